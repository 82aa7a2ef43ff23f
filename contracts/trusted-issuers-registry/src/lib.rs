#![no_std]

//! Registry of claim issuers trusted to attest given claim topics. Keeps a
//! reverse index topic -> issuers with a stored position per (topic, issuer)
//! so membership checks and removals are O(1) (swap-and-pop).

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Vec,
};

mod index;


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum IssuersError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    IssuerAlreadyExists = 4,
    IssuerDoesNotExist = 5,
    EmptyClaimTopics = 6,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustedIssuer {
    pub issuer: Address,
    pub claim_topics: Vec<u32>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Issuer(Address),
    IssuerList,
    /// topic -> ordered issuer list (the reverse index).
    TopicIssuers(u32),
    /// (topic, issuer) -> position in `TopicIssuers` plus one. Zero/absent
    /// means not listed.
    TopicIndex(u32, Address),
}

fn require_registrar(env: &Env, operator: &Address) -> Result<(), IssuersError> {
    operator.require_auth();
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(IssuersError::NotInitialized)?;
    if *operator != owner {
        return Err(IssuersError::Unauthorized);
    }
    Ok(())
}

fn issuer_record(env: &Env, issuer: &Address) -> Option<TrustedIssuer> {
    env.storage().persistent().get(&DataKey::Issuer(issuer.clone()))
}

/// Collapse repeated topics, keeping first-occurrence order. The reverse
/// index stores one position per (topic, issuer), so a duplicate would leave
/// a stale list entry behind on removal.
fn dedupe_topics(env: &Env, claim_topics: &Vec<u32>) -> Vec<u32> {
    let mut unique = Vec::new(env);
    for topic in claim_topics.iter() {
        if !unique.contains(&topic) {
            unique.push_back(topic);
        }
    }
    unique
}

#[contract]
pub struct TrustedIssuersRegistry;

#[contractimpl]
impl TrustedIssuersRegistry {
    pub fn initialize(env: Env, owner: Address) -> Result<(), IssuersError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(IssuersError::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    pub fn add_trusted_issuer(
        env: Env,
        operator: Address,
        issuer: Address,
        claim_topics: Vec<u32>,
    ) -> Result<(), IssuersError> {
        require_registrar(&env, &operator)?;
        if claim_topics.is_empty() {
            return Err(IssuersError::EmptyClaimTopics);
        }
        if issuer_record(&env, &issuer).is_some() {
            return Err(IssuersError::IssuerAlreadyExists);
        }
        let claim_topics = dedupe_topics(&env, &claim_topics);

        for topic in claim_topics.iter() {
            index::append(&env, topic, &issuer);
        }
        env.storage().persistent().set(
            &DataKey::Issuer(issuer.clone()),
            &TrustedIssuer {
                issuer: issuer.clone(),
                claim_topics: claim_topics.clone(),
            },
        );

        let mut all: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::IssuerList)
            .unwrap_or_else(|| Vec::new(&env));
        all.push_back(issuer.clone());
        env.storage().instance().set(&DataKey::IssuerList, &all);

        env.events().publish(
            (symbol_short!("tir"), symbol_short!("added")),
            (operator, issuer, claim_topics),
        );
        Ok(())
    }

    pub fn remove_trusted_issuer(
        env: Env,
        operator: Address,
        issuer: Address,
    ) -> Result<(), IssuersError> {
        require_registrar(&env, &operator)?;
        let record = issuer_record(&env, &issuer).ok_or(IssuersError::IssuerDoesNotExist)?;

        // Unwind every topic-index entry before dropping the primary record.
        for topic in record.claim_topics.iter() {
            index::remove(&env, topic, &issuer);
        }
        env.storage().persistent().remove(&DataKey::Issuer(issuer.clone()));

        let all: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::IssuerList)
            .unwrap_or_else(|| Vec::new(&env));
        if let Some(pos) = all.first_index_of(&issuer) {
            let mut all = all;
            all.remove(pos);
            env.storage().instance().set(&DataKey::IssuerList, &all);
        }

        env.events().publish(
            (symbol_short!("tir"), symbol_short!("removed")),
            (operator, issuer),
        );
        Ok(())
    }

    /// Replace an issuer's topic set. Repeated topics collapse to one entry
    /// so removal can fully unwind the reverse index later.
    pub fn update_issuer_claim_topics(
        env: Env,
        operator: Address,
        issuer: Address,
        claim_topics: Vec<u32>,
    ) -> Result<(), IssuersError> {
        require_registrar(&env, &operator)?;
        if claim_topics.is_empty() {
            return Err(IssuersError::EmptyClaimTopics);
        }
        let mut record = issuer_record(&env, &issuer).ok_or(IssuersError::IssuerDoesNotExist)?;
        let claim_topics = dedupe_topics(&env, &claim_topics);

        for topic in record.claim_topics.iter() {
            index::remove(&env, topic, &issuer);
        }
        for topic in claim_topics.iter() {
            index::append(&env, topic, &issuer);
        }
        record.claim_topics = claim_topics.clone();
        env.storage().persistent().set(&DataKey::Issuer(issuer.clone()), &record);

        env.events().publish(
            (symbol_short!("tir"), symbol_short!("topics_up")),
            (operator, issuer, claim_topics),
        );
        Ok(())
    }

    pub fn get_trusted_issuers(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::IssuerList)
            .unwrap_or_else(|| Vec::new(&env))
    }

    pub fn get_issuers_for_claim_topic(env: Env, claim_topic: u32) -> Vec<Address> {
        index::issuers_for(&env, claim_topic)
    }

    pub fn is_trusted_issuer(env: Env, issuer: Address) -> bool {
        issuer_record(&env, &issuer).is_some()
    }

    pub fn has_claim_topic(env: Env, issuer: Address, claim_topic: u32) -> bool {
        index::contains(&env, claim_topic, &issuer)
    }

    pub fn get_trusted_issuer_claim_topics(
        env: Env,
        issuer: Address,
    ) -> Result<Vec<u32>, IssuersError> {
        issuer_record(&env, &issuer)
            .map(|record| record.claim_topics)
            .ok_or(IssuersError::IssuerDoesNotExist)
    }
}
