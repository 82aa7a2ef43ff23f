//! Reverse index topic -> issuers. Each listed (topic, issuer) pair stores
//! its array position plus one, so membership is a single read and removal
//! is swap-and-pop: the last element moves into the vacated slot and its
//! stored position is rewritten in the same call.

use soroban_sdk::{Address, Env, Vec};

use crate::DataKey;

pub fn issuers_for(env: &Env, topic: u32) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::TopicIssuers(topic))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn contains(env: &Env, topic: u32, issuer: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::TopicIndex(topic, issuer.clone()))
}

pub fn append(env: &Env, topic: u32, issuer: &Address) {
    let mut issuers = issuers_for(env, topic);
    issuers.push_back(issuer.clone());
    env.storage()
        .persistent()
        .set(&DataKey::TopicIssuers(topic), &issuers);
    env.storage()
        .persistent()
        .set(&DataKey::TopicIndex(topic, issuer.clone()), &issuers.len());
}

pub fn remove(env: &Env, topic: u32, issuer: &Address) {
    let index_key = DataKey::TopicIndex(topic, issuer.clone());
    let stored: Option<u32> = env.storage().persistent().get(&index_key);
    let Some(position_plus_one) = stored else {
        return;
    };
    let position = position_plus_one - 1;

    let mut issuers = issuers_for(env, topic);
    let last = issuers.len() - 1;
    if position != last {
        let moved = issuers.get_unchecked(last);
        issuers.set(position, moved.clone());
        env.storage()
            .persistent()
            .set(&DataKey::TopicIndex(topic, moved), &(position + 1));
    }
    issuers.pop_back();
    env.storage()
        .persistent()
        .set(&DataKey::TopicIssuers(topic), &issuers);
    env.storage().persistent().remove(&index_key);
}
