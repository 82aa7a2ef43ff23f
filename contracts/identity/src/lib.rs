#![no_std]

//! On-chain identity: holds the claims attested to its owner, keyed by the
//! deterministic id `sha256(issuer ++ topic)`. An identity that attests
//! claims for others (a claim issuer) uses the same contract; the issuer
//! surface is `is_claim_valid` plus signature revocation.

use smart_interfaces::Claim;
use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, BytesN, Env};

mod claims;
mod error;
mod issuer;


pub use error::IdentityError;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Claim(BytesN<32>),
    Revoked(Bytes),
}

fn owner(env: &Env) -> Result<Address, IdentityError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(IdentityError::NotInitialized)
}

fn require_owner(env: &Env, operator: &Address) -> Result<(), IdentityError> {
    operator.require_auth();
    if *operator != owner(env)? {
        return Err(IdentityError::Unauthorized);
    }
    Ok(())
}

#[contract]
pub struct IdentityContract;

#[contractimpl]
impl IdentityContract {
    pub fn initialize(env: Env, owner: Address) -> Result<(), IdentityError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(IdentityError::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    /// Add (or replace) the claim attested by `issuer` for `topic`.
    pub fn add_claim(
        env: Env,
        operator: Address,
        topic: u32,
        issuer: Address,
        signature: Bytes,
        data: Bytes,
    ) -> Result<BytesN<32>, IdentityError> {
        require_owner(&env, &operator)?;
        claims::add_claim(&env, topic, issuer, signature, data)
    }

    pub fn remove_claim(
        env: Env,
        operator: Address,
        claim_id: BytesN<32>,
    ) -> Result<(), IdentityError> {
        require_owner(&env, &operator)?;
        claims::remove_claim(&env, claim_id)
    }

    pub fn get_claim(env: Env, claim_id: BytesN<32>) -> Option<Claim> {
        claims::get_claim(&env, claim_id)
    }

    // Claim-issuer surface.

    pub fn is_claim_valid(
        env: Env,
        identity: Address,
        claim_topic: u32,
        signature: Bytes,
        data: Bytes,
    ) -> bool {
        issuer::is_claim_valid(&env, &identity, claim_topic, &signature, &data)
    }

    /// Revoke a previously issued claim signature. Every claim carrying this
    /// signature stops verifying, on any identity.
    pub fn revoke_claim_signature(
        env: Env,
        operator: Address,
        signature: Bytes,
    ) -> Result<(), IdentityError> {
        require_owner(&env, &operator)?;
        if signature.is_empty() {
            return Err(IdentityError::EmptySignature);
        }
        issuer::revoke_signature(&env, &signature);
        Ok(())
    }

    pub fn is_signature_revoked(env: Env, signature: Bytes) -> bool {
        issuer::is_revoked(&env, &signature)
    }

    pub fn get_owner(env: Env) -> Result<Address, IdentityError> {
        owner(&env)
    }
}
