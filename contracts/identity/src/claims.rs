use smart_interfaces::{claim_id, Claim};
use soroban_sdk::{symbol_short, Address, Bytes, BytesN, Env};

use crate::error::IdentityError;
use crate::DataKey;

pub fn add_claim(
    env: &Env,
    topic: u32,
    issuer: Address,
    signature: Bytes,
    data: Bytes,
) -> Result<BytesN<32>, IdentityError> {
    if signature.is_empty() {
        return Err(IdentityError::EmptySignature);
    }

    let id = claim_id(env, &issuer, topic);
    let claim = Claim {
        topic,
        issuer: issuer.clone(),
        signature,
        data,
    };
    // One claim per (issuer, topic); re-adding overwrites the previous claim.
    env.storage().persistent().set(&DataKey::Claim(id.clone()), &claim);

    env.events().publish(
        (symbol_short!("identity"), symbol_short!("claim_add")),
        (id.clone(), topic, issuer),
    );

    Ok(id)
}

pub fn remove_claim(env: &Env, id: BytesN<32>) -> Result<(), IdentityError> {
    let key = DataKey::Claim(id.clone());
    let claim: Claim = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(IdentityError::ClaimNotFound)?;

    env.storage().persistent().remove(&key);

    env.events().publish(
        (symbol_short!("identity"), symbol_short!("claim_rm")),
        (id, claim.topic, claim.issuer),
    );

    Ok(())
}

pub fn get_claim(env: &Env, id: BytesN<32>) -> Option<Claim> {
    env.storage().persistent().get(&DataKey::Claim(id))
}
