use soroban_sdk::{symbol_short, Address, Bytes, Env};

use crate::DataKey;

/// Claim-issuer side of the identity. The concrete signature scheme is
/// opaque to the rest of the system: a signature is valid while it is
/// non-empty and the issuer has not revoked it.
pub fn is_claim_valid(
    env: &Env,
    _identity: &Address,
    _claim_topic: u32,
    signature: &Bytes,
    _data: &Bytes,
) -> bool {
    if signature.is_empty() {
        return false;
    }
    !is_revoked(env, signature)
}

pub fn revoke_signature(env: &Env, signature: &Bytes) {
    env.storage()
        .persistent()
        .set(&DataKey::Revoked(signature.clone()), &true);

    env.events().publish(
        (symbol_short!("identity"), symbol_short!("sig_rvk")),
        signature.clone(),
    );
}

pub fn is_revoked(env: &Env, signature: &Bytes) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Revoked(signature.clone()))
        .unwrap_or(false)
}
