//! Collateral gate for minting: the token's own identity must carry a
//! valid, unexpired collateral claim from a trusted issuer covering the
//! total supply after the pending mint.

use smart_interfaces::{claim_id, ClaimData, ClaimIssuerClient, IdentityClient, TrustedIssuersClient};
use soroban_sdk::{xdr::FromXdr, Address, Env};

use crate::error::TokenError;
use crate::{balances, config};

/// Any single sufficient claim passes; claims are not summed and the
/// maximum is not required. No configured collateral topic means minting
/// is ungated.
pub fn check_mint(env: &Env, amount: i128) -> Result<(), TokenError> {
    let Some(topic) = config::collateral_topic(env) else {
        return Ok(());
    };
    let token_identity = config::token_identity(env)?;
    let issuers_registry = config::trusted_issuers_registry(env)?;
    let required = balances::total_supply(env) + amount;
    let now = env.ledger().timestamp();

    let issuers = TrustedIssuersClient::new(env, &issuers_registry)
        .get_issuers_for_claim_topic(&topic);
    let identity_client = IdentityClient::new(env, &token_identity);

    for issuer in issuers.iter() {
        let Some(attested) = attested_amount(env, &identity_client, &token_identity, &issuer, topic, now)
        else {
            continue;
        };
        if attested >= required {
            return Ok(());
        }
    }
    Err(TokenError::InsufficientCollateral)
}

/// Highest valid attested amount right now, zero when nothing attests or no
/// collateral topic is configured. Error enums carry no payload, so callers
/// hitting `InsufficientCollateral` read the shortfall from here (required
/// is total supply plus the pending mint).
pub fn attested_collateral(env: &Env) -> Result<i128, TokenError> {
    let Some(topic) = config::collateral_topic(env) else {
        return Ok(0);
    };
    let token_identity = config::token_identity(env)?;
    let issuers_registry = config::trusted_issuers_registry(env)?;
    let now = env.ledger().timestamp();

    let issuers = TrustedIssuersClient::new(env, &issuers_registry)
        .get_issuers_for_claim_topic(&topic);
    let identity_client = IdentityClient::new(env, &token_identity);

    let mut best = 0;
    for issuer in issuers.iter() {
        let Some(attested) = attested_amount(env, &identity_client, &token_identity, &issuer, topic, now)
        else {
            continue;
        };
        if attested > best {
            best = attested;
        }
    }
    Ok(best)
}

fn attested_amount(
    env: &Env,
    identity_client: &IdentityClient,
    token_identity: &Address,
    issuer: &Address,
    topic: u32,
    now: u64,
) -> Option<i128> {
    let id = claim_id(env, issuer, topic);
    let claim = match identity_client.try_get_claim(&id) {
        Ok(Ok(Some(claim))) => claim,
        _ => return None,
    };
    if claim.issuer != *issuer || claim.topic != topic {
        return None;
    }
    let issuer_client = ClaimIssuerClient::new(env, issuer);
    match issuer_client.try_is_claim_valid(token_identity, &topic, &claim.signature, &claim.data) {
        Ok(Ok(true)) => {}
        _ => return None,
    }
    let data = ClaimData::from_xdr(env, &claim.data).ok()?;
    if data.expiry <= now {
        return None;
    }
    Some(data.amount)
}
