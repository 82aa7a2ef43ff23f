//! The verification engine: does a wallet's identity carry a valid,
//! trust-anchored claim for every required topic?

use smart_interfaces::{claim_id, ClaimIssuerClient, IdentityClient, TrustedIssuersClient};
use soroban_sdk::{Address, Env, Vec};

/// Checks topics in argument order and short-circuits to `false` on the
/// first topic with no valid claim. A missing claim, a mismatched claim, or
/// an issuer whose validity call fails all mean "try the next issuer";
/// one misbehaving issuer must not break verification for the topic.
pub fn has_required_claims(
    env: &Env,
    identity: &Address,
    issuers_registry: &Address,
    required_topics: &Vec<u32>,
) -> bool {
    let issuers_client = TrustedIssuersClient::new(env, issuers_registry);

    for topic in required_topics.iter() {
        let issuers = issuers_client.get_issuers_for_claim_topic(&topic);
        if !topic_satisfied(env, identity, topic, &issuers) {
            return false;
        }
    }
    true
}

fn topic_satisfied(env: &Env, identity: &Address, topic: u32, issuers: &Vec<Address>) -> bool {
    let identity_client = IdentityClient::new(env, identity);

    for issuer in issuers.iter() {
        let id = claim_id(env, &issuer, topic);
        let claim = match identity_client.try_get_claim(&id) {
            Ok(Ok(Some(claim))) => claim,
            _ => continue,
        };
        if claim.issuer != issuer || claim.topic != topic {
            continue;
        }
        let issuer_client = ClaimIssuerClient::new(env, &issuer);
        match issuer_client.try_is_claim_valid(identity, &topic, &claim.signature, &claim.data) {
            Ok(Ok(true)) => return true,
            _ => continue,
        }
    }
    false
}
