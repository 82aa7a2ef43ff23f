#![cfg(test)]

use super::*;
use identity_contract::{IdentityContract, IdentityContractClient};
use identity_registry_storage::{IdentityRegistryStorage, IdentityRegistryStorageClient};
use soroban_sdk::{testutils::Address as _, vec, Address, Bytes, Env};
use trusted_issuers_registry::{TrustedIssuersRegistry, TrustedIssuersRegistryClient};

const KYC: u32 = 1;
const AML: u32 = 2;

struct Setup<'a> {
    env: Env,
    owner: Address,
    registry: IdentityRegistryClient<'a>,
    storage: IdentityRegistryStorageClient<'a>,
    issuers: TrustedIssuersRegistryClient<'a>,
}

fn setup() -> Setup<'static> {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);

    let storage_id = env.register_contract(None, IdentityRegistryStorage);
    let storage = IdentityRegistryStorageClient::new(&env, &storage_id);
    storage.initialize(&owner);

    let issuers_id = env.register_contract(None, TrustedIssuersRegistry);
    let issuers = TrustedIssuersRegistryClient::new(&env, &issuers_id);
    issuers.initialize(&owner);

    let registry_id = env.register_contract(None, IdentityRegistry);
    let registry = IdentityRegistryClient::new(&env, &registry_id);
    registry.initialize(&owner, &storage_id, &issuers_id);
    storage.bind_registry(&owner, &registry_id);

    Setup {
        env,
        owner,
        registry,
        storage,
        issuers,
    }
}

/// Deploys an identity contract owned by `owner`.
fn deploy_identity(env: &Env, owner: &Address) -> (Address, IdentityContractClient<'static>) {
    let id = env.register_contract(None, IdentityContract);
    let client = IdentityContractClient::new(env, &id);
    client.initialize(owner);
    (id, client)
}

/// Issues a claim for `topic` on `holder_identity`, attested by the issuer
/// identity contract at `issuer`.
fn issue_claim(
    env: &Env,
    holder: &IdentityContractClient,
    holder_owner: &Address,
    issuer: &Address,
    topic: u32,
    signature: &[u8],
) {
    holder.add_claim(
        holder_owner,
        &topic,
        issuer,
        &Bytes::from_slice(env, signature),
        &Bytes::new(env),
    );
}

#[test]
fn unregistered_wallet_is_never_verified() {
    let s = setup();
    let wallet = Address::generate(&s.env);

    assert!(!s.registry.contains(&wallet));
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env]));
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC]));

    let err = s.registry.try_identity(&wallet).unwrap_err().unwrap();
    assert_eq!(err, RegistryError::IdentityNotRegistered);
    let err = s.registry.try_investor_country(&wallet).unwrap_err().unwrap();
    assert_eq!(err, RegistryError::IdentityNotRegistered);
}

#[test]
fn register_and_lookup() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);

    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);

    assert!(s.registry.contains(&wallet));
    assert_eq!(s.registry.identity(&wallet), identity_id);
    assert_eq!(s.registry.investor_country(&wallet), 840);
    assert_eq!(s.registry.country_of(&wallet), Some(840));

    // Empty requirement is trivially satisfied for a registered wallet.
    assert!(s.registry.is_verified(&wallet, &vec![&s.env]));

    let err = s
        .registry
        .try_register_identity(&s.owner, &wallet, &identity_id, &840)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, RegistryError::IdentityAlreadyRegistered);
}

#[test]
fn verification_requires_trusted_claim() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, holder) = deploy_identity(&s.env, &holder_owner);
    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);

    // No claims issued yet.
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC]));

    let issuer_owner = Address::generate(&s.env);
    let (issuer_id, _issuer) = deploy_identity(&s.env, &issuer_owner);
    s.issuers.add_trusted_issuer(&s.owner, &issuer_id, &vec![&s.env, KYC]);

    // Still no claim on the holder identity.
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC]));

    issue_claim(&s.env, &holder, &holder_owner, &issuer_id, KYC, &[1, 2, 3]);
    assert!(s.registry.is_verified(&wallet, &vec![&s.env, KYC]));

    // A second required topic with no claim short-circuits to false.
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC, AML]));
}

#[test]
fn claim_from_untrusted_issuer_does_not_verify() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, holder) = deploy_identity(&s.env, &holder_owner);
    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);

    let rogue_owner = Address::generate(&s.env);
    let (rogue_id, _) = deploy_identity(&s.env, &rogue_owner);
    issue_claim(&s.env, &holder, &holder_owner, &rogue_id, KYC, &[1]);

    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC]));
}

#[test]
fn revoked_signature_invalidates_claim() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, holder) = deploy_identity(&s.env, &holder_owner);
    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);

    let issuer_owner = Address::generate(&s.env);
    let (issuer_id, issuer) = deploy_identity(&s.env, &issuer_owner);
    s.issuers.add_trusted_issuer(&s.owner, &issuer_id, &vec![&s.env, KYC]);

    issue_claim(&s.env, &holder, &holder_owner, &issuer_id, KYC, &[7, 7]);
    assert!(s.registry.is_verified(&wallet, &vec![&s.env, KYC]));

    issuer.revoke_claim_signature(&issuer_owner, &Bytes::from_slice(&s.env, &[7, 7]));
    assert!(!s.registry.is_verified(&wallet, &vec![&s.env, KYC]));
}

#[test]
fn any_trusted_issuer_satisfies_a_topic() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, holder) = deploy_identity(&s.env, &holder_owner);
    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);

    let owner_a = Address::generate(&s.env);
    let (issuer_a, _) = deploy_identity(&s.env, &owner_a);
    let owner_b = Address::generate(&s.env);
    let (issuer_b, _) = deploy_identity(&s.env, &owner_b);
    s.issuers.add_trusted_issuer(&s.owner, &issuer_a, &vec![&s.env, KYC]);
    s.issuers.add_trusted_issuer(&s.owner, &issuer_b, &vec![&s.env, KYC]);

    // Only the second issuer has attested the holder.
    issue_claim(&s.env, &holder, &holder_owner, &issuer_b, KYC, &[9]);
    assert!(s.registry.is_verified(&wallet, &vec![&s.env, KYC]));
}

#[test]
fn update_identity_and_country() {
    let s = setup();
    let wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);
    let (identity_id2, _) = deploy_identity(&s.env, &holder_owner);

    s.registry.register_identity(&s.owner, &wallet, &identity_id, &840);
    s.registry.update_identity(&s.owner, &wallet, &identity_id2);
    assert_eq!(s.registry.identity(&wallet), identity_id2);

    s.registry.update_country(&s.owner, &wallet, &250);
    assert_eq!(s.registry.investor_country(&wallet), 250);

    s.registry.delete_identity(&s.owner, &wallet);
    assert!(!s.registry.contains(&wallet));
}

#[test]
fn batch_register_checks_lengths() {
    let s = setup();
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);
    let w1 = Address::generate(&s.env);
    let w2 = Address::generate(&s.env);

    let err = s
        .registry
        .try_batch_register_identity(
            &s.owner,
            &vec![&s.env, w1.clone(), w2.clone()],
            &vec![&s.env, identity_id.clone()],
            &vec![&s.env, 840u32, 250u32],
        )
        .unwrap_err()
        .unwrap();
    assert_eq!(err, RegistryError::ArrayLengthMismatch);

    s.registry.batch_register_identity(
        &s.owner,
        &vec![&s.env, w1.clone(), w2.clone()],
        &vec![&s.env, identity_id.clone(), identity_id.clone()],
        &vec![&s.env, 840u32, 250u32],
    );
    assert_eq!(s.registry.investor_country(&w1), 840);
    assert_eq!(s.registry.investor_country(&w2), 250);
}

#[test]
fn recover_identity_round_trip() {
    let s = setup();
    let old_wallet = Address::generate(&s.env);
    let new_wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);

    s.registry.register_identity(&s.owner, &old_wallet, &identity_id, &840);
    s.registry.recover_identity(&s.owner, &old_wallet, &new_wallet, &identity_id);

    assert!(!s.registry.contains(&old_wallet));
    assert!(!s.registry.is_verified(&old_wallet, &vec![&s.env]));
    assert!(s.registry.is_verified(&new_wallet, &vec![&s.env]));
    assert!(s.registry.is_wallet_lost(&old_wallet));
    assert_eq!(s.registry.recovered_wallet(&old_wallet), Some(new_wallet.clone()));
    // Country inherited from the old record.
    assert_eq!(s.registry.investor_country(&new_wallet), 840);
}

#[test]
fn recover_into_registered_wallet_merges_same_identity_only() {
    let s = setup();
    let old_wallet = Address::generate(&s.env);
    let new_wallet = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);
    let (other_identity, _) = deploy_identity(&s.env, &holder_owner);

    s.registry.register_identity(&s.owner, &old_wallet, &identity_id, &840);
    // New wallet already registered to the same identity with its own country.
    s.registry.register_identity(&s.owner, &new_wallet, &identity_id, &250);

    s.registry.recover_identity(&s.owner, &old_wallet, &new_wallet, &identity_id);
    // Merge keeps the new wallet's country.
    assert_eq!(s.registry.investor_country(&new_wallet), 250);

    // A wallet registered to a different identity cannot be a target.
    let third = Address::generate(&s.env);
    let victim = Address::generate(&s.env);
    s.registry.register_identity(&s.owner, &third, &other_identity, &840);
    s.registry.register_identity(&s.owner, &victim, &identity_id, &840);
    let err = s
        .registry
        .try_recover_identity(&s.owner, &victim, &third, &identity_id)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, RegistryError::IdentityAlreadyRegistered);
}

#[test]
fn lost_wallet_cannot_be_recovered_twice() {
    let s = setup();
    let old_wallet = Address::generate(&s.env);
    let new_wallet = Address::generate(&s.env);
    let third = Address::generate(&s.env);
    let holder_owner = Address::generate(&s.env);
    let (identity_id, _) = deploy_identity(&s.env, &holder_owner);

    s.registry.register_identity(&s.owner, &old_wallet, &identity_id, &840);
    s.registry.recover_identity(&s.owner, &old_wallet, &new_wallet, &identity_id);

    // Old wallet has no record any more.
    let err = s
        .registry
        .try_recover_identity(&s.owner, &old_wallet, &third, &identity_id)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, RegistryError::IdentityNotRegistered);

    // A lost wallet cannot be a recovery target either.
    s.registry.register_identity(&s.owner, &third, &identity_id, &840);
    let err = s
        .registry
        .try_recover_identity(&s.owner, &third, &old_wallet, &identity_id)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, RegistryError::WalletAlreadyMarkedAsLost);
}
