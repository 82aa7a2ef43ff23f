#![no_std]

//! Shared data structures and cross-contract clients for the permissioned
//! token suite. Every seam between contracts (identity, claim issuer,
//! identity registry, compliance module) is a `contractclient` trait here so
//! callers get typed invocations and `try_` variants at trust boundaries.

use soroban_sdk::{
    contractclient, contracterror, contracttype, xdr::ToXdr, Address, Bytes, BytesN, Env, String,
    Vec,
};

/// A claim held on an identity contract. `data` is an opaque payload whose
/// meaning depends on the topic (collateral claims carry an XDR-encoded
/// [`ClaimData`]).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Claim {
    pub topic: u32,
    pub issuer: Address,
    pub signature: Bytes,
    pub data: Bytes,
}

/// Payload of a collateral-proof claim: attested amount and expiry timestamp.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimData {
    pub amount: i128,
    pub expiry: u64,
}

/// One entry of a token's ordered compliance pipeline: a module contract and
/// the opaque parameter blob that module interprets for this token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleParamPair {
    pub module: Address,
    pub params: Bytes,
}

/// Parameter payload of the country allow-list module, XDR-encoded into
/// `ModuleParamPair::params`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CountryParams {
    pub allowed: Vec<u32>,
}

/// Errors a compliance module may raise. Shared by every module
/// implementation so the aggregator can decode rejections uniformly.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum ModuleError {
    CheckFailed = 1,
    InvalidParams = 2,
    CountryNotAllowed = 3,
    ReceiverNotRegistered = 4,
}

/// Deterministic claim id: `sha256(xdr(issuer) ++ be(topic))`. One claim per
/// (issuer, topic) pair on any given identity.
pub fn claim_id(env: &Env, issuer: &Address, topic: u32) -> BytesN<32> {
    let mut preimage = Bytes::new(env);
    preimage.append(&issuer.clone().to_xdr(env));
    preimage.extend_from_array(&topic.to_be_bytes());
    env.crypto().sha256(&preimage).into()
}

/// Claim-holder surface of an identity contract.
#[contractclient(name = "IdentityClient")]
pub trait IdentityInterface {
    fn get_claim(env: Env, claim_id: BytesN<32>) -> Option<Claim>;
}

/// Claim-issuer surface of an identity contract. The concrete signature
/// scheme is opaque to callers; a lookup or validation failure is treated as
/// "claim not valid", never as a hard error.
#[contractclient(name = "ClaimIssuerClient")]
pub trait ClaimIssuerInterface {
    fn is_claim_valid(
        env: Env,
        identity: Address,
        claim_topic: u32,
        signature: Bytes,
        data: Bytes,
    ) -> bool;
}

/// Reads the token and compliance modules need from the identity registry.
#[contractclient(name = "IdentityRegistryClient")]
pub trait IdentityRegistryInterface {
    fn is_verified(env: Env, wallet: Address, required_topics: Vec<u32>) -> bool;
    fn contains(env: Env, wallet: Address) -> bool;
    fn country_of(env: Env, wallet: Address) -> Option<u32>;
    fn is_wallet_lost(env: Env, wallet: Address) -> bool;
    fn recovered_wallet(env: Env, wallet: Address) -> Option<Address>;
}

/// Write/read surface the identity registry uses against its storage
/// contract. Precondition checks happen in the registry, so the plain client
/// is used on the write path; a storage-side rejection traps the transaction,
/// which preserves atomicity.
#[contractclient(name = "IdentityStorageClient")]
pub trait IdentityStorageInterface {
    fn add_identity(env: Env, caller: Address, wallet: Address, identity: Address, country: u32);
    fn modify_stored_identity(env: Env, caller: Address, wallet: Address, identity: Address);
    fn modify_stored_country(env: Env, caller: Address, wallet: Address, country: u32);
    fn remove_identity(env: Env, caller: Address, wallet: Address);
    fn stored_identity(env: Env, wallet: Address) -> Option<Address>;
    fn stored_country(env: Env, wallet: Address) -> Option<u32>;
    fn contains(env: Env, wallet: Address) -> bool;
}

/// Trusted-issuers lookups consumed by the identity registry and the token's
/// collateral check.
#[contractclient(name = "TrustedIssuersClient")]
pub trait TrustedIssuersInterface {
    fn get_issuers_for_claim_topic(env: Env, claim_topic: u32) -> Vec<Address>;
    fn is_trusted_issuer(env: Env, issuer: Address) -> bool;
    fn has_claim_topic(env: Env, issuer: Address, claim_topic: u32) -> bool;
}

/// The contract every compliance module implements. `can_transfer` is a view
/// check; the `on_*` hooks are post-mutation notifications. `from`/`to` are
/// `None` for mints and burns respectively.
#[contractclient(name = "ComplianceModuleClient")]
pub trait ComplianceModuleInterface {
    fn can_transfer(
        env: Env,
        token: Address,
        from: Option<Address>,
        to: Option<Address>,
        amount: i128,
        params: Bytes,
    ) -> Result<(), ModuleError>;
    fn on_transferred(env: Env, token: Address, from: Address, to: Address, amount: i128, params: Bytes);
    fn on_created(env: Env, token: Address, to: Address, amount: i128, params: Bytes);
    fn on_destroyed(env: Env, token: Address, from: Address, amount: i128, params: Bytes);
    fn validate_parameters(env: Env, params: Bytes) -> Result<(), ModuleError>;
    fn name(env: Env) -> String;
}

/// Aggregator surface the token calls around every balance mutation. The
/// ordered module list is owned by the token and passed with each call; the
/// aggregator stores nothing per token.
#[contractclient(name = "ComplianceClient")]
pub trait ComplianceInterface {
    fn can_transfer(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        from: Option<Address>,
        to: Option<Address>,
        amount: i128,
    );
    fn transferred(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        from: Address,
        to: Address,
        amount: i128,
    );
    fn created(env: Env, token: Address, modules: Vec<ModuleParamPair>, to: Address, amount: i128);
    fn destroyed(env: Env, token: Address, modules: Vec<ModuleParamPair>, from: Address, amount: i128);
}
