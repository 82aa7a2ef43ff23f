//! Token configuration: metadata, collaborating contract addresses,
//! verification requirements, and the ordered compliance-module list.

use smart_interfaces::{ComplianceModuleClient, ModuleParamPair};
use soroban_sdk::{symbol_short, Address, Bytes, Env, String, Vec};

use crate::error::TokenError;
use crate::DataKey;

pub fn set_metadata(env: &Env, name: &String, symbol: &String, decimals: u32) {
    env.storage().instance().set(&DataKey::Name, name);
    env.storage().instance().set(&DataKey::TokenSymbol, symbol);
    env.storage().instance().set(&DataKey::Decimals, &decimals);
}

pub fn name(env: &Env) -> Result<String, TokenError> {
    env.storage().instance().get(&DataKey::Name).ok_or(TokenError::NotInitialized)
}

pub fn symbol(env: &Env) -> Result<String, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::TokenSymbol)
        .ok_or(TokenError::NotInitialized)
}

pub fn decimals(env: &Env) -> Result<u32, TokenError> {
    env.storage().instance().get(&DataKey::Decimals).ok_or(TokenError::NotInitialized)
}

pub fn identity_registry(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::IdentityRegistry)
        .ok_or(TokenError::NotInitialized)
}

pub fn trusted_issuers_registry(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::TrustedIssuersRegistry)
        .ok_or(TokenError::NotInitialized)
}

pub fn compliance(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::ComplianceContract)
        .ok_or(TokenError::NotInitialized)
}

pub fn token_identity(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::TokenIdentity)
        .ok_or(TokenError::NotInitialized)
}

pub fn set_identity_registry(env: &Env, registry: &Address) {
    env.storage().instance().set(&DataKey::IdentityRegistry, registry);
}

pub fn set_trusted_issuers_registry(env: &Env, registry: &Address) {
    env.storage().instance().set(&DataKey::TrustedIssuersRegistry, registry);
}

pub fn set_compliance(env: &Env, compliance: &Address) {
    env.storage().instance().set(&DataKey::ComplianceContract, compliance);
}

pub fn set_token_identity(env: &Env, identity: &Address) {
    env.storage().instance().set(&DataKey::TokenIdentity, identity);
}

pub fn required_claim_topics(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&DataKey::RequiredTopics)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_required_claim_topics(env: &Env, topics: &Vec<u32>) {
    env.storage().instance().set(&DataKey::RequiredTopics, topics);
}

pub fn collateral_topic(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::CollateralTopic)
}

pub fn set_collateral_topic(env: &Env, topic: u32) {
    env.storage().instance().set(&DataKey::CollateralTopic, &topic);
}

// Pause flag

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// Compliance-module list. Ordered; a module appears at most once; params
// are validated by the module itself at attach time.

pub fn modules(env: &Env) -> Vec<ModuleParamPair> {
    env.storage()
        .instance()
        .get(&DataKey::Modules)
        .unwrap_or_else(|| Vec::new(env))
}

fn module_position(list: &Vec<ModuleParamPair>, module: &Address) -> Option<u32> {
    for (i, pair) in list.iter().enumerate() {
        if pair.module == *module {
            return Some(i as u32);
        }
    }
    None
}

fn validate_params(env: &Env, module: &Address, params: &Bytes) -> Result<(), TokenError> {
    let client = ComplianceModuleClient::new(env, module);
    match client.try_validate_parameters(params) {
        Ok(Ok(())) => Ok(()),
        _ => Err(TokenError::InvalidModuleParams),
    }
}

pub fn add_module(env: &Env, module: &Address, params: &Bytes) -> Result<(), TokenError> {
    let mut list = modules(env);
    if module_position(&list, module).is_some() {
        return Err(TokenError::ModuleAlreadyAdded);
    }
    validate_params(env, module, params)?;
    list.push_back(ModuleParamPair {
        module: module.clone(),
        params: params.clone(),
    });
    env.storage().instance().set(&DataKey::Modules, &list);
    env.events()
        .publish((symbol_short!("token"), symbol_short!("mod_add")), module.clone());
    Ok(())
}

pub fn remove_module(env: &Env, module: &Address) -> Result<(), TokenError> {
    let mut list = modules(env);
    let position = module_position(&list, module).ok_or(TokenError::ModuleNotFound)?;
    list.remove(position);
    env.storage().instance().set(&DataKey::Modules, &list);
    env.events()
        .publish((symbol_short!("token"), symbol_short!("mod_rm")), module.clone());
    Ok(())
}

pub fn set_module_params(env: &Env, module: &Address, params: &Bytes) -> Result<(), TokenError> {
    let mut list = modules(env);
    let position = module_position(&list, module).ok_or(TokenError::ModuleNotFound)?;
    validate_params(env, module, params)?;
    list.set(
        position,
        ModuleParamPair {
            module: module.clone(),
            params: params.clone(),
        },
    );
    env.storage().instance().set(&DataKey::Modules, &list);
    Ok(())
}
