#![no_std]

//! Compliance module gating transfers on the receiver's country. One
//! deployment serves many tokens: the allow-list arrives as opaque params
//! (XDR-encoded [`CountryParams`]) with every call. The module keeps
//! per-(token, country) exposure counters from the notification hooks.

use smart_interfaces::{CountryParams, IdentityRegistryClient, ModuleError};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, xdr::FromXdr, Address,
    Bytes, Env, String,
};


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum CountryModuleError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    IdentityRegistry,
    /// Running balance-exposure per (token, country).
    Exposure(Address, u32),
}

fn require_owner(env: &Env, operator: &Address) -> Result<(), CountryModuleError> {
    operator.require_auth();
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(CountryModuleError::NotInitialized)?;
    if *operator != owner {
        return Err(CountryModuleError::Unauthorized);
    }
    Ok(())
}

fn identity_registry(env: &Env) -> Result<Address, ModuleError> {
    env.storage()
        .instance()
        .get(&DataKey::IdentityRegistry)
        .ok_or(ModuleError::CheckFailed)
}

fn decode_params(env: &Env, params: &Bytes) -> Result<CountryParams, ModuleError> {
    let decoded = CountryParams::from_xdr(env, params).map_err(|_| ModuleError::InvalidParams)?;
    if decoded.allowed.is_empty() {
        return Err(ModuleError::InvalidParams);
    }
    Ok(decoded)
}

fn country_of(env: &Env, wallet: &Address) -> Option<u32> {
    let registry = identity_registry(env).ok()?;
    IdentityRegistryClient::new(env, &registry).country_of(wallet)
}

fn exposure(env: &Env, token: &Address, country: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Exposure(token.clone(), country))
        .unwrap_or(0)
}

fn adjust_exposure(env: &Env, token: &Address, country: u32, delta: i128) {
    let current = exposure(env, token, country);
    let next = if delta < 0 && current < -delta {
        0
    } else {
        current + delta
    };
    env.storage()
        .persistent()
        .set(&DataKey::Exposure(token.clone(), country), &next);
}

#[contract]
pub struct CountryAllowlistModule;

#[contractimpl]
impl CountryAllowlistModule {
    pub fn initialize(
        env: Env,
        owner: Address,
        identity_registry: Address,
    ) -> Result<(), CountryModuleError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(CountryModuleError::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);
        Ok(())
    }

    pub fn set_identity_registry(
        env: Env,
        operator: Address,
        identity_registry: Address,
    ) -> Result<(), CountryModuleError> {
        require_owner(&env, &operator)?;
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);
        env.events().publish(
            (symbol_short!("ctry_mod"), symbol_short!("set_reg")),
            (operator, identity_registry),
        );
        Ok(())
    }

    /// Receiver's country must be on the token's allow-list. Mints and
    /// transfers both carry a receiver; burns (`to = None`) pass.
    pub fn can_transfer(
        env: Env,
        _token: Address,
        _from: Option<Address>,
        to: Option<Address>,
        _amount: i128,
        params: Bytes,
    ) -> Result<(), ModuleError> {
        let Some(receiver) = to else {
            return Ok(());
        };
        let allowed = decode_params(&env, &params)?.allowed;
        let country = country_of(&env, &receiver).ok_or(ModuleError::ReceiverNotRegistered)?;
        if !allowed.contains(&country) {
            return Err(ModuleError::CountryNotAllowed);
        }
        Ok(())
    }

    pub fn on_transferred(
        env: Env,
        token: Address,
        from: Address,
        to: Address,
        amount: i128,
        _params: Bytes,
    ) {
        if let Some(country) = country_of(&env, &from) {
            adjust_exposure(&env, &token, country, -amount);
        }
        if let Some(country) = country_of(&env, &to) {
            adjust_exposure(&env, &token, country, amount);
        }
        env.events()
            .publish((symbol_short!("ctry_mod"), symbol_short!("moved")), (token, amount));
    }

    pub fn on_created(env: Env, token: Address, to: Address, amount: i128, _params: Bytes) {
        if let Some(country) = country_of(&env, &to) {
            adjust_exposure(&env, &token, country, amount);
        }
    }

    pub fn on_destroyed(env: Env, token: Address, from: Address, amount: i128, _params: Bytes) {
        if let Some(country) = country_of(&env, &from) {
            adjust_exposure(&env, &token, country, -amount);
        }
    }

    /// Checked once at module-attach time so malformed allow-lists fail
    /// fast instead of on every transfer. Well-formed XDR of the wrong
    /// shape, and empty allow-lists, come back as `InvalidParams`; bytes
    /// that are not XDR at all abort the host's deserialization, which
    /// callers going through `try_` invocations see as a failed call.
    pub fn validate_parameters(env: Env, params: Bytes) -> Result<(), ModuleError> {
        decode_params(&env, &params).map(|_| ())
    }

    pub fn name(env: Env) -> String {
        String::from_str(&env, "country-allowlist")
    }

    pub fn country_exposure(env: Env, token: Address, country: u32) -> i128 {
        exposure(&env, &token, country)
    }
}
