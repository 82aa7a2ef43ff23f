#![no_std]

//! Backing store for identity registries: wallet -> (identity contract,
//! country) records. Several registries can be bound to one storage so a
//! single investor base serves multiple tokens; only bound registries and
//! the owner may write.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Vec,
};


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum StorageError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    IdentityAlreadyRegistered = 4,
    IdentityNotRegistered = 5,
    RegistryAlreadyBound = 6,
    RegistryNotBound = 7,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityRecord {
    pub identity: Address,
    pub country: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Record(Address),
    BoundRegistries,
}

fn owner(env: &Env) -> Result<Address, StorageError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(StorageError::NotInitialized)
}

fn bound_registries(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::BoundRegistries)
        .unwrap_or_else(|| Vec::new(env))
}

/// Writers are the owner and any bound registry. The caller authenticates
/// itself; a bound registry authenticates via contract invocation auth.
fn require_writer(env: &Env, caller: &Address) -> Result<(), StorageError> {
    caller.require_auth();
    if *caller == owner(env)? {
        return Ok(());
    }
    if bound_registries(env).contains(caller) {
        return Ok(());
    }
    Err(StorageError::Unauthorized)
}

fn record(env: &Env, wallet: &Address) -> Option<IdentityRecord> {
    env.storage().persistent().get(&DataKey::Record(wallet.clone()))
}

#[contract]
pub struct IdentityRegistryStorage;

#[contractimpl]
impl IdentityRegistryStorage {
    pub fn initialize(env: Env, owner: Address) -> Result<(), StorageError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(StorageError::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    pub fn bind_registry(env: Env, operator: Address, registry: Address) -> Result<(), StorageError> {
        operator.require_auth();
        if operator != owner(&env)? {
            return Err(StorageError::Unauthorized);
        }
        let mut registries = bound_registries(&env);
        if registries.contains(&registry) {
            return Err(StorageError::RegistryAlreadyBound);
        }
        registries.push_back(registry.clone());
        env.storage().instance().set(&DataKey::BoundRegistries, &registries);
        env.events()
            .publish((symbol_short!("irs"), symbol_short!("bound")), registry);
        Ok(())
    }

    pub fn unbind_registry(env: Env, operator: Address, registry: Address) -> Result<(), StorageError> {
        operator.require_auth();
        if operator != owner(&env)? {
            return Err(StorageError::Unauthorized);
        }
        let registries = bound_registries(&env);
        match registries.first_index_of(&registry) {
            Some(index) => {
                let mut registries = registries;
                registries.remove(index);
                env.storage().instance().set(&DataKey::BoundRegistries, &registries);
                env.events()
                    .publish((symbol_short!("irs"), symbol_short!("unbound")), registry);
                Ok(())
            }
            None => Err(StorageError::RegistryNotBound),
        }
    }

    pub fn add_identity(
        env: Env,
        caller: Address,
        wallet: Address,
        identity: Address,
        country: u32,
    ) -> Result<(), StorageError> {
        require_writer(&env, &caller)?;
        if record(&env, &wallet).is_some() {
            return Err(StorageError::IdentityAlreadyRegistered);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Record(wallet.clone()), &IdentityRecord { identity, country });
        env.events()
            .publish((symbol_short!("irs"), symbol_short!("stored")), wallet);
        Ok(())
    }

    pub fn modify_stored_identity(
        env: Env,
        caller: Address,
        wallet: Address,
        identity: Address,
    ) -> Result<(), StorageError> {
        require_writer(&env, &caller)?;
        let mut rec = record(&env, &wallet).ok_or(StorageError::IdentityNotRegistered)?;
        rec.identity = identity;
        env.storage().persistent().set(&DataKey::Record(wallet), &rec);
        Ok(())
    }

    pub fn modify_stored_country(
        env: Env,
        caller: Address,
        wallet: Address,
        country: u32,
    ) -> Result<(), StorageError> {
        require_writer(&env, &caller)?;
        let mut rec = record(&env, &wallet).ok_or(StorageError::IdentityNotRegistered)?;
        rec.country = country;
        env.storage().persistent().set(&DataKey::Record(wallet), &rec);
        Ok(())
    }

    pub fn remove_identity(env: Env, caller: Address, wallet: Address) -> Result<(), StorageError> {
        require_writer(&env, &caller)?;
        if record(&env, &wallet).is_none() {
            return Err(StorageError::IdentityNotRegistered);
        }
        env.storage().persistent().remove(&DataKey::Record(wallet.clone()));
        env.events()
            .publish((symbol_short!("irs"), symbol_short!("removed")), wallet);
        Ok(())
    }

    pub fn stored_identity(env: Env, wallet: Address) -> Option<Address> {
        record(&env, &wallet).map(|rec| rec.identity)
    }

    pub fn stored_country(env: Env, wallet: Address) -> Option<u32> {
        record(&env, &wallet).map(|rec| rec.country)
    }

    pub fn contains(env: Env, wallet: Address) -> bool {
        record(&env, &wallet).is_some()
    }

    pub fn linked_registries(env: Env) -> Vec<Address> {
        bound_registries(&env)
    }
}
