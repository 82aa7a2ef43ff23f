#![no_std]

//! Identity registry: orchestrates the identity storage and the trusted
//! issuers registry. Answers "is this wallet verified for these claim
//! topics?" and keeps the lost-wallet bookkeeping used by token-level
//! recovery. The required topic list is an argument, not registry state, so
//! one registry serves many tokens with different requirements.

use smart_interfaces::IdentityStorageClient;
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Vec};

mod error;
mod verification;

#[cfg(test)]
mod test;

pub use error::RegistryError;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    StorageContract,
    IssuersContract,
    /// Wallet has been recovered away from and may never hold again.
    Lost(Address),
    /// old wallet -> replacement wallet, written once per old wallet.
    RecoveredTo(Address),
}

fn require_registrar(env: &Env, operator: &Address) -> Result<(), RegistryError> {
    operator.require_auth();
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(RegistryError::NotInitialized)?;
    if *operator != owner {
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}

fn storage_contract(env: &Env) -> Result<Address, RegistryError> {
    env.storage()
        .instance()
        .get(&DataKey::StorageContract)
        .ok_or(RegistryError::NotInitialized)
}

fn issuers_contract(env: &Env) -> Result<Address, RegistryError> {
    env.storage()
        .instance()
        .get(&DataKey::IssuersContract)
        .ok_or(RegistryError::NotInitialized)
}

fn storage_client(env: &Env) -> Result<IdentityStorageClient<'static>, RegistryError> {
    Ok(IdentityStorageClient::new(env, &storage_contract(env)?))
}

fn is_lost(env: &Env, wallet: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Lost(wallet.clone()))
        .unwrap_or(false)
}

#[contract]
pub struct IdentityRegistry;

#[contractimpl]
impl IdentityRegistry {
    pub fn initialize(
        env: Env,
        owner: Address,
        identity_storage: Address,
        trusted_issuers: Address,
    ) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(RegistryError::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::StorageContract, &identity_storage);
        env.storage().instance().set(&DataKey::IssuersContract, &trusted_issuers);
        Ok(())
    }

    pub fn set_identity_registry_storage(
        env: Env,
        operator: Address,
        identity_storage: Address,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        env.storage().instance().set(&DataKey::StorageContract, &identity_storage);
        env.events()
            .publish((symbol_short!("id_reg"), symbol_short!("set_irs")), identity_storage);
        Ok(())
    }

    pub fn set_trusted_issuers_registry(
        env: Env,
        operator: Address,
        trusted_issuers: Address,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        env.storage().instance().set(&DataKey::IssuersContract, &trusted_issuers);
        env.events()
            .publish((symbol_short!("id_reg"), symbol_short!("set_tir")), trusted_issuers);
        Ok(())
    }

    pub fn register_identity(
        env: Env,
        operator: Address,
        wallet: Address,
        identity: Address,
        country: u32,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        Self::register_one(&env, &operator, &wallet, &identity, country)
    }

    pub fn batch_register_identity(
        env: Env,
        operator: Address,
        wallets: Vec<Address>,
        identities: Vec<Address>,
        countries: Vec<u32>,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        if wallets.len() != identities.len() || wallets.len() != countries.len() {
            return Err(RegistryError::ArrayLengthMismatch);
        }
        for i in 0..wallets.len() {
            Self::register_one(
                &env,
                &operator,
                &wallets.get_unchecked(i),
                &identities.get_unchecked(i),
                countries.get_unchecked(i),
            )?;
        }
        Ok(())
    }

    pub fn delete_identity(env: Env, operator: Address, wallet: Address) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        let storage = storage_client(&env)?;
        let identity = storage
            .stored_identity(&wallet)
            .ok_or(RegistryError::IdentityNotRegistered)?;
        storage.remove_identity(&env.current_contract_address(), &wallet);

        env.events().publish(
            (symbol_short!("id_reg"), symbol_short!("removed")),
            (operator, wallet, identity),
        );
        Ok(())
    }

    pub fn update_identity(
        env: Env,
        operator: Address,
        wallet: Address,
        identity: Address,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        let storage = storage_client(&env)?;
        let old_identity = storage
            .stored_identity(&wallet)
            .ok_or(RegistryError::IdentityNotRegistered)?;
        storage.modify_stored_identity(&env.current_contract_address(), &wallet, &identity);

        env.events().publish(
            (symbol_short!("id_reg"), symbol_short!("id_up")),
            (operator, old_identity, identity),
        );
        Ok(())
    }

    pub fn update_country(
        env: Env,
        operator: Address,
        wallet: Address,
        country: u32,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        let storage = storage_client(&env)?;
        if storage.stored_identity(&wallet).is_none() {
            return Err(RegistryError::IdentityNotRegistered);
        }
        storage.modify_stored_country(&env.current_contract_address(), &wallet, &country);

        env.events().publish(
            (symbol_short!("id_reg"), symbol_short!("countryup")),
            (operator, wallet, country),
        );
        Ok(())
    }

    /// Recover the identity registration from a lost wallet onto a new one.
    /// The old wallet's record is deleted and the wallet permanently marked
    /// lost; the old -> new link is recorded for token-level recovery.
    pub fn recover_identity(
        env: Env,
        operator: Address,
        old_wallet: Address,
        new_wallet: Address,
        new_identity: Address,
    ) -> Result<(), RegistryError> {
        require_registrar(&env, &operator)?;
        let storage = storage_client(&env)?;

        let old_identity = storage
            .stored_identity(&old_wallet)
            .ok_or(RegistryError::IdentityNotRegistered)?;
        if is_lost(&env, &old_wallet) || is_lost(&env, &new_wallet) {
            return Err(RegistryError::WalletAlreadyMarkedAsLost);
        }

        match storage.stored_identity(&new_wallet) {
            Some(existing) if existing != new_identity => {
                return Err(RegistryError::IdentityAlreadyRegistered);
            }
            Some(_) => {
                // Already registered to the same identity: merge, keeping
                // the new wallet's own country.
            }
            None => {
                let country = storage.stored_country(&old_wallet).unwrap_or(0);
                storage.add_identity(
                    &env.current_contract_address(),
                    &new_wallet,
                    &new_identity,
                    &country,
                );
            }
        }

        storage.remove_identity(&env.current_contract_address(), &old_wallet);
        env.storage().persistent().set(&DataKey::Lost(old_wallet.clone()), &true);
        env.storage()
            .persistent()
            .set(&DataKey::RecoveredTo(old_wallet.clone()), &new_wallet);

        env.events().publish(
            (symbol_short!("id_reg"), symbol_short!("recovered")),
            (operator, old_wallet, new_wallet, new_identity, old_identity),
        );
        Ok(())
    }

    /// `true` iff the wallet is registered and its identity carries a valid
    /// claim from a trusted issuer for every required topic. An empty
    /// requirement is trivially satisfied.
    pub fn is_verified(env: Env, wallet: Address, required_topics: Vec<u32>) -> bool {
        let Ok(storage) = storage_client(&env) else {
            return false;
        };
        let Some(identity) = storage.stored_identity(&wallet) else {
            return false;
        };
        if required_topics.is_empty() {
            return true;
        }
        let Ok(issuers) = issuers_contract(&env) else {
            return false;
        };
        verification::has_required_claims(&env, &identity, &issuers, &required_topics)
    }

    pub fn contains(env: Env, wallet: Address) -> bool {
        match storage_client(&env) {
            Ok(storage) => storage.contains(&wallet),
            Err(_) => false,
        }
    }

    pub fn identity(env: Env, wallet: Address) -> Result<Address, RegistryError> {
        storage_client(&env)?
            .stored_identity(&wallet)
            .ok_or(RegistryError::IdentityNotRegistered)
    }

    pub fn investor_country(env: Env, wallet: Address) -> Result<u32, RegistryError> {
        storage_client(&env)?
            .stored_country(&wallet)
            .ok_or(RegistryError::IdentityNotRegistered)
    }

    /// Non-erroring country read for compliance modules.
    pub fn country_of(env: Env, wallet: Address) -> Option<u32> {
        storage_client(&env).ok()?.stored_country(&wallet)
    }

    pub fn is_wallet_lost(env: Env, wallet: Address) -> bool {
        is_lost(&env, &wallet)
    }

    pub fn recovered_wallet(env: Env, wallet: Address) -> Option<Address> {
        env.storage().persistent().get(&DataKey::RecoveredTo(wallet))
    }

    pub fn identity_storage(env: Env) -> Result<Address, RegistryError> {
        storage_contract(&env)
    }

    pub fn trusted_issuers_registry(env: Env) -> Result<Address, RegistryError> {
        issuers_contract(&env)
    }
}

impl IdentityRegistry {
    fn register_one(
        env: &Env,
        operator: &Address,
        wallet: &Address,
        identity: &Address,
        country: u32,
    ) -> Result<(), RegistryError> {
        let storage = storage_client(env)?;
        if storage.contains(wallet) {
            return Err(RegistryError::IdentityAlreadyRegistered);
        }
        storage.add_identity(&env.current_contract_address(), wallet, identity, &country);

        env.events().publish(
            (symbol_short!("id_reg"), symbol_short!("register")),
            (operator.clone(), wallet.clone(), identity.clone(), country),
        );
        Ok(())
    }
}
