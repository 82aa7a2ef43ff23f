#![no_std]

//! Compliance aggregator: fans a transfer check or a post-mutation
//! notification across a token's ordered module list, all-or-nothing. The
//! list and per-module params are owned by the calling token and travel
//! with each call (a callback into the token mid-call would be re-entrant);
//! nothing is stored here per token.

use smart_interfaces::{ComplianceModuleClient, ModuleParamPair};
use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, Vec};


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum ComplianceError {
    ComplianceCheckFailed = 1,
}

#[contract]
pub struct Compliance;

#[contractimpl]
impl Compliance {
    /// View check consulted before any balance mutation. Modules run in
    /// list order; the first rejection (an error or a trapped module call)
    /// aborts the whole check. No modules means always allowed.
    pub fn can_transfer(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        from: Option<Address>,
        to: Option<Address>,
        amount: i128,
    ) -> Result<(), ComplianceError> {
        for pair in modules.iter() {
            let module = ComplianceModuleClient::new(&env, &pair.module);
            match module.try_can_transfer(&token, &from, &to, &amount, &pair.params) {
                Ok(Ok(())) => {}
                _ => return Err(ComplianceError::ComplianceCheckFailed),
            }
        }
        Ok(())
    }

    /// Post-transfer notification, same module order. A module that traps
    /// here aborts the whole transaction, which rolls the mutation back.
    pub fn transferred(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ComplianceError> {
        for pair in modules.iter() {
            let module = ComplianceModuleClient::new(&env, &pair.module);
            match module.try_on_transferred(&token, &from, &to, &amount, &pair.params) {
                Ok(_) => {}
                Err(_) => return Err(ComplianceError::ComplianceCheckFailed),
            }
        }
        Ok(())
    }

    /// Post-mint notification.
    pub fn created(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        to: Address,
        amount: i128,
    ) -> Result<(), ComplianceError> {
        for pair in modules.iter() {
            let module = ComplianceModuleClient::new(&env, &pair.module);
            match module.try_on_created(&token, &to, &amount, &pair.params) {
                Ok(_) => {}
                Err(_) => return Err(ComplianceError::ComplianceCheckFailed),
            }
        }
        Ok(())
    }

    /// Post-burn/redeem notification.
    pub fn destroyed(
        env: Env,
        token: Address,
        modules: Vec<ModuleParamPair>,
        from: Address,
        amount: i128,
    ) -> Result<(), ComplianceError> {
        for pair in modules.iter() {
            let module = ComplianceModuleClient::new(&env, &pair.module);
            match module.try_on_destroyed(&token, &from, &amount, &pair.params) {
                Ok(_) => {}
                Err(_) => return Err(ComplianceError::ComplianceCheckFailed),
            }
        }
        Ok(())
    }
}
