#![no_std]

//! Permissioned token. Every balance-changing entry point runs the fixed
//! hook pipeline (pause -> custodian -> collateral -> verification ->
//! compliance check), mutates the ledger, notifies the compliance modules,
//! then snapshots historical balances. The whole call succeeds or reverts;
//! no partial mutation is observable.

use smart_interfaces::ModuleParamPair;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Bytes, Env, String, Symbol, Vec,
};

mod balances;
mod collateral;
mod config;
mod custodian;
mod error;
mod hooks;
mod recovery;
pub mod roles;

#[cfg(test)]
mod test_pipeline;

pub use balances::Checkpoint;
pub use error::TokenError;

use hooks::{OpCtx, OpKind};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Name,
    TokenSymbol,
    Decimals,
    IdentityRegistry,
    TrustedIssuersRegistry,
    ComplianceContract,
    TokenIdentity,
    RequiredTopics,
    CollateralTopic,
    Paused,
    Modules,
    TotalSupply,
    SupplyCheckpoints,
    Role(Symbol, Address),
    Balance(Address),
    Allowance(Address, Address),
    FrozenAmount(Address),
    FullyFrozen(Address),
    Checkpoints(Address),
}

#[contract]
pub struct SmartToken;

#[contractimpl]
impl SmartToken {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        decimals: u32,
        identity_registry: Address,
        trusted_issuers_registry: Address,
        compliance: Address,
        token_identity: Address,
    ) -> Result<(), TokenError> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(TokenError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Initialized, &true);

        config::set_metadata(&env, &name, &symbol, decimals);
        config::set_identity_registry(&env, &identity_registry);
        config::set_trusted_issuers_registry(&env, &trusted_issuers_registry);
        config::set_compliance(&env, &compliance);
        config::set_token_identity(&env, &token_identity);
        roles::grant(&env, &roles::ADMIN, &admin);
        Ok(())
    }

    // Roles

    pub fn grant_role(
        env: Env,
        operator: Address,
        role: Symbol,
        account: Address,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::ADMIN, &operator)?;
        roles::grant(&env, &role, &account);
        Ok(())
    }

    pub fn revoke_role(
        env: Env,
        operator: Address,
        role: Symbol,
        account: Address,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::ADMIN, &operator)?;
        roles::revoke(&env, &role, &account);
        Ok(())
    }

    pub fn has_role(env: Env, role: Symbol, account: Address) -> bool {
        roles::has_role(&env, &role, &account)
    }

    // Configuration

    pub fn set_required_claim_topics(
        env: Env,
        operator: Address,
        topics: Vec<u32>,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::VERIFICATION_ADMIN, &operator)?;
        config::set_required_claim_topics(&env, &topics);
        Ok(())
    }

    pub fn required_claim_topics(env: Env) -> Vec<u32> {
        config::required_claim_topics(&env)
    }

    pub fn set_collateral_topic(env: Env, operator: Address, topic: u32) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::VERIFICATION_ADMIN, &operator)?;
        config::set_collateral_topic(&env, topic);
        Ok(())
    }

    pub fn collateral_topic(env: Env) -> Option<u32> {
        config::collateral_topic(&env)
    }

    /// Best currently-valid attested collateral amount. A mint rejected with
    /// `InsufficientCollateral` needed more than this.
    pub fn attested_collateral(env: Env) -> Result<i128, TokenError> {
        collateral::attested_collateral(&env)
    }

    pub fn set_identity_registry(
        env: Env,
        operator: Address,
        registry: Address,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::ADMIN, &operator)?;
        config::set_identity_registry(&env, &registry);
        Ok(())
    }

    pub fn set_compliance(env: Env, operator: Address, compliance: Address) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::ADMIN, &operator)?;
        config::set_compliance(&env, &compliance);
        Ok(())
    }

    pub fn identity_registry(env: Env) -> Result<Address, TokenError> {
        config::identity_registry(&env)
    }

    pub fn compliance(env: Env) -> Result<Address, TokenError> {
        config::compliance(&env)
    }

    pub fn token_identity(env: Env) -> Result<Address, TokenError> {
        config::token_identity(&env)
    }

    // Compliance-module management

    pub fn add_compliance_module(
        env: Env,
        operator: Address,
        module: Address,
        params: Bytes,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::COMPLIANCE_ADMIN, &operator)?;
        config::add_module(&env, &module, &params)
    }

    pub fn remove_compliance_module(
        env: Env,
        operator: Address,
        module: Address,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::COMPLIANCE_ADMIN, &operator)?;
        config::remove_module(&env, &module)
    }

    pub fn set_module_params(
        env: Env,
        operator: Address,
        module: Address,
        params: Bytes,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::COMPLIANCE_ADMIN, &operator)?;
        config::set_module_params(&env, &module, &params)
    }

    pub fn compliance_modules(env: Env) -> Vec<ModuleParamPair> {
        config::modules(&env)
    }

    // Pause

    pub fn pause(env: Env, operator: Address) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::PAUSER, &operator)?;
        if config::is_paused(&env) {
            return Err(TokenError::TokenPaused);
        }
        config::set_paused(&env, true);
        env.events()
            .publish((symbol_short!("token"), symbol_short!("paused")), operator);
        Ok(())
    }

    pub fn unpause(env: Env, operator: Address) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::PAUSER, &operator)?;
        if !config::is_paused(&env) {
            return Err(TokenError::TokenNotPaused);
        }
        config::set_paused(&env, false);
        env.events()
            .publish((symbol_short!("token"), symbol_short!("unpaused")), operator);
        Ok(())
    }

    pub fn paused(env: Env) -> bool {
        config::is_paused(&env)
    }

    // Custodian

    pub fn set_address_frozen(
        env: Env,
        operator: Address,
        wallet: Address,
        frozen: bool,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FREEZER, &operator)?;
        custodian::set_address_frozen(&env, &operator, &wallet, frozen);
        Ok(())
    }

    pub fn freeze_partial_tokens(
        env: Env,
        operator: Address,
        wallet: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FREEZER, &operator)?;
        custodian::freeze_partial(&env, &operator, &wallet, amount)
    }

    pub fn unfreeze_partial_tokens(
        env: Env,
        operator: Address,
        wallet: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FREEZER, &operator)?;
        custodian::unfreeze_partial(&env, &operator, &wallet, amount)
    }

    pub fn batch_freeze_partial_tokens(
        env: Env,
        operator: Address,
        wallets: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FREEZER, &operator)?;
        if wallets.len() != amounts.len() {
            return Err(TokenError::ArrayLengthMismatch);
        }
        for i in 0..wallets.len() {
            custodian::freeze_partial(&env, &operator, &wallets.get_unchecked(i), amounts.get_unchecked(i))?;
        }
        Ok(())
    }

    pub fn batch_unfreeze_partial_tokens(
        env: Env,
        operator: Address,
        wallets: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FREEZER, &operator)?;
        if wallets.len() != amounts.len() {
            return Err(TokenError::ArrayLengthMismatch);
        }
        for i in 0..wallets.len() {
            custodian::unfreeze_partial(&env, &operator, &wallets.get_unchecked(i), amounts.get_unchecked(i))?;
        }
        Ok(())
    }

    pub fn is_frozen(env: Env, wallet: Address) -> bool {
        custodian::is_frozen(&env, &wallet)
    }

    pub fn frozen_tokens(env: Env, wallet: Address) -> i128 {
        custodian::frozen_amount(&env, &wallet)
    }

    pub fn unfrozen_balance(env: Env, wallet: Address) -> i128 {
        custodian::unfrozen_balance(&env, &wallet)
    }

    // Value-moving operations

    pub fn mint(env: Env, operator: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::MINTER, &operator)?;
        Self::mint_one(&env, &operator, &to, amount)
    }

    pub fn batch_mint(
        env: Env,
        operator: Address,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::MINTER, &operator)?;
        if recipients.len() != amounts.len() {
            return Err(TokenError::ArrayLengthMismatch);
        }
        for i in 0..recipients.len() {
            Self::mint_one(&env, &operator, &recipients.get_unchecked(i), amounts.get_unchecked(i))?;
        }
        Ok(())
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        Self::transfer_one(&env, OpKind::Transfer, &from, &to, amount)
    }

    pub fn batch_transfer(
        env: Env,
        from: Address,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), TokenError> {
        from.require_auth();
        if recipients.len() != amounts.len() {
            return Err(TokenError::ArrayLengthMismatch);
        }
        for i in 0..recipients.len() {
            Self::transfer_one(
                &env,
                OpKind::Transfer,
                &from,
                &recipients.get_unchecked(i),
                amounts.get_unchecked(i),
            )?;
        }
        Ok(())
    }

    pub fn approve(env: Env, owner: Address, spender: Address, amount: i128) -> Result<(), TokenError> {
        owner.require_auth();
        if amount < 0 {
            return Err(TokenError::InvalidAmount);
        }
        balances::set_allowance(&env, &owner, &spender, amount);
        env.events().publish(
            (symbol_short!("token"), symbol_short!("approve")),
            (owner, spender, amount),
        );
        Ok(())
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        balances::allowance(&env, &owner, &spender)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        spender.require_auth();
        balances::spend_allowance(&env, &from, &spender, amount)?;
        Self::transfer_one(&env, OpKind::Transfer, &from, &to, amount)
    }

    /// Regulatory override: moves tokens regardless of the sender's freeze
    /// state. When the amount exceeds the unfrozen balance, exactly the
    /// excess is released from the frozen counter.
    pub fn forced_transfer(
        env: Env,
        operator: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FORCED_TRANSFER, &operator)?;
        Self::forced_one(&env, &operator, &from, &to, amount)
    }

    pub fn batch_forced_transfer(
        env: Env,
        operator: Address,
        senders: Vec<Address>,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::FORCED_TRANSFER, &operator)?;
        if senders.len() != recipients.len() || senders.len() != amounts.len() {
            return Err(TokenError::ArrayLengthMismatch);
        }
        for i in 0..senders.len() {
            Self::forced_one(
                &env,
                &operator,
                &senders.get_unchecked(i),
                &recipients.get_unchecked(i),
                amounts.get_unchecked(i),
            )?;
        }
        Ok(())
    }

    pub fn burn(env: Env, operator: Address, from: Address, amount: i128) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::BURNER, &operator)?;
        Self::burn_one(&env, OpKind::Burn, &from, amount)?;
        env.events().publish(
            (symbol_short!("token"), symbol_short!("burn")),
            (operator, from, amount),
        );
        Ok(())
    }

    /// Holder-initiated burn.
    pub fn redeem(env: Env, from: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        Self::burn_one(&env, OpKind::Redeem, &from, amount)?;
        env.events().publish(
            (symbol_short!("token"), symbol_short!("redeem")),
            (from, amount),
        );
        Ok(())
    }

    // Recovery

    /// Called by the replacement wallet itself once the identity registry
    /// links it to the lost wallet.
    pub fn recover_tokens(env: Env, caller: Address, lost_wallet: Address) -> Result<(), TokenError> {
        caller.require_auth();
        recovery::recover(&env, &caller, &lost_wallet, &caller)?;
        Ok(())
    }

    /// Operator-driven recovery into the registered replacement wallet.
    pub fn forced_recover_tokens(
        env: Env,
        operator: Address,
        lost_wallet: Address,
        new_wallet: Address,
    ) -> Result<(), TokenError> {
        roles::require_role(&env, &roles::RECOVERY, &operator)?;
        recovery::recover(&env, &operator, &lost_wallet, &new_wallet)?;
        Ok(())
    }

    // Reads

    pub fn balance(env: Env, holder: Address) -> i128 {
        balances::balance(&env, &holder)
    }

    pub fn total_supply(env: Env) -> i128 {
        balances::total_supply(&env)
    }

    pub fn balance_at(env: Env, holder: Address, ledger: u32) -> i128 {
        balances::balance_at(&env, &holder, ledger)
    }

    pub fn total_supply_at(env: Env, ledger: u32) -> i128 {
        balances::total_supply_at(&env, ledger)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        config::name(&env)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        config::symbol(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, TokenError> {
        config::decimals(&env)
    }
}

impl SmartToken {
    fn mint_one(env: &Env, operator: &Address, to: &Address, amount: i128) -> Result<(), TokenError> {
        let ctx = OpCtx {
            kind: OpKind::Mint,
            from: None,
            to: Some(to.clone()),
            amount,
        };
        hooks::run_before(env, &ctx)?;
        balances::credit(env, to, amount);
        balances::grow_supply(env, amount);
        hooks::notify_compliance(env, &ctx)?;
        hooks::run_after(env, &ctx);
        env.events().publish(
            (symbol_short!("token"), symbol_short!("mint")),
            (operator.clone(), to.clone(), amount),
        );
        Ok(())
    }

    fn transfer_one(
        env: &Env,
        kind: OpKind,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        let ctx = OpCtx {
            kind,
            from: Some(from.clone()),
            to: Some(to.clone()),
            amount,
        };
        hooks::run_before(env, &ctx)?;
        balances::debit(env, from, amount)?;
        balances::credit(env, to, amount);
        hooks::notify_compliance(env, &ctx)?;
        hooks::run_after(env, &ctx);
        env.events().publish(
            (symbol_short!("token"), symbol_short!("transfer")),
            (from.clone(), to.clone(), amount),
        );
        Ok(())
    }

    fn forced_one(
        env: &Env,
        operator: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        let ctx = OpCtx {
            kind: OpKind::ForcedTransfer,
            from: Some(from.clone()),
            to: Some(to.clone()),
            amount,
        };
        hooks::run_before(env, &ctx)?;
        custodian::release_for_forced_transfer(env, operator, from, amount);
        balances::debit(env, from, amount)?;
        balances::credit(env, to, amount);
        hooks::notify_compliance(env, &ctx)?;
        hooks::run_after(env, &ctx);
        env.events().publish(
            (symbol_short!("token"), symbol_short!("forced_tr")),
            (operator.clone(), from.clone(), to.clone(), amount),
        );
        Ok(())
    }

    fn burn_one(env: &Env, kind: OpKind, from: &Address, amount: i128) -> Result<(), TokenError> {
        let ctx = OpCtx {
            kind,
            from: Some(from.clone()),
            to: None,
            amount,
        };
        hooks::run_before(env, &ctx)?;
        balances::debit(env, from, amount)?;
        balances::shrink_supply(env, amount);
        hooks::notify_compliance(env, &ctx)?;
        hooks::run_after(env, &ctx);
        Ok(())
    }
}
