//! Token-layer wallet recovery: once the identity registry has marked a
//! wallet lost and linked its replacement, the whole balance and the exact
//! freeze state move to the new wallet.

use smart_interfaces::IdentityRegistryClient;
use soroban_sdk::{symbol_short, Address, Env};

use crate::error::TokenError;
use crate::hooks::{self, OpCtx, OpKind};
use crate::{balances, config, custodian};

pub fn recover(
    env: &Env,
    operator: &Address,
    lost_wallet: &Address,
    new_wallet: &Address,
) -> Result<i128, TokenError> {
    let registry = config::identity_registry(env)?;
    let client = IdentityRegistryClient::new(env, &registry);
    if !client.is_wallet_lost(lost_wallet) {
        return Err(TokenError::InvalidLostWallet);
    }
    if client.recovered_wallet(lost_wallet).as_ref() != Some(new_wallet) {
        return Err(TokenError::InvalidLostWallet);
    }

    let amount = balances::balance(env, lost_wallet);
    if amount == 0 {
        return Err(TokenError::NoTokensToRecover);
    }

    let ctx = OpCtx {
        kind: OpKind::Recovery,
        from: Some(lost_wallet.clone()),
        to: Some(new_wallet.clone()),
        amount,
    };
    hooks::run_before(env, &ctx)?;

    let was_fully_frozen = custodian::is_frozen(env, lost_wallet);
    let partial_frozen = custodian::frozen_amount(env, lost_wallet);

    // Clear the old wallet's freeze state before the debit so the
    // frozen <= balance invariant holds at every step.
    custodian::set_frozen_amount(env, lost_wallet, 0);
    if was_fully_frozen {
        custodian::set_address_frozen(env, operator, lost_wallet, false);
    }

    balances::debit(env, lost_wallet, amount)?;
    balances::credit(env, new_wallet, amount);

    // Migrate freeze state; the full-freeze flag is rewritten outright so a
    // pre-frozen target cannot stack with the migrated state.
    if was_fully_frozen != custodian::is_frozen(env, new_wallet) {
        custodian::set_address_frozen(env, operator, new_wallet, was_fully_frozen);
    }
    if partial_frozen > 0 {
        let existing = custodian::frozen_amount(env, new_wallet);
        custodian::set_frozen_amount(env, new_wallet, existing + partial_frozen);
    }

    hooks::notify_compliance(env, &ctx)?;
    hooks::run_after(env, &ctx);

    env.events().publish(
        (symbol_short!("token"), symbol_short!("recovered")),
        (operator.clone(), lost_wallet.clone(), new_wallet.clone(), amount),
    );
    Ok(amount)
}
