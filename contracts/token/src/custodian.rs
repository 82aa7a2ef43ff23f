//! Custodian extension: full account freezes and partial token freezes.
//! Invariant: `frozen_amount(h) <= balance(h)` at all times; ordinary
//! spending may only touch the unfrozen portion.

use soroban_sdk::{symbol_short, Address, Env};

use crate::balances;
use crate::error::TokenError;
use crate::DataKey;

pub fn is_frozen(env: &Env, wallet: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::FullyFrozen(wallet.clone()))
        .unwrap_or(false)
}

pub fn frozen_amount(env: &Env, wallet: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::FrozenAmount(wallet.clone()))
        .unwrap_or(0)
}

pub fn unfrozen_balance(env: &Env, wallet: &Address) -> i128 {
    balances::balance(env, wallet) - frozen_amount(env, wallet)
}

pub fn set_address_frozen(env: &Env, operator: &Address, wallet: &Address, frozen: bool) {
    if frozen {
        env.storage()
            .persistent()
            .set(&DataKey::FullyFrozen(wallet.clone()), &true);
    } else {
        env.storage()
            .persistent()
            .remove(&DataKey::FullyFrozen(wallet.clone()));
    }
    env.events().publish(
        (symbol_short!("token"), symbol_short!("addr_frz")),
        (operator.clone(), wallet.clone(), frozen),
    );
}

pub fn freeze_partial(
    env: &Env,
    operator: &Address,
    wallet: &Address,
    amount: i128,
) -> Result<(), TokenError> {
    if amount <= 0 {
        return Err(TokenError::InvalidAmount);
    }
    let next = frozen_amount(env, wallet) + amount;
    if next > balances::balance(env, wallet) {
        return Err(TokenError::FreezeExceedsBalance);
    }
    set_frozen_amount(env, wallet, next);
    env.events().publish(
        (symbol_short!("token"), symbol_short!("tok_frz")),
        (operator.clone(), wallet.clone(), amount),
    );
    Ok(())
}

pub fn unfreeze_partial(
    env: &Env,
    operator: &Address,
    wallet: &Address,
    amount: i128,
) -> Result<(), TokenError> {
    if amount <= 0 {
        return Err(TokenError::InvalidAmount);
    }
    let current = frozen_amount(env, wallet);
    if amount > current {
        return Err(TokenError::UnfreezeExceedsFrozen);
    }
    set_frozen_amount(env, wallet, current - amount);
    env.events().publish(
        (symbol_short!("token"), symbol_short!("tok_unfrz")),
        (operator.clone(), wallet.clone(), amount),
    );
    Ok(())
}

/// Forced transfers may spend into the frozen portion: when `amount`
/// exceeds the unfrozen balance, exactly the excess is released from the
/// frozen counter, never more and never below zero.
pub fn release_for_forced_transfer(env: &Env, operator: &Address, from: &Address, amount: i128) {
    let unfrozen = unfrozen_balance(env, from);
    if amount > unfrozen {
        let excess = amount - unfrozen;
        set_frozen_amount(env, from, frozen_amount(env, from) - excess);
        env.events().publish(
            (symbol_short!("token"), symbol_short!("tok_unfrz")),
            (operator.clone(), from.clone(), excess),
        );
    }
}

pub fn set_frozen_amount(env: &Env, wallet: &Address, amount: i128) {
    if amount == 0 {
        env.storage()
            .persistent()
            .remove(&DataKey::FrozenAmount(wallet.clone()));
    } else {
        env.storage()
            .persistent()
            .set(&DataKey::FrozenAmount(wallet.clone()), &amount);
    }
}
