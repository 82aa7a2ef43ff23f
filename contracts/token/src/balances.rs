//! Fungible ledger: balances, total supply, allowances, and the append-only
//! historical checkpoints written by the after-hooks.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::TokenError;
use crate::DataKey;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub ledger: u32,
    pub amount: i128,
}

pub fn balance(env: &Env, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(holder.clone()))
        .unwrap_or(0)
}

pub fn total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

pub fn credit(env: &Env, holder: &Address, amount: i128) {
    let next = balance(env, holder) + amount;
    env.storage()
        .persistent()
        .set(&DataKey::Balance(holder.clone()), &next);
}

pub fn debit(env: &Env, holder: &Address, amount: i128) -> Result<(), TokenError> {
    let current = balance(env, holder);
    if current < amount {
        return Err(TokenError::InsufficientBalance);
    }
    env.storage()
        .persistent()
        .set(&DataKey::Balance(holder.clone()), &(current - amount));
    Ok(())
}

pub fn grow_supply(env: &Env, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::TotalSupply, &(total_supply(env) + amount));
}

pub fn shrink_supply(env: &Env, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::TotalSupply, &(total_supply(env) - amount));
}

// Allowances

pub fn allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Allowance(owner.clone(), spender.clone()))
        .unwrap_or(0)
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Allowance(owner.clone(), spender.clone()), &amount);
}

pub fn spend_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), TokenError> {
    let current = allowance(env, owner, spender);
    if current < amount {
        return Err(TokenError::InsufficientAllowance);
    }
    set_allowance(env, owner, spender, current - amount);
    Ok(())
}

// Historical checkpoints. Append-only and ledger-monotonic: a second write
// in the same ledger overwrites the last entry instead of appending.

fn push_checkpoint(env: &Env, key: &DataKey, amount: i128) {
    let ledger = env.ledger().sequence();
    let mut checkpoints: Vec<Checkpoint> = env
        .storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env));

    let len = checkpoints.len();
    if len > 0 && checkpoints.get_unchecked(len - 1).ledger == ledger {
        checkpoints.set(len - 1, Checkpoint { ledger, amount });
    } else {
        checkpoints.push_back(Checkpoint { ledger, amount });
    }
    env.storage().persistent().set(key, &checkpoints);
}

pub fn snapshot_holder(env: &Env, holder: &Address) {
    push_checkpoint(
        env,
        &DataKey::Checkpoints(holder.clone()),
        balance(env, holder),
    );
}

pub fn snapshot_supply(env: &Env) {
    push_checkpoint(env, &DataKey::SupplyCheckpoints, total_supply(env));
}

/// Balance as of the end of `ledger`; zero before the first checkpoint.
pub fn balance_at(env: &Env, holder: &Address, ledger: u32) -> i128 {
    checkpoint_at(env, &DataKey::Checkpoints(holder.clone()), ledger)
}

pub fn total_supply_at(env: &Env, ledger: u32) -> i128 {
    checkpoint_at(env, &DataKey::SupplyCheckpoints, ledger)
}

fn checkpoint_at(env: &Env, key: &DataKey, ledger: u32) -> i128 {
    let checkpoints: Vec<Checkpoint> = env
        .storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env));

    // Binary search for the last checkpoint at or before `ledger`.
    let mut low = 0u32;
    let mut high = checkpoints.len();
    while low < high {
        let mid = low + (high - low) / 2;
        if checkpoints.get_unchecked(mid).ledger <= ledger {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    if low == 0 {
        0
    } else {
        checkpoints.get_unchecked(low - 1).amount
    }
}
