#![cfg(test)]

//! Pipeline-level tests: stage ordering, amount validation, allowances,
//! freeze accounting bounds, and historical checkpoints.

use crate::test::{register_holder, setup, KYC, US};
use crate::TokenError;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    vec, Address, Env,
};

fn set_sequence(env: &Env, sequence: u32) {
    env.ledger().with_mut(|info| info.sequence_number = sequence);
}

#[test]
fn checkpoints_track_balance_history() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    let bob = register_holder(&s, US, &[]);

    set_sequence(&s.env, 10);
    s.token.mint(&s.admin, &alice, &1_000);

    set_sequence(&s.env, 20);
    s.token.transfer(&alice, &bob, &400);

    set_sequence(&s.env, 30);
    s.token.burn(&s.admin, &bob, &100);

    // Before the first checkpoint every account reads zero.
    assert_eq!(s.token.balance_at(&alice, &5), 0);
    assert_eq!(s.token.total_supply_at(&5), 0);

    assert_eq!(s.token.balance_at(&alice, &10), 1_000);
    assert_eq!(s.token.balance_at(&alice, &15), 1_000);
    assert_eq!(s.token.balance_at(&alice, &20), 600);
    assert_eq!(s.token.balance_at(&alice, &100), 600);

    assert_eq!(s.token.balance_at(&bob, &10), 0);
    assert_eq!(s.token.balance_at(&bob, &25), 400);
    assert_eq!(s.token.balance_at(&bob, &30), 300);

    assert_eq!(s.token.total_supply_at(&10), 1_000);
    assert_eq!(s.token.total_supply_at(&29), 1_000);
    assert_eq!(s.token.total_supply_at(&30), 900);
    assert_eq!(s.token.total_supply(), 900);
}

#[test]
fn same_ledger_writes_collapse_into_one_checkpoint() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);

    set_sequence(&s.env, 7);
    s.token.mint(&s.admin, &alice, &500);
    s.token.mint(&s.admin, &alice, &250);

    assert_eq!(s.token.balance_at(&alice, &7), 750);
    assert_eq!(s.token.total_supply_at(&7), 750);
    assert_eq!(s.token.balance_at(&alice, &6), 0);
}

#[test]
fn allowance_spending() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    let bob = register_holder(&s, US, &[]);
    let spender = Address::generate(&s.env);
    s.token.mint(&s.admin, &alice, &1_000);

    s.token.approve(&alice, &spender, &300);
    assert_eq!(s.token.allowance(&alice, &spender), 300);

    s.token.transfer_from(&spender, &alice, &bob, &200);
    assert_eq!(s.token.balance(&bob), 200);
    assert_eq!(s.token.allowance(&alice, &spender), 100);

    let err = s
        .token
        .try_transfer_from(&spender, &alice, &bob, &200)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::InsufficientAllowance);

    let err = s.token.try_approve(&alice, &spender, &-1).unwrap_err().unwrap();
    assert_eq!(err, TokenError::InvalidAmount);

    // Delegated transfers run the same pipeline as direct ones.
    s.token.freeze_partial_tokens(&s.admin, &alice, &750);
    let err = s
        .token
        .try_transfer_from(&spender, &alice, &bob, &100)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::InsufficientUnfrozenBalance);
}

#[test]
fn freeze_accounting_bounds() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    s.token.mint(&s.admin, &alice, &100);

    let err = s
        .token
        .try_freeze_partial_tokens(&s.admin, &alice, &150)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::FreezeExceedsBalance);

    s.token.freeze_partial_tokens(&s.admin, &alice, &80);
    let err = s
        .token
        .try_freeze_partial_tokens(&s.admin, &alice, &30)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::FreezeExceedsBalance);

    let err = s
        .token
        .try_unfreeze_partial_tokens(&s.admin, &alice, &90)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::UnfreezeExceedsFrozen);

    s.token.unfreeze_partial_tokens(&s.admin, &alice, &80);
    assert_eq!(s.token.frozen_tokens(&alice), 0);

    let err = s
        .token
        .try_freeze_partial_tokens(&s.admin, &alice, &0)
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::InvalidAmount);
}

#[test]
fn zero_and_negative_amounts_rejected() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    let bob = register_holder(&s, US, &[]);
    s.token.mint(&s.admin, &alice, &100);

    let err = s.token.try_mint(&s.admin, &alice, &0).unwrap_err().unwrap();
    assert_eq!(err, TokenError::InvalidAmount);
    let err = s.token.try_transfer(&alice, &bob, &-5).unwrap_err().unwrap();
    assert_eq!(err, TokenError::InvalidAmount);
    let err = s.token.try_burn(&s.admin, &alice, &0).unwrap_err().unwrap();
    assert_eq!(err, TokenError::InvalidAmount);
}

#[test]
fn pause_check_runs_before_custodian_check() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    let bob = register_holder(&s, US, &[]);
    s.token.mint(&s.admin, &alice, &100);
    s.token.set_address_frozen(&s.admin, &alice, &true);
    s.token.pause(&s.admin);

    // Both stages would reject; the pause stage answers first.
    let err = s.token.try_transfer(&alice, &bob, &10).unwrap_err().unwrap();
    assert_eq!(err, TokenError::TokenPaused);
}

#[test]
fn custodian_check_runs_before_verification() {
    let s = setup();
    s.token.set_required_claim_topics(&s.admin, &vec![&s.env, KYC]);
    let alice = register_holder(&s, US, &[KYC]);
    let stranger = Address::generate(&s.env);
    s.token.mint(&s.admin, &alice, &100);
    s.token.set_address_frozen(&s.admin, &alice, &true);

    // Frozen sender and unverified recipient: the custodian stage wins.
    let err = s.token.try_transfer(&alice, &stranger, &10).unwrap_err().unwrap();
    assert_eq!(err, TokenError::SenderAddressFrozen);
}

#[test]
fn batch_freeze_checks_lengths() {
    let s = setup();
    let alice = register_holder(&s, US, &[]);
    let bob = register_holder(&s, US, &[]);
    s.token.mint(&s.admin, &alice, &100);
    s.token.mint(&s.admin, &bob, &100);

    let err = s
        .token
        .try_batch_freeze_partial_tokens(
            &s.admin,
            &vec![&s.env, alice.clone(), bob.clone()],
            &vec![&s.env, 10_i128],
        )
        .unwrap_err()
        .unwrap();
    assert_eq!(err, TokenError::ArrayLengthMismatch);

    s.token.batch_freeze_partial_tokens(
        &s.admin,
        &vec![&s.env, alice.clone(), bob.clone()],
        &vec![&s.env, 10_i128, 20_i128],
    );
    assert_eq!(s.token.frozen_tokens(&alice), 10);
    assert_eq!(s.token.frozen_tokens(&bob), 20);

    s.token.batch_unfreeze_partial_tokens(
        &s.admin,
        &vec![&s.env, alice.clone(), bob.clone()],
        &vec![&s.env, 10_i128, 5_i128],
    );
    assert_eq!(s.token.frozen_tokens(&alice), 0);
    assert_eq!(s.token.frozen_tokens(&bob), 15);
}
