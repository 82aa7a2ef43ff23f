//! The hook pipeline. Every balance-mutating operation runs the same
//! statically ordered before-stages, then the ledger mutation, then the
//! compliance notification, then the after-stages. The order is an explicit
//! array, not an artifact of some override chain, so it can be asserted in
//! tests and never drifts.

use smart_interfaces::{ComplianceClient, IdentityRegistryClient};
use soroban_sdk::{Address, Env};

use crate::error::TokenError;
use crate::{balances, collateral, config, custodian};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpKind {
    Mint,
    Transfer,
    ForcedTransfer,
    Burn,
    Redeem,
    Recovery,
}

pub struct OpCtx {
    pub kind: OpKind,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub amount: i128,
}

type Stage = fn(&Env, &OpCtx) -> Result<(), TokenError>;

/// Fixed before-stage order: pause, custodian, collateral, verification,
/// compliance view-check. Reordering these changes observable semantics.
pub const BEFORE_STAGES: [Stage; 5] = [
    pause_stage,
    custodian_stage,
    collateral_stage,
    verification_stage,
    compliance_stage,
];

pub fn run_before(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    if ctx.amount <= 0 {
        return Err(TokenError::InvalidAmount);
    }
    for stage in BEFORE_STAGES.iter() {
        stage(env, ctx)?;
    }
    Ok(())
}

/// After-stages: historical snapshots for the touched holders and supply.
pub fn run_after(env: &Env, ctx: &OpCtx) {
    if let Some(from) = &ctx.from {
        balances::snapshot_holder(env, from);
    }
    if let Some(to) = &ctx.to {
        balances::snapshot_holder(env, to);
    }
    balances::snapshot_supply(env);
}

fn pause_stage(env: &Env, _ctx: &OpCtx) -> Result<(), TokenError> {
    if config::is_paused(env) {
        return Err(TokenError::TokenPaused);
    }
    Ok(())
}

fn custodian_stage(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    // Forced transfers and recovery override sender-side freezes; the
    // frozen excess is settled by the caller right before the mutation.
    let sender_checks = matches!(ctx.kind, OpKind::Transfer | OpKind::Burn | OpKind::Redeem);

    if sender_checks {
        if let Some(from) = &ctx.from {
            if custodian::is_frozen(env, from) {
                return Err(TokenError::SenderAddressFrozen);
            }
            if ctx.amount > custodian::unfrozen_balance(env, from) {
                return Err(TokenError::InsufficientUnfrozenBalance);
            }
        }
    }

    if !matches!(ctx.kind, OpKind::Recovery) {
        if let Some(to) = &ctx.to {
            if custodian::is_frozen(env, to) {
                return Err(TokenError::RecipientAddressFrozen);
            }
        }
    }
    Ok(())
}

fn collateral_stage(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    if matches!(ctx.kind, OpKind::Mint) {
        collateral::check_mint(env, ctx.amount)?;
    }
    Ok(())
}

fn verification_stage(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    let needs_verified_recipient = matches!(
        ctx.kind,
        OpKind::Mint | OpKind::Transfer | OpKind::ForcedTransfer
    );
    if !needs_verified_recipient {
        return Ok(());
    }
    let Some(to) = &ctx.to else {
        return Ok(());
    };
    let registry = config::identity_registry(env)?;
    let topics = config::required_claim_topics(env);
    let client = IdentityRegistryClient::new(env, &registry);
    match client.try_is_verified(to, &topics) {
        Ok(Ok(true)) => Ok(()),
        _ => Err(TokenError::RecipientNotVerified),
    }
}

fn compliance_stage(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    let modules = config::modules(env);
    if modules.is_empty() {
        return Ok(());
    }
    let compliance = config::compliance(env)?;
    let client = ComplianceClient::new(env, &compliance);
    let token = env.current_contract_address();
    match client.try_can_transfer(&token, &modules, &ctx.from, &ctx.to, &ctx.amount) {
        Ok(_) => Ok(()),
        Err(_) => Err(TokenError::ComplianceCheckFailed),
    }
}

/// Post-mutation compliance notification; module order is the list order.
/// A failure here aborts the transaction, rolling the mutation back.
pub fn notify_compliance(env: &Env, ctx: &OpCtx) -> Result<(), TokenError> {
    let modules = config::modules(env);
    if modules.is_empty() {
        return Ok(());
    }
    let compliance = config::compliance(env)?;
    let client = ComplianceClient::new(env, &compliance);
    let token = env.current_contract_address();

    let outcome = match (ctx.kind, &ctx.from, &ctx.to) {
        (OpKind::Mint, _, Some(to)) => {
            client.try_created(&token, &modules, to, &ctx.amount).map(|_| ())
        }
        (OpKind::Burn | OpKind::Redeem, Some(from), _) => {
            client.try_destroyed(&token, &modules, from, &ctx.amount).map(|_| ())
        }
        (_, Some(from), Some(to)) => client
            .try_transferred(&token, &modules, from, to, &ctx.amount)
            .map(|_| ()),
        _ => Ok(()),
    };
    outcome.map_err(|_| TokenError::ComplianceCheckFailed)
}
