//! Role-based access control. Regulatory capabilities (freeze, forced
//! transfer, recovery) must be grantable independently of ordinary
//! administration, so each is its own role entry rather than one owner flag.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::error::TokenError;
use crate::DataKey;

pub const ADMIN: Symbol = symbol_short!("admin");
pub const COMPLIANCE_ADMIN: Symbol = symbol_short!("comp_adm");
pub const VERIFICATION_ADMIN: Symbol = symbol_short!("verif_adm");
pub const MINTER: Symbol = symbol_short!("minter");
pub const BURNER: Symbol = symbol_short!("burner");
pub const FREEZER: Symbol = symbol_short!("freezer");
pub const FORCED_TRANSFER: Symbol = symbol_short!("forced");
pub const RECOVERY: Symbol = symbol_short!("recovery");
pub const PAUSER: Symbol = symbol_short!("pauser");

pub fn has_role(env: &Env, role: &Symbol, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Role(role.clone(), account.clone()))
        .unwrap_or(false)
}

/// Authenticates `operator` and checks the role grant.
pub fn require_role(env: &Env, role: &Symbol, operator: &Address) -> Result<(), TokenError> {
    operator.require_auth();
    if !has_role(env, role, operator) {
        return Err(TokenError::Unauthorized);
    }
    Ok(())
}

pub fn grant(env: &Env, role: &Symbol, account: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Role(role.clone(), account.clone()), &true);
    env.events().publish(
        (symbol_short!("token"), symbol_short!("rolegrant")),
        (role.clone(), account.clone()),
    );
}

pub fn revoke(env: &Env, role: &Symbol, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Role(role.clone(), account.clone()));
    env.events().publish(
        (symbol_short!("token"), symbol_short!("rolerevok")),
        (role.clone(), account.clone()),
    );
}
