use soroban_sdk::{Address, Env, String};

use crate::config::{self, ProtocolConfig};
use crate::{events, ContractError};

/// Load the configuration of an initialized contract.
pub fn require_initialized(env: &Env) -> Result<ProtocolConfig, ContractError> {
    if !config::is_initialized(env) {
        return Err(ContractError::NotInitialized);
    }
    config::load(env)
}

/// Only the owner fixed at initialization passes. Failures are published as
/// access violations before returning.
pub fn require_owner(
    env: &Env,
    config: &ProtocolConfig,
    caller: &Address,
    action: &str,
) -> Result<(), ContractError> {
    if *caller != config.owner {
        events::publish_access_violation(
            env,
            caller.clone(),
            String::from_str(env, action),
            String::from_str(env, "owner"),
        );
        events::publish_error(env, ContractError::NotAuthorized, Some(caller.clone()));
        return Err(ContractError::NotAuthorized);
    }
    Ok(())
}

/// Checked at the top of every user-facing mutation except
/// `emergency_withdraw`.
pub fn require_not_emergency(config: &ProtocolConfig) -> Result<(), ContractError> {
    if config.emergency_mode {
        return Err(ContractError::EmergencyMode);
    }
    Ok(())
}

/// Gates new deposits only; withdrawal paths ignore the pause flag.
pub fn require_not_paused(config: &ProtocolConfig) -> Result<(), ContractError> {
    if config.paused {
        return Err(ContractError::Paused);
    }
    Ok(())
}

pub fn require_emergency(config: &ProtocolConfig) -> Result<(), ContractError> {
    if !config.emergency_mode {
        return Err(ContractError::NotAuthorized);
    }
    Ok(())
}

pub fn set_paused(
    env: &Env,
    caller: &Address,
    paused: bool,
) -> Result<ProtocolConfig, ContractError> {
    let mut cfg = require_initialized(env)?;
    let action = if paused { "pause" } else { "resume" };
    require_owner(env, &cfg, caller, action)?;

    cfg.paused = paused;
    config::store(env, &cfg);

    if paused {
        events::publish_paused(env, caller.clone());
    } else {
        events::publish_resumed(env, caller.clone());
    }
    Ok(cfg)
}

pub fn set_emergency_mode(
    env: &Env,
    caller: &Address,
    enabled: bool,
) -> Result<ProtocolConfig, ContractError> {
    let mut cfg = require_initialized(env)?;
    require_owner(env, &cfg, caller, "set_emergency_mode")?;

    cfg.emergency_mode = enabled;
    config::store(env, &cfg);

    events::publish_emergency_mode_set(env, caller.clone(), enabled);
    Ok(cfg)
}
