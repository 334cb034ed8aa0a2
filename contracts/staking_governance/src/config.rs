use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const INITIALIZED: Symbol = symbol_short!("INIT");
const POOL_TOTAL: Symbol = symbol_short!("POOL_TOT");
const REWARD_RESERVE: Symbol = symbol_short!("RWD_RSV");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Protocol constants ───────────────────────────────────────────────────────

/// 5% expressed in basis points.
pub const DEFAULT_BASE_REWARD_RATE: u32 = 500;
/// Blocks between `initiate_unstake` and the earliest `complete_unstake`.
pub const DEFAULT_COOLDOWN_PERIOD: u32 = 1440;
pub const DEFAULT_MINIMUM_STAKE: i128 = 1_000_000;
pub const MAX_BASE_REWARD_RATE: u32 = 10_000;

/// Process-wide configuration. Only the owner may change it after
/// `initialize_contract`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolConfig {
    pub owner: Address,
    /// Token contract holding the pooled asset.
    pub token: Address,
    pub base_reward_rate: u32,
    pub cooldown_period: u32,
    pub minimum_stake: i128,
    pub paused: bool,
    pub emergency_mode: bool,
}

impl ProtocolConfig {
    pub fn new(owner: Address, token: Address) -> Self {
        Self {
            owner,
            token,
            base_reward_rate: DEFAULT_BASE_REWARD_RATE,
            cooldown_period: DEFAULT_COOLDOWN_PERIOD,
            minimum_stake: DEFAULT_MINIMUM_STAKE,
            paused: false,
            emergency_mode: false,
        }
    }
}

pub fn validate_base_reward_rate(rate: u32) -> Result<(), ContractError> {
    if rate > MAX_BASE_REWARD_RATE {
        return Err(ContractError::InvalidProtocolParameter);
    }
    Ok(())
}

pub fn validate_cooldown_period(period: u32) -> Result<(), ContractError> {
    if period == 0 {
        return Err(ContractError::InvalidProtocolParameter);
    }
    Ok(())
}

pub fn validate_minimum_stake(minimum: i128) -> Result<(), ContractError> {
    if minimum <= 0 {
        return Err(ContractError::InvalidProtocolParameter);
    }
    Ok(())
}

fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
    extend_ttl_instance(env);
}

pub fn load(env: &Env) -> Result<ProtocolConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, config: &ProtocolConfig) {
    env.storage().instance().set(&CONFIG, config);
    extend_ttl_instance(env);
}

pub fn pool_total(env: &Env) -> i128 {
    env.storage().instance().get(&POOL_TOTAL).unwrap_or(0)
}

pub fn set_pool_total(env: &Env, total: i128) {
    env.storage().instance().set(&POOL_TOTAL, &total);
}

pub fn reward_reserve(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_RESERVE).unwrap_or(0)
}

pub fn set_reward_reserve(env: &Env, reserve: i128) {
    env.storage().instance().set(&REWARD_RESERVE, &reserve);
}
