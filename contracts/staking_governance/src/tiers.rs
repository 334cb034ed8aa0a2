use soroban_sdk::{contracttype, symbol_short, vec, Env, Symbol, Vec};

use crate::ContractError;

const TIERS: Symbol = symbol_short!("TIERS");

pub const FEATURE_FLAG_COUNT: u32 = 3;

/// Tier assigned to any stake below the smallest configured threshold.
pub const DEFAULT_TIER_LEVEL: u32 = 1;
/// 1.00x at scale 100.
pub const BASE_MULTIPLIER: u32 = 100;

pub const TIER_2_THRESHOLD: i128 = 5_000_000;
pub const TIER_3_THRESHOLD: i128 = 10_000_000;

/// One row of the tier table.
///
/// `feature_flags` is ordered: `[can_vote, can_propose, priority]`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tier {
    pub level: u32,
    pub minimum_stake: i128,
    pub reward_multiplier: u32,
    pub feature_flags: Vec<bool>,
}

/// The table written by `initialize_contract`, sorted by ascending threshold.
pub fn reference_table(env: &Env) -> Vec<Tier> {
    vec![
        env,
        Tier {
            level: 1,
            minimum_stake: 0,
            reward_multiplier: BASE_MULTIPLIER,
            feature_flags: vec![env, true, false, false],
        },
        Tier {
            level: 2,
            minimum_stake: TIER_2_THRESHOLD,
            reward_multiplier: 150,
            feature_flags: vec![env, true, true, false],
        },
        Tier {
            level: 3,
            minimum_stake: TIER_3_THRESHOLD,
            reward_multiplier: 200,
            feature_flags: vec![env, true, true, true],
        },
    ]
}

/// Checks that thresholds start at zero and strictly ascend, multipliers
/// never drop below 1.00x or decrease, and every row carries the full flag set.
pub fn validate_table(tiers: &Vec<Tier>) -> Result<(), ContractError> {
    let mut previous: Option<Tier> = None;
    for tier in tiers.iter() {
        if tier.feature_flags.len() != FEATURE_FLAG_COUNT || tier.reward_multiplier < BASE_MULTIPLIER
        {
            return Err(ContractError::InvalidProtocolParameter);
        }
        match &previous {
            None if tier.minimum_stake != 0 => {
                return Err(ContractError::InvalidProtocolParameter);
            }
            Some(prev)
                if tier.minimum_stake <= prev.minimum_stake
                    || tier.reward_multiplier < prev.reward_multiplier =>
            {
                return Err(ContractError::InvalidProtocolParameter);
            }
            _ => {}
        }
        previous = Some(tier);
    }
    if previous.is_none() {
        return Err(ContractError::InvalidProtocolParameter);
    }
    Ok(())
}

/// Resolve `(tier_level, reward_multiplier)` for a total stake.
///
/// Thresholds are evaluated from largest to smallest and the first one met
/// wins. Anything below every threshold falls back to tier 1 at 1.00x.
pub fn tier_for(tiers: &Vec<Tier>, total_stake: i128) -> (u32, u32) {
    let mut idx = tiers.len();
    while idx > 0 {
        idx -= 1;
        if let Some(tier) = tiers.get(idx) {
            if total_stake >= tier.minimum_stake {
                return (tier.level, tier.reward_multiplier);
            }
        }
    }
    (DEFAULT_TIER_LEVEL, BASE_MULTIPLIER)
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub fn store(env: &Env, tiers: &Vec<Tier>) {
    env.storage().instance().set(&TIERS, tiers);
}

pub fn load(env: &Env) -> Vec<Tier> {
    env.storage()
        .instance()
        .get(&TIERS)
        .unwrap_or_else(|| Vec::new(env))
}
