//! Staking ledger: per-principal positions and accounts, the pool counter,
//! and the `Staked → CooldownPending → Withdrawable → Unstaked` state machine.
//!
//! Every function here validates completely before its first storage write.
//! Token movements are left to the caller in `lib.rs`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::config::{self, ProtocolConfig};
use crate::rewards;
use crate::tiers::{self, Tier};
use crate::ContractError;

const POSITION: Symbol = symbol_short!("POS");
const ACCOUNT: Symbol = symbol_short!("ACCT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingPosition {
    pub amount: i128,
    pub start_height: u32,
    pub last_claim_height: u32,
    pub lock_period: u32,
    /// Set exactly while an unstake request is outstanding.
    pub cooldown_start: Option<u32>,
    pub accumulated_rewards: i128,
    /// Combined tier and lock multiplier (scale 100) captured at stake time.
    pub reward_multiplier: u32,
    /// Amount requested by the outstanding unstake; zero when none.
    pub unstake_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserAccount {
    pub stx_staked: i128,
    pub tier_level: u32,
    pub rewards_multiplier: u32,
    pub voting_power: i128,
    pub last_updated: u32,
    /// Height before which the stake may not leave the pool because it backs
    /// a ballot on a proposal that is still open.
    pub vote_locked_until: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionState {
    Unstaked,
    Staked,
    CooldownPending,
    Withdrawable,
}

/// Result of a successful `complete_unstake`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub principal: i128,
    pub rewards: i128,
    /// The position was fully withdrawn and deleted.
    pub closed: bool,
}

// ── Repository ───────────────────────────────────────────────────────────────

fn position_key(staker: &Address) -> (Symbol, Address) {
    (POSITION, staker.clone())
}

fn account_key(staker: &Address) -> (Symbol, Address) {
    (ACCOUNT, staker.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn get_position(env: &Env, staker: &Address) -> Option<StakingPosition> {
    env.storage().persistent().get(&position_key(staker))
}

pub fn set_position(env: &Env, staker: &Address, position: &StakingPosition) {
    let key = position_key(staker);
    env.storage().persistent().set(&key, position);
    extend_ttl(env, &key);
}

pub fn remove_position(env: &Env, staker: &Address) {
    env.storage().persistent().remove(&position_key(staker));
}

pub fn get_account(env: &Env, staker: &Address) -> Option<UserAccount> {
    env.storage().persistent().get(&account_key(staker))
}

pub fn set_account(env: &Env, staker: &Address, account: &UserAccount) {
    let key = account_key(staker);
    env.storage().persistent().set(&key, account);
    extend_ttl(env, &key);
}

pub fn remove_account(env: &Env, staker: &Address) {
    env.storage().persistent().remove(&account_key(staker));
}

// ── Derived values ───────────────────────────────────────────────────────────

/// Rebuild an account from its staked total. Tier, multiplier and voting
/// power are never set any other way.
pub fn account_for(
    tiers: &Vec<Tier>,
    stx_staked: i128,
    now: u32,
    vote_locked_until: u32,
) -> UserAccount {
    let (tier_level, rewards_multiplier) = tiers::tier_for(tiers, stx_staked);
    UserAccount {
        stx_staked,
        tier_level,
        rewards_multiplier,
        voting_power: stx_staked,
        last_updated: now,
        vote_locked_until,
    }
}

/// Principal that is still earning. The amount under an outstanding unstake
/// request stops at `cooldown_start`; `initiate_unstake` settles up to that
/// height, so the clock never needs to look behind `last_claim_height`.
fn accruing_amount(position: &StakingPosition) -> i128 {
    match position.cooldown_start {
        Some(_) => position.amount.saturating_sub(position.unstake_amount),
        None => position.amount,
    }
}

/// Rewards accrued since the last claim, not yet folded into
/// `accumulated_rewards`.
pub fn accrued_since_claim(position: &StakingPosition, base_rate: u32, now: u32) -> i128 {
    let elapsed = now.saturating_sub(position.last_claim_height);
    rewards::rewards(
        accruing_amount(position),
        base_rate,
        position.reward_multiplier,
        elapsed,
    )
}

pub fn pending_rewards(position: &StakingPosition, base_rate: u32, now: u32) -> i128 {
    position
        .accumulated_rewards
        .saturating_add(accrued_since_claim(position, base_rate, now))
}

/// Fold accrued rewards into `accumulated_rewards` and advance the claim clock.
pub fn settle(position: &mut StakingPosition, base_rate: u32, now: u32) {
    let accrued = accrued_since_claim(position, base_rate, now);
    position.accumulated_rewards = position.accumulated_rewards.saturating_add(accrued);
    position.last_claim_height = position.last_claim_height.max(now);
}

pub fn position_state(
    position: Option<&StakingPosition>,
    cooldown_period: u32,
    now: u32,
) -> PositionState {
    match position {
        None => PositionState::Unstaked,
        Some(p) => match p.cooldown_start {
            None if p.amount == 0 => PositionState::Unstaked,
            None => PositionState::Staked,
            Some(start) if now.saturating_sub(start) >= cooldown_period => {
                PositionState::Withdrawable
            }
            Some(_) => PositionState::CooldownPending,
        },
    }
}

// ── State transitions ────────────────────────────────────────────────────────

/// Checks every `stake` precondition that does not depend on the caller's
/// token balance. The minimum is always positive, so zero and negative
/// amounts fail as `BelowMinimum`.
pub fn validate_stake(
    config: &ProtocolConfig,
    amount: i128,
    lock_period: u32,
) -> Result<(), ContractError> {
    if !rewards::is_valid_lock_period(lock_period) {
        return Err(ContractError::InvalidProtocolParameter);
    }
    if amount < config.minimum_stake {
        return Err(ContractError::BelowMinimum);
    }
    Ok(())
}

/// Record a deposit that has already been transferred into the pool.
///
/// Repeated stakes add to the amount but overwrite `start_height` and
/// `lock_period` with this call's values, and cancel any pending unstake.
pub fn record_stake(
    env: &Env,
    config: &ProtocolConfig,
    staker: &Address,
    amount: i128,
    lock_period: u32,
    now: u32,
) -> (StakingPosition, UserAccount) {
    let tiers = tiers::load(env);

    let (prev_amount, prev_rewards) = match get_position(env, staker) {
        Some(mut existing) => {
            settle(&mut existing, config.base_reward_rate, now);
            (existing.amount, existing.accumulated_rewards)
        }
        None => (0, 0),
    };
    let new_total = prev_amount.saturating_add(amount);
    let (_, tier_multiplier) = tiers::tier_for(&tiers, new_total);

    let position = StakingPosition {
        amount: new_total,
        start_height: now,
        last_claim_height: now,
        lock_period,
        cooldown_start: None,
        accumulated_rewards: prev_rewards,
        reward_multiplier: rewards::combined_multiplier(
            tier_multiplier,
            rewards::lock_multiplier(lock_period),
        ),
        unstake_amount: 0,
    };
    set_position(env, staker, &position);

    let vote_locked_until = get_account(env, staker)
        .map(|a| a.vote_locked_until)
        .unwrap_or(0);
    let account = account_for(&tiers, new_total, now, vote_locked_until);
    set_account(env, staker, &account);

    config::set_pool_total(env, config::pool_total(env).saturating_add(amount));

    (position, account)
}

/// Start the cooldown for `amount`. No funds move.
pub fn initiate_unstake(
    env: &Env,
    config: &ProtocolConfig,
    staker: &Address,
    amount: i128,
    now: u32,
) -> Result<StakingPosition, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let mut position = get_position(env, staker).ok_or(ContractError::NoStake)?;
    if amount > position.amount {
        return Err(ContractError::InsufficientBalance);
    }
    if position.cooldown_start.is_some() {
        return Err(ContractError::CooldownActive);
    }
    require_unlocked(env, staker, now)?;

    settle(&mut position, config.base_reward_rate, now);
    position.cooldown_start = Some(now);
    position.unstake_amount = amount;
    set_position(env, staker, &position);

    Ok(position)
}

/// Finish a matured unstake request, releasing the requested amount from
/// the pool. A request covering the whole position deletes it and pays out
/// every owed reward the reserve can cover.
pub fn complete_unstake(
    env: &Env,
    config: &ProtocolConfig,
    staker: &Address,
    now: u32,
) -> Result<Withdrawal, ContractError> {
    let mut position = get_position(env, staker).ok_or(ContractError::NoStake)?;
    let cooldown_start = position
        .cooldown_start
        .ok_or(ContractError::NotAuthorized)?;
    if now.saturating_sub(cooldown_start) < config.cooldown_period {
        return Err(ContractError::CooldownActive);
    }
    require_unlocked(env, staker, now)?;

    settle(&mut position, config.base_reward_rate, now);
    let principal = position.unstake_amount.min(position.amount);
    let remaining = position.amount.saturating_sub(principal);

    let mut paid_rewards = 0;
    if remaining == 0 {
        let reserve = config::reward_reserve(env);
        paid_rewards = position.accumulated_rewards.min(reserve).max(0);
        config::set_reward_reserve(env, reserve.saturating_sub(paid_rewards));
        remove_position(env, staker);
        remove_account(env, staker);
    } else {
        let tiers = tiers::load(env);
        let (_, tier_multiplier) = tiers::tier_for(&tiers, remaining);
        position.amount = remaining;
        position.cooldown_start = None;
        position.unstake_amount = 0;
        position.last_claim_height = now;
        position.reward_multiplier = rewards::combined_multiplier(
            tier_multiplier,
            rewards::lock_multiplier(position.lock_period),
        );
        set_position(env, staker, &position);

        let vote_locked_until = get_account(env, staker)
            .map(|a| a.vote_locked_until)
            .unwrap_or(0);
        let account = account_for(&tiers, remaining, now, vote_locked_until);
        set_account(env, staker, &account);
    }

    config::set_pool_total(env, config::pool_total(env).saturating_sub(principal));

    Ok(Withdrawal {
        principal,
        rewards: paid_rewards,
        closed: remaining == 0,
    })
}

/// Settle and zero the caller's owed rewards, debiting the reserve.
/// Returns the amount to pay out; zero means nothing was owed.
pub fn claim_rewards(
    env: &Env,
    config: &ProtocolConfig,
    staker: &Address,
    now: u32,
) -> Result<i128, ContractError> {
    let mut position = get_position(env, staker).ok_or(ContractError::NoStake)?;

    settle(&mut position, config.base_reward_rate, now);
    let owed = position.accumulated_rewards;
    if owed <= 0 {
        set_position(env, staker, &position);
        return Ok(0);
    }

    let reserve = config::reward_reserve(env);
    if reserve < owed {
        return Err(ContractError::InsufficientRewardReserve);
    }

    position.accumulated_rewards = 0;
    set_position(env, staker, &position);
    config::set_reward_reserve(env, reserve.saturating_sub(owed));

    Ok(owed)
}

/// Drop the whole position without cooldown. Unpaid rewards are forfeited.
pub fn emergency_exit(env: &Env, staker: &Address) -> Result<i128, ContractError> {
    let position = get_position(env, staker).ok_or(ContractError::NoStake)?;

    remove_position(env, staker);
    remove_account(env, staker);
    config::set_pool_total(
        env,
        config::pool_total(env).saturating_sub(position.amount),
    );

    Ok(position.amount)
}

/// Extend the caller's vote lock to cover a ballot closing at `until`.
pub fn extend_vote_lock(env: &Env, staker: &Address, until: u32) {
    if let Some(mut account) = get_account(env, staker) {
        if until > account.vote_locked_until {
            account.vote_locked_until = until;
            set_account(env, staker, &account);
        }
    }
}

fn require_unlocked(env: &Env, staker: &Address, now: u32) -> Result<(), ContractError> {
    match get_account(env, staker) {
        Some(account) if now < account.vote_locked_until => Err(ContractError::VoteLocked),
        _ => Ok(()),
    }
}
