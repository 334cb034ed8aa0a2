#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

use crate::errors::{ContractError, ErrorContext};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub base_reward_rate: u32,
    pub cooldown_period: u32,
    pub minimum_stake: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub lock_period: u32,
    pub position_amount: i128,
    pub tier_level: u32,
    pub reward_multiplier: u32,
    pub pool_total: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeInitiatedEvent {
    pub staker: Address,
    pub amount: i128,
    pub withdrawable_at: u32,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeCompletedEvent {
    pub staker: Address,
    pub principal: i128,
    pub rewards: i128,
    pub position_closed: bool,
    pub pool_total: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub reserve: i128,
    pub height: u32,
}

/// Fired when a staker leaves through the emergency exit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub staker: Address,
    pub principal: i128,
    pub pool_total: i128,
    /// Open proposals whose tallies dropped this staker's weight.
    pub votes_withdrawn: u32,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalCreatedEvent {
    pub id: u64,
    pub creator: Address,
    pub end_height: u32,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCastEvent {
    pub id: u64,
    pub voter: Address,
    pub support: bool,
    pub weight: i128,
    pub votes_for: i128,
    pub votes_against: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalExecutedEvent {
    pub id: u64,
    pub votes_for: i128,
    pub votes_against: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub owner: Address,
    pub paused: bool,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyModeSetEvent {
    pub owner: Address,
    pub enabled: bool,
    pub height: u32,
}

/// Fired when the owner changes a numeric configuration parameter.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdatedEvent {
    pub parameter: Symbol,
    pub old_value: i128,
    pub new_value: i128,
    pub height: u32,
}

/// Fired when an owner-only action is attempted by someone else.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessViolationEvent {
    pub caller: Address,
    pub action: String,
    pub required_permission: String,
    pub height: u32,
}

/// Machine-readable record of a rejected call.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorEvent {
    pub error_code: u32,
    pub context: ErrorContext,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    token: Address,
    base_reward_rate: u32,
    cooldown_period: u32,
    minimum_stake: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            token,
            base_reward_rate,
            cooldown_period,
            minimum_stake,
            height: env.ledger().sequence(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_staked(
    env: &Env,
    staker: Address,
    amount: i128,
    lock_period: u32,
    position_amount: i128,
    tier_level: u32,
    reward_multiplier: u32,
    pool_total: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            lock_period,
            position_amount,
            tier_level,
            reward_multiplier,
            pool_total,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_unstake_initiated(env: &Env, staker: Address, amount: i128, withdrawable_at: u32) {
    env.events().publish(
        (symbol_short!("UNSTK_REQ"), staker.clone()),
        UnstakeInitiatedEvent {
            staker,
            amount,
            withdrawable_at,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_unstake_completed(
    env: &Env,
    staker: Address,
    principal: i128,
    rewards: i128,
    position_closed: bool,
    pool_total: i128,
) {
    env.events().publish(
        (symbol_short!("UNSTK_FIN"), staker.clone()),
        UnstakeCompletedEvent {
            staker,
            principal,
            rewards,
            position_closed,
            pool_total,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128, reserve: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        RewardsFundedEvent {
            funder,
            amount,
            reserve,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdrawn(
    env: &Env,
    staker: Address,
    principal: i128,
    pool_total: i128,
    votes_withdrawn: u32,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), staker.clone()),
        EmergencyWithdrawnEvent {
            staker,
            principal,
            pool_total,
            votes_withdrawn,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_proposal_created(env: &Env, id: u64, creator: Address, end_height: u32) {
    env.events().publish(
        (symbol_short!("PROP_NEW"), id),
        ProposalCreatedEvent {
            id,
            creator,
            end_height,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_vote_cast(
    env: &Env,
    id: u64,
    voter: Address,
    support: bool,
    weight: i128,
    votes_for: i128,
    votes_against: i128,
) {
    env.events().publish(
        (symbol_short!("VOTE"), id, voter.clone()),
        VoteCastEvent {
            id,
            voter,
            support,
            weight,
            votes_for,
            votes_against,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_proposal_executed(env: &Env, id: u64, votes_for: i128, votes_against: i128) {
    env.events().publish(
        (symbol_short!("PROP_EXEC"), id),
        ProposalExecutedEvent {
            id,
            votes_for,
            votes_against,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_paused(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"),),
        PauseChangedEvent {
            owner,
            paused: true,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_resumed(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("RESUMED"),),
        PauseChangedEvent {
            owner,
            paused: false,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_mode_set(env: &Env, owner: Address, enabled: bool) {
    env.events().publish(
        (symbol_short!("EMRG_SET"),),
        EmergencyModeSetEvent {
            owner,
            enabled,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_config_updated(env: &Env, parameter: Symbol, old_value: i128, new_value: i128) {
    env.events().publish(
        (symbol_short!("CFG_SET"), parameter.clone()),
        ConfigUpdatedEvent {
            parameter,
            old_value,
            new_value,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_access_violation(
    env: &Env,
    caller: Address,
    action: String,
    required_permission: String,
) {
    env.events().publish(
        (symbol_short!("ACC_VIOL"), caller.clone(), action.clone()),
        AccessViolationEvent {
            caller,
            action,
            required_permission,
            height: env.ledger().sequence(),
        },
    );
}

/// Topics: `(ERROR, category, severity)`.
pub fn publish_error(env: &Env, error: ContractError, user: Option<Address>) {
    let context = error.context(env, user);
    env.events().publish(
        (
            symbol_short!("ERROR"),
            context.category.clone(),
            context.severity.clone(),
        ),
        ErrorEvent {
            error_code: error as u32,
            context,
        },
    );
}
