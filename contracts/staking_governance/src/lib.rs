#![no_std]

pub mod config;
pub mod errors;
pub mod events;
pub mod governance;
pub mod guard;
pub mod ledger;
pub mod rewards;
pub mod tiers;

use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, String, Vec};

pub use config::ProtocolConfig;
pub use errors::{ContractError, ErrorCategory, ErrorContext, ErrorSeverity};
pub use governance::{Ballot, Proposal, ProposalStatus};
pub use ledger::{PositionState, StakingPosition, UserAccount};
pub use tiers::Tier;

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingGovernanceContract;

#[contractimpl]
impl StakingGovernanceContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `owner` – the only address that may pause, resume, or reconfigure.
    /// * `token` – SAC address of the asset users stake and earn.
    ///
    /// Writes the reference tier table and default parameters. A second call
    /// fails instead of resetting anything.
    pub fn initialize_contract(env: Env, owner: Address, token: Address) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        owner.require_auth();

        let table = tiers::reference_table(&env);
        tiers::validate_table(&table)?;

        let cfg = ProtocolConfig::new(owner.clone(), token.clone());
        config::store(&env, &cfg);
        tiers::store(&env, &table);
        config::mark_initialized(&env);
        // POOL_TOT, RWD_RSV and PR_CTR start at zero; readers default absent keys.

        events::publish_initialized(
            &env,
            owner,
            token,
            cfg.base_reward_rate,
            cfg.cooldown_period,
            cfg.minimum_stake,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` with a lock commitment of 0, 4320 or 8640 blocks.
    ///
    /// Adds to any existing position but restarts its lock clock with this
    /// call's `lock_period`, and cancels an outstanding unstake request.
    pub fn stake(
        env: Env,
        staker: Address,
        amount: i128,
        lock_period: u32,
    ) -> Result<StakingPosition, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        staker.require_auth();
        guard::require_not_emergency(&cfg)?;
        guard::require_not_paused(&cfg)?;
        ledger::validate_stake(&cfg, amount, lock_period)?;

        // Pull tokens first; a failed transfer aborts the whole invocation.
        token::Client::new(&env, &cfg.token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        let now = env.ledger().sequence();
        let (position, account) =
            ledger::record_stake(&env, &cfg, &staker, amount, lock_period, now);

        events::publish_staked(
            &env,
            staker,
            amount,
            lock_period,
            position.amount,
            account.tier_level,
            position.reward_multiplier,
            config::pool_total(&env),
        );

        Ok(position)
    }

    // ── Unstaking ───────────────────────────────────────────────────────────

    /// Request withdrawal of `amount`. Starts the cooldown; no funds move.
    pub fn initiate_unstake(
        env: Env,
        staker: Address,
        amount: i128,
    ) -> Result<StakingPosition, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        staker.require_auth();
        guard::require_not_emergency(&cfg)?;

        let now = env.ledger().sequence();
        let position = ledger::initiate_unstake(&env, &cfg, &staker, amount, now)?;

        events::publish_unstake_initiated(
            &env,
            staker,
            amount,
            now.saturating_add(cfg.cooldown_period),
        );

        Ok(position)
    }

    /// Withdraw the amount requested by `initiate_unstake` once the cooldown
    /// has elapsed. Returns the principal sent back to `staker`.
    pub fn complete_unstake(env: Env, staker: Address) -> Result<i128, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        staker.require_auth();
        guard::require_not_emergency(&cfg)?;

        let now = env.ledger().sequence();
        let withdrawal = ledger::complete_unstake(&env, &cfg, &staker, now)?;

        let payout = withdrawal.principal.saturating_add(withdrawal.rewards);
        if payout > 0 {
            token::Client::new(&env, &cfg.token).transfer(
                &env.current_contract_address(),
                &staker,
                &payout,
            );
        }

        events::publish_unstake_completed(
            &env,
            staker,
            withdrawal.principal,
            withdrawal.rewards,
            withdrawal.closed,
            config::pool_total(&env),
        );

        Ok(withdrawal.principal)
    }

    /// Return the full principal immediately while emergency mode is on.
    /// Unpaid rewards are forfeited and the staker's weight is taken back out
    /// of every proposal still open.
    pub fn emergency_withdraw(env: Env, staker: Address) -> Result<i128, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        staker.require_auth();
        guard::require_emergency(&cfg)?;

        let principal = ledger::emergency_exit(&env, &staker)?;
        let votes_withdrawn =
            governance::withdraw_open_votes(&env, &staker, env.ledger().sequence());
        if principal > 0 {
            token::Client::new(&env, &cfg.token).transfer(
                &env.current_contract_address(),
                &staker,
                &principal,
            );
        }

        events::publish_emergency_withdrawn(
            &env,
            staker,
            principal,
            config::pool_total(&env),
            votes_withdrawn,
        );

        Ok(principal)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has earned so far. Returns 0 without
    /// reverting when nothing is owed.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        staker.require_auth();
        guard::require_not_emergency(&cfg)?;

        let now = env.ledger().sequence();
        let owed = ledger::claim_rewards(&env, &cfg, &staker, now)?;
        if owed == 0 {
            return Ok(0);
        }

        token::Client::new(&env, &cfg.token).transfer(
            &env.current_contract_address(),
            &staker,
            &owed,
        );

        events::publish_reward_claimed(&env, staker, owed);

        Ok(owed)
    }

    /// Top up the reward reserve. Reserve funds are kept apart from staked
    /// principal so yield is never paid out of other users' deposits.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<i128, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        funder.require_auth();
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        token::Client::new(&env, &cfg.token).transfer(
            &funder,
            &env.current_contract_address(),
            &amount,
        );

        let reserve = config::reward_reserve(&env).saturating_add(amount);
        config::set_reward_reserve(&env, reserve);

        events::publish_rewards_funded(&env, funder, amount, reserve);

        Ok(reserve)
    }

    // ── Governance ──────────────────────────────────────────────────────────

    /// Open a proposal for `voting_period` blocks. Requires at least
    /// 1,000,000 units of voting power. Returns the new proposal id.
    pub fn create_proposal(
        env: Env,
        creator: Address,
        description: String,
        voting_period: u32,
    ) -> Result<u64, ContractError> {
        let cfg = guard::require_initialized(&env)?;
        creator.require_auth();
        guard::require_not_emergency(&cfg)?;

        let now = env.ledger().sequence();
        let proposal = governance::create_proposal(&env, &creator, description, voting_period, now)?;

        events::publish_proposal_created(&env, proposal.id, creator, proposal.end_height);

        Ok(proposal.id)
    }

    pub fn vote_on_proposal(
        env: Env,
        voter: Address,
        id: u64,
        support: bool,
    ) -> Result<(), ContractError> {
        let cfg = guard::require_initialized(&env)?;
        voter.require_auth();
        guard::require_not_emergency(&cfg)?;

        let now = env.ledger().sequence();
        let (proposal, ballot) = governance::cast_vote(&env, &voter, id, support, now)?;

        events::publish_vote_cast(
            &env,
            id,
            voter,
            support,
            ballot.weight,
            proposal.votes_for,
            proposal.votes_against,
        );

        Ok(())
    }

    /// Record that an accepted proposal has been applied. Applying it is up
    /// to the owner; this only flips the `executed` flag.
    pub fn mark_proposal_executed(env: Env, caller: Address, id: u64) -> Result<(), ContractError> {
        let cfg = guard::require_initialized(&env)?;
        caller.require_auth();
        guard::require_owner(&env, &cfg, &caller, "mark_proposal_executed")?;

        let proposal = governance::mark_executed(&env, id, env.ledger().sequence())?;

        events::publish_proposal_executed(&env, id, proposal.votes_for, proposal.votes_against);

        Ok(())
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Block new stakes. Unstaking and claiming stay available.
    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        guard::set_paused(&env, &caller, true)?;
        Ok(())
    }

    pub fn resume(env: Env, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        guard::set_paused(&env, &caller, false)?;
        Ok(())
    }

    /// Toggle emergency mode. While on, every user mutation except
    /// `emergency_withdraw` is rejected.
    pub fn set_emergency_mode(env: Env, caller: Address, enabled: bool) -> Result<(), ContractError> {
        caller.require_auth();
        guard::set_emergency_mode(&env, &caller, enabled)?;
        Ok(())
    }

    /// Update the base reward rate (basis points, at most 10_000).
    ///
    /// Takes effect on the next settlement of each position; accrual since a
    /// position's last claim is computed at the new rate.
    pub fn set_base_reward_rate(env: Env, caller: Address, new_rate: u32) -> Result<(), ContractError> {
        let mut cfg = guard::require_initialized(&env)?;
        caller.require_auth();
        guard::require_owner(&env, &cfg, &caller, "set_base_reward_rate")?;
        config::validate_base_reward_rate(new_rate)?;

        let old = cfg.base_reward_rate;
        cfg.base_reward_rate = new_rate;
        config::store(&env, &cfg);

        events::publish_config_updated(
            &env,
            symbol_short!("RWD_RATE"),
            i128::from(old),
            i128::from(new_rate),
        );
        Ok(())
    }

    /// Update the cooldown. Requests already in flight are measured against
    /// the new value.
    pub fn set_cooldown_period(env: Env, caller: Address, new_period: u32) -> Result<(), ContractError> {
        let mut cfg = guard::require_initialized(&env)?;
        caller.require_auth();
        guard::require_owner(&env, &cfg, &caller, "set_cooldown_period")?;
        config::validate_cooldown_period(new_period)?;

        let old = cfg.cooldown_period;
        cfg.cooldown_period = new_period;
        config::store(&env, &cfg);

        events::publish_config_updated(
            &env,
            symbol_short!("COOLDOWN"),
            i128::from(old),
            i128::from(new_period),
        );
        Ok(())
    }

    pub fn set_minimum_stake(env: Env, caller: Address, new_minimum: i128) -> Result<(), ContractError> {
        let mut cfg = guard::require_initialized(&env)?;
        caller.require_auth();
        guard::require_owner(&env, &cfg, &caller, "set_minimum_stake")?;
        config::validate_minimum_stake(new_minimum)?;

        let old = cfg.minimum_stake;
        cfg.minimum_stake = new_minimum;
        config::store(&env, &cfg);

        events::publish_config_updated(&env, symbol_short!("MIN_STAKE"), old, new_minimum);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(config::load(&env)?.owner)
    }

    pub fn get_config(env: Env) -> Result<ProtocolConfig, ContractError> {
        config::load(&env)
    }

    /// Sum of every position's amount.
    pub fn get_pool_total(env: Env) -> i128 {
        config::pool_total(&env)
    }

    pub fn get_reward_reserve(env: Env) -> i128 {
        config::reward_reserve(&env)
    }

    pub fn get_proposal_count(env: Env) -> u64 {
        governance::proposal_count(&env)
    }

    pub fn get_position(env: Env, staker: Address) -> Option<StakingPosition> {
        ledger::get_position(&env, &staker)
    }

    pub fn get_position_state(env: Env, staker: Address) -> Result<PositionState, ContractError> {
        let cfg = config::load(&env)?;
        let position = ledger::get_position(&env, &staker);
        Ok(ledger::position_state(
            position.as_ref(),
            cfg.cooldown_period,
            env.ledger().sequence(),
        ))
    }

    pub fn get_user_account(env: Env, staker: Address) -> Option<UserAccount> {
        ledger::get_account(&env, &staker)
    }

    /// Rewards owed right now without mutating state.
    pub fn get_pending_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        let cfg = config::load(&env)?;
        Ok(ledger::get_position(&env, &staker)
            .map(|p| ledger::pending_rewards(&p, cfg.base_reward_rate, env.ledger().sequence()))
            .unwrap_or(0))
    }

    pub fn get_tiers(env: Env) -> Vec<Tier> {
        tiers::load(&env)
    }

    /// `(tier_level, reward_multiplier)` for a hypothetical total stake.
    pub fn get_tier_for(env: Env, total_stake: i128) -> (u32, u32) {
        tiers::tier_for(&tiers::load(&env), total_stake)
    }

    pub fn get_proposal(env: Env, id: u64) -> Option<Proposal> {
        governance::get_proposal(&env, id)
    }

    pub fn get_proposal_status(env: Env, id: u64) -> Result<ProposalStatus, ContractError> {
        let proposal = governance::load_proposal(&env, id)?;
        Ok(proposal.status(env.ledger().sequence()))
    }

    pub fn get_ballot(env: Env, id: u64, voter: Address) -> Option<Ballot> {
        governance::get_ballot(&env, id, &voter)
    }

    pub fn is_paused(env: Env) -> bool {
        config::load(&env).map(|c| c.paused).unwrap_or(false)
    }

    pub fn is_emergency_mode(env: Env) -> bool {
        config::load(&env).map(|c| c.emergency_mode).unwrap_or(false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;

#[cfg(test)]
mod test_governance;
