use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::ledger;
use crate::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const PROPOSAL_CTR: Symbol = symbol_short!("PR_CTR");
const PROPOSAL: Symbol = symbol_short!("PROPOSAL");
const BALLOT: Symbol = symbol_short!("BALLOT");
const OPEN_VOTES: Symbol = symbol_short!("OPEN_VOTE");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Parameters ───────────────────────────────────────────────────────────────

pub const PROPOSAL_THRESHOLD: i128 = 1_000_000;
pub const MINIMUM_VOTES: i128 = 1_000_000;
pub const MIN_DESCRIPTION_LEN: u32 = 10;
pub const MAX_DESCRIPTION_LEN: u32 = 256;
pub const MIN_VOTING_PERIOD: u32 = 100;
pub const MAX_VOTING_PERIOD: u32 = 2880;

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub creator: Address,
    pub description: String,
    pub start_height: u32,
    pub end_height: u32,
    pub executed: bool,
    pub votes_for: i128,
    pub votes_against: i128,
    pub minimum_votes: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ballot {
    pub voter: Address,
    pub support: bool,
    pub weight: i128,
    pub cast_at: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalStatus {
    Active,
    Accepted,
    Rejected,
    Executed,
}

impl Proposal {
    /// Accepted once voting has closed with a strict majority in favour and
    /// enough total participation.
    pub fn status(&self, now: u32) -> ProposalStatus {
        if self.executed {
            return ProposalStatus::Executed;
        }
        if now < self.end_height {
            return ProposalStatus::Active;
        }
        let turnout = self.votes_for.saturating_add(self.votes_against);
        if self.votes_for > self.votes_against && turnout >= self.minimum_votes {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Rejected
        }
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn proposal_key(id: u64) -> (Symbol, u64) {
    (PROPOSAL, id)
}

fn ballot_key(id: u64, voter: &Address) -> (Symbol, u64, Address) {
    (BALLOT, id, voter.clone())
}

fn open_votes_key(voter: &Address) -> (Symbol, Address) {
    (OPEN_VOTES, voter.clone())
}

/// Ids of proposals the voter has a ballot on that were still open at the
/// time of the last vote.
pub fn open_votes(env: &Env, voter: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&open_votes_key(voter))
        .unwrap_or_else(|| Vec::new(env))
}

/// Append `id`, dropping entries whose voting window has closed.
fn track_open_vote(env: &Env, voter: &Address, id: u64, now: u32) {
    let mut kept = Vec::new(env);
    for open_id in open_votes(env, voter).iter() {
        if let Some(p) = get_proposal(env, open_id) {
            if now < p.end_height {
                kept.push_back(open_id);
            }
        }
    }
    kept.push_back(id);

    let key = open_votes_key(voter);
    env.storage().persistent().set(&key, &kept);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage().instance().get(&PROPOSAL_CTR).unwrap_or(0)
}

pub fn get_proposal(env: &Env, id: u64) -> Option<Proposal> {
    env.storage().persistent().get(&proposal_key(id))
}

fn store_proposal(env: &Env, proposal: &Proposal) {
    let key = proposal_key(proposal.id);
    env.storage().persistent().set(&key, proposal);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn get_ballot(env: &Env, id: u64, voter: &Address) -> Option<Ballot> {
    env.storage().persistent().get(&ballot_key(id, voter))
}

/// Look up a proposal, treating ids outside `1..=proposal_count` as malformed.
pub fn load_proposal(env: &Env, id: u64) -> Result<Proposal, ContractError> {
    if id == 0 || id > proposal_count(env) {
        return Err(ContractError::InvalidProtocolParameter);
    }
    get_proposal(env, id).ok_or(ContractError::InvalidProtocolParameter)
}

// ── Operations ───────────────────────────────────────────────────────────────

pub fn create_proposal(
    env: &Env,
    creator: &Address,
    description: String,
    voting_period: u32,
    now: u32,
) -> Result<Proposal, ContractError> {
    let account = ledger::get_account(env, creator).ok_or(ContractError::NotAuthorized)?;
    if account.voting_power < PROPOSAL_THRESHOLD {
        return Err(ContractError::NotAuthorized);
    }

    let len = description.len();
    if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&len) {
        return Err(ContractError::InvalidProtocolParameter);
    }
    if !(MIN_VOTING_PERIOD..=MAX_VOTING_PERIOD).contains(&voting_period) {
        return Err(ContractError::InvalidProtocolParameter);
    }

    let id = proposal_count(env).saturating_add(1);
    let proposal = Proposal {
        id,
        creator: creator.clone(),
        description,
        start_height: now,
        end_height: now.saturating_add(voting_period),
        executed: false,
        votes_for: 0,
        votes_against: 0,
        minimum_votes: MINIMUM_VOTES,
    };

    store_proposal(env, &proposal);
    env.storage().instance().set(&PROPOSAL_CTR, &id);

    Ok(proposal)
}

/// Add the voter's full voting power to one side. One ballot per voter per
/// proposal; the voter's stake stays in the pool until voting closes.
pub fn cast_vote(
    env: &Env,
    voter: &Address,
    id: u64,
    support: bool,
    now: u32,
) -> Result<(Proposal, Ballot), ContractError> {
    let mut proposal = load_proposal(env, id)?;
    if now >= proposal.end_height {
        return Err(ContractError::NotAuthorized);
    }
    let account = ledger::get_account(env, voter).ok_or(ContractError::NotAuthorized)?;
    let key = ballot_key(id, voter);
    if env.storage().persistent().has(&key) {
        return Err(ContractError::AlreadyVoted);
    }

    let weight = account.voting_power;
    if support {
        proposal.votes_for = proposal.votes_for.saturating_add(weight);
    } else {
        proposal.votes_against = proposal.votes_against.saturating_add(weight);
    }

    let ballot = Ballot {
        voter: voter.clone(),
        support,
        weight,
        cast_at: now,
    };
    env.storage().persistent().set(&key, &ballot);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    store_proposal(env, &proposal);
    track_open_vote(env, voter, id, now);
    ledger::extend_vote_lock(env, voter, proposal.end_height);

    Ok((proposal, ballot))
}

/// Take the voter's weight back out of every proposal still open, for stake
/// that leaves the pool before its vote lock expires. Ballots stay recorded
/// with zero weight and still block a second vote. Returns the number of
/// proposals adjusted.
pub fn withdraw_open_votes(env: &Env, voter: &Address, now: u32) -> u32 {
    let mut adjusted = 0;
    for id in open_votes(env, voter).iter() {
        let Some(mut proposal) = get_proposal(env, id) else {
            continue;
        };
        if now >= proposal.end_height {
            continue;
        }
        let key = ballot_key(id, voter);
        let Some(mut ballot) = env.storage().persistent().get::<_, Ballot>(&key) else {
            continue;
        };
        if ballot.support {
            proposal.votes_for = proposal.votes_for.saturating_sub(ballot.weight);
        } else {
            proposal.votes_against = proposal.votes_against.saturating_sub(ballot.weight);
        }
        ballot.weight = 0;
        env.storage().persistent().set(&key, &ballot);
        store_proposal(env, &proposal);
        adjusted += 1;
    }
    env.storage().persistent().remove(&open_votes_key(voter));
    adjusted
}

pub fn mark_executed(env: &Env, id: u64, now: u32) -> Result<Proposal, ContractError> {
    let mut proposal = load_proposal(env, id)?;
    match proposal.status(now) {
        ProposalStatus::Accepted => {}
        ProposalStatus::Executed => return Err(ContractError::ProposalAlreadyExecuted),
        ProposalStatus::Active | ProposalStatus::Rejected => {
            return Err(ContractError::ProposalNotAccepted)
        }
    }
    proposal.executed = true;
    store_proposal(env, &proposal);
    Ok(proposal)
}
