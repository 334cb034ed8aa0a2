extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env, String,
};

use crate::{
    ContractError, ProposalStatus, StakingGovernanceContract, StakingGovernanceContractClient,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakingGovernanceContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(1_000);

    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let token_id = token.address();

    let contract_id = env.register(StakingGovernanceContract, ());
    let client = StakingGovernanceContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize_contract(&owner, &token_id);

    (env, client, owner, token_id)
}

/// Mint and stake `amount` for a fresh address.
fn staked_voter(
    env: &Env,
    client: &StakingGovernanceContractClient<'static>,
    token: &Address,
    amount: i128,
) -> Address {
    let voter = Address::generate(env);
    StellarAssetClient::new(env, token).mint(&voter, &amount);
    client.stake(&voter, &amount, &0);
    voter
}

fn text(env: &Env, len: usize) -> String {
    let body = "x".repeat(len);
    String::from_str(env, &body)
}

// ── create_proposal ───────────────────────────────────────────────────────────

#[test]
fn test_create_proposal_assigns_sequential_ids() {
    let (env, client, _owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);

    let first = client.create_proposal(&creator, &text(&env, 20), &100);
    let second = client.create_proposal(&creator, &text(&env, 20), &2880);

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(client.get_proposal_count(), 2);

    let proposal = client.get_proposal(&1).unwrap();
    assert_eq!(proposal.creator, creator);
    assert_eq!(proposal.start_height, 1_000);
    assert_eq!(proposal.end_height, 1_100);
    assert_eq!(proposal.votes_for, 0);
    assert_eq!(proposal.votes_against, 0);
    assert_eq!(proposal.minimum_votes, 1_000_000);
    assert!(!proposal.executed);
    assert_eq!(client.get_proposal_status(&1), ProposalStatus::Active);
}

#[test]
fn test_create_proposal_requires_voting_power() {
    let (env, client, owner, token) = setup();

    let outsider = Address::generate(&env);
    match client.try_create_proposal(&outsider, &text(&env, 20), &100) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }

    // Lower the floor so a sub-threshold position can exist.
    client.set_minimum_stake(&owner, &10);
    let small = staked_voter(&env, &client, &token, 999_999);
    match client.try_create_proposal(&small, &text(&env, 20), &100) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
}

#[test]
fn test_create_proposal_description_bounds() {
    let (env, client, _owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);

    for len in [9usize, 257] {
        match client.try_create_proposal(&creator, &text(&env, len), &100) {
            Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
            _ => unreachable!("Expected InvalidProtocolParameter error"),
        }
    }
    assert_eq!(client.create_proposal(&creator, &text(&env, 10), &100), 1);
    assert_eq!(client.create_proposal(&creator, &text(&env, 256), &100), 2);
}

#[test]
fn test_create_proposal_voting_period_bounds() {
    let (env, client, _owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);

    for period in [99u32, 2881] {
        match client.try_create_proposal(&creator, &text(&env, 20), &period) {
            Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
            _ => unreachable!("Expected InvalidProtocolParameter error"),
        }
    }
    assert_eq!(client.get_proposal_count(), 0);
    assert_eq!(client.create_proposal(&creator, &text(&env, 20), &100), 1);
    assert_eq!(client.create_proposal(&creator, &text(&env, 20), &2880), 2);
}

// ── vote_on_proposal ─────────────────────────────────────────────────────────

#[test]
fn test_votes_tally_voting_power_on_one_side() {
    let (env, client, _owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);
    let yes = staked_voter(&env, &client, &token, 3_000_000);
    let no = staked_voter(&env, &client, &token, 2_000_000);

    let id = client.create_proposal(&creator, &text(&env, 30), &500);
    client.vote_on_proposal(&yes, &id, &true);
    client.vote_on_proposal(&no, &id, &false);
    client.vote_on_proposal(&creator, &id, &true);

    let proposal = client.get_proposal(&id).unwrap();
    assert_eq!(proposal.votes_for, 4_000_000);
    assert_eq!(proposal.votes_against, 2_000_000);

    let ballot = client.get_ballot(&id, &no).unwrap();
    assert!(!ballot.support);
    assert_eq!(ballot.weight, 2_000_000);
    assert_eq!(ballot.cast_at, 1_000);
}

#[test]
fn test_vote_out_of_range_id_fails() {
    let (env, client, _owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 1_000_000);

    for id in [0u64, 1] {
        match client.try_vote_on_proposal(&voter, &id, &true) {
            Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
            _ => unreachable!("Expected InvalidProtocolParameter error"),
        }
    }
}

#[test]
fn test_vote_after_end_fails() {
    let (env, client, _owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 1_000_000);
    let id = client.create_proposal(&voter, &text(&env, 30), &100);

    env.ledger().set_sequence_number(1_099);
    client.vote_on_proposal(&voter, &id, &true);

    let late = staked_voter(&env, &client, &token, 1_000_000);
    env.ledger().set_sequence_number(1_100);
    match client.try_vote_on_proposal(&late, &id, &true) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
}

#[test]
fn test_vote_without_account_fails() {
    let (env, client, _owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);
    let id = client.create_proposal(&creator, &text(&env, 30), &100);

    let outsider = Address::generate(&env);
    match client.try_vote_on_proposal(&outsider, &id, &true) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
}

#[test]
fn test_double_vote_rejected() {
    let (env, client, _owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 2_000_000);
    let id = client.create_proposal(&voter, &text(&env, 30), &100);

    client.vote_on_proposal(&voter, &id, &true);
    match client.try_vote_on_proposal(&voter, &id, &false) {
        Err(Ok(e)) => assert_eq!(e, ContractError::AlreadyVoted),
        _ => unreachable!("Expected AlreadyVoted error"),
    }

    let proposal = client.get_proposal(&id).unwrap();
    assert_eq!(proposal.votes_for, 2_000_000);
    assert_eq!(proposal.votes_against, 0);
}

#[test]
fn test_vote_locks_stake_until_close() {
    let (env, client, _owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 2_000_000);
    let id = client.create_proposal(&voter, &text(&env, 30), &300);
    client.vote_on_proposal(&voter, &id, &true);

    assert_eq!(client.get_user_account(&voter).unwrap().vote_locked_until, 1_300);

    env.ledger().set_sequence_number(1_299);
    match client.try_initiate_unstake(&voter, &2_000_000) {
        Err(Ok(e)) => assert_eq!(e, ContractError::VoteLocked),
        _ => unreachable!("Expected VoteLocked error"),
    }

    env.ledger().set_sequence_number(1_300);
    client.initiate_unstake(&voter, &2_000_000);
}

#[test]
fn test_vote_during_cooldown_blocks_completion() {
    let (env, client, _owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 2_000_000);
    client.initiate_unstake(&voter, &2_000_000);

    let id = client.create_proposal(&voter, &text(&env, 30), &2880);
    client.vote_on_proposal(&voter, &id, &false);

    env.ledger().set_sequence_number(1_000 + 1440);
    match client.try_complete_unstake(&voter) {
        Err(Ok(e)) => assert_eq!(e, ContractError::VoteLocked),
        _ => unreachable!("Expected VoteLocked error"),
    }

    env.ledger().set_sequence_number(1_000 + 2880);
    assert_eq!(client.complete_unstake(&voter), 2_000_000);
}

// ── Outcome & execution ──────────────────────────────────────────────────────

#[test]
fn test_accepted_proposal_can_be_marked_executed_once() {
    let (env, client, owner, token) = setup();
    let voter = staked_voter(&env, &client, &token, 1_500_000);
    let id = client.create_proposal(&voter, &text(&env, 30), &100);
    client.vote_on_proposal(&voter, &id, &true);

    match client.try_mark_proposal_executed(&owner, &id) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ProposalNotAccepted),
        _ => unreachable!("Expected ProposalNotAccepted error"),
    }

    env.ledger().set_sequence_number(1_100);
    assert_eq!(client.get_proposal_status(&id), ProposalStatus::Accepted);

    match client.try_mark_proposal_executed(&voter, &id) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }

    client.mark_proposal_executed(&owner, &id);
    assert!(client.get_proposal(&id).unwrap().executed);
    assert_eq!(client.get_proposal_status(&id), ProposalStatus::Executed);

    match client.try_mark_proposal_executed(&owner, &id) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ProposalAlreadyExecuted),
        _ => unreachable!("Expected ProposalAlreadyExecuted error"),
    }
}

#[test]
fn test_rejected_proposal_cannot_be_executed() {
    let (env, client, owner, token) = setup();
    let creator = staked_voter(&env, &client, &token, 1_000_000);
    let against = staked_voter(&env, &client, &token, 3_000_000);
    let id = client.create_proposal(&creator, &text(&env, 30), &100);
    client.vote_on_proposal(&creator, &id, &true);
    client.vote_on_proposal(&against, &id, &false);

    env.ledger().set_sequence_number(1_100);
    assert_eq!(client.get_proposal_status(&id), ProposalStatus::Rejected);
    match client.try_mark_proposal_executed(&owner, &id) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ProposalNotAccepted),
        _ => unreachable!("Expected ProposalNotAccepted error"),
    }
}
