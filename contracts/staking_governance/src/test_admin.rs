extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String,
};

use crate::{ContractError, StakingGovernanceContract, StakingGovernanceContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakingGovernanceContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let token_id = token.address();

    let contract_id = env.register(StakingGovernanceContract, ());
    let client = StakingGovernanceContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize_contract(&owner, &token_id);

    (env, client, owner, token_id)
}

fn funded(env: &Env, token: &Address, amount: i128) -> Address {
    let who = Address::generate(env);
    StellarAssetClient::new(env, token).mint(&who, &amount);
    who
}

// ── Pause ────────────────────────────────────────────────────────────────────

#[test]
fn test_pause_blocks_stake_only() {
    let (env, client, owner, token) = setup();
    let staker = funded(&env, &token, 3_000_000);
    client.stake(&staker, &2_000_000, &0);

    client.pause(&owner);
    assert!(client.is_paused());

    match client.try_stake(&staker, &1_000_000, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }

    // Withdrawal paths stay open.
    client.initiate_unstake(&staker, &2_000_000);
    env.ledger().set_sequence_number(10 + 1440);
    assert_eq!(client.complete_unstake(&staker), 2_000_000);

    client.resume(&owner);
    assert!(!client.is_paused());
    client.stake(&staker, &1_000_000, &0);
    assert_eq!(client.get_pool_total(), 1_000_000);
}

#[test]
fn test_non_owner_cannot_pause_or_resume() {
    let (env, client, owner, _token) = setup();
    let intruder = Address::generate(&env);

    match client.try_pause(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }

    client.pause(&owner);
    match client.try_resume(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
    assert!(client.is_paused());
}

// ── Emergency mode ───────────────────────────────────────────────────────────

#[test]
fn test_emergency_mode_blocks_user_mutations() {
    let (env, client, owner, token) = setup();
    let staker = funded(&env, &token, 3_000_000);
    client.stake(&staker, &2_000_000, &0);
    let id = client.create_proposal(&staker, &String::from_str(&env, "adjust the rate"), &100);

    client.set_emergency_mode(&owner, &true);
    assert!(client.is_emergency_mode());

    let err = ContractError::EmergencyMode;
    assert_eq!(client.try_stake(&staker, &1_000_000, &0).unwrap_err().unwrap(), err);
    assert_eq!(client.try_initiate_unstake(&staker, &1).unwrap_err().unwrap(), err);
    assert_eq!(client.try_complete_unstake(&staker).unwrap_err().unwrap(), err);
    assert_eq!(client.try_claim_rewards(&staker).unwrap_err().unwrap(), err);
    assert_eq!(
        client
            .try_create_proposal(&staker, &String::from_str(&env, "another proposal"), &100)
            .unwrap_err()
            .unwrap(),
        err
    );
    assert_eq!(
        client.try_vote_on_proposal(&staker, &id, &true).unwrap_err().unwrap(),
        err
    );
}

#[test]
fn test_emergency_withdraw_returns_principal() {
    let (env, client, owner, token) = setup();
    let staker = funded(&env, &token, 4_000_000);
    client.stake(&staker, &4_000_000, &8640);

    match client.try_emergency_withdraw(&staker) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }

    client.set_emergency_mode(&owner, &true);
    env.ledger().set_sequence_number(20);
    assert_eq!(client.emergency_withdraw(&staker), 4_000_000);

    assert_eq!(client.get_position(&staker), None);
    assert_eq!(client.get_user_account(&staker), None);
    assert_eq!(client.get_pool_total(), 0);
    assert_eq!(TokenClient::new(&env, &token).balance(&staker), 4_000_000);

    match client.try_emergency_withdraw(&staker) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoStake),
        _ => unreachable!("Expected NoStake error"),
    }

    client.set_emergency_mode(&owner, &false);
    assert!(!client.is_emergency_mode());
}

#[test]
fn test_emergency_withdraw_removes_weight_from_open_proposals() {
    let (env, client, owner, token) = setup();
    let creator = funded(&env, &token, 2_000_000);
    let voter = funded(&env, &token, 3_000_000);
    client.stake(&creator, &2_000_000, &0);
    client.stake(&voter, &3_000_000, &0);

    let closing = client.create_proposal(&creator, &String::from_str(&env, "short window vote"), &100);
    let open = client.create_proposal(&creator, &String::from_str(&env, "long window vote"), &2880);
    client.vote_on_proposal(&voter, &closing, &true);
    client.vote_on_proposal(&voter, &open, &false);

    env.ledger().set_sequence_number(200);
    client.vote_on_proposal(&creator, &open, &true);

    client.set_emergency_mode(&owner, &true);
    assert_eq!(client.emergency_withdraw(&voter), 3_000_000);

    // Closed proposals keep their final tally.
    assert_eq!(client.get_proposal(&closing).unwrap().votes_for, 3_000_000);
    assert_eq!(client.get_ballot(&closing, &voter).unwrap().weight, 3_000_000);

    let proposal = client.get_proposal(&open).unwrap();
    assert_eq!(proposal.votes_for, 2_000_000);
    assert_eq!(proposal.votes_against, 0);
    let ballot = client.get_ballot(&open, &voter).unwrap();
    assert!(!ballot.support);
    assert_eq!(ballot.weight, 0);
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn test_owner_updates_configuration() {
    let (_env, client, owner, _token) = setup();

    client.set_base_reward_rate(&owner, &750);
    client.set_cooldown_period(&owner, &720);
    client.set_minimum_stake(&owner, &5_000);

    let cfg = client.get_config();
    assert_eq!(cfg.base_reward_rate, 750);
    assert_eq!(cfg.cooldown_period, 720);
    assert_eq!(cfg.minimum_stake, 5_000);
}

#[test]
fn test_configuration_validation() {
    let (_env, client, owner, _token) = setup();

    match client.try_set_base_reward_rate(&owner, &10_001) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
        _ => unreachable!("Expected InvalidProtocolParameter error"),
    }
    match client.try_set_cooldown_period(&owner, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
        _ => unreachable!("Expected InvalidProtocolParameter error"),
    }
    match client.try_set_minimum_stake(&owner, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidProtocolParameter),
        _ => unreachable!("Expected InvalidProtocolParameter error"),
    }
    assert_eq!(client.get_config().base_reward_rate, 500);
}

#[test]
fn test_non_owner_cannot_configure() {
    let (env, client, _owner, _token) = setup();
    let intruder = Address::generate(&env);

    match client.try_set_base_reward_rate(&intruder, &999) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
    match client.try_set_cooldown_period(&intruder, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
    match client.try_set_minimum_stake(&intruder, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
    match client.try_set_emergency_mode(&intruder, &true) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAuthorized),
        _ => unreachable!("Expected NotAuthorized error"),
    }
}

#[test]
fn test_rate_change_applies_to_unsettled_accrual() {
    let (env, client, owner, token) = setup();
    let staker = funded(&env, &token, 1_000_000);
    client.stake(&staker, &1_000_000, &0);

    env.ledger().set_sequence_number(110);
    client.set_base_reward_rate(&owner, &0);
    assert_eq!(client.get_pending_rewards(&staker), 0);
}

#[test]
fn test_shorter_cooldown_applies_to_pending_request() {
    let (env, client, owner, token) = setup();
    let staker = funded(&env, &token, 1_000_000);
    client.stake(&staker, &1_000_000, &0);
    client.initiate_unstake(&staker, &1_000_000);

    client.set_cooldown_period(&owner, &10);
    env.ledger().set_sequence_number(20);
    assert_eq!(client.complete_unstake(&staker), 1_000_000);
}
