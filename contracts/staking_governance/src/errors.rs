use soroban_sdk::{contracttype, Address, Env, String};

/// Broad classification of a failure, used by off-chain tooling to decide
/// how to surface it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Malformed input or a parameter outside its accepted range
    Validation = 1,
    /// Caller lacks the role, stake, or timing required
    Authorization = 2,
    /// The referenced position does not exist
    NotFound = 3,
    /// The request conflicts with the current position or ballot state
    StateConflict = 4,
    /// Contract-wide flags or reserves block the request
    System = 5,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Structured description of a failure, published alongside the error code.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub user: Option<Address>,
    pub retryable: bool,
    pub height: u32,
}

/// Every failure an entry point can return. Codes are part of the public
/// interface and must never be renumbered.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAuthorized = 3,
    InvalidProtocolParameter = 4,
    InvalidAmount = 5,
    InsufficientBalance = 6,
    CooldownActive = 7,
    NoStake = 8,
    BelowMinimum = 9,
    Paused = 10,
    EmergencyMode = 11,
    AlreadyVoted = 12,
    VoteLocked = 13,
    InsufficientRewardReserve = 14,
    ProposalNotAccepted = 15,
    ProposalAlreadyExecuted = 16,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InvalidProtocolParameter
            | ContractError::InvalidAmount
            | ContractError::BelowMinimum => ErrorCategory::Validation,
            ContractError::NotAuthorized => ErrorCategory::Authorization,
            ContractError::NoStake => ErrorCategory::NotFound,
            ContractError::InsufficientBalance
            | ContractError::CooldownActive
            | ContractError::AlreadyVoted
            | ContractError::VoteLocked
            | ContractError::ProposalNotAccepted
            | ContractError::ProposalAlreadyExecuted => ErrorCategory::StateConflict,
            ContractError::Paused
            | ContractError::EmergencyMode
            | ContractError::InsufficientRewardReserve => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::InvalidProtocolParameter
            | ContractError::InvalidAmount
            | ContractError::BelowMinimum
            | ContractError::NoStake
            | ContractError::AlreadyInitialized
            | ContractError::AlreadyVoted => ErrorSeverity::Low,
            ContractError::NotAuthorized
            | ContractError::InsufficientBalance
            | ContractError::CooldownActive
            | ContractError::VoteLocked
            | ContractError::ProposalNotAccepted
            | ContractError::ProposalAlreadyExecuted => ErrorSeverity::Medium,
            ContractError::NotInitialized | ContractError::InsufficientRewardReserve => {
                ErrorSeverity::High
            }
            ContractError::Paused | ContractError::EmergencyMode => ErrorSeverity::Critical,
        }
    }

    /// Whether the same call can succeed later without the caller changing
    /// its arguments (waiting out a cooldown, a pause, or a vote lock).
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ContractError::CooldownActive
                | ContractError::Paused
                | ContractError::EmergencyMode
                | ContractError::VoteLocked
                | ContractError::InsufficientRewardReserve
                | ContractError::ProposalNotAccepted
        )
    }

    pub fn context(&self, env: &Env, user: Option<Address>) -> ErrorContext {
        ErrorContext {
            category: self.category(),
            severity: self.severity(),
            message: String::from_str(env, self.message()),
            user,
            retryable: self.retryable(),
            height: env.ledger().sequence(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::NotAuthorized => "Caller is not authorized for this operation",
            ContractError::InvalidProtocolParameter => "Parameter is outside its accepted range",
            ContractError::InvalidAmount => "Amount must be strictly positive",
            ContractError::InsufficientBalance => "Amount exceeds the staked balance",
            ContractError::CooldownActive => "An unstake cooldown is in progress",
            ContractError::NoStake => "No staking position exists for this address",
            ContractError::BelowMinimum => "Stake is below the configured minimum",
            ContractError::Paused => "Staking is currently paused",
            ContractError::EmergencyMode => "Contract is in emergency mode",
            ContractError::AlreadyVoted => "Address has already voted on this proposal",
            ContractError::VoteLocked => "Stake is locked until the voted proposal closes",
            ContractError::InsufficientRewardReserve => "Reward reserve cannot cover the payout",
            ContractError::ProposalNotAccepted => "Proposal has not been accepted",
            ContractError::ProposalAlreadyExecuted => "Proposal has already been executed",
        }
    }
}
