use thiserror::Error;

/// Authoring errors, all detected before simulation starts.
///
/// Nothing in the per-tick path returns these: missing references at runtime make conditions
/// fail closed and actions skip their effect instead.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("no initial state configured for agent {agent}")]
    MissingInitialState { agent: String },

    #[error("no initial patrol point configured for agent {agent}")]
    MissingInitialPatrolPoint { agent: String },

    #[error("unknown state `{0}`")]
    UnknownState(String),

    #[error("state id {0} is not part of this state graph")]
    InvalidStateId(usize),

    #[error("duplicate state name `{0}`")]
    DuplicateState(String),

    #[error("state graph has no states")]
    EmptyStateGraph,

    #[error("unknown patrol point `{0}`")]
    UnknownPatrolPoint(String),

    #[error("patrol point id {0} is not part of this patrol graph")]
    InvalidPatrolPointId(usize),

    #[error("duplicate patrol point name `{0}`")]
    DuplicatePatrolPoint(String),

    #[error("state `{state}` has an invalid elapsed-time threshold {seconds}; expected a finite value >= 0")]
    InvalidThreshold { state: String, seconds: f32 },

    #[error("invalid guard stats: {0}")]
    InvalidStats(String),

    #[error("failed to parse machine config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, FsmError>;
