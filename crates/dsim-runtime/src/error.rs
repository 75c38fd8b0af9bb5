use dsim_core::{AgentId, RankId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("agent {0} has no known host rank")]
    AgentNotHosted(AgentId),

    #[error("agent {0} created or received twice on the same rank")]
    DuplicateAgent(AgentId),

    #[error("no store named {0:?} is registered")]
    UnknownStore(String),

    #[error("store {0:?} has no host rank assigned")]
    StoreNotHosted(String),

    #[error(transparent)]
    Agent(#[from] dsim_agent::AgentError),

    #[error(transparent)]
    Balance(#[from] dsim_balance::BalanceError),

    #[error(transparent)]
    Store(#[from] dsim_store::StoreError),

    #[error(transparent)]
    Transport(#[from] dsim_transport::TransportError),

    #[error("rank {0} sent a message out of protocol order: {1}")]
    Protocol(RankId, String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
