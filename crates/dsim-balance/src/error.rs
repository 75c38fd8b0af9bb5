use dsim_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("object {0} is not tracked by this balancer")]
    UnknownObject(AgentId),
}

pub type BalanceResult<T> = Result<T, BalanceError>;
