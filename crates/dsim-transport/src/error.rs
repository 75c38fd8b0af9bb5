use dsim_core::RankId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rank {0} is not part of this transport's world")]
    UnknownRank(RankId),

    #[error("node {0:?} has no registered ranks")]
    UnknownNode(dsim_core::NodeHostId),
}

pub type TransportResult<T> = Result<T, TransportError>;
