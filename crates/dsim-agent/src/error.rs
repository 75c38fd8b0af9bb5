use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no constructor registered for agent type {0:?}")]
    UnknownConstructor(&'static str),

    #[error("no deserializer registered for agent type {0:?}")]
    UnknownDeserializer(&'static str),

    #[error("failed to encode payload for agent type {0:?}: {1}")]
    Encode(&'static str, serde_json::Error),

    #[error("failed to decode payload for agent type {0:?}: {1}")]
    Decode(&'static str, serde_json::Error),

    #[error("agent step failed: {0}")]
    Step(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
