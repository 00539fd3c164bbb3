use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot serialize value: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid JSON text")]
    InvalidJson,
    #[error("cannot deserialize value: {0}")]
    Deserialize(#[source] serde_json::Error),
}
