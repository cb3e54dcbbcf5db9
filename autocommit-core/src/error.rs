use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Project not initialized: {0}")]
    NotInitialized(String),

    #[error("Project already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}
