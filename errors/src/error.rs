use messages::MessagesError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectionError>;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Message rendering error: {0}")]
    Message(#[from] MessagesError),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
