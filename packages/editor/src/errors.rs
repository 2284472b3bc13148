//! Error types for the editor

use pagekit_blocks::BlockError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[cfg(feature = "async")]
    #[error("Session driver stopped")]
    DriverStopped,
}

impl EditorError {
    /// The edit was refused because it would delete protected content
    pub fn is_protected(&self) -> bool {
        matches!(self, EditorError::Block(BlockError::ProtectedBlock(_)))
    }
}
