use thiserror::Error;

pub type BlockResult<T> = Result<T, BlockError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block {id} is a {expected} block, cannot take {found} properties")]
    TypeMismatch {
        id: String,
        expected: String,
        found: String,
    },

    #[error("Block {0} is not a container")]
    NotAContainer(String),

    #[error("Block {0} is a container, its children are edited structurally")]
    NotALeaf(String),

    #[error("Invalid properties for {block_type}: {message}")]
    InvalidProperties { block_type: String, message: String },

    #[error("Would create cycle: {0} cannot be moved into its own subtree")]
    CycleDetected(String),

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Block {0} is protected and can only be hidden")]
    ProtectedBlock(String),
}

impl BlockError {
    pub fn type_mismatch(
        id: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            id: id.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_properties(block_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProperties {
            block_type: block_type.into(),
            message: message.into(),
        }
    }
}
