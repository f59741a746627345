//! Error types for editor operations.
//!
//! Editing commands themselves never fail: a command that doesn't apply is
//! reported as "not handled". These errors cover input coming from outside
//! the model (DOM selections, configuration, hand-built documents).

use thiserror::Error;

use crate::types::BlockKey;

/// Errors that can occur when building or addressing editor state.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// A position referred to a block that isn't in the document.
    #[error("unknown block key: {0}")]
    UnknownBlock(BlockKey),

    /// A position's offset lies past the end of its block.
    #[error("offset {offset} out of bounds for block {block} (length {len})")]
    OffsetOutOfBounds {
        block: BlockKey,
        offset: usize,
        len: usize,
    },

    /// Documents always hold at least one block.
    #[error("document must contain at least one block")]
    EmptyDocument,

    /// Two blocks share a key.
    #[error("duplicate block key: {0}")]
    DuplicateBlockKey(BlockKey),

    /// Editor configuration could not be parsed.
    #[error("invalid editor configuration: {0}")]
    Config(#[from] serde_json::Error),
}
