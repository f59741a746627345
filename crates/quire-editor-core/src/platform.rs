//! Platform abstraction for selection sync.
//!
//! The editor model never touches the UI directly. A platform (the browser
//! DOM, in practice) reads the user's selection into model positions and
//! writes model selections back after a re-render.

use crate::content::ContentState;
use crate::types::SelectionState;

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Two-way selection sync between the UI and the model.
pub trait SelectionPlatform {
    /// Read the UI selection as model positions.
    ///
    /// Returns `Ok(None)` when the selection lies outside the editor.
    fn read_selection(&self, content: &ContentState) -> Result<Option<SelectionState>, PlatformError>;

    /// Place the UI selection at the given model selection.
    fn restore_selection(&self, selection: &SelectionState) -> Result<(), PlatformError>;
}
