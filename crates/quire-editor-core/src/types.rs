//! Core editor types: block/entity keys, positions and selection.
//!
//! These types are framework-agnostic. Offsets are measured in Unicode scalar
//! values (chars) within a single block, never bytes or UTF-16 units.

use std::fmt;

use smol_str::{SmolStr, format_smolstr};

/// Stable identifier of a content block.
///
/// Keys survive edits to the block's text and type, so selections and the DOM
/// can refer to a block across snapshots.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockKey(SmolStr);

impl BlockKey {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    /// Key for the n-th generated block.
    pub(crate) fn generated(n: u32) -> Self {
        Self(format_smolstr!("b{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of an entity in a content state's entity map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey(pub u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A caret position: block plus char offset inside that block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub block: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(block: impl Into<BlockKey>, offset: usize) -> Self {
        Self {
            block: block.into(),
            offset,
        }
    }
}

/// Text selection with anchor and focus positions.
///
/// The anchor is where the selection started, the focus is where the caret is
/// now. Whether focus comes before anchor in document order can't be derived
/// from the keys alone, so it is recorded in `is_backward` when the selection
/// is built against a content state (see `ContentState::selection`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor: Position,
    pub focus: Position,
    pub is_backward: bool,
    pub has_focus: bool,
}

impl SelectionState {
    /// Collapsed selection (caret) at the given position.
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
            is_backward: false,
            has_focus: false,
        }
    }

    /// Caret at the start of a block.
    pub fn at_block_start(block: BlockKey) -> Self {
        Self::collapsed(Position { block, offset: 0 })
    }

    /// Forward selection spanning `start..end` inside one block.
    pub fn within_block(block: impl Into<BlockKey>, start: usize, end: usize) -> Self {
        let block = block.into();
        let (start, end, is_backward) = if start <= end {
            (start, end, false)
        } else {
            (end, start, true)
        };
        let (anchor, focus) = if is_backward {
            (end, start)
        } else {
            (start, end)
        };
        Self {
            anchor: Position::new(block.clone(), anchor),
            focus: Position::new(block, focus),
            is_backward,
            has_focus: false,
        }
    }

    /// Lower bound in document order.
    pub fn start(&self) -> &Position {
        if self.is_backward {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Upper bound in document order.
    pub fn end(&self) -> &Position {
        if self.is_backward {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn start_key(&self) -> &BlockKey {
        &self.start().block
    }

    pub fn end_key(&self) -> &BlockKey {
        &self.end().block
    }

    pub fn start_offset(&self) -> usize {
        self.start().offset
    }

    pub fn end_offset(&self) -> usize {
        self.end().offset
    }

    /// Check if the selection is collapsed (caret only, spans no chars).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Whether the whole selection lies in one block.
    pub fn is_single_block(&self) -> bool {
        self.anchor.block == self.focus.block
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    /// Collapse to the start bound.
    pub fn collapse_to_start(&self) -> Self {
        Self::collapsed(self.start().clone()).with_focus(self.has_focus)
    }

    /// Collapse to the end bound.
    pub fn collapse_to_end(&self) -> Self {
        Self::collapsed(self.end().clone()).with_focus(self.has_focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = SelectionState::within_block("a", 5, 10);
        assert_eq!(sel.start_offset(), 5);
        assert_eq!(sel.end_offset(), 10);
        assert!(!sel.is_backward);

        // Backward selection
        let sel = SelectionState::within_block("a", 10, 5);
        assert_eq!(sel.start_offset(), 5);
        assert_eq!(sel.end_offset(), 10);
        assert!(sel.is_backward);
        assert_eq!(sel.anchor.offset, 10);
        assert_eq!(sel.focus.offset, 5);
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = SelectionState::collapsed(Position::new("a", 7));
        assert!(sel.is_collapsed());
        assert!(sel.is_single_block());
        assert_eq!(sel.start_offset(), 7);
        assert_eq!(sel.end_offset(), 7);

        let sel = SelectionState::within_block("a", 3, 3);
        assert!(sel.is_collapsed());
    }

    #[test]
    fn test_collapse_keeps_focus_flag() {
        let sel = SelectionState::within_block("a", 2, 6).with_focus(true);
        let caret = sel.collapse_to_end();
        assert!(caret.is_collapsed());
        assert_eq!(caret.focus.offset, 6);
        assert!(caret.has_focus);
    }

    #[test]
    fn test_generated_keys() {
        assert_eq!(BlockKey::generated(3).as_str(), "b3");
        assert_eq!(EntityKey(4).to_string(), "4");
    }
}
