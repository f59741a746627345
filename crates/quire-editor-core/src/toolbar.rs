//! Active-state derivation for toolbar controls.
//!
//! Computed fresh from an `EditorState` on every call; nothing is cached.

use crate::commands::current_block_type;
use crate::config::StyleDescriptor;
use crate::editor_state::EditorState;
use crate::style::InlineStyle;

/// A toolbar entry together with whether it is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub descriptor: StyleDescriptor,
    pub active: bool,
}

/// Block controls: the entry matching the start block's type is active.
///
/// At most one entry is active since a block has exactly one type.
pub fn block_controls(state: &EditorState, table: &[StyleDescriptor]) -> Vec<ControlState> {
    let block_type = current_block_type(state);
    table
        .iter()
        .map(|descriptor| ControlState {
            descriptor: *descriptor,
            active: descriptor.style == block_type.key(),
        })
        .collect()
}

/// Inline controls: an entry is active when its style covers the whole
/// selection (or is the pending style at a caret).
pub fn inline_controls(state: &EditorState, table: &[StyleDescriptor]) -> Vec<ControlState> {
    let current = state.current_inline_style();
    table
        .iter()
        .map(|descriptor| ControlState {
            descriptor: *descriptor,
            active: current.contains(&descriptor.inline_style()),
        })
        .collect()
}

/// Whether the link trigger shows as active: the current style carries a
/// `LINK` key.
pub fn link_active(state: &EditorState) -> bool {
    state.current_inline_style().contains(&InlineStyle::new("LINK"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{toggle_block_type, toggle_inline_style};
    use crate::config::{BLOCK_TYPES, INLINE_STYLES};
    use crate::content::ContentState;
    use crate::style::BlockType;
    use crate::types::SelectionState;

    fn active_names(controls: &[ControlState]) -> Vec<&'static str> {
        controls
            .iter()
            .filter(|c| c.active)
            .map(|c| c.descriptor.name)
            .collect()
    }

    #[test]
    fn test_exactly_one_block_control_active() {
        let state = EditorState::create_with_content(ContentState::from_text("x"));
        assert!(active_names(&block_controls(&state, BLOCK_TYPES)).is_empty());

        for entry in BLOCK_TYPES {
            let toggled = toggle_block_type(&state, &entry.block_type());
            assert_eq!(
                active_names(&block_controls(&toggled, BLOCK_TYPES)),
                vec![entry.name]
            );
        }
    }

    #[test]
    fn test_block_controls_follow_start_block() {
        let content = ContentState::from_text("a\nb");
        let state = EditorState::create_with_content(content);
        let quoted = toggle_block_type(&state, &BlockType::Blockquote);
        let second = quoted.force_selection(SelectionState::within_block("b1", 0, 0));
        assert!(active_names(&block_controls(&second, BLOCK_TYPES)).is_empty());
    }

    #[test]
    fn test_inline_controls_need_full_coverage() {
        let state = EditorState::create_with_content(ContentState::from_text("hello world"))
            .force_selection(SelectionState::within_block("b0", 6, 11));
        let bold = toggle_inline_style(&state, &InlineStyle::BOLD);
        let italic = toggle_inline_style(&bold, &InlineStyle::ITALIC);
        assert_eq!(
            active_names(&inline_controls(&italic, INLINE_STYLES)),
            vec!["bold", "italic"]
        );

        let wide = italic.force_selection(SelectionState::within_block("b0", 0, 11));
        assert!(active_names(&inline_controls(&wide, INLINE_STYLES)).is_empty());
    }

    #[test]
    fn test_link_trigger_is_not_active_by_default() {
        let state = EditorState::create_empty();
        assert!(!link_active(&state));
    }
}
