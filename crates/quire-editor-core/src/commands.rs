//! Rich-text commands over `EditorState`.
//!
//! Each command takes a snapshot and returns a new one. Commands that don't
//! apply to the current selection return `None` (for key commands, meaning
//! "not handled") or the input state unchanged (for toolbar toggles).

use crate::actions::KeyCommand;
use crate::content::{CharMetadata, ContentState, Mutability};
use crate::editor_state::{ChangeType, EditorState};
use crate::modifier;
use crate::style::{BlockType, InlineStyle};
use crate::text_helpers::{find_word_boundary_backward, find_word_boundary_forward};
use crate::types::{EntityKey, Position, SelectionState};

/// Type of the block holding the selection start.
pub fn current_block_type(state: &EditorState) -> BlockType {
    let content = state.current_content();
    content
        .block_for_key(state.selection().start_key())
        .map(|block| block.block_type.clone())
        .unwrap_or_default()
}

/// Toggle a block type on every block the selection touches.
///
/// If the block holding the selection start already has `block_type`, all
/// touched blocks reset to unstyled; otherwise they all take `block_type`.
/// A multi-block range ending at offset 0 (what a triple-click leaves) does
/// not touch the block it ends in.
pub fn toggle_block_type(state: &EditorState, block_type: &BlockType) -> EditorState {
    let target = if &current_block_type(state) == block_type {
        BlockType::Unstyled
    } else {
        block_type.clone()
    };
    tracing::debug!(block_type = %target, "toggle block type");
    let content = state.current_content();
    let selection = block_type_target(content, state.selection());
    let next = modifier::set_block_type(content, &selection, &target);
    state.push(next, state.selection().clone(), ChangeType::ChangeBlockType)
}

/// Pull a range that ends at the start of a later block back to the end of
/// the block before it.
fn block_type_target(content: &ContentState, selection: &SelectionState) -> SelectionState {
    if selection.is_collapsed() || selection.is_single_block() || selection.end_offset() != 0 {
        return selection.clone();
    }
    let Some(before) = content.block_before(selection.end_key()) else {
        return selection.clone();
    };
    SelectionState {
        anchor: selection.start().clone(),
        focus: Position::new(before.key.clone(), before.len()),
        is_backward: false,
        has_focus: selection.has_focus,
    }
}

/// Toggle an inline style.
///
/// On a range the style is removed when it covers every selected char and
/// applied otherwise. On a caret the pending style for the next typed text
/// is toggled instead.
pub fn toggle_inline_style(state: &EditorState, style: &InlineStyle) -> EditorState {
    let selection = state.selection();
    if selection.is_collapsed() {
        let mut pending = state.current_inline_style();
        if !pending.remove(style) {
            pending.insert(style.clone());
        }
        return state.set_inline_style_override(pending);
    }

    let content = state.current_content();
    let next = if content.selection_has_style(selection, style) {
        modifier::remove_inline_style(content, selection, style)
    } else {
        modifier::apply_inline_style(content, selection, style)
    };
    tracing::debug!(%style, "toggle inline style");
    state
        .push(next, selection.clone(), ChangeType::ChangeInlineStyle)
        .force_selection(selection.clone())
}

/// Attach `entity` to the selected text, or detach any entity when `None`.
pub fn toggle_link(
    state: &EditorState,
    selection: &SelectionState,
    entity: Option<EntityKey>,
) -> EditorState {
    let content = modifier::apply_entity(state.current_content(), selection, entity);
    state
        .push(content, selection.clone(), ChangeType::ApplyEntity)
        .force_selection(selection.clone())
}

/// Handle the rich-text key commands.
///
/// Formatting commands toggle their inline style. Backspace at the very start
/// of a styled block resets the block to unstyled. Everything else is left to
/// `handle_default_command`.
pub fn handle_key_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    let style = match command {
        KeyCommand::Bold => InlineStyle::BOLD,
        KeyCommand::Italic => InlineStyle::ITALIC,
        KeyCommand::Underline => InlineStyle::UNDERLINE,
        KeyCommand::Code => InlineStyle::CODE,
        KeyCommand::Strikethrough => InlineStyle::LINE_THROUGH,
        KeyCommand::Backspace
        | KeyCommand::BackspaceWord
        | KeyCommand::BackspaceToStartOfLine => return try_remove_block_style(state),
        _ => return None,
    };
    Some(toggle_inline_style(state, &style))
}

/// Reset a styled block to unstyled when the caret sits at its start.
///
/// A code block following a non-empty code block is left alone, so backspace
/// merges the two instead.
fn try_remove_block_style(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    if !selection.is_collapsed() || selection.start_offset() != 0 {
        return None;
    }
    let content = state.current_content();
    let block = content.block_for_key(selection.start_key())?;
    if block.block_type == BlockType::CodeBlock
        && content
            .block_before(&block.key)
            .is_some_and(|before| before.block_type == BlockType::CodeBlock && !before.is_empty())
    {
        return None;
    }
    if block.block_type == BlockType::Unstyled {
        return None;
    }
    let next = modifier::set_block_type(content, selection, &BlockType::Unstyled);
    Some(state.push(next, selection.clone(), ChangeType::ChangeBlockType))
}

/// Built-in editing behavior for commands the rich-text layer passed on.
///
/// Returns `None` when the command has no effect here (nothing to delete,
/// nothing to undo, or a command this layer doesn't know).
pub fn handle_default_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    let content = state.current_content();
    let selection = state.selection();

    if command.is_deletion() && !selection.is_collapsed() {
        let (next, caret) = modifier::remove_range(content, selection);
        return Some(state.push(next, caret, ChangeType::RemoveRange));
    }

    match command {
        KeyCommand::Backspace => {
            let target = backward_target(content, selection, |_, offset| offset - 1)?;
            remove_to(state, target, selection.focus.clone(), ChangeType::BackspaceCharacter)
        }
        KeyCommand::BackspaceWord => {
            let target = backward_target(content, selection, find_word_boundary_backward)?;
            remove_to(state, target, selection.focus.clone(), ChangeType::RemoveRange)
        }
        KeyCommand::BackspaceToStartOfLine => {
            let target = backward_target(content, selection, |_, _| 0)?;
            remove_to(state, target, selection.focus.clone(), ChangeType::RemoveRange)
        }
        KeyCommand::Delete => {
            let target = forward_target(content, selection, |_, offset| offset + 1)?;
            remove_to(state, selection.focus.clone(), target, ChangeType::DeleteCharacter)
        }
        KeyCommand::DeleteWord => {
            let target = forward_target(content, selection, find_word_boundary_forward)?;
            remove_to(state, selection.focus.clone(), target, ChangeType::RemoveRange)
        }
        KeyCommand::DeleteToEndOfBlock => {
            let target = forward_target(content, selection, |block, _| block.len())?;
            remove_to(state, selection.focus.clone(), target, ChangeType::RemoveRange)
        }
        KeyCommand::SplitBlock => {
            let (next, caret) = modifier::split_block(content, selection);
            Some(state.push(next, caret, ChangeType::SplitBlock))
        }
        KeyCommand::Undo => state.undo(),
        KeyCommand::Redo => state.redo(),
        _ => None,
    }
}

/// Where a backward deletion from a caret ends.
///
/// Inside a block `within` picks the offset; at a block start the deletion
/// reaches the end of the previous block, merging the two.
fn backward_target(
    content: &ContentState,
    caret: &SelectionState,
    within: impl Fn(&crate::content::ContentBlock, usize) -> usize,
) -> Option<Position> {
    let block = content.block_for_key(&caret.focus.block)?;
    let offset = caret.focus.offset.min(block.len());
    if offset > 0 {
        return Some(Position::new(block.key.clone(), within(block, offset)));
    }
    let before = content.block_before(&block.key)?;
    Some(Position::new(before.key.clone(), before.len()))
}

/// Where a forward deletion from a caret ends. Mirrors `backward_target`.
fn forward_target(
    content: &ContentState,
    caret: &SelectionState,
    within: impl Fn(&crate::content::ContentBlock, usize) -> usize,
) -> Option<Position> {
    let block = content.block_for_key(&caret.focus.block)?;
    let offset = caret.focus.offset.min(block.len());
    if offset < block.len() {
        return Some(Position::new(block.key.clone(), within(block, offset).min(block.len())));
    }
    let after = content.block_after(&block.key)?;
    Some(Position::new(after.key.clone(), 0))
}

fn remove_to(
    state: &EditorState,
    start: Position,
    end: Position,
    change: ChangeType,
) -> Option<EditorState> {
    let content = state.current_content();
    let range = content.selection(start, end).ok()?;
    if range.is_collapsed() {
        return None;
    }
    let (next, caret) = modifier::remove_range(content, &range);
    Some(state.push(next, caret, change))
}

/// Metadata for text typed at a caret.
///
/// Styles come from `current_inline_style`. A mutable entity carries over
/// when the caret sits strictly inside it.
fn metadata_for_insert(state: &EditorState, content: &ContentState, caret: &SelectionState) -> CharMetadata {
    let style = state.current_inline_style();
    let entity = content.block_for_key(&caret.focus.block).and_then(|block| {
        let offset = caret.focus.offset;
        if offset == 0 {
            return None;
        }
        let key = block.entity_at(offset - 1)?;
        if block.entity_at(offset) != Some(key) {
            return None;
        }
        content
            .entity(key)
            .filter(|entity| entity.mutability == Mutability::Mutable)
            .map(|_| key)
    });
    CharMetadata::new(style, entity)
}

/// Type `text` at the selection, replacing any selected text.
pub fn insert_characters(state: &EditorState, text: &str) -> EditorState {
    if text.is_empty() {
        return state.clone();
    }
    let (content, caret) = modifier::remove_range(state.current_content(), state.selection());
    let meta = metadata_for_insert(state, &content, &caret);
    let (next, caret) = modifier::insert_text(&content, &caret, text, &meta);
    state.push(next, caret, ChangeType::InsertCharacters)
}

/// Paste plain text. Line breaks split blocks.
pub fn insert_fragment(state: &EditorState, text: &str) -> EditorState {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.is_empty() {
        return state.clone();
    }
    let (content, caret) = modifier::remove_range(state.current_content(), state.selection());
    let meta = metadata_for_insert(state, &content, &caret);
    let (next, caret) = modifier::insert_text(&content, &caret, &text, &meta);
    state.push(next, caret, ChangeType::InsertFragment)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::content::Entity;

    fn state_with(text: &str, selection: SelectionState) -> EditorState {
        EditorState::create_with_content(ContentState::from_text(text)).force_selection(selection)
    }

    #[test]
    fn test_toggle_block_type_round_trip() {
        let state = state_with("item", SelectionState::within_block("b0", 0, 0));
        let list = toggle_block_type(&state, &BlockType::UnorderedListItem);
        assert_eq!(current_block_type(&list), BlockType::UnorderedListItem);
        let back = toggle_block_type(&list, &BlockType::UnorderedListItem);
        assert_eq!(current_block_type(&back), BlockType::Unstyled);
    }

    #[test]
    fn test_toggle_block_type_uses_start_block() {
        let content = ContentState::from_text("one\ntwo");
        let state = EditorState::create_with_content(content.clone());
        let sel = content
            .selection(Position::new("b0", 0), Position::new("b1", 3))
            .unwrap();
        let quoted = toggle_block_type(&state.force_selection(sel), &BlockType::Blockquote);
        let blocks = quoted.current_content().blocks();
        assert!(blocks.iter().all(|b| b.block_type == BlockType::Blockquote));
    }

    #[test]
    fn test_toggle_block_type_skips_block_after_triple_click() {
        let content = ContentState::from_text("title\nbody text");
        let sel = content
            .selection(Position::new("b0", 0), Position::new("b1", 0))
            .unwrap();
        let state = EditorState::create_with_content(content).force_selection(sel.clone());
        let heading = toggle_block_type(&state, &BlockType::HeaderOne);
        let blocks = heading.current_content().blocks();
        assert_eq!(blocks[0].block_type, BlockType::HeaderOne);
        assert_eq!(blocks[1].block_type, BlockType::Unstyled);
        assert_eq!(heading.selection().anchor, sel.anchor);
        assert_eq!(heading.selection().focus, sel.focus);
    }

    #[test]
    fn test_toggle_inline_style_full_coverage() {
        let state = state_with("hello world", SelectionState::within_block("b0", 6, 11));
        let bold = toggle_inline_style(&state, &InlineStyle::BOLD);
        assert!(bold.current_inline_style().contains(&InlineStyle::BOLD));

        // Partially bold selection gets bold everywhere rather than cleared.
        let wider = bold.force_selection(SelectionState::within_block("b0", 0, 11));
        let all_bold = toggle_inline_style(&wider, &InlineStyle::BOLD);
        let block = all_bold.current_content().first_block().clone();
        assert!(block.chars.iter().all(|c| c.style.contains(&InlineStyle::BOLD)));

        let cleared = toggle_inline_style(&all_bold, &InlineStyle::BOLD);
        let block = cleared.current_content().first_block().clone();
        assert!(block.chars.iter().all(|c| c.style.is_empty()));
    }

    #[test]
    fn test_toggle_inline_style_on_caret_sets_override() {
        let state = state_with("hello", SelectionState::within_block("b0", 5, 5));
        let toggled = toggle_inline_style(&state, &InlineStyle::ITALIC);
        assert!(Arc::ptr_eq(state.content_arc(), toggled.content_arc()));

        let typed = insert_characters(&toggled, "!");
        let block = typed.current_content().first_block().clone();
        assert!(block.style_at(5).contains(&InlineStyle::ITALIC));
        assert!(!block.style_at(4).contains(&InlineStyle::ITALIC));
    }

    #[test]
    fn test_key_command_formatting() {
        let state = state_with("hello", SelectionState::within_block("b0", 0, 5));
        let next = handle_key_command(&state, &KeyCommand::Strikethrough).unwrap();
        assert!(next.current_inline_style().contains(&InlineStyle::LINE_THROUGH));
        assert!(handle_key_command(&state, &KeyCommand::Unknown("x".into())).is_none());
        assert!(handle_key_command(&state, &KeyCommand::SplitBlock).is_none());
    }

    #[test]
    fn test_backspace_at_block_start_resets_type() {
        let state = state_with("title", SelectionState::within_block("b0", 0, 0));
        let heading = toggle_block_type(&state, &BlockType::HeaderOne);
        let reset = handle_key_command(&heading, &KeyCommand::Backspace).unwrap();
        assert_eq!(current_block_type(&reset), BlockType::Unstyled);
        assert_eq!(reset.current_content().plain_text(), "title");

        // Unstyled blocks fall through to the default handler.
        assert!(handle_key_command(&reset, &KeyCommand::Backspace).is_none());
    }

    #[test]
    fn test_backspace_in_code_block_after_code_block() {
        let content = ContentState::from_text("let a = 1;\nlet b = 2;");
        let all = content.select_all();
        let state = EditorState::create_with_content(content).force_selection(all);
        let code = toggle_block_type(&state, &BlockType::CodeBlock);
        let caret = code.force_selection(SelectionState::within_block("b1", 0, 0));
        assert!(handle_key_command(&caret, &KeyCommand::Backspace).is_none());

        let merged = handle_default_command(&caret, &KeyCommand::Backspace).unwrap();
        assert_eq!(merged.current_content().plain_text(), "let a = 1;let b = 2;");
    }

    #[test]
    fn test_default_backspace_and_delete() {
        let state = state_with("abc", SelectionState::within_block("b0", 2, 2));
        let back = handle_default_command(&state, &KeyCommand::Backspace).unwrap();
        assert_eq!(back.current_content().plain_text(), "ac");
        assert_eq!(back.selection().focus.offset, 1);

        let del = handle_default_command(&back, &KeyCommand::Delete).unwrap();
        assert_eq!(del.current_content().plain_text(), "a");

        let at_end = handle_default_command(&del, &KeyCommand::Delete);
        assert!(at_end.is_none());
    }

    #[test]
    fn test_default_word_and_line_deletion() {
        let state = state_with("hello big world", SelectionState::within_block("b0", 9, 9));
        let word = handle_default_command(&state, &KeyCommand::BackspaceWord).unwrap();
        assert_eq!(word.current_content().plain_text(), "hello  world");

        let line = handle_default_command(&state, &KeyCommand::BackspaceToStartOfLine).unwrap();
        assert_eq!(line.current_content().plain_text(), " world");

        let tail = handle_default_command(&state, &KeyCommand::DeleteToEndOfBlock).unwrap();
        assert_eq!(tail.current_content().plain_text(), "hello big");
    }

    #[test]
    fn test_delete_at_block_end_merges_next() {
        let state = state_with("ab\ncd", SelectionState::within_block("b0", 2, 2));
        let merged = handle_default_command(&state, &KeyCommand::Delete).unwrap();
        assert_eq!(merged.current_content().plain_text(), "abcd");
        assert_eq!(merged.current_content().blocks().len(), 1);
    }

    #[test]
    fn test_backspace_at_document_start_is_unhandled() {
        let state = state_with("abc", SelectionState::within_block("b0", 0, 0));
        assert!(handle_default_command(&state, &KeyCommand::Backspace).is_none());
    }

    #[test]
    fn test_default_undo_redo() {
        let state = state_with("", SelectionState::within_block("b0", 0, 0));
        assert!(handle_default_command(&state, &KeyCommand::Undo).is_none());
        let typed = insert_characters(&state, "hi");
        let undone = handle_default_command(&typed, &KeyCommand::Undo).unwrap();
        assert_eq!(undone.current_content().plain_text(), "");
        let redone = handle_default_command(&undone, &KeyCommand::Redo).unwrap();
        assert_eq!(redone.current_content().plain_text(), "hi");
    }

    #[test]
    fn test_typing_inside_link_extends_it() {
        let content = ContentState::from_text("hello world")
            .create_entity(Entity::link("http://x"));
        let key = content.last_created_entity_key().unwrap();
        let state = EditorState::create_with_content(content);
        let linked = toggle_link(&state, &SelectionState::within_block("b0", 6, 11), Some(key));

        let inside = linked.force_selection(SelectionState::within_block("b0", 8, 8));
        let typed = insert_characters(&inside, "x");
        assert_eq!(typed.current_content().first_block().entity_at(8), Some(key));

        let after = linked.force_selection(SelectionState::within_block("b0", 11, 11));
        let typed = insert_characters(&after, "!");
        assert_eq!(typed.current_content().first_block().entity_at(11), None);
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let state = state_with("", SelectionState::within_block("b0", 0, 0));
        let pasted = insert_fragment(&state, "one\r\ntwo");
        assert_eq!(pasted.current_content().plain_text(), "one\ntwo");
        assert_eq!(pasted.last_change_type(), Some(ChangeType::InsertFragment));
    }
}
