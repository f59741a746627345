//! Pure transformations over `ContentState`.
//!
//! Every function takes the current content and a selection and returns new
//! content. Blocks outside the selection are carried over by `Arc` clone, so
//! the previous snapshot stays valid and cheap to keep for undo.

use std::sync::Arc;

use crate::content::{CharMetadata, ContentBlock, ContentState};
use crate::style::{BlockType, InlineStyle};
use crate::types::{EntityKey, Position, SelectionState};

/// Rewrite the metadata of every char the selection covers.
fn map_chars(
    content: &ContentState,
    selection: &SelectionState,
    f: impl Fn(&mut CharMetadata),
) -> ContentState {
    let mut blocks = content.blocks().to_vec();
    for (idx, range) in content.selected_ranges(selection) {
        if range.is_empty() {
            continue;
        }
        let block = Arc::make_mut(&mut blocks[idx]);
        for meta in &mut block.chars[range] {
            f(meta);
        }
    }
    content.with_blocks(blocks)
}

/// Add `style` to every selected char.
pub fn apply_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: &InlineStyle,
) -> ContentState {
    map_chars(content, selection, |meta| {
        meta.style.insert(style.clone());
    })
}

/// Remove `style` from every selected char.
pub fn remove_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: &InlineStyle,
) -> ContentState {
    map_chars(content, selection, |meta| {
        meta.style.remove(style);
    })
}

/// Attach `entity` to every selected char, or detach whatever is there when
/// `entity` is `None`.
pub fn apply_entity(
    content: &ContentState,
    selection: &SelectionState,
    entity: Option<EntityKey>,
) -> ContentState {
    map_chars(content, selection, |meta| {
        meta.entity = entity;
    })
}

/// Set the type of every block the selection touches, including blocks it
/// only touches with a collapsed caret.
pub fn set_block_type(
    content: &ContentState,
    selection: &SelectionState,
    block_type: &BlockType,
) -> ContentState {
    let mut blocks = content.blocks().to_vec();
    for (idx, _) in content.selected_ranges(selection) {
        if &blocks[idx].block_type != block_type {
            blocks[idx] = Arc::new(blocks[idx].with_type(block_type.clone()));
        }
    }
    content.with_blocks(blocks)
}

/// Delete the selected text, merging the first and last touched blocks.
///
/// Returns the new content and a caret at the start of the removed range.
pub fn remove_range(
    content: &ContentState,
    selection: &SelectionState,
) -> (ContentState, SelectionState) {
    let caret = selection.collapse_to_start();
    if selection.is_collapsed() {
        return (content.clone(), caret);
    }
    let ranges = content.selected_ranges(selection);
    let (Some((first_idx, first_range)), Some((last_idx, last_range))) =
        (ranges.first().cloned(), ranges.last().cloned())
    else {
        return (content.clone(), caret);
    };

    let first = &content.blocks()[first_idx];
    let last = &content.blocks()[last_idx];

    let mut text = String::from(first.slice(0..first_range.start));
    text.push_str(last.slice(last_range.end..last.len()));
    let mut chars = first.chars[..first_range.start].to_vec();
    chars.extend_from_slice(&last.chars[last_range.end..]);

    let merged = ContentBlock {
        key: first.key.clone(),
        block_type: first.block_type.clone(),
        text,
        chars,
    };

    let mut blocks = content.blocks().to_vec();
    blocks.splice(first_idx..=last_idx, [Arc::new(merged)]);
    (content.with_blocks(blocks), caret)
}

/// Insert text at the selection, replacing any selected text.
///
/// Inserted chars carry `meta`. Newlines in `text` split the block, so pasted
/// multi-line text becomes multiple blocks of the current type.
pub fn insert_text(
    content: &ContentState,
    selection: &SelectionState,
    text: &str,
    meta: &CharMetadata,
) -> (ContentState, SelectionState) {
    let (mut content, mut caret) = remove_range(content, selection);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            (content, caret) = split_block_at(&content, &caret, false);
        }
        if !line.is_empty() {
            (content, caret) = insert_line(&content, &caret, line, meta);
        }
    }
    (content, caret)
}

fn insert_line(
    content: &ContentState,
    caret: &SelectionState,
    line: &str,
    meta: &CharMetadata,
) -> (ContentState, SelectionState) {
    let Some(idx) = content.block_index(&caret.focus.block) else {
        return (content.clone(), caret.clone());
    };
    let mut blocks = content.blocks().to_vec();
    let block = Arc::make_mut(&mut blocks[idx]);
    let offset = caret.focus.offset.min(block.len());
    let byte = block.byte_offset(offset);
    let inserted = line.chars().count();

    block.text.insert_str(byte, line);
    block
        .chars
        .splice(offset..offset, std::iter::repeat_n(meta.clone(), inserted));

    let caret = SelectionState::collapsed(Position {
        block: block.key.clone(),
        offset: offset + inserted,
    })
    .with_focus(caret.has_focus);
    (content.with_blocks(blocks), caret)
}

/// Split the block at the selection (after removing any selected text).
///
/// Splitting an empty styled block resets it to unstyled instead, which is how
/// Enter leaves a list or quote.
pub fn split_block(
    content: &ContentState,
    selection: &SelectionState,
) -> (ContentState, SelectionState) {
    let (content, caret) = remove_range(content, selection);
    split_block_at(&content, &caret, true)
}

fn split_block_at(
    content: &ContentState,
    caret: &SelectionState,
    reset_empty: bool,
) -> (ContentState, SelectionState) {
    let Some(idx) = content.block_index(&caret.focus.block) else {
        return (content.clone(), caret.clone());
    };
    let block = &content.blocks()[idx];

    if reset_empty && block.is_empty() && block.block_type != BlockType::Unstyled {
        tracing::trace!(block = %block.key, "empty styled block, resetting type");
        let content = set_block_type(content, caret, &BlockType::Unstyled);
        return (content, caret.clone());
    }

    let offset = caret.focus.offset.min(block.len());
    let (new_key, content) = content.next_block_key();
    let block = &content.blocks()[idx];

    let above = ContentBlock {
        key: block.key.clone(),
        block_type: block.block_type.clone(),
        text: block.slice(0..offset).to_string(),
        chars: block.chars[..offset].to_vec(),
    };
    let below = ContentBlock {
        key: new_key.clone(),
        block_type: block.block_type.clone(),
        text: block.slice(offset..block.len()).to_string(),
        chars: block.chars[offset..].to_vec(),
    };

    let mut blocks = content.blocks().to_vec();
    blocks.splice(idx..=idx, [Arc::new(above), Arc::new(below)]);
    let caret = SelectionState::at_block_start(new_key).with_focus(caret.has_focus);
    (content.with_blocks(blocks), caret)
}
