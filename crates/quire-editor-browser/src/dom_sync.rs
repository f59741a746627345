//! DOM synchronization for the rich text editor.
//!
//! Reads the browser's selection and converts DOM points into block/offset
//! positions in the editor model.

use wasm_bindgen::JsCast;
use quire_editor_core::{BlockKey, ContentState, PlatformError, Position, SelectionState};

use crate::BLOCK_KEY_ATTR;

/// Read the browser selection inside `editor_id` as a model selection.
///
/// Returns `Ok(None)` when there is no selection or it lies outside the
/// editor element.
pub fn read_dom_selection(
    editor_id: &str,
    content: &ContentState,
) -> Result<Option<SelectionState>, PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let dom_document = window.document().ok_or("no document")?;
    let editor_element = dom_document
        .get_element_by_id(editor_id)
        .ok_or_else(|| format!("editor element {editor_id} not found"))?;

    let Some(selection) = window.get_selection().ok().flatten() else {
        return Ok(None);
    };
    if selection.range_count() == 0 {
        return Ok(None);
    }

    let (Some(anchor_node), Some(focus_node)) = (selection.anchor_node(), selection.focus_node())
    else {
        return Ok(None);
    };
    if !editor_element.contains(Some(&anchor_node)) || !editor_element.contains(Some(&focus_node))
    {
        return Ok(None);
    }

    tracing::trace!(
        anchor_node_name = %anchor_node.node_name(),
        anchor_offset = selection.anchor_offset(),
        focus_node_name = %focus_node.node_name(),
        focus_offset = selection.focus_offset(),
        "read_dom_selection: browser selection state"
    );

    let anchor = dom_point_to_position(
        &dom_document,
        &editor_element,
        &anchor_node,
        selection.anchor_offset(),
        content,
    );
    let focus = dom_point_to_position(
        &dom_document,
        &editor_element,
        &focus_node,
        selection.focus_offset(),
        content,
    );

    let (Some(anchor), Some(focus)) = (anchor, focus) else {
        tracing::warn!("Could not map DOM selection to block positions");
        return Ok(None);
    };

    let has_focus = dom_document
        .active_element()
        .map(|active| {
            let active: &web_sys::Node = &active;
            editor_element.contains(Some(active))
        })
        .unwrap_or(false);

    content
        .selection(anchor, focus)
        .map(|sel| Some(sel.with_focus(has_focus)))
        .map_err(|e| PlatformError(e.to_string()))
}

/// Convert a DOM point (node + offset) to a model position.
///
/// Walks up from the node to the element carrying `data-block-key`, then
/// measures the text between the block start and the point. The measured
/// length is clamped to the block's length, so stray DOM text (a trailing
/// `<br>`, a half-applied IME edit) never yields an out-of-range offset.
pub fn dom_point_to_position(
    dom_document: &web_sys::Document,
    editor_element: &web_sys::Element,
    node: &web_sys::Node,
    offset: u32,
    content: &ContentState,
) -> Option<Position> {
    let mut current_node = node.clone();

    let block_element = loop {
        if let Some(element) = current_node.dyn_ref::<web_sys::Element>() {
            if element == editor_element {
                // Selection directly on the editor container (e.g., Cmd+A).
                return Some(container_boundary(editor_element, offset, content));
            }
            if element.has_attribute(BLOCK_KEY_ATTR) {
                break element.clone();
            }
        }
        current_node = current_node.parent_node()?;
    };

    let key = block_element.get_attribute(BLOCK_KEY_ATTR)?;
    let block = content.block_for_key(&BlockKey::from(key.as_str()))?;

    let range = dom_document.create_range().ok()?;
    range.select_node_contents(&block_element).ok()?;
    range.set_end(node, offset).ok()?;
    let before: String = range.to_string().into();
    let char_offset = before.chars().count().min(block.len());

    tracing::trace!(
        block = %key,
        char_offset,
        "dom_point_to_position: mapped DOM point"
    );

    Some(Position::new(block.key.clone(), char_offset))
}

/// Positions for points that sit on the editor element between blocks.
///
/// Offset 0 is the document start; anything else is treated as the end.
fn container_boundary(
    editor_element: &web_sys::Element,
    offset: u32,
    content: &ContentState,
) -> Position {
    tracing::trace!(
        offset,
        child_count = editor_element.child_element_count(),
        "dom_point_to_position: selection directly on editor container"
    );
    if offset == 0 {
        Position::new(content.first_block().key.clone(), 0)
    } else {
        let last = content.last_block();
        Position::new(last.key.clone(), last.len())
    }
}
