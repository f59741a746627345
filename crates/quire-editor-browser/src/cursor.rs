//! Browser implementation of selection platform operations.
//!
//! Uses the DOM Selection API to place the caret after the surface re-renders.

use wasm_bindgen::JsCast;
use quire_editor_core::{ContentState, PlatformError, Position, SelectionPlatform, SelectionState};

use crate::BLOCK_KEY_ATTR;
use crate::dom_sync::read_dom_selection;

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

/// Browser-based selection platform implementation.
///
/// Holds the editor element ID for DOM lookups.
pub struct BrowserSelection {
    editor_id: String,
}

impl BrowserSelection {
    /// Create a new browser selection handler for the given editor element.
    pub fn new(editor_id: impl Into<String>) -> Self {
        Self {
            editor_id: editor_id.into(),
        }
    }

    /// Get the editor element ID.
    pub fn editor_id(&self) -> &str {
        &self.editor_id
    }
}

impl SelectionPlatform for BrowserSelection {
    fn read_selection(
        &self,
        content: &ContentState,
    ) -> Result<Option<SelectionState>, PlatformError> {
        read_dom_selection(&self.editor_id, content)
    }

    fn restore_selection(&self, selection: &SelectionState) -> Result<(), PlatformError> {
        restore_selection(&self.editor_id, selection)
    }
}

/// Restore the DOM selection from a model selection after re-render.
pub fn restore_selection(editor_id: &str, selection: &SelectionState) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let dom_document = window.document().ok_or("no document")?;
    let editor_element = dom_document
        .get_element_by_id(editor_id)
        .ok_or_else(|| format!("editor element {editor_id} not found"))?;

    let (anchor_node, anchor_offset) =
        dom_point_for_position(&dom_document, &editor_element, &selection.anchor)?;
    let (focus_node, focus_offset) =
        dom_point_for_position(&dom_document, &editor_element, &selection.focus)?;

    let dom_selection = window
        .get_selection()
        .map_err(|e| format!("getSelection failed: {e:?}"))?
        .ok_or("no selection object")?;

    dom_selection
        .set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
        .map_err(|e| PlatformError(format!("setBaseAndExtent failed: {e:?}")))?;

    tracing::trace!(
        anchor = ?selection.anchor,
        focus = ?selection.focus,
        "restore_selection: applied"
    );
    Ok(())
}

/// Find the DOM text node and UTF-16 offset for a model position.
fn dom_point_for_position(
    dom_document: &web_sys::Document,
    editor_element: &web_sys::Element,
    position: &Position,
) -> Result<(web_sys::Node, u32), PlatformError> {
    let selector = format!(r#"[{BLOCK_KEY_ATTR}="{}"]"#, position.block);
    let block_element = editor_element
        .query_selector(&selector)
        .map_err(|e| format!("invalid block selector: {e:?}"))?
        .ok_or_else(|| format!("block {} not rendered", position.block))?;

    find_text_node_at_offset(dom_document, &block_element, position.offset)
}

/// Walk the text nodes of a block element to the one containing `char_offset`.
///
/// Offsets past the last text node land at its end. A block with no text
/// (an empty block holding only `<br>`) yields the block element itself at
/// offset 0.
pub fn find_text_node_at_offset(
    dom_document: &web_sys::Document,
    block_element: &web_sys::Element,
    char_offset: usize,
) -> Result<(web_sys::Node, u32), PlatformError> {
    let walker = dom_document
        .create_tree_walker_with_what_to_show(block_element, SHOW_TEXT)
        .map_err(|e| format!("createTreeWalker failed: {e:?}"))?;

    let mut remaining = char_offset;
    let mut last: Option<(web_sys::Node, u32)> = None;

    while let Ok(Some(node)) = walker.next_node() {
        let text = node.text_content().unwrap_or_default();
        let char_len = text.chars().count();

        if remaining <= char_len {
            let utf16: usize = text.chars().take(remaining).map(char::len_utf16).sum();
            return Ok((node, utf16 as u32));
        }

        remaining -= char_len;
        let utf16_len: usize = text.chars().map(char::len_utf16).sum();
        last = Some((node, utf16_len as u32));
    }

    if let Some(last) = last {
        tracing::warn!(
            char_offset,
            "find_text_node_at_offset: offset past block text, clamping to end"
        );
        return Ok(last);
    }

    let block_node: &web_sys::Node = block_element;
    Ok((block_node.clone(), 0))
}

/// Move keyboard focus to the editor element.
///
/// Toolbar forms take focus away from the surface; call this before the
/// selection is restored so the caret is visible again.
pub fn focus_editor(editor_id: &str) -> Result<(), PlatformError> {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(editor_id))
        .ok_or_else(|| format!("editor element {editor_id} not found"))?;
    let html_element = element
        .dyn_ref::<web_sys::HtmlElement>()
        .ok_or("editor element is not an HtmlElement")?;
    html_element
        .focus()
        .map_err(|e| PlatformError(format!("focus failed: {e:?}")))
}
