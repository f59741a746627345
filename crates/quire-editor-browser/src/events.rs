//! Browser event handling for the editor.
//!
//! Provides browser-specific event extraction and input type parsing for
//! `beforeinput`, `keydown` and `paste` events.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use quire_editor_core::{ContentState, InputType, Key, KeyCombo, Modifiers, SelectionState};

use crate::dom_sync::dom_point_to_position;

// StaticRange is what InputEvent.getTargetRanges() hands back. It does not
// track later DOM changes.
#[wasm_bindgen]
extern "C" {
    pub type StaticRange;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn collapsed(this: &StaticRange) -> bool;
}

// === InputType browser parsing ===

/// Parse a browser inputType string to an InputType enum.
///
/// This handles the W3C Input Events inputType values as returned by
/// `InputEvent.inputType` in browsers.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        // Insertion
        "insertText" => InputType::InsertText,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertReplacementText" => InputType::InsertReplacementText,

        // Deletion
        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteWordBackward" => InputType::DeleteWordBackward,
        "deleteWordForward" => InputType::DeleteWordForward,
        "deleteSoftLineBackward" => InputType::DeleteSoftLineBackward,
        "deleteSoftLineForward" => InputType::DeleteSoftLineForward,
        "deleteHardLineBackward" => InputType::DeleteHardLineBackward,
        "deleteHardLineForward" => InputType::DeleteHardLineForward,
        "deleteEntireSoftLine" => InputType::DeleteSoftLineBackward,
        "deleteByCut" => InputType::DeleteByCut,

        // History
        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        // Formatting
        "formatBold" => InputType::FormatBold,
        "formatItalic" => InputType::FormatItalic,
        "formatUnderline" => InputType::FormatUnderline,
        "formatStrikeThrough" => InputType::FormatStrikeThrough,

        // Unknown
        other => InputType::Unknown(other.to_string()),
    }
}

/// Get data from a beforeinput event, handling different sources.
pub fn get_data_from_event(event: &web_sys::InputEvent) -> Option<String> {
    // First try the data property.
    if let Some(data) = event.data() {
        if !data.is_empty() {
            return Some(data);
        }
    }

    // For paste and replacement text, try dataTransfer.
    if let Some(data_transfer) = event.data_transfer() {
        if let Ok(text) = data_transfer.get_data("text/plain") {
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Get input type from a beforeinput event.
pub fn get_input_type_from_event(event: &web_sys::InputEvent) -> InputType {
    parse_browser_input_type(&event.input_type())
}

/// The range a beforeinput event is about to replace, as a model selection.
///
/// Spell-check and autocorrect replacements name a word that is usually not
/// the current selection. Returns `None` when the browser gives no range or
/// it cannot be mapped onto rendered blocks.
pub fn get_target_range_from_event(
    event: &web_sys::InputEvent,
    editor_id: &str,
    content: &ContentState,
) -> Option<SelectionState> {
    let ranges = event.get_target_ranges();
    if ranges.length() == 0 {
        return None;
    }
    let static_range: StaticRange = ranges.get(0).unchecked_into();

    let dom_document = web_sys::window()?.document()?;
    let editor_element = dom_document.get_element_by_id(editor_id)?;

    let start = dom_point_to_position(
        &dom_document,
        &editor_element,
        &static_range.startContainer(),
        static_range.startOffset(),
        content,
    )?;
    let end = if static_range.collapsed() {
        start.clone()
    } else {
        dom_point_to_position(
            &dom_document,
            &editor_element,
            &static_range.endContainer(),
            static_range.endOffset(),
            content,
        )?
    };

    tracing::trace!(?start, ?end, "target range from beforeinput");
    content.selection(start, end).ok()
}

/// Check if the beforeinput event is during IME composition.
pub fn is_composing(event: &web_sys::InputEvent) -> bool {
    event.is_composing()
}

/// Plain text carried by a paste event.
pub fn clipboard_text(event: &web_sys::ClipboardEvent) -> Option<String> {
    event
        .clipboard_data()?
        .get_data("text/plain")
        .ok()
        .filter(|s| !s.is_empty())
}

/// Attach a `beforeinput` listener that may call `preventDefault`.
///
/// Framework event props register passive handlers for some event types,
/// so the surface attaches this one directly. The listener detaches when the
/// returned guard is dropped.
pub fn listen_beforeinput<F>(target: &web_sys::EventTarget, mut callback: F) -> EventListener
where
    F: FnMut(&web_sys::InputEvent) + 'static,
{
    EventListener::new_with_options(
        target,
        "beforeinput",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if let Some(input) = event.dyn_ref::<web_sys::InputEvent>() {
                callback(input);
            }
        },
    )
}

// === Keyboard ===

/// Convert a `KeyboardEvent.key` value to a `Key`.
pub fn key_from_name(name: &str) -> Key {
    match name {
        "Backspace" => Key::Backspace,
        "Delete" => Key::Delete,
        "Enter" => Key::Enter,
        "Tab" => Key::Tab,
        "Escape" => Key::Escape,
        "ArrowLeft" => Key::ArrowLeft,
        "ArrowRight" => Key::ArrowRight,
        "ArrowUp" => Key::ArrowUp,
        "ArrowDown" => Key::ArrowDown,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Alt" => Key::Alt,
        "Control" => Key::Control,
        "Meta" => Key::Meta,
        "Shift" => Key::Shift,
        "CapsLock" => Key::CapsLock,
        " " => Key::character(" "),
        s if s.chars().count() == 1 => Key::character(s),
        _ => Key::Unidentified,
    }
}

/// Build a `KeyCombo` from a native keyboard event.
pub fn keycombo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    let modifiers = Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    };
    KeyCombo::with_modifiers(key_from_name(&event.key()), modifiers)
}
