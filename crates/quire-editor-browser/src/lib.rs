//! Browser DOM layer for the quire rich text editor.
//!
//! This crate maps between the contenteditable surface and the editor
//! model. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `cursor`: writes model selections back into the DOM Selection API
//! - `dom_sync`: reads DOM selections into block/offset positions
//! - `events`: beforeinput, keydown, paste event extraction
//! - `platform`: Browser/OS detection for platform-specific behavior
//!
//! # DOM contract
//!
//! Every block element carries `data-block-key`, and every text span inside
//! it carries `data-offset` (the char offset of its first character). Empty
//! blocks hold a single `<br>`.
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

// Re-export core crate
pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod cursor;
pub mod dom_sync;
pub mod events;
pub mod platform;

pub use cursor::{BrowserSelection, focus_editor, restore_selection};
pub use dom_sync::{dom_point_to_position, read_dom_selection};
pub use events::{
    StaticRange, clipboard_text, get_data_from_event, get_input_type_from_event,
    get_target_range_from_event, is_composing, key_from_name, keycombo_from_event,
    listen_beforeinput, parse_browser_input_type,
};

// Platform detection
pub use platform::{Platform, platform};

/// Attribute holding a block's key on its DOM element.
pub const BLOCK_KEY_ATTR: &str = "data-block-key";

/// Attribute holding a span's starting char offset within its block.
pub const OFFSET_ATTR: &str = "data-offset";
