//! quire-editor-core: framework-free rich text editing.
//!
//! This crate provides:
//! - `ContentState` / `EditorState` - immutable document snapshots with undo
//! - `commands` - block/inline/link toggles and key command handling
//! - `html` - deterministic HTML export
//! - `toolbar` - active-state derivation for toolbar controls
//! - `EditorShell` - the coordinator a UI layer drives

pub mod actions;
pub mod commands;
pub mod config;
pub mod content;
pub mod editor_state;
pub mod error;
pub mod html;
pub mod link;
pub mod modifier;
pub mod platform;
pub mod render;
pub mod shell;
pub mod style;
pub mod text_helpers;
pub mod toolbar;
pub mod types;

pub use actions::{
    InputType, Key, KeyBindings, KeyCombo, KeyCommand, KeydownResult, Modifiers,
    default_key_binding,
};
pub use config::{BLOCK_TYPES, EditorConfig, INLINE_STYLES, StyleDescriptor};
pub use content::{CharMetadata, ContentBlock, ContentState, Entity, EntityKind, Mutability};
pub use editor_state::{ChangeType, EditorState};
pub use error::EditorError;
pub use html::{serialize, write_html_fmt};
pub use link::LinkForm;
pub use platform::{PlatformError, SelectionPlatform};
pub use render::{BlockGroup, BlockRender, SpanRender, render_groups};
pub use shell::{EditorShell, ExportBuffer};
pub use smol_str::SmolStr;
pub use style::{BlockType, InlineStyle, StyleSet};
pub use toolbar::ControlState;
pub use types::{BlockKey, EntityKey, Position, SelectionState};
