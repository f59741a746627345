//! Components of the editor widget.

mod controls;
mod link_popup;
mod preview;
mod style_button;
mod surface;
mod text_editor;

pub use controls::{BlockStyleControls, InlineStyleControls};
pub use link_popup::LinkPopup;
pub use preview::HtmlPreviewModal;
pub use style_button::StyleButton;
pub use surface::{EDITOR_ID, EditorSurface};
pub use text_editor::TextEditor;
