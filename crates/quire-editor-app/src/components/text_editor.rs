//! The embeddable editor widget.

use dioxus::prelude::*;
use quire_editor_browser::{EditorShell, focus_editor};

use super::{
    BlockStyleControls, EDITOR_ID, EditorSurface, HtmlPreviewModal, InlineStyleControls,
    LinkPopup, StyleButton,
};
use crate::config::CONFIG;

const EDITOR_CSS: Asset = asset!("/assets/editor.css");

/// Toolbar, editable surface and HTML preview around one `EditorShell`.
#[component]
pub fn TextEditor() -> Element {
    let mut shell = use_signal(|| EditorShell::new(&CONFIG));

    let (block_controls, inline_controls, link_active, export) = {
        let shell = shell.read();
        (
            shell.block_controls(),
            shell.inline_controls(),
            shell.link_active(),
            shell.export().clone(),
        )
    };

    rsx! {
        document::Link { rel: "stylesheet", href: EDITOR_CSS }
        div { class: "RichEditor-root",
            div { class: "RichEditor-toolbar",
                BlockStyleControls {
                    controls: block_controls,
                    on_toggle: move |style: &'static str| shell.write().toggle_block_type(style),
                }
                InlineStyleControls {
                    controls: inline_controls,
                    on_toggle: move |style: &'static str| shell.write().toggle_inline_type(style),
                }
                LinkPopup {
                    label: CONFIG.link_label.clone(),
                    active: link_active,
                    on_confirm: move |url: String| {
                        shell.write().set_link(&url);
                        if let Err(e) = focus_editor(EDITOR_ID) {
                            tracing::warn!("refocusing editor failed: {e}");
                        }
                    },
                }
                StyleButton {
                    icon: "unlinkify",
                    style: "unlink",
                    active: false,
                    on_toggle: move |_| shell.write().unlink(),
                }
                StyleButton {
                    icon: "html5",
                    style: "html",
                    active: false,
                    on_toggle: move |_| {
                        shell.write().export_html();
                    },
                }
            }
            EditorSurface { shell, spell_check: CONFIG.spell_check }
            HtmlPreviewModal {
                title: CONFIG.preview_title.clone(),
                html: export.html,
                open: export.visible,
                on_close: move |_| shell.write().dismiss_preview(),
            }
        }
    }
}
