//! Overlay showing exported HTML as literal text.

use dioxus::prelude::keyboard_types::Key;
use dioxus::prelude::*;

/// Dismissible overlay with the HTML source in a read-only block.
///
/// The markup is shown as text, never interpreted.
#[component]
pub fn HtmlPreviewModal(
    title: String,
    html: String,
    open: bool,
    on_close: EventHandler<()>,
) -> Element {
    if !open {
        return rsx! {};
    }

    rsx! {
        div {
            class: "RichEditor-previewOverlay",
            tabindex: "-1",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            onmounted: move |evt| async move {
                if let Err(e) = evt.set_focus(true).await {
                    tracing::debug!("preview focus failed: {e:?}");
                }
            },
            div {
                class: "RichEditor-previewModal",
                role: "dialog",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "RichEditor-previewHeader",
                    h3 { "{title}" }
                    button {
                        class: "RichEditor-previewClose",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                pre { class: "RichEditor-previewBody", "{html}" }
            }
        }
    }
}
