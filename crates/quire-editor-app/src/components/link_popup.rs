//! Link trigger with its URL popup.

use dioxus::prelude::keyboard_types::Key;
use dioxus::prelude::*;
use quire_editor_browser::LinkForm;

use super::StyleButton;

/// Link button that opens a small form for the URL.
///
/// Confirming emits the trimmed URL and clears the field whether or not the
/// editor could use it.
#[component]
pub fn LinkPopup(label: String, active: bool, on_confirm: EventHandler<String>) -> Element {
    let mut open = use_signal(|| false);
    let mut link_form = use_signal(LinkForm::new);

    let mut confirm = move || {
        let url = link_form.write().confirm();
        open.set(false);
        tracing::debug!(%url, "link confirmed");
        on_confirm.call(url);
    };

    rsx! {
        span { class: "RichEditor-linkPopup",
            StyleButton {
                icon: "linkify",
                style: "LINK",
                active,
                on_toggle: move |_| open.set(!open()),
            }
            if open() {
                form {
                    class: "RichEditor-linkForm",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        confirm();
                    },
                    label { r#for: "quire-link-url", "{label}" }
                    input {
                        id: "quire-link-url",
                        r#type: "text",
                        value: "{link_form.read().url()}",
                        oninput: move |evt| link_form.write().set_url(evt.value()),
                        onkeydown: move |evt| {
                            if evt.key() == Key::Escape {
                                open.set(false);
                            }
                        },
                        onmounted: move |evt| async move {
                            if let Err(e) = evt.set_focus(true).await {
                                tracing::debug!("link input focus failed: {e:?}");
                            }
                        },
                    }
                    button { r#type: "submit", "OK" }
                }
            }
        }
    }
}
