//! Block and inline toolbar groups.

use dioxus::prelude::*;
use quire_editor_browser::ControlState;

use super::StyleButton;

/// One button per block type; at most one is active.
#[component]
pub fn BlockStyleControls(
    controls: Vec<ControlState>,
    on_toggle: EventHandler<&'static str>,
) -> Element {
    rsx! {
        span { class: "RichEditor-controls RichEditor-blockControls",
            for control in controls {
                StyleButton {
                    key: "{control.descriptor.style}",
                    icon: control.descriptor.name,
                    style: control.descriptor.style,
                    active: control.active,
                    on_toggle,
                }
            }
        }
    }
}

/// One button per inline style.
#[component]
pub fn InlineStyleControls(
    controls: Vec<ControlState>,
    on_toggle: EventHandler<&'static str>,
) -> Element {
    rsx! {
        span { class: "RichEditor-controls RichEditor-inlineControls",
            for control in controls {
                StyleButton {
                    key: "{control.descriptor.style}",
                    icon: control.descriptor.name,
                    style: control.descriptor.style,
                    active: control.active,
                    on_toggle,
                }
            }
        }
    }
}
