//! A single toolbar toggle.

use dioxus::prelude::*;

/// Glyphs for toolbar icon names.
const GLYPHS: &[(&str, &str)] = &[
    ("heading", "H"),
    ("quote right", "❞"),
    ("list ul", "•"),
    ("list ol", "1."),
    ("code", "<>"),
    ("align center", "≡"),
    ("align justify", "☰"),
    ("align left", "⇤"),
    ("align right", "⇥"),
    ("bold", "B"),
    ("italic", "I"),
    ("underline", "U"),
    ("strikethrough", "S"),
    ("linkify", "🔗"),
    ("unlinkify", "⛓"),
    ("html5", "</>"),
];

/// Glyph shown for an icon name; unknown names show the name itself.
pub fn glyph(icon: &str) -> &str {
    GLYPHS
        .iter()
        .find(|(name, _)| *name == icon)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(icon)
}

/// Stateless toolbar button. Emits `style` when pressed.
///
/// Acts on mousedown with the default prevented, so the surface keeps its
/// focus and selection.
#[component]
pub fn StyleButton(
    icon: &'static str,
    style: &'static str,
    active: bool,
    on_toggle: EventHandler<&'static str>,
) -> Element {
    let class = if active {
        "RichEditor-styleButton RichEditor-activeButton"
    } else {
        "RichEditor-styleButton"
    };
    let pressed = if active { "true" } else { "false" };
    rsx! {
        span {
            class,
            title: icon,
            role: "button",
            "aria-pressed": pressed,
            onmousedown: move |evt| {
                evt.prevent_default();
                on_toggle.call(style);
            },
            i { class: "icon {icon}", "{glyph(icon)}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_editor_browser::{BLOCK_TYPES, INLINE_STYLES};

    #[test]
    fn test_every_toolbar_entry_has_a_glyph() {
        for entry in BLOCK_TYPES.iter().chain(INLINE_STYLES) {
            assert_ne!(glyph(entry.name), entry.name, "{} has no glyph", entry.name);
        }
    }

    #[test]
    fn test_unknown_icon_falls_back_to_name() {
        assert_eq!(glyph("rocket"), "rocket");
    }
}
