//! Toolbar tables and editor configuration.

use serde::Deserialize;

use crate::editor_state::DEFAULT_MAX_UNDO_STEPS;
use crate::error::EditorError;
use crate::style::{BlockType, InlineStyle};

/// One toolbar entry: the glyph name shown and the key it toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub name: &'static str,
    pub style: &'static str,
}

impl StyleDescriptor {
    pub const fn new(name: &'static str, style: &'static str) -> Self {
        Self { name, style }
    }

    pub fn block_type(&self) -> BlockType {
        BlockType::from_key(self.style)
    }

    pub fn inline_style(&self) -> InlineStyle {
        InlineStyle::new(self.style)
    }
}

/// Block style buttons, in display order.
pub const BLOCK_TYPES: &[StyleDescriptor] = &[
    StyleDescriptor::new("heading", "header-one"),
    StyleDescriptor::new("quote right", "blockquote"),
    StyleDescriptor::new("list ul", "unordered-list-item"),
    StyleDescriptor::new("list ol", "ordered-list-item"),
    StyleDescriptor::new("code", "code-block"),
    StyleDescriptor::new("align center", "CENTERED_BLOCK"),
    StyleDescriptor::new("align justify", "JUSTIFY_BLOCK"),
    StyleDescriptor::new("align left", "LEFT_BLOCK"),
    StyleDescriptor::new("align right", "RIGHT_BLOCK"),
];

/// Inline style buttons, in display order.
pub const INLINE_STYLES: &[StyleDescriptor] = &[
    StyleDescriptor::new("bold", "BOLD"),
    StyleDescriptor::new("italic", "ITALIC"),
    StyleDescriptor::new("underline", "UNDERLINE"),
    StyleDescriptor::new("strikethrough", "lineThrough"),
];

/// Runtime options for the editor widget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_undo_steps: usize,
    pub spell_check: bool,
    /// Header of the HTML preview overlay.
    pub preview_title: String,
    /// Label above the link URL field.
    pub link_label: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
            spell_check: true,
            preview_title: "HTML-разметка".to_string(),
            link_label: "Адрес".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_keys_are_unique() {
        for table in [BLOCK_TYPES, INLINE_STYLES] {
            for (i, entry) in table.iter().enumerate() {
                assert!(table[..i].iter().all(|e| e.style != entry.style));
                assert!(table[..i].iter().all(|e| e.name != entry.name));
            }
        }
    }

    #[test]
    fn test_block_table_keys_are_known() {
        for entry in BLOCK_TYPES {
            assert!(!matches!(entry.block_type(), BlockType::Other(_)));
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "spell_check": false }"#).unwrap();
        assert!(!config.spell_check);
        assert_eq!(config.max_undo_steps, 100);
        assert_eq!(config.link_label, "Адрес");
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let err = EditorConfig::from_json("{ \"max_undo_steps\": -1 }").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }
}
