//! View model for the editable surface.
//!
//! The surface shows the live document, not the exported HTML: each block
//! becomes an element carrying its key, each run a span carrying its char
//! offset, so DOM selections can be mapped back to model positions.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::content::{ContentBlock, ContentState};
use crate::html::{ListTag, block_tag};
use crate::style::{BlockType, StyleSet};
use crate::types::BlockKey;

/// CSS declarations per inline style on the surface.
///
/// Several styles may set `text-decoration`; their values are combined.
pub const SURFACE_STYLES: &[(&str, &[(&str, &str)])] = &[
    ("BOLD", &[("font-weight", "bold")]),
    ("ITALIC", &[("font-style", "italic")]),
    ("UNDERLINE", &[("text-decoration", "underline")]),
    ("lineThrough", &[("text-decoration", "line-through")]),
    (
        "CODE",
        &[
            ("background-color", "rgba(0, 0, 0, 0.05)"),
            ("font-family", r#""Inconsolata", "Menlo", "Consolas", monospace"#),
            ("font-size", "16px"),
            ("padding", "2px"),
        ],
    ),
];

/// CSS class for a block on the surface, if its type has one.
pub fn block_class(block_type: &BlockType) -> Option<&'static str> {
    match block_type {
        BlockType::Blockquote => Some("RichEditor-blockquote"),
        BlockType::Centered => Some("RichEditor-CENTERED_BLOCK"),
        BlockType::Justify => Some("RichEditor-JUSTIFY_BLOCK"),
        BlockType::Left => Some("RichEditor-LEFT_BLOCK"),
        BlockType::Right => Some("RichEditor-RIGHT_BLOCK"),
        _ => None,
    }
}

/// Inline CSS for a style set, or `None` when nothing applies.
pub fn style_css(style: &StyleSet) -> Option<String> {
    let mut decorations: Vec<&str> = Vec::new();
    let mut css = String::new();
    for (key, declarations) in SURFACE_STYLES {
        if !style.iter().any(|s| s.key() == *key) {
            continue;
        }
        for (property, value) in declarations.iter() {
            if *property == "text-decoration" {
                decorations.push(*value);
            } else {
                css.push_str(property);
                css.push_str(": ");
                css.push_str(value);
                css.push_str("; ");
            }
        }
    }
    if !decorations.is_empty() {
        css.push_str("text-decoration: ");
        css.push_str(&decorations.join(" "));
        css.push_str("; ");
    }
    let css = css.trim_end().to_string();
    (!css.is_empty()).then_some(css)
}

/// One run of text on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRender {
    /// Char offset of the run inside its block.
    pub offset: usize,
    pub text: String,
    pub css: Option<String>,
    /// Target when the run is part of a link.
    pub link: Option<String>,
}

impl SpanRender {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One block on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRender {
    pub key: BlockKey,
    pub element: &'static str,
    pub class: Option<&'static str>,
    pub spans: Vec<SpanRender>,
    /// Hash of text and metadata for quick change detection.
    pub source_hash: u64,
}

impl BlockRender {
    fn from_block(content: &ContentState, block: &ContentBlock) -> Self {
        let spans = block
            .runs()
            .into_iter()
            .map(|run| {
                let meta = &block.chars[run.start];
                let link = meta
                    .entity
                    .and_then(|key| content.entity(key))
                    .filter(|entity| entity.is_link())
                    .and_then(|entity| entity.url())
                    .map(str::to_string);
                SpanRender {
                    offset: run.start,
                    text: block.slice(run).to_string(),
                    css: style_css(&meta.style),
                    link,
                }
            })
            .collect();
        Self {
            key: block.key.clone(),
            element: block_tag(&block.block_type).element,
            class: block_class(&block.block_type),
            spans,
            source_hash: hash_block(block),
        }
    }
}

/// Consecutive blocks rendered inside the same list wrapper, or a single
/// block outside any list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGroup {
    pub list: Option<ListTag>,
    pub blocks: Vec<BlockRender>,
}

/// Build the surface view model for the whole document.
pub fn render_groups(content: &ContentState) -> Vec<BlockGroup> {
    let mut groups: Vec<BlockGroup> = Vec::new();
    for block in content.blocks() {
        let list = block_tag(&block.block_type).list;
        let render = BlockRender::from_block(content, block);
        match groups.last_mut() {
            Some(group) if list.is_some() && group.list == list => group.blocks.push(render),
            _ => groups.push(BlockGroup {
                list,
                blocks: vec![render],
            }),
        }
    }
    groups
}

/// Hash a block's text, type and per-char metadata.
pub fn hash_block(block: &ContentBlock) -> u64 {
    let mut hasher = DefaultHasher::new();
    block.text.hash(&mut hasher);
    block.block_type.hash(&mut hasher);
    for meta in &block.chars {
        meta.style.hash(&mut hasher);
        meta.entity.hash(&mut hasher);
    }
    hasher.finish()
}
