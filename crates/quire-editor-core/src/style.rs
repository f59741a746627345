//! Inline style and block type identifiers.
//!
//! Identifiers are the string keys the toolbar tables and the HTML export
//! agree on. Block types are a closed enum with an `Other` escape hatch so an
//! unknown key read from configuration still round-trips.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A character-range formatting attribute, identified by its key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(SmolStr);

impl InlineStyle {
    pub const BOLD: InlineStyle = InlineStyle(SmolStr::new_static("BOLD"));
    pub const ITALIC: InlineStyle = InlineStyle(SmolStr::new_static("ITALIC"));
    pub const UNDERLINE: InlineStyle = InlineStyle(SmolStr::new_static("UNDERLINE"));
    pub const CODE: InlineStyle = InlineStyle(SmolStr::new_static("CODE"));
    /// Custom strikethrough key.
    pub const LINE_THROUGH: InlineStyle = InlineStyle(SmolStr::new_static("lineThrough"));

    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InlineStyle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered set of inline styles applied to one character.
///
/// Ordered so that equality and iteration are deterministic.
pub type StyleSet = BTreeSet<InlineStyle>;

/// Block type of a content block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    UnorderedListItem,
    OrderedListItem,
    CodeBlock,
    Centered,
    Justify,
    Left,
    Right,
    /// Any key not known to the editor.
    Other(SmolStr),
}

impl BlockType {
    /// Every named block type, in declaration order.
    pub const NAMED: [BlockType; 15] = [
        BlockType::Unstyled,
        BlockType::HeaderOne,
        BlockType::HeaderTwo,
        BlockType::HeaderThree,
        BlockType::HeaderFour,
        BlockType::HeaderFive,
        BlockType::HeaderSix,
        BlockType::Blockquote,
        BlockType::UnorderedListItem,
        BlockType::OrderedListItem,
        BlockType::CodeBlock,
        BlockType::Centered,
        BlockType::Justify,
        BlockType::Left,
        BlockType::Right,
    ];

    /// The identifier used by the toolbar tables and command names.
    pub fn key(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::Blockquote => "blockquote",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::CodeBlock => "code-block",
            BlockType::Centered => "CENTERED_BLOCK",
            BlockType::Justify => "JUSTIFY_BLOCK",
            BlockType::Left => "LEFT_BLOCK",
            BlockType::Right => "RIGHT_BLOCK",
            BlockType::Other(key) => key.as_str(),
        }
    }

    /// Parse a key. Unknown keys become `Other`; this never fails.
    pub fn from_key(key: &str) -> Self {
        Self::NAMED
            .iter()
            .find(|ty| ty.key() == key)
            .cloned()
            .unwrap_or_else(|| BlockType::Other(SmolStr::new(key)))
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BlockType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_key(s))
    }
}

impl Serialize for BlockType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = SmolStr::deserialize(deserializer)?;
        Ok(Self::from_key(&key))
    }
}
