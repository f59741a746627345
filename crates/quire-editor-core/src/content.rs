//! Immutable document content: blocks, per-character metadata and entities.
//!
//! A `ContentState` is never mutated once built. Edits go through the
//! functions in `modifier`, which return a new state that shares every
//! untouched block with the old one.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::EditorError;
use crate::style::{BlockType, InlineStyle, StyleSet};
use crate::types::{BlockKey, EntityKey, Position, SelectionState};

/// Styles and entity attached to a single character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }
}

/// How an entity reacts when the text it covers is edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mutability {
    /// Text may change freely; the entity stays attached.
    Mutable,
    /// Editing the text removes the entity from it.
    Immutable,
    /// The range is treated as separate words when deleting.
    Segmented,
}

/// Entity type discriminator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Link,
    Other(SmolStr),
}

impl EntityKind {
    pub fn key(&self) -> &str {
        match self {
            EntityKind::Link => "LINK",
            EntityKind::Other(key) => key.as_str(),
        }
    }
}

/// Metadata attached to a text range, distinct from styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub mutability: Mutability,
    pub data: BTreeMap<SmolStr, String>,
}

impl Entity {
    /// A mutable LINK entity pointing at `url`.
    pub fn link(url: impl Into<String>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(SmolStr::new_static("url"), url.into());
        Self {
            kind: EntityKind::Link,
            mutability: Mutability::Mutable,
            data,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.data.get("url").map(String::as_str)
    }

    pub fn is_link(&self) -> bool {
        self.kind == EntityKind::Link
    }
}

/// One structural unit of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentBlock {
    pub key: BlockKey,
    pub block_type: BlockType,
    pub text: String,
    /// One entry per char of `text`.
    pub chars: Vec<CharMetadata>,
}

impl ContentBlock {
    /// Block with unstyled characters.
    pub fn new(key: BlockKey, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = vec![CharMetadata::default(); text.chars().count()];
        Self {
            key,
            block_type,
            text,
            chars,
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.chars
            .get(offset)
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.chars.get(offset).and_then(|c| c.entity)
    }

    /// Byte offset of a char offset, clamped to the end of the text.
    pub fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Text of a char range.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        &self.text[start..end]
    }

    /// Maximal runs of chars sharing both style set and entity.
    ///
    /// Empty blocks yield no runs.
    pub fn runs(&self) -> Vec<Range<usize>> {
        split_runs(&self.chars, |a, b| a == b)
    }

    /// Maximal runs of chars sharing the same entity (`None` included).
    pub fn entity_ranges(&self) -> Vec<(Range<usize>, Option<EntityKey>)> {
        split_runs(&self.chars, |a, b| a.entity == b.entity)
            .into_iter()
            .map(|range| {
                let entity = self.chars[range.start].entity;
                (range, entity)
            })
            .collect()
    }

    /// Maximal runs of chars sharing the same style set, within `range`.
    pub fn style_ranges(&self, range: Range<usize>) -> Vec<Range<usize>> {
        split_runs(&self.chars[range.clone()], |a, b| a.style == b.style)
            .into_iter()
            .map(|r| r.start + range.start..r.end + range.start)
            .collect()
    }

    pub(crate) fn with_type(&self, block_type: BlockType) -> Self {
        Self {
            block_type,
            ..self.clone()
        }
    }
}

fn split_runs(
    chars: &[CharMetadata],
    same: impl Fn(&CharMetadata, &CharMetadata) -> bool,
) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        if i == chars.len() || !same(&chars[start], &chars[i]) {
            if start < i {
                runs.push(start..i);
            }
            start = i;
        }
    }
    runs
}

/// The full document content at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentState {
    blocks: Vec<Arc<ContentBlock>>,
    entities: Arc<BTreeMap<EntityKey, Entity>>,
    last_entity: Option<EntityKey>,
    next_block: u32,
}

impl ContentState {
    /// Document with a single empty unstyled block.
    pub fn create_empty() -> Self {
        Self::from_text("")
    }

    /// One unstyled block per line of `text`.
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<_> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                Arc::new(ContentBlock::new(
                    BlockKey::generated(i as u32),
                    BlockType::Unstyled,
                    line,
                ))
            })
            .collect();
        let next_block = blocks.len() as u32;
        Self {
            blocks,
            entities: Arc::new(BTreeMap::new()),
            last_entity: None,
            next_block,
        }
    }

    /// Build from explicit blocks. At least one block is required and keys
    /// must be unique.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Result<Self, EditorError> {
        if blocks.is_empty() {
            return Err(EditorError::EmptyDocument);
        }
        for (i, block) in blocks.iter().enumerate() {
            if blocks[..i].iter().any(|b| b.key == block.key) {
                return Err(EditorError::DuplicateBlockKey(block.key.clone()));
            }
        }
        let next_block = blocks.len() as u32;
        Ok(Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
            entities: Arc::new(BTreeMap::new()),
            last_entity: None,
            next_block,
        })
    }

    pub fn blocks(&self) -> &[Arc<ContentBlock>] {
        &self.blocks
    }

    pub fn first_block(&self) -> &Arc<ContentBlock> {
        // Invariant: never empty.
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Arc<ContentBlock> {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| &b.key == key)
    }

    pub fn block_for_key(&self, key: &BlockKey) -> Option<&Arc<ContentBlock>> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub fn block_before(&self, key: &BlockKey) -> Option<&Arc<ContentBlock>> {
        let idx = self.block_index(key)?;
        idx.checked_sub(1).map(|i| &self.blocks[i])
    }

    pub fn block_after(&self, key: &BlockKey) -> Option<&Arc<ContentBlock>> {
        let idx = self.block_index(key)?;
        self.blocks.get(idx + 1)
    }

    /// Plain text with blocks joined by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    pub fn entities(&self) -> &BTreeMap<EntityKey, Entity> {
        &self.entities
    }

    /// Register a new entity. The returned state's `last_created_entity_key`
    /// identifies it.
    pub fn create_entity(&self, entity: Entity) -> Self {
        let key = EntityKey(
            self.entities
                .keys()
                .next_back()
                .map(|k| k.0 + 1)
                .unwrap_or(1),
        );
        let mut entities = Arc::clone(&self.entities);
        Arc::make_mut(&mut entities).insert(key, entity);
        tracing::trace!(entity = %key, "created entity");
        Self {
            entities,
            last_entity: Some(key),
            ..self.clone()
        }
    }

    pub fn last_created_entity_key(&self) -> Option<EntityKey> {
        self.last_entity
    }

    /// Build a selection between two positions, working out its direction
    /// from block order.
    pub fn selection(
        &self,
        anchor: Position,
        focus: Position,
    ) -> Result<SelectionState, EditorError> {
        let anchor_idx = self.check_position(&anchor)?;
        let focus_idx = self.check_position(&focus)?;
        let is_backward = (focus_idx, focus.offset) < (anchor_idx, anchor.offset);
        Ok(SelectionState {
            anchor,
            focus,
            is_backward,
            has_focus: false,
        })
    }

    /// Check that a selection refers to existing blocks and in-range offsets.
    pub fn validate(&self, selection: &SelectionState) -> Result<(), EditorError> {
        self.check_position(&selection.anchor)?;
        self.check_position(&selection.focus)?;
        Ok(())
    }

    fn check_position(&self, pos: &Position) -> Result<usize, EditorError> {
        let idx = self
            .block_index(&pos.block)
            .ok_or_else(|| EditorError::UnknownBlock(pos.block.clone()))?;
        let len = self.blocks[idx].len();
        if pos.offset > len {
            return Err(EditorError::OffsetOutOfBounds {
                block: pos.block.clone(),
                offset: pos.offset,
                len,
            });
        }
        Ok(idx)
    }

    /// Selection covering the whole document.
    pub fn select_all(&self) -> SelectionState {
        let last = self.last_block();
        SelectionState {
            anchor: Position::new(self.first_block().key.clone(), 0),
            focus: Position::new(last.key.clone(), last.len()),
            is_backward: false,
            has_focus: true,
        }
    }

    /// Blocks touched by a selection, in document order, paired with the
    /// char range of each block the selection covers.
    pub fn selected_ranges(&self, selection: &SelectionState) -> Vec<(usize, Range<usize>)> {
        let (Some(start_idx), Some(end_idx)) = (
            self.block_index(selection.start_key()),
            self.block_index(selection.end_key()),
        ) else {
            return Vec::new();
        };
        (start_idx..=end_idx)
            .map(|idx| {
                let len = self.blocks[idx].len();
                let from = if idx == start_idx {
                    selection.start_offset().min(len)
                } else {
                    0
                };
                let to = if idx == end_idx {
                    selection.end_offset().min(len)
                } else {
                    len
                };
                (idx, from..to.max(from))
            })
            .collect()
    }

    /// Styles shared by every char the selection covers.
    ///
    /// A style that covers only part of the selection is not included.
    /// Collapsed selections cover no chars and yield an empty set.
    pub fn covering_styles(&self, selection: &SelectionState) -> StyleSet {
        let mut covering: Option<StyleSet> = None;
        for (idx, range) in self.selected_ranges(selection) {
            for meta in &self.blocks[idx].chars[range] {
                covering = Some(match covering {
                    None => meta.style.clone(),
                    Some(acc) => acc.intersection(&meta.style).cloned().collect(),
                });
            }
        }
        covering.unwrap_or_default()
    }

    /// Whether every char the selection covers carries `style`.
    pub fn selection_has_style(&self, selection: &SelectionState, style: &InlineStyle) -> bool {
        self.covering_styles(selection).contains(style)
    }

    pub(crate) fn with_blocks(&self, blocks: Vec<Arc<ContentBlock>>) -> Self {
        Self {
            blocks,
            ..self.clone()
        }
    }

    pub(crate) fn next_block_key(&self) -> (BlockKey, Self) {
        let mut key = BlockKey::generated(self.next_block);
        let mut next = self.next_block + 1;
        // Keys from `from_blocks` may collide with generated ones.
        while self.block_index(&key).is_some() {
            key = BlockKey::generated(next);
            next += 1;
        }
        (
            key,
            Self {
                next_block: next,
                ..self.clone()
            },
        )
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::create_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(block: &mut ContentBlock, range: Range<usize>, style: InlineStyle) {
        for meta in &mut block.chars[range] {
            meta.style.insert(style.clone());
        }
    }

    #[test]
    fn test_from_text_splits_lines() {
        let content = ContentState::from_text("one\ntwo\n");
        assert_eq!(content.blocks().len(), 3);
        assert_eq!(content.blocks()[1].text, "two");
        assert!(content.blocks()[2].is_empty());
        assert_eq!(content.plain_text(), "one\ntwo\n");
    }

    #[test]
    fn test_runs_split_on_style_and_entity() {
        let mut block = ContentBlock::new("a".into(), BlockType::Unstyled, "hello world");
        styled(&mut block, 6..11, InlineStyle::BOLD);
        block.chars[8].entity = Some(EntityKey(1));
        assert_eq!(block.runs(), vec![0..6, 6..8, 8..9, 9..11]);
        assert_eq!(block.style_ranges(0..11), vec![0..6, 6..11]);
        assert_eq!(block.entity_ranges().len(), 3);
    }

    #[test]
    fn test_empty_block_has_no_runs() {
        let block = ContentBlock::new("a".into(), BlockType::Unstyled, "");
        assert!(block.runs().is_empty());
        assert!(block.entity_ranges().is_empty());
    }

    #[test]
    fn test_multibyte_slice() {
        let block = ContentBlock::new("a".into(), BlockType::Unstyled, "héllo wörld");
        assert_eq!(block.len(), 11);
        assert_eq!(block.slice(6..11), "wörld");
    }

    #[test]
    fn test_create_entity_assigns_increasing_keys() {
        let content = ContentState::create_empty();
        assert_eq!(content.last_created_entity_key(), None);
        let content = content.create_entity(Entity::link("http://a"));
        let first = content.last_created_entity_key().unwrap();
        let content = content.create_entity(Entity::link("http://b"));
        let second = content.last_created_entity_key().unwrap();
        assert!(second > first);
        assert_eq!(content.entity(first).and_then(Entity::url), Some("http://a"));
        assert_eq!(content.entity(second).and_then(Entity::url), Some("http://b"));
    }

    #[test]
    fn test_create_entity_leaves_original_untouched() {
        let content = ContentState::create_empty();
        let with_entity = content.create_entity(Entity::link("http://a"));
        assert!(content.entities().is_empty());
        assert_eq!(with_entity.entities().len(), 1);
    }

    #[test]
    fn test_selection_direction_across_blocks() {
        let content = ContentState::from_text("one\ntwo");
        let sel = content
            .selection(Position::new("b1", 1), Position::new("b0", 2))
            .unwrap();
        assert!(sel.is_backward);
        assert_eq!(sel.start_key().as_str(), "b0");
        assert_eq!(sel.end_offset(), 1);
    }

    #[test]
    fn test_selection_rejects_bad_positions() {
        let content = ContentState::from_text("one");
        let err = content
            .selection(Position::new("b0", 0), Position::new("b0", 9))
            .unwrap_err();
        assert!(matches!(err, EditorError::OffsetOutOfBounds { offset: 9, .. }));
        let err = content
            .selection(Position::new("zz", 0), Position::new("b0", 0))
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownBlock(_)));
    }

    #[test]
    fn test_covering_styles_requires_full_coverage() {
        let mut block = ContentBlock::new("a".into(), BlockType::Unstyled, "hello world");
        styled(&mut block, 0..11, InlineStyle::ITALIC);
        styled(&mut block, 6..11, InlineStyle::BOLD);
        let content = ContentState::from_blocks(vec![block]).unwrap();

        let all = SelectionState::within_block("a", 0, 11);
        let covering = content.covering_styles(&all);
        assert!(covering.contains(&InlineStyle::ITALIC));
        assert!(!covering.contains(&InlineStyle::BOLD));

        let world = SelectionState::within_block("a", 6, 11);
        assert!(content.selection_has_style(&world, &InlineStyle::BOLD));

        let caret = SelectionState::within_block("a", 8, 8);
        assert!(content.covering_styles(&caret).is_empty());
    }

    #[test]
    fn test_from_blocks_rejects_duplicates_and_empty() {
        assert!(matches!(
            ContentState::from_blocks(Vec::new()),
            Err(EditorError::EmptyDocument)
        ));
        let a = ContentBlock::new("a".into(), BlockType::Unstyled, "");
        assert!(matches!(
            ContentState::from_blocks(vec![a.clone(), a]),
            Err(EditorError::DuplicateBlockKey(_))
        ));
    }

    #[test]
    fn test_next_block_key_skips_existing() {
        let blocks = vec![
            ContentBlock::new("b2".into(), BlockType::Unstyled, ""),
            ContentBlock::new("x".into(), BlockType::Unstyled, ""),
        ];
        let content = ContentState::from_blocks(blocks).unwrap();
        let (key, content) = content.next_block_key();
        assert_eq!(key.as_str(), "b3");
        let (key, _) = content.next_block_key();
        assert_eq!(key.as_str(), "b4");
    }
}
