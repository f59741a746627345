//! Editor state snapshots and undo history.
//!
//! An `EditorState` pairs an immutable `ContentState` with the selection and
//! the undo/redo stacks. Every edit returns a fresh `EditorState`; old
//! snapshots stay valid, which is what lets undo keep plain `Arc`s to
//! earlier content.

use std::sync::Arc;

use crate::content::ContentState;
use crate::style::StyleSet;
use crate::types::SelectionState;

/// Default bound on the undo stack.
pub const DEFAULT_MAX_UNDO_STEPS: usize = 100;

/// What kind of edit produced a snapshot.
///
/// Consecutive edits of a coalescing kind share one undo step, so undo
/// removes a typed word rather than a single character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeType {
    InsertCharacters,
    BackspaceCharacter,
    DeleteCharacter,
    RemoveRange,
    InsertFragment,
    SplitBlock,
    ChangeInlineStyle,
    ChangeBlockType,
    ApplyEntity,
    Undo,
    Redo,
}

impl ChangeType {
    fn coalesces(self) -> bool {
        matches!(
            self,
            ChangeType::InsertCharacters
                | ChangeType::BackspaceCharacter
                | ChangeType::DeleteCharacter
        )
    }
}

#[derive(Clone, Debug)]
struct Snapshot {
    content: Arc<ContentState>,
    selection: SelectionState,
}

/// Immutable snapshot of the editor: content, selection and history.
#[derive(Clone, Debug)]
pub struct EditorState {
    content: Arc<ContentState>,
    selection: SelectionState,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_undo_steps: usize,
    inline_style_override: Option<StyleSet>,
    last_change: Option<ChangeType>,
}

impl EditorState {
    /// State holding a single empty block with the caret inside it.
    pub fn create_empty() -> Self {
        Self::create_with_content(ContentState::create_empty())
    }

    /// State over existing content, caret at the start of the first block.
    pub fn create_with_content(content: ContentState) -> Self {
        let selection = SelectionState::at_block_start(content.first_block().key.clone());
        Self {
            content: Arc::new(content),
            selection,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
            inline_style_override: None,
            last_change: None,
        }
    }

    pub fn with_max_undo_steps(mut self, max_undo_steps: usize) -> Self {
        self.max_undo_steps = max_undo_steps;
        self.trim_undo();
        self
    }

    pub fn current_content(&self) -> &ContentState {
        &self.content
    }

    /// Shared handle to the content, for identity checks between snapshots.
    pub fn content_arc(&self) -> &Arc<ContentState> {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Styles the next typed character will receive.
    ///
    /// A pending override (from toggling a style on a caret) wins. Otherwise a
    /// caret inherits the style of the char before it, or of the first char
    /// when it sits at the block start. A range reports the styles covering
    /// all of it.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }
        if !self.selection.is_collapsed() {
            return self.content.covering_styles(&self.selection);
        }
        let Some(block) = self.content.block_for_key(self.selection.start_key()) else {
            return StyleSet::new();
        };
        match self.selection.start_offset() {
            0 => block.style_at(0),
            offset => block.style_at(offset - 1),
        }
    }

    /// Record `content` as the new current content.
    ///
    /// The previous content goes on the undo stack unless this edit coalesces
    /// with the one before it. Redo history and any style override are
    /// dropped.
    pub fn push(
        &self,
        content: ContentState,
        selection_after: SelectionState,
        change: ChangeType,
    ) -> Self {
        let mut next = self.clone();
        let coalesce = change.coalesces() && self.last_change == Some(change);
        if !coalesce {
            next.undo_stack.push(Snapshot {
                content: Arc::clone(&self.content),
                selection: self.selection.clone(),
            });
            next.trim_undo();
        }
        next.redo_stack.clear();
        next.content = Arc::new(content);
        next.selection = selection_after.with_focus(self.selection.has_focus);
        next.inline_style_override = None;
        next.last_change = Some(change);
        tracing::trace!(?change, coalesce, undo_depth = next.undo_stack.len(), "push");
        next
    }

    /// Replace the content without recording an undo step.
    pub fn set_content(&self, content: ContentState) -> Self {
        Self {
            content: Arc::new(content),
            ..self.clone()
        }
    }

    /// Replace the selection without touching content or history.
    ///
    /// Moving the caret ends the current undo coalescing run and drops a
    /// pending style override.
    pub fn accept_selection(&self, selection: SelectionState) -> Self {
        if selection == self.selection {
            return self.clone();
        }
        Self {
            selection,
            inline_style_override: None,
            last_change: None,
            ..self.clone()
        }
    }

    /// Like `accept_selection`, but marks the editor as focused so the
    /// surface re-applies the selection to the DOM.
    pub fn force_selection(&self, selection: SelectionState) -> Self {
        self.accept_selection(selection.with_focus(true))
    }

    pub fn set_inline_style_override(&self, style: StyleSet) -> Self {
        Self {
            inline_style_override: Some(style),
            ..self.clone()
        }
    }

    /// Step back one undo entry, or `None` when there is nothing to undo.
    pub fn undo(&self) -> Option<Self> {
        let mut next = self.clone();
        let snapshot = next.undo_stack.pop()?;
        next.redo_stack.push(Snapshot {
            content: Arc::clone(&self.content),
            selection: self.selection.clone(),
        });
        next.content = snapshot.content;
        next.selection = snapshot.selection.with_focus(self.selection.has_focus);
        next.inline_style_override = None;
        next.last_change = Some(ChangeType::Undo);
        Some(next)
    }

    /// Re-apply the last undone entry, or `None` when redo history is empty.
    pub fn redo(&self) -> Option<Self> {
        let mut next = self.clone();
        let snapshot = next.redo_stack.pop()?;
        next.undo_stack.push(Snapshot {
            content: Arc::clone(&self.content),
            selection: self.selection.clone(),
        });
        next.trim_undo();
        next.content = snapshot.content;
        next.selection = snapshot.selection.with_focus(self.selection.has_focus);
        next.inline_style_override = None;
        next.last_change = Some(ChangeType::Redo);
        Some(next)
    }

    fn trim_undo(&mut self) {
        if self.undo_stack.len() > self.max_undo_steps {
            let excess = self.undo_stack.len() - self.max_undo_steps;
            self.undo_stack.drain(..excess);
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create_empty()
    }
}
