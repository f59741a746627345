//! Top-level coordinator between toolbar, surface and document state.
//!
//! `EditorShell` owns exactly one `EditorState` at a time and replaces it
//! wholesale on every edit. It also owns the export buffer shown by the HTML
//! preview.

use std::sync::Arc;

use crate::actions::{InputType, KeyBindings, KeyCombo, KeyCommand, KeydownResult};
use crate::commands;
use crate::config::{BLOCK_TYPES, EditorConfig, INLINE_STYLES};
use crate::content::Entity;
use crate::editor_state::EditorState;
use crate::error::EditorError;
use crate::html::serialize;
use crate::style::{BlockType, InlineStyle};
use crate::toolbar::{self, ControlState};
use crate::types::SelectionState;

/// Last exported HTML and whether the preview shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportBuffer {
    pub html: String,
    pub visible: bool,
}

/// Owns the document state and routes every user action to it.
#[derive(Debug, Clone)]
pub struct EditorShell {
    state: EditorState,
    export: ExportBuffer,
}

impl EditorShell {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_state(EditorState::create_empty().with_max_undo_steps(config.max_undo_steps))
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            export: ExportBuffer::default(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn export(&self) -> &ExportBuffer {
        &self.export
    }

    fn adopt(&mut self, state: EditorState) {
        self.state = state;
    }

    /// Offer a key command to the rich-text handler.
    ///
    /// Returns `true` and adopts the new state when the command applied;
    /// `false` leaves default handling to the caller.
    pub fn on_key_command(&mut self, command: &KeyCommand) -> bool {
        match commands::handle_key_command(&self.state, command) {
            Some(next) => {
                tracing::debug!(%command, "key command handled");
                self.adopt(next);
                true
            }
            None => false,
        }
    }

    /// Run the built-in editing behavior for a command.
    pub fn default_command(&mut self, command: &KeyCommand) -> bool {
        match commands::handle_default_command(&self.state, command) {
            Some(next) => {
                tracing::trace!(%command, "default command");
                self.adopt(next);
                true
            }
            None => false,
        }
    }

    /// Rich-text handling first, default editing second.
    pub fn run_command(&mut self, command: &KeyCommand) -> bool {
        self.on_key_command(command) || self.default_command(command)
    }

    pub fn toggle_block_type(&mut self, key: &str) {
        let next = commands::toggle_block_type(&self.state, &BlockType::from_key(key));
        self.adopt(next);
    }

    pub fn toggle_inline_type(&mut self, key: &str) {
        let next = commands::toggle_inline_style(&self.state, &InlineStyle::new(key));
        self.adopt(next);
    }

    /// Create a mutable LINK entity for `url` and attach it to the selection.
    ///
    /// On a collapsed selection the entity is created but covers no text, and
    /// no undo step is recorded.
    pub fn set_link(&mut self, url: &str) {
        let content = self
            .state
            .current_content()
            .create_entity(Entity::link(url));
        let key = content.last_created_entity_key();
        let selection = self.state.selection().clone();
        // Registering the entity is not an undo step of its own.
        let registered = self.state.set_content(content);
        if selection.is_collapsed() {
            tracing::debug!(url, entity = ?key, "link entity created at caret");
            self.adopt(registered);
            return;
        }
        let with_entity = commands::toggle_link(&registered, &selection, key);
        tracing::debug!(url, entity = ?key, "set link");
        self.adopt(with_entity);
    }

    /// Remove links from a non-empty selection. A caret is left alone.
    pub fn unlink(&mut self) {
        let selection = self.state.selection();
        if selection.is_collapsed() {
            return;
        }
        let next = commands::toggle_link(&self.state, &selection.clone(), None);
        self.adopt(next);
    }

    /// Serialize the current content and open the preview.
    pub fn export_html(&mut self) -> &str {
        self.export.html = serialize(self.state.current_content());
        self.export.visible = true;
        tracing::debug!(bytes = self.export.html.len(), "exported html");
        &self.export.html
    }

    pub fn dismiss_preview(&mut self) {
        self.export.visible = false;
    }

    /// Adopt a selection read from the surface.
    pub fn select(&mut self, selection: SelectionState) -> Result<(), EditorError> {
        self.state.current_content().validate(&selection)?;
        let next = self.state.accept_selection(selection);
        self.adopt(next);
        Ok(())
    }

    pub fn insert_text(&mut self, text: &str) {
        let next = commands::insert_characters(&self.state, text);
        self.adopt(next);
    }

    pub fn paste_text(&mut self, text: &str) {
        let next = commands::insert_fragment(&self.state, text);
        self.adopt(next);
    }

    /// Handle a keydown: bound combinations run their command.
    ///
    /// A bound command is reported handled even when it changed nothing, so
    /// the browser never edits the surface behind the model's back.
    pub fn handle_keydown(&mut self, bindings: &KeyBindings, combo: &KeyCombo) -> KeydownResult {
        if let Some(command) = bindings.lookup(combo) {
            self.run_command(&command);
            return KeydownResult::Handled;
        }
        if combo.key.is_navigation() || combo.key.is_modifier() {
            return KeydownResult::PassThrough;
        }
        KeydownResult::NotHandled
    }

    /// Handle a `beforeinput` event. Returns whether it was consumed.
    ///
    /// `target` is the range the event says it will replace. Text insertion
    /// and replacement (spell-check, autocorrect) act on it instead of the
    /// current selection; an invalid target is ignored.
    pub fn handle_input(
        &mut self,
        input: &InputType,
        data: Option<&str>,
        target: Option<SelectionState>,
    ) -> bool {
        match input {
            InputType::InsertText | InputType::InsertReplacementText => {
                if let Some(target) = target {
                    if let Err(e) = self.select(target.with_focus(true)) {
                        tracing::warn!("ignoring input target range: {e}");
                    }
                }
                self.insert_text(data.unwrap_or_default());
                true
            }
            InputType::InsertFromPaste => {
                self.paste_text(data.unwrap_or_default());
                true
            }
            InputType::DeleteByCut => {
                !self.state.selection().is_collapsed() && self.default_command(&KeyCommand::Delete)
            }
            other => match other.command() {
                Some(command) => {
                    self.run_command(&command);
                    true
                }
                None => {
                    tracing::trace!(?other, "unhandled input type");
                    false
                }
            },
        }
    }

    pub fn block_controls(&self) -> Vec<ControlState> {
        toolbar::block_controls(&self.state, BLOCK_TYPES)
    }

    pub fn inline_controls(&self) -> Vec<ControlState> {
        toolbar::inline_controls(&self.state, INLINE_STYLES)
    }

    pub fn link_active(&self) -> bool {
        toolbar::link_active(&self.state)
    }

    /// Whether the shell still holds the content snapshot of `other`.
    pub fn same_content(&self, other: &EditorState) -> bool {
        Arc::ptr_eq(self.state.content_arc(), other.content_arc())
    }
}

impl Default for EditorShell {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::actions::{Key, Modifiers};
    use crate::content::ContentState;
    use crate::types::{EntityKey, Position};

    fn shell_with(text: &str, selection: SelectionState) -> EditorShell {
        let state = EditorState::create_with_content(ContentState::from_text(text));
        let mut shell = EditorShell::with_state(state);
        shell.select(selection.with_focus(true)).unwrap();
        shell
    }

    #[test]
    fn test_bold_world_example() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 6, 11));
        shell.toggle_inline_type("BOLD");
        assert_snapshot!(shell.export_html(), @r#"<p>hello <span style="font-weight:bold;">world</span></p>"#);
        assert!(shell.export().visible);
    }

    #[test]
    fn test_inline_toggle_is_idempotent() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 6, 11));
        let before = serialize(shell.state().current_content());
        shell.toggle_inline_type("ITALIC");
        assert_ne!(serialize(shell.state().current_content()), before);
        shell.toggle_inline_type("ITALIC");
        assert_eq!(serialize(shell.state().current_content()), before);
    }

    #[test]
    fn test_list_toggle_example() {
        let mut shell = shell_with("item one", SelectionState::within_block("b0", 0, 0));
        shell.toggle_block_type("unordered-list-item");
        assert_snapshot!(shell.export_html(), @r#"<ul class="public-DraftStyleDefault-ul"><li>item one</li></ul>"#);
        shell.toggle_block_type("unordered-list-item");
        assert_snapshot!(shell.export_html(), @"<p>item one</p>");
    }

    #[test]
    fn test_set_link_wraps_selection() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 6, 11));
        shell.set_link("http://x");
        assert_snapshot!(shell.export_html(), @r#"<p>hello <a href="http://x">world</a></p>"#);

        // One undo removes the link and the entity-only step leaves no trace.
        assert!(shell.default_command(&KeyCommand::Undo));
        assert_snapshot!(shell.export_html(), @"<p>hello world</p>");
        assert!(!shell.state().can_undo());
    }

    #[test]
    fn test_set_link_on_caret_records_no_undo_step() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 3, 3));
        shell.set_link("http://x");
        assert!(!shell.state().can_undo());
        assert!(shell.state().current_content().entity(EntityKey(1)).is_some());
        assert_snapshot!(shell.export_html(), @"<p>hello world</p>");
    }

    #[test]
    fn test_replacement_text_uses_target_range() {
        let mut shell = shell_with("helo world", SelectionState::within_block("b0", 4, 4));
        let target = SelectionState::within_block("b0", 0, 4);
        assert!(shell.handle_input(&InputType::InsertReplacementText, Some("hello"), Some(target)));
        assert_eq!(shell.state().current_content().plain_text(), "hello world");
        assert_eq!(shell.state().selection().focus, Position::new("b0", 5));
    }

    #[test]
    fn test_invalid_target_range_falls_back_to_selection() {
        let mut shell = shell_with("ab", SelectionState::within_block("b0", 2, 2));
        let target = SelectionState::within_block("gone", 0, 1);
        assert!(shell.handle_input(&InputType::InsertText, Some("c"), Some(target)));
        assert_eq!(shell.state().current_content().plain_text(), "abc");
    }

    #[test]
    fn test_unlink_on_caret_is_noop() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 6, 11));
        shell.set_link("http://x");
        shell
            .select(SelectionState::within_block("b0", 8, 8).with_focus(true))
            .unwrap();
        let before = shell.state().clone();
        shell.unlink();
        assert!(shell.same_content(&before));
        assert_eq!(shell.state().selection(), before.selection());
    }

    #[test]
    fn test_unlink_on_range_removes_link() {
        let mut shell = shell_with("hello world", SelectionState::within_block("b0", 6, 11));
        shell.set_link("http://x");
        shell.unlink();
        assert_snapshot!(shell.export_html(), @"<p>hello world</p>");
    }

    #[test]
    fn test_key_command_reports_handled() {
        let mut shell = shell_with("hello", SelectionState::within_block("b0", 0, 5));
        assert!(shell.on_key_command(&KeyCommand::Bold));
        assert!(!shell.on_key_command(&"split-block".parse().unwrap()));
        assert!(!shell.on_key_command(&"no-such-command".parse().unwrap()));
        assert!(shell.inline_controls()[0].active);
    }

    #[test]
    fn test_preview_dismissal() {
        let mut shell = EditorShell::default();
        assert!(!shell.export().visible);
        assert_eq!(shell.export_html(), "<p></p>");
        shell.dismiss_preview();
        assert!(!shell.export().visible);
        assert_eq!(shell.export().html, "<p></p>");
    }

    #[test]
    fn test_select_rejects_unknown_block() {
        let mut shell = EditorShell::default();
        let err = shell
            .select(SelectionState::within_block("nope", 0, 0))
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownBlock(_)));
    }

    #[test]
    fn test_keydown_and_input_routing() {
        let bindings = KeyBindings::default_for_platform(false);
        let mut shell = shell_with("", SelectionState::within_block("b0", 0, 0));

        assert!(shell.handle_input(&InputType::InsertText, Some("abc"), None));
        assert_eq!(shell.state().current_content().plain_text(), "abc");

        let backspace = KeyCombo::new(Key::Backspace);
        assert_eq!(shell.handle_keydown(&bindings, &backspace), KeydownResult::Handled);
        assert_eq!(shell.state().current_content().plain_text(), "ab");

        let typing = KeyCombo::new(Key::character("x"));
        assert_eq!(shell.handle_keydown(&bindings, &typing), KeydownResult::NotHandled);

        let arrow = KeyCombo::new(Key::ArrowLeft);
        assert_eq!(shell.handle_keydown(&bindings, &arrow), KeydownResult::PassThrough);

        let undo = KeyCombo::with_modifiers(Key::character("z"), Modifiers::CTRL);
        assert_eq!(shell.handle_keydown(&bindings, &undo), KeydownResult::Handled);
        assert_eq!(shell.state().current_content().plain_text(), "abc");

        assert!(shell.handle_input(&InputType::InsertParagraph, None, None));
        assert_eq!(shell.state().current_content().blocks().len(), 2);
    }

    #[test]
    fn test_block_controls_single_active() {
        let mut shell = shell_with("x", SelectionState::within_block("b0", 0, 0));
        shell.toggle_block_type("code-block");
        let active: Vec<_> = shell
            .block_controls()
            .into_iter()
            .filter(|c| c.active)
            .map(|c| c.descriptor.name)
            .collect();
        assert_eq!(active, vec!["code"]);
    }
}
