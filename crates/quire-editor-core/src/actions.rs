//! Editor commands, input types and keybindings.
//!
//! Platform-agnostic definitions. A `KeyCommand` is the named editing command
//! a key combination resolves to; `InputType` is the semantic intent of a
//! browser `beforeinput` event. Platform code converts native events into
//! these and hands them to the shell.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// A named editing command.
///
/// Names match the strings the key binding function produces, so custom
/// bindings can be expressed as plain strings and parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Backspace,
    BackspaceWord,
    BackspaceToStartOfLine,
    Delete,
    DeleteWord,
    DeleteToEndOfBlock,
    SplitBlock,
    Undo,
    Redo,
    /// A command name nothing in the editor understands.
    Unknown(SmolStr),
}

impl KeyCommand {
    const NAMED: [KeyCommand; 14] = [
        KeyCommand::Bold,
        KeyCommand::Italic,
        KeyCommand::Underline,
        KeyCommand::Code,
        KeyCommand::Strikethrough,
        KeyCommand::Backspace,
        KeyCommand::BackspaceWord,
        KeyCommand::BackspaceToStartOfLine,
        KeyCommand::Delete,
        KeyCommand::DeleteWord,
        KeyCommand::DeleteToEndOfBlock,
        KeyCommand::SplitBlock,
        KeyCommand::Undo,
        KeyCommand::Redo,
    ];

    pub fn name(&self) -> &str {
        match self {
            KeyCommand::Bold => "bold",
            KeyCommand::Italic => "italic",
            KeyCommand::Underline => "underline",
            KeyCommand::Code => "code",
            KeyCommand::Strikethrough => "strikethrough",
            KeyCommand::Backspace => "backspace",
            KeyCommand::BackspaceWord => "backspace-word",
            KeyCommand::BackspaceToStartOfLine => "backspace-to-start-of-line",
            KeyCommand::Delete => "delete",
            KeyCommand::DeleteWord => "delete-word",
            KeyCommand::DeleteToEndOfBlock => "delete-to-end-of-block",
            KeyCommand::SplitBlock => "split-block",
            KeyCommand::Undo => "undo",
            KeyCommand::Redo => "redo",
            KeyCommand::Unknown(name) => name.as_str(),
        }
    }

    /// Whether this command deletes text.
    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            Self::Backspace
                | Self::BackspaceWord
                | Self::BackspaceToStartOfLine
                | Self::Delete
                | Self::DeleteWord
                | Self::DeleteToEndOfBlock
        )
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyCommand {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::NAMED
            .iter()
            .find(|cmd| cmd.name() == s)
            .cloned()
            .unwrap_or_else(|| KeyCommand::Unknown(SmolStr::new(s))))
    }
}

/// Semantic input types from `beforeinput` events.
///
/// Based on the W3C Input Events specification, limited to the intents the
/// editor acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    /// Insert typed text.
    InsertText,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert from paste operation.
    InsertFromPaste,
    /// Insert replacement text (e.g., spell check correction).
    InsertReplacementText,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteHardLineBackward,
    DeleteSoftLineForward,
    DeleteHardLineForward,
    /// Delete by cut operation.
    DeleteByCut,
    HistoryUndo,
    HistoryRedo,
    FormatBold,
    FormatItalic,
    FormatUnderline,
    FormatStrikeThrough,
    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// The command this input resolves to, if it maps onto one.
    ///
    /// Text insertion and cut carry a payload or a range and are handled
    /// separately.
    pub fn command(&self) -> Option<KeyCommand> {
        Some(match self {
            Self::InsertParagraph | Self::InsertLineBreak => KeyCommand::SplitBlock,
            Self::DeleteContentBackward => KeyCommand::Backspace,
            Self::DeleteContentForward => KeyCommand::Delete,
            Self::DeleteWordBackward => KeyCommand::BackspaceWord,
            Self::DeleteWordForward => KeyCommand::DeleteWord,
            Self::DeleteSoftLineBackward | Self::DeleteHardLineBackward => {
                KeyCommand::BackspaceToStartOfLine
            }
            Self::DeleteSoftLineForward | Self::DeleteHardLineForward => {
                KeyCommand::DeleteToEndOfBlock
            }
            Self::HistoryUndo => KeyCommand::Undo,
            Self::HistoryRedo => KeyCommand::Redo,
            Self::FormatBold => KeyCommand::Bold,
            Self::FormatItalic => KeyCommand::Italic,
            Self::FormatUnderline => KeyCommand::Underline,
            Self::FormatStrikeThrough => KeyCommand::Strikethrough,
            _ => return None,
        })
    }

    /// Whether this input type inserts text carried in the event data.
    pub fn is_insertion(&self) -> bool {
        matches!(
            self,
            Self::InsertText | Self::InsertFromPaste | Self::InsertReplacementText
        )
    }
}

/// Key values for keyboard input.
///
/// Platform-specific code converts from native key events to this enum. Keys
/// the editor never binds collapse into `Unidentified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),
    Unidentified,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Alt,
    Control,
    Meta,
    Shift,
    CapsLock,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::Alt | Self::Control | Self::Meta | Self::Shift | Self::CapsLock
        )
    }

    /// Case-insensitive character match.
    fn is_char(&self, c: &str) -> bool {
        matches!(self, Self::Character(s) if s.eq_ignore_ascii_case(c))
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// The primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// Primary modifier plus Shift.
    pub fn primary_shift(is_mac: bool) -> Self {
        Self {
            shift: true,
            ..Self::primary(is_mac)
        }
    }

    fn has_primary(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }

    fn has_word_modifier(&self, is_mac: bool) -> bool {
        if is_mac { self.alt } else { self.ctrl }
    }
}

/// A key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(is_mac))
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary_shift(is_mac))
    }
}

/// Platform key binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyBindings {
    is_mac: bool,
}

impl KeyBindings {
    pub fn default_for_platform(is_mac: bool) -> Self {
        Self { is_mac }
    }

    /// Resolve a key combination to a command.
    ///
    /// Returns `None` for keys the editor leaves to the browser (plain
    /// typing, navigation, unbound shortcuts).
    pub fn lookup(&self, combo: &KeyCombo) -> Option<KeyCommand> {
        let mac = self.is_mac;
        let mods = combo.modifiers;
        let key = &combo.key;

        if mods.has_primary(mac) && !mods.alt {
            let command = if key.is_char("z") {
                if mods.shift {
                    KeyCommand::Redo
                } else {
                    KeyCommand::Undo
                }
            } else if key.is_char("y") && !mac && !mods.shift {
                KeyCommand::Redo
            } else if key.is_char("x") && mods.shift {
                KeyCommand::Strikethrough
            } else if mods.shift {
                return None;
            } else if key.is_char("b") {
                KeyCommand::Bold
            } else if key.is_char("i") {
                KeyCommand::Italic
            } else if key.is_char("u") {
                KeyCommand::Underline
            } else if key.is_char("j") {
                KeyCommand::Code
            } else {
                return self.lookup_editing(combo);
            };
            return Some(command);
        }

        self.lookup_editing(combo)
    }

    fn lookup_editing(&self, combo: &KeyCombo) -> Option<KeyCommand> {
        let mac = self.is_mac;
        let mods = combo.modifiers;
        match combo.key {
            Key::Backspace if mac && mods.meta => Some(KeyCommand::BackspaceToStartOfLine),
            Key::Backspace if mods.has_word_modifier(mac) => Some(KeyCommand::BackspaceWord),
            Key::Backspace => Some(KeyCommand::Backspace),
            Key::Delete if mac && mods.meta => Some(KeyCommand::DeleteToEndOfBlock),
            Key::Delete if mods.has_word_modifier(mac) => Some(KeyCommand::DeleteWord),
            Key::Delete => Some(KeyCommand::Delete),
            Key::Enter if !mods.has_primary(mac) && !mods.alt => Some(KeyCommand::SplitBlock),
            _ => None,
        }
    }
}

/// Resolve a key combination with the platform's default bindings.
pub fn default_key_binding(combo: &KeyCombo, is_mac: bool) -> Option<KeyCommand> {
    KeyBindings::default_for_platform(is_mac).lookup(combo)
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: &str) -> Key {
        Key::character(c)
    }

    #[test]
    fn test_formatting_bindings_use_platform_modifier() {
        let mac = KeyBindings::default_for_platform(true);
        let other = KeyBindings::default_for_platform(false);

        assert_eq!(
            mac.lookup(&KeyCombo::primary(ch("b"), true)),
            Some(KeyCommand::Bold)
        );
        assert_eq!(
            other.lookup(&KeyCombo::primary(ch("b"), false)),
            Some(KeyCommand::Bold)
        );
        // Ctrl+B on a Mac is not the primary modifier.
        assert_eq!(mac.lookup(&KeyCombo::primary(ch("b"), false)), None);

        assert_eq!(
            other.lookup(&KeyCombo::primary(ch("I"), false)),
            Some(KeyCommand::Italic)
        );
        assert_eq!(
            other.lookup(&KeyCombo::primary(ch("u"), false)),
            Some(KeyCommand::Underline)
        );
        assert_eq!(
            other.lookup(&KeyCombo::primary(ch("j"), false)),
            Some(KeyCommand::Code)
        );
        assert_eq!(
            other.lookup(&KeyCombo::primary_shift(ch("X"), false)),
            Some(KeyCommand::Strikethrough)
        );
    }

    #[test]
    fn test_history_bindings() {
        assert_eq!(
            default_key_binding(&KeyCombo::primary(ch("z"), true), true),
            Some(KeyCommand::Undo)
        );
        assert_eq!(
            default_key_binding(&KeyCombo::primary_shift(ch("Z"), true), true),
            Some(KeyCommand::Redo)
        );
        assert_eq!(
            default_key_binding(&KeyCombo::primary(ch("y"), false), false),
            Some(KeyCommand::Redo)
        );
        assert_eq!(default_key_binding(&KeyCombo::primary(ch("y"), true), true), None);
    }

    #[test]
    fn test_deletion_bindings() {
        let mac_word = KeyCombo::with_modifiers(Key::Backspace, Modifiers::ALT);
        assert_eq!(
            default_key_binding(&mac_word, true),
            Some(KeyCommand::BackspaceWord)
        );
        let mac_line = KeyCombo::with_modifiers(Key::Backspace, Modifiers::META);
        assert_eq!(
            default_key_binding(&mac_line, true),
            Some(KeyCommand::BackspaceToStartOfLine)
        );
        let ctrl_word = KeyCombo::with_modifiers(Key::Delete, Modifiers::CTRL);
        assert_eq!(
            default_key_binding(&ctrl_word, false),
            Some(KeyCommand::DeleteWord)
        );
        assert_eq!(
            default_key_binding(&KeyCombo::new(Key::Delete), false),
            Some(KeyCommand::Delete)
        );
        assert_eq!(
            default_key_binding(&KeyCombo::new(Key::Enter), false),
            Some(KeyCommand::SplitBlock)
        );
    }

    #[test]
    fn test_plain_typing_is_unbound() {
        assert_eq!(default_key_binding(&KeyCombo::new(ch("b")), false), None);
        assert_eq!(default_key_binding(&KeyCombo::new(Key::ArrowLeft), false), None);
        assert_eq!(
            default_key_binding(&KeyCombo::primary(ch("k"), false), false),
            None
        );
    }

    #[test]
    fn test_command_names_round_trip() {
        for cmd in KeyCommand::NAMED {
            let parsed: KeyCommand = cmd.name().parse().unwrap();
            assert_eq!(parsed, cmd);
        }
        let unknown: KeyCommand = "myeditor-save".parse().unwrap();
        assert_eq!(unknown, KeyCommand::Unknown("myeditor-save".into()));
        assert_eq!(unknown.to_string(), "myeditor-save");
    }

    #[test]
    fn test_input_type_commands() {
        assert_eq!(
            InputType::DeleteContentBackward.command(),
            Some(KeyCommand::Backspace)
        );
        assert_eq!(
            InputType::InsertParagraph.command(),
            Some(KeyCommand::SplitBlock)
        );
        assert_eq!(InputType::InsertText.command(), None);
        assert!(InputType::InsertFromPaste.is_insertion());
    }
}
