//! Key binding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the table to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveUp,
    MoveDown,
    First,
    Last,
    /// Flip the cursor row's selection.
    ToggleRow,
    /// Select all rows, or deselect them when all are selected.
    ToggleAll,
    ClearSelection,
    /// Pick up the cursor row.
    StartMove,
    /// Drop the picked-up row at the cursor.
    Drop,
    CancelMove,
    Quit,
}

/// Input context, which decides the bindings and the help hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyContext {
    #[default]
    Browsing,
    /// A row has been picked up.
    Moving,
}

/// Help bar hints for `context`.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Browsing => {
            "[j/k] move  [space] select  [a] all  [c] clear  [m] move row  [q] quit"
        }
        KeyContext::Moving => "[j/k] choose position  [enter] drop  [esc] cancel",
    }
}

/// Display name of a key, as reported to selection callbacks.
pub fn key_name(key: &KeyEvent) -> String {
    match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        code => format!("{:?}", code).to_lowercase(),
    }
}

/// Key binding configuration.
pub struct KeyBindings {
    /// Whether vim-style bindings are enabled.
    pub vim_mode: bool,
}

impl KeyBindings {
    /// Create new key bindings.
    pub fn new(vim_mode: bool) -> Self {
        Self { vim_mode }
    }

    /// Map a key press to an action in `context`.
    pub fn action_for(&self, key: &KeyEvent, context: KeyContext) -> Option<KeyAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(KeyAction::Quit);
        }

        let action = match key.code {
            KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Home => KeyAction::First,
            KeyCode::End => KeyAction::Last,
            KeyCode::Char('k') if self.vim_mode => KeyAction::MoveUp,
            KeyCode::Char('j') if self.vim_mode => KeyAction::MoveDown,
            KeyCode::Char('g') if self.vim_mode => KeyAction::First,
            KeyCode::Char('G') if self.vim_mode => KeyAction::Last,
            _ => return self.context_action(key.code, context),
        };
        Some(action)
    }

    fn context_action(&self, code: KeyCode, context: KeyContext) -> Option<KeyAction> {
        match (context, code) {
            (KeyContext::Browsing, KeyCode::Char(' ')) => Some(KeyAction::ToggleRow),
            (KeyContext::Browsing, KeyCode::Char('a')) => Some(KeyAction::ToggleAll),
            (KeyContext::Browsing, KeyCode::Char('c')) => Some(KeyAction::ClearSelection),
            (KeyContext::Browsing, KeyCode::Char('m')) => Some(KeyAction::StartMove),
            (KeyContext::Browsing, KeyCode::Char('q')) => Some(KeyAction::Quit),
            (KeyContext::Moving, KeyCode::Enter) => Some(KeyAction::Drop),
            (KeyContext::Moving, KeyCode::Esc) => Some(KeyAction::CancelMove),
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_in_both_contexts() {
        let keys = KeyBindings::default();
        for context in [KeyContext::Browsing, KeyContext::Moving] {
            assert_eq!(
                keys.action_for(&press(KeyCode::Char('j')), context),
                Some(KeyAction::MoveDown)
            );
            assert_eq!(keys.action_for(&press(KeyCode::Up), context), Some(KeyAction::MoveUp));
        }
    }

    #[test]
    fn test_vim_keys_disabled() {
        let keys = KeyBindings::new(false);
        assert_eq!(keys.action_for(&press(KeyCode::Char('j')), KeyContext::Browsing), None);
        assert_eq!(
            keys.action_for(&press(KeyCode::Down), KeyContext::Browsing),
            Some(KeyAction::MoveDown)
        );
    }

    #[test]
    fn test_selection_keys_only_while_browsing() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.action_for(&press(KeyCode::Char(' ')), KeyContext::Browsing),
            Some(KeyAction::ToggleRow)
        );
        assert_eq!(keys.action_for(&press(KeyCode::Char(' ')), KeyContext::Moving), None);
        assert_eq!(keys.action_for(&press(KeyCode::Char('q')), KeyContext::Moving), None);
    }

    #[test]
    fn test_move_keys() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.action_for(&press(KeyCode::Char('m')), KeyContext::Browsing),
            Some(KeyAction::StartMove)
        );
        assert_eq!(
            keys.action_for(&press(KeyCode::Enter), KeyContext::Moving),
            Some(KeyAction::Drop)
        );
        assert_eq!(
            keys.action_for(&press(KeyCode::Esc), KeyContext::Moving),
            Some(KeyAction::CancelMove)
        );
        assert_eq!(keys.action_for(&press(KeyCode::Enter), KeyContext::Browsing), None);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let keys = KeyBindings::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.action_for(&ctrl_c, KeyContext::Moving), Some(KeyAction::Quit));
        assert_eq!(keys.action_for(&ctrl_c, KeyContext::Browsing), Some(KeyAction::Quit));
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(&press(KeyCode::Char(' '))), "space");
        assert_eq!(key_name(&press(KeyCode::Char('a'))), "a");
        assert_eq!(key_name(&press(KeyCode::Enter)), "enter");
        assert_eq!(key_name(&press(KeyCode::Home)), "home");
    }

    #[test]
    fn test_hints_mention_keys() {
        assert!(get_context_hints(KeyContext::Browsing).contains("[space]"));
        assert!(get_context_hints(KeyContext::Moving).contains("[esc]"));
    }
}
