//! Event handler for processing input events.

use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, InputMode, Store, View};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;

use super::InputEvent;

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Store snapshot for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Clone)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    chat_is_fresh: bool,
    has_selected_opportunity: bool,
}

impl EventHandler {
    /// Create a new event handler with the given key bindings.
    pub fn new(keybindings: KeyBindings) -> Self {
        Self {
            keybindings,
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            chat_is_fresh: store.chat.is_fresh(),
            has_selected_opportunity: store.opportunities.selected_opportunity().is_some(),
        });
    }

    /// Get the next action from user input.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            match event {
                CrosstermEvent::Key(key) => {
                    if let Some(action) = self.handle_key(key) {
                        return Ok(Some(action));
                    }
                }
                CrosstermEvent::Resize(_, _) => {
                    // Terminal will automatically redraw
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let snapshot = self.store_snapshot.as_ref()?;

        match snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, snapshot),
            InputMode::Insert => self.handle_insert_mode(key),
        }
    }

    fn handle_normal_mode(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);

        // Global shortcuts
        if input.matches(&self.keybindings.quit) {
            return Some(Action::Quit);
        }

        if input.matches(&self.keybindings.help) {
            return Some(Action::ToggleHelp);
        }

        if input.matches(&self.keybindings.refresh) {
            return Some(Action::RefreshAll);
        }

        if input.matches(&self.keybindings.back) {
            return Some(Action::DismissNotification);
        }

        // View switching
        if input.matches(&self.keybindings.chat) {
            return Some(Action::SetView(View::Chat));
        }
        if input.matches(&self.keybindings.dashboard) {
            return Some(Action::SetView(View::Dashboard));
        }
        if input.matches(&self.keybindings.opportunities) {
            return Some(Action::SetView(View::Opportunities));
        }

        // Navigation
        if input.matches(&self.keybindings.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&self.keybindings.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if key.code == KeyCode::Home {
            return Some(Action::GoToTop);
        }
        if key.code == KeyCode::End {
            return Some(Action::GoToBottom);
        }

        // View-specific actions
        match snapshot.current_view {
            View::Chat => self.handle_chat_view(key, snapshot),
            View::Opportunities => self.handle_opportunities_view(key, snapshot),
            View::Dashboard => None,
        }
    }

    fn handle_chat_view(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);

        if input.matches(&self.keybindings.insert) {
            return Some(Action::SetInputMode(InputMode::Insert));
        }

        // Quick questions are offered only on a fresh session.
        if let KeyCode::F(n @ 1..=4) = key.code
            && snapshot.chat_is_fresh
        {
            return Some(Action::QuickQuestion(n as usize - 1));
        }

        None
    }

    fn handle_opportunities_view(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);

        if input.matches(&self.keybindings.register) && snapshot.has_selected_opportunity {
            return Some(Action::RegisterWager);
        }

        None
    }

    fn handle_insert_mode(&self, key: KeyEvent) -> Option<Action> {
        let input = InputEvent::from(key);

        match key.code {
            KeyCode::Esc => Some(Action::SetInputMode(InputMode::Normal)),
            KeyCode::Enter => Some(Action::SubmitMessage),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            _ => input.char().map(Action::InputChar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn handler_with(store: &Store) -> EventHandler {
        let mut handler = EventHandler::new(KeyBindings::default());
        handler.update_store_snapshot(store);
        handler
    }

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_mode_chars_feed_buffer() {
        let store = store();
        // Chat view starts in insert mode.
        let handler = handler_with(&store);
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('o'))),
            Some(Action::InputChar('o'))
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Enter)),
            Some(Action::SubmitMessage)
        ));
    }

    #[test]
    fn test_normal_mode_quit() {
        let mut store = store();
        store.reduce(Action::SetInputMode(InputMode::Normal));
        let handler = handler_with(&store);
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_register_requires_selection() {
        let mut store = store();
        store.reduce(Action::SetView(View::Opportunities));
        let handler = handler_with(&store);
        // Empty board: Enter does nothing.
        assert!(handler.handle_key(press(KeyCode::Enter)).is_none());
    }
}
