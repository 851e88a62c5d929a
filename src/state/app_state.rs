//! Application-level state.

use super::Notification;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chat,
    Dashboard,
    Opportunities,
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app is loading data.
    pub loading: bool,
    /// Whether connected to the backend.
    pub connected: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Current chat input.
    pub input_buffer: String,
    /// Cursor position in input buffer (byte offset).
    pub cursor_position: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self {
            current_view: View::Chat,
            // Chat is the landing view; start ready to type.
            input_mode: InputMode::Insert,
            connected: false,
            ..Default::default()
        }
    }

    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Insert
    }

    /// Clear the input buffer.
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// Replace the input buffer contents.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input_buffer = text.into();
        self.cursor_position = self.input_buffer.len();
    }

    /// Add a character at the cursor.
    pub fn push_char(&mut self, c: char) {
        self.input_buffer.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    /// Remove the character before the cursor.
    pub fn pop_char(&mut self) {
        if self.cursor_position > 0 {
            let prev = self.input_buffer[..self.cursor_position]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor_position -= prev;
            self.input_buffer.remove(self.cursor_position);
        }
    }

    /// Move cursor left one character.
    pub fn cursor_left(&mut self) {
        let prev = self.input_buffer[..self.cursor_position]
            .chars()
            .next_back()
            .map(char::len_utf8)
            .unwrap_or(0);
        self.cursor_position -= prev;
    }

    /// Move cursor right one character.
    pub fn cursor_right(&mut self) {
        let next = self.input_buffer[self.cursor_position..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        self.cursor_position += next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_input_buffer_handles_multibyte() {
        let mut state = AppState::new();
        state.push_char('m');
        state.push_char('ú');
        state.push_char('l');
        assert_eq!(state.input_buffer, "múl");

        state.pop_char();
        state.pop_char();
        assert_eq!(state.input_buffer, "m");
        assert_eq!(state.cursor_position, 1);
    }

    #[test]
    fn test_cursor_moves_by_character() {
        let mut state = AppState::new();
        state.set_input("não");
        state.cursor_left();
        state.cursor_left();
        state.push_char('x');
        assert_eq!(state.input_buffer, "nxão");
    }
}
