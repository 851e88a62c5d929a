//! Key press matching against configurable binding strings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A processed key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

impl InputEvent {
    /// Get the character if this is a plain character input.
    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Check if this matches a key binding string (e.g., "Ctrl+q", "Enter").
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected_mods = KeyModifiers::NONE;
        let mut expected_code = None;

        for part in binding.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" => expected_mods |= KeyModifiers::CONTROL,
                "alt" => expected_mods |= KeyModifiers::ALT,
                "shift" => expected_mods |= KeyModifiers::SHIFT,
                name => expected_code = binding_code(name),
            }
        }

        let Some(code) = expected_code else {
            return false;
        };

        if self.modifiers.contains(KeyModifiers::CONTROL) != expected_mods.contains(KeyModifiers::CONTROL)
            || self.modifiers.contains(KeyModifiers::ALT) != expected_mods.contains(KeyModifiers::ALT)
        {
            return false;
        }

        match (self.code, code) {
            // Characters compare case-insensitively; terminals disagree on
            // whether Shift accompanies shifted symbols.
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => {
                a == b
                    && self.modifiers.contains(KeyModifiers::SHIFT)
                        == expected_mods.contains(KeyModifiers::SHIFT)
            }
        }
    }
}

fn binding_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        f if f.starts_with('f') && (2..=3).contains(&f.len()) => KeyCode::F(f[1..].parse().ok()?),
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: KeyCode, modifiers: KeyModifiers) -> InputEvent {
        InputEvent { code, modifiers }
    }

    #[test]
    fn test_matches_plain_char() {
        let input = event(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(input.matches("q"));
        assert!(!input.matches("r"));
    }

    #[test]
    fn test_matches_modifier_combo() {
        let input = event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(input.matches("Ctrl+c"));
        assert!(!input.matches("c"));
    }

    #[test]
    fn test_matches_shifted_symbol() {
        // '?' arrives with or without SHIFT depending on the terminal.
        let input = event(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert!(input.matches("?"));
    }

    #[test]
    fn test_matches_named_key() {
        assert!(event(KeyCode::Enter, KeyModifiers::NONE).matches("Enter"));
        assert!(event(KeyCode::Esc, KeyModifiers::NONE).matches("Esc"));
        assert!(event(KeyCode::F(2), KeyModifiers::NONE).matches("f2"));
    }
}
