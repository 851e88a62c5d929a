//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{SessionState, Store};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let connection_status = if store.app.connected {
            Span::styled("● Conectado", Style::default().fg(Color::Green))
        } else {
            Span::styled("○ Desconectado", Style::default().fg(Color::Red))
        };

        let context_status = if store.chat.context().is_some() {
            Span::styled(" contexto ✓ ", Style::default().fg(Color::Green))
        } else {
            Span::styled(" sem contexto ", Style::default().fg(Color::DarkGray))
        };

        let activity = if store.chat.state() == SessionState::Sending || store.app.loading {
            Span::styled(
                " Enviando… ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let help_hint = Span::styled(" ? ajuda ", Style::default().fg(Color::DarkGray));

        let left_content = vec![
            Span::styled(
                " 🎲 Stakemate ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            connection_status,
            Span::raw(" | "),
            context_status,
            activity,
        ];

        let status_line = Line::from(left_content);

        // Right-align the help hint.
        let left_len: usize = status_line.spans.iter().map(|s| s.content.len()).sum();
        let right_len = help_hint.content.len();
        let padding = area
            .width
            .saturating_sub(left_len as u16 + right_len as u16);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding as usize)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
