//! Chat panel widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::{QUICK_QUESTIONS, Role, Store};

/// Chat panel widget: message log, typing indicator, and input line.
pub struct ChatPanel;

impl ChatPanel {
    /// Render the chat panel.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let show_quick_questions = store.chat.is_fresh();

        let constraints = if show_quick_questions {
            vec![
                Constraint::Length(QUICK_QUESTIONS.len() as u16 + 2),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
        } else {
            vec![Constraint::Min(0), Constraint::Length(3)]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = 0;
        if show_quick_questions {
            render_quick_questions(frame, chunks[next]);
            next += 1;
        }

        render_messages(frame, chunks[next], store);
        render_input(frame, chunks[next + 1], store);
    }
}

fn render_quick_questions(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = QUICK_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, question)| {
            Line::from(vec![
                Span::styled(format!("F{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(*question),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Perguntas rápidas ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_messages(frame: &mut Frame, area: Rect, store: &Store) {
    let block = Block::default()
        .title(" Chat com Agente ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    let mut lines: Vec<Line> = Vec::new();
    for message in store.chat.messages() {
        let (prefix, style) = match message.role {
            Role::User => (
                "Você: ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Role::Assistant => (
                "Agente: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let mut content_lines = message.content.lines();
        let first = content_lines.next().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::raw(first.to_string()),
        ]));
        for continuation in content_lines {
            lines.push(Line::from(continuation.to_string()));
        }
        lines.push(Line::default());
    }

    if store.chat.is_sending() {
        lines.push(Line::from(Span::styled(
            "Agente está digitando…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the tail of the conversation visible.
    let total = estimate_wrapped_height(&lines, inner.width);
    let scroll = total.saturating_sub(u32::from(inner.height)).min(u32::from(u16::MAX)) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, store: &Store) {
    let editing = store.app.is_editing();
    let border = if editing { Color::Green } else { Color::DarkGray };
    let title = if editing {
        " Mensagem (Enter envia, Esc sai) "
    } else {
        " Mensagem (i para digitar) "
    };

    let paragraph = Paragraph::new(store.app.input_buffer.as_str()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);

    if editing {
        let cursor_x = store.app.input_buffer[..store.app.cursor_position]
            .chars()
            .count() as u16;
        frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1));
    }
}

/// Rough wrapped-height estimate: long lines wrap at the panel width.
fn estimate_wrapped_height(lines: &[Line], width: u16) -> u32 {
    if width == 0 {
        return 0;
    }
    lines
        .iter()
        .map(|line| {
            let len = line.width() as u32;
            len.div_ceil(u32::from(width)).max(1)
        })
        .sum()
}
