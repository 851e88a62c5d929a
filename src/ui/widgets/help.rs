//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;

/// Help panel showing keybindings.
pub struct HelpPanel;

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn binding(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(keys, Style::default().fg(Color::Cyan)),
        Span::raw(action),
    ])
}

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            section("Views"),
            Line::from(""),
            binding("  1      ", "Chat"),
            binding("  2      ", "Dashboard"),
            binding("  3      ", "Oportunidades"),
            Line::from(""),
            section("Chat"),
            Line::from(""),
            binding("  i      ", "Digitar mensagem"),
            binding("  Enter  ", "Enviar"),
            binding("  Esc    ", "Sair do modo de digitação"),
            binding("  F1-F4  ", "Perguntas rápidas (sessão nova)"),
            Line::from(""),
            section("Oportunidades"),
            Line::from(""),
            binding("  j/↓ k/↑", "Navegar"),
            binding("  Enter  ", "Registrar aposta selecionada"),
            Line::from(""),
            section("Geral"),
            Line::from(""),
            binding("  r      ", "Atualizar dados"),
            binding("  ?      ", "Mostrar/ocultar ajuda"),
            binding("  q      ", "Sair"),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Ajuda ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
