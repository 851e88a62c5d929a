//! Dashboard panel widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
};

use super::severity_color;
use crate::config::UiConfig;
use crate::state::{DashboardModel, ProfitSign, Store, WagerRow};
use rust_decimal::prelude::ToPrimitive;

/// Dashboard panel: stat cards and the wager history table.
pub struct DashboardPanel;

impl DashboardPanel {
    /// Render the dashboard.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, ui: &UiConfig) {
        if store.dashboard.loading {
            render_centered_note(frame, area, "Carregando dashboard…", Color::Yellow);
            return;
        }

        let Some(model) = &store.dashboard.model else {
            render_centered_note(
                frame,
                area,
                "Dashboard indisponível. Pressione r para tentar novamente.",
                Color::Red,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        render_cards(frame, chunks[0], model);
        render_history(frame, chunks[1], model, ui);
    }
}

fn render_centered_note(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let note = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::ITALIC),
    )))
    .block(
        Block::default()
            .title(" Dashboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(note, area);
}

fn render_cards(frame: &mut Frame, area: Rect, model: &DashboardModel) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    // Banca
    let bankroll = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("R$ {:.2}", model.phase.bankroll),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ])
    .block(card_block(" Banca ", Color::Green));
    frame.render_widget(bankroll, cards[0]);

    // Balanço
    let profit_color = match model.profit_sign() {
        ProfitSign::Positive => Color::Green,
        ProfitSign::Negative => Color::Red,
    };
    let balance = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("R$ {:.2}", model.stats.profit),
            Style::default()
                .fg(profit_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("ROI: {:.2}%", model.stats.roi),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(card_block(" Balanço ", profit_color));
    frame.render_widget(balance, cards[1]);

    // Win rate
    let win_rate = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{:.1}%", model.stats.win_rate),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} / {} apostas", model.stats.wins, model.stats.total_bets),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(card_block(" Win Rate ", Color::Blue));
    frame.render_widget(win_rate, cards[2]);

    // Fase
    let progress = model
        .phase
        .progress
        .to_f64()
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(card_block(
            &format!(" Fase {} · R$ {:.2} ", model.phase.phase, model.phase.target),
            Color::Yellow,
        ))
        .gauge_style(Style::default().fg(Color::Yellow))
        .ratio(progress / 100.0)
        .label(format!("{progress:.1}% completo"));
    frame.render_widget(gauge, cards[3]);
}

fn card_block(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn render_history(frame: &mut Frame, area: Rect, model: &DashboardModel, ui: &UiConfig) {
    let compact = area.width < ui.compact_width;
    let row_count = if compact {
        ui.compact_history_rows
    } else {
        ui.full_history_rows
    };
    let rows = model.visible_rows(row_count);

    let headers: &[&str] = if compact {
        &["Jogo", "Status"]
    } else {
        &["Data", "Jogo", "Mercado", "Odd", "Stake", "Status", "Resultado"]
    };

    let header_cells = headers.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let body = rows.iter().map(|row| {
        let status = status_cell(row);
        let cells = if compact {
            vec![Cell::from(row.matchup.clone()), status]
        } else {
            vec![
                Cell::from(row.date.clone()),
                Cell::from(row.matchup.clone()),
                Cell::from(row.market.clone()),
                Cell::from(row.odds.clone()),
                Cell::from(row.stake.clone()),
                status,
                result_cell(row),
            ]
        };
        Row::new(cells).height(1)
    });

    let widths: Vec<Constraint> = if compact {
        vec![Constraint::Percentage(70), Constraint::Percentage(30)]
    } else {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(11),
        ]
    };

    let title = format!(" Últimas {} Apostas ", rows.len());
    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(table, area);

    if model.records.is_empty() && area.height > 4 && area.width > 4 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Nenhuma aposta registrada ainda",
            Style::default().fg(Color::DarkGray),
        )));
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 3,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(empty, inner);
    }
}

fn status_cell(row: &WagerRow) -> Cell<'static> {
    Cell::from(format!("{} {}", row.badge.glyph, row.badge.label))
        .style(Style::default().fg(severity_color(row.badge.severity)))
}

fn result_cell(row: &WagerRow) -> Cell<'static> {
    match row.result {
        Some(result) => {
            let color = if result > rust_decimal::Decimal::ZERO {
                Color::Green
            } else {
                Color::Red
            };
            Cell::from(format!("R$ {result:.2}")).style(Style::default().fg(color))
        }
        None => {
            Cell::from(crate::state::MISSING_FIELD).style(Style::default().fg(Color::DarkGray))
        }
    }
}
