//! Opportunity list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::state::Store;
use rust_decimal::Decimal;

/// Opportunity list widget: singles table plus suggested multiples.
pub struct OpportunityList;

impl OpportunityList {
    /// Render the opportunity list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let multiples = &store.opportunities.board.multiples;

        let constraints = if multiples.is_empty() {
            vec![Constraint::Min(0)]
        } else {
            vec![
                Constraint::Min(0),
                Constraint::Length(multiples.len() as u16 + 2),
            ]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        render_singles(frame, chunks[0], store);
        if !multiples.is_empty() {
            render_multiples(frame, chunks[1], store);
        }
    }
}

fn render_singles(frame: &mut Frame, area: Rect, store: &Store) {
    let opportunities = &store.opportunities.board.opportunities;

    if opportunities.is_empty() && !store.opportunities.loading {
        let notice = Paragraph::new(vec![
            Line::from(Span::styled(
                "Nenhuma oportunidade com bom +EV hoje",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Não encontramos apostas com valor esperado positivo suficiente."),
            Line::from("Continue acompanhando!"),
        ])
        .block(
            Block::default()
                .title(" Oportunidades de Hoje ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(notice, area);
        return;
    }

    let header_cells = ["Jogo", "Mercado", "Odd", "EV", "Prob", "Stake", "Retorno"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = opportunities.iter().map(|opp| {
        let ev_style = if opp.ev > Decimal::ZERO {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };

        let probability_pct = opp.probability * Decimal::ONE_HUNDRED;

        let cells = vec![
            Cell::from(truncate_string(&opp.matchup, 36)),
            Cell::from(opp.market.clone()),
            Cell::from(format!("{:.2}", opp.odds)),
            Cell::from(format!("{:.1}%", opp.ev)).style(ev_style),
            Cell::from(format!("{probability_pct:.0}%")),
            Cell::from(format!("R$ {:.2}", opp.stake)),
            Cell::from(format!("R$ {:.2}", opp.potential_return)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(32),
            Constraint::Percentage(20),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(
                " Oportunidades de Hoje ({}) — Enter registra ",
                opportunities.len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(store.opportunities.selected_index);

    frame.render_stateful_widget(table, area, &mut state);

    if store.opportunities.loading {
        render_loading(frame, area);
    }
}

fn render_multiples(frame: &mut Frame, area: Rect, store: &Store) {
    let lines: Vec<Line> = store
        .opportunities
        .board
        .multiples
        .iter()
        .map(|multiple| {
            let description = multiple
                .description
                .clone()
                .unwrap_or_else(|| format!("{} pernas", multiple.legs.len()));
            Line::from(vec![
                Span::styled(
                    format!("@{:.2} ", multiple.combined_odds),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(description),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " Múltiplas ({}) ",
            store.opportunities.board.multiples.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Line::from(vec![Span::styled(
        "Carregando…",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    )]);

    let loading_area = Rect {
        x: area.x + area.width.saturating_sub(14),
        y: area.y + area.height.saturating_sub(1),
        width: 13.min(area.width),
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}
