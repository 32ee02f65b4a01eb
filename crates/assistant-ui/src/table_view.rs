//! Ranked-answer table for the attachment pane.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with a rank column, the key
//! and the formatted value, plus a placeholder for when nothing has been
//! asked yet.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use assistant_core::formatting::format_value;
use assistant_core::models::Ranking;

use crate::themes::Theme;

/// Render `ranking` as a table titled `title` into `area`.
pub fn render_ranking(frame: &mut Frame, area: Rect, title: &str, ranking: &Ranking, theme: &Theme) {
    let header = Row::new(vec![
        Cell::from("#").style(theme.table_header),
        Cell::from(ranking.key_column.clone()).style(theme.table_header),
        Cell::from(Line::from(ranking.value_column.clone()).alignment(Alignment::Right))
            .style(theme.table_header),
    ])
    .height(1);

    let rows: Vec<Row> = ranking
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(row.key.clone()),
                Cell::from(
                    Line::from(format_value(row.value, ranking.value_kind))
                        .alignment(Alignment::Right),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown before the first table or chart answer.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Nothing to show yet", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Tables and charts from your answers appear here.",
            theme.dim,
        )),
        Line::from(Span::styled(
            "Try \"top selling items\" or \"monthly sales trend\".",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Results "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
