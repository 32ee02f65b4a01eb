//! Chart rendering for the attachment pane and for plain-text output.
//!
//! Line charts use [`ratatui::widgets::Chart`], bar charts use
//! [`BarChart`], and pie charts are drawn as a proportional share bar with
//! one labelled row per slice.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use assistant_core::formatting::{format_currency, format_number};
use assistant_core::models::{columns, ChartKind, ChartSpec};

use crate::components::progress_bar::{ShareBar, ValueBar};
use crate::themes::Theme;

/// Render `spec` into `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {} ", spec.title));

    if spec.points.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled("No data to plot", theme.warning)).block(block),
            area,
        );
        return;
    }

    match spec.kind {
        ChartKind::Line => render_line(frame, area, spec, block, theme),
        ChartKind::Bar => render_bars(frame, area, spec, block, theme),
        ChartKind::Pie => render_pie(frame, area, spec, block, theme),
    }
}

/// Format a point value the way the chart's y-axis measures it.
pub fn format_point(spec: &ChartSpec, value: f64) -> String {
    match spec.kind {
        ChartKind::Pie => format_number(value, 0),
        ChartKind::Line => format_currency(value),
        ChartKind::Bar if spec.y_label == columns::TOTAL_PRICE => format_currency(value),
        ChartKind::Bar => format_number(value, 0),
    }
}

/// Plain-text rendering: the title followed by one bar per point.
///
/// Pie charts show percentage shares instead of raw values.
pub fn chart_to_text(spec: &ChartSpec, width: u16) -> String {
    let theme = Theme::classic();
    let mut out = vec![spec.title.clone(), "-".repeat(spec.title.chars().count())];
    if spec.points.is_empty() {
        out.push("No data to plot".to_string());
        return out.join("\n");
    }
    for line in value_bars(spec, width, &theme) {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        out.push(text.trim_end().to_string());
    }
    out.join("\n")
}

// ── Chart kinds ───────────────────────────────────────────────────────────────

fn render_line(frame: &mut Frame, area: Rect, spec: &ChartSpec, block: Block, theme: &Theme) {
    let data: Vec<(f64, f64)> = spec
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let x_max = (spec.points.len().saturating_sub(1) as f64).max(1.0);
    let y_max = if spec.max_value() > 0.0 {
        spec.max_value() * 1.1
    } else {
        1.0
    };

    let first = spec.points.first().map(|p| p.label.clone()).unwrap_or_default();
    let middle = spec.points[spec.points.len() / 2].label.clone();
    let last = spec.points.last().map(|p| p.label.clone()).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name(spec.y_label.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.series_style(0))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(spec.x_label.clone())
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(vec![first, middle, last]),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_label.clone())
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    format_currency(0.0),
                    format_currency(y_max / 2.0),
                    format_currency(y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_bars(frame: &mut Frame, area: Rect, spec: &ChartSpec, block: Block, theme: &Theme) {
    let bars: Vec<Bar> = spec
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::default()
                .value(p.value.max(0.0).round() as u64)
                .label(Line::from(p.label.clone()))
                .text_value(format_point(spec, p.value))
                .style(theme.series_style(i))
        })
        .collect();

    let n = spec.points.len() as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / n.max(1)).saturating_sub(1).clamp(1, 14);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(theme.label)
        .value_style(theme.value);

    frame.render_widget(chart, area);
}

fn render_pie(frame: &mut Frame, area: Rect, spec: &ChartSpec, block: Block, theme: &Theme) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [bar_area, rows_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

    let width = inner.width.saturating_sub(2).min(40);
    let mut share = ShareBar::new(spec.shares(), theme);
    share.width = width;
    frame.render_widget(Paragraph::new(share.to_line()), bar_area);

    let rows = value_bars(spec, width.saturating_sub(20).max(10), theme);
    frame.render_widget(Paragraph::new(Text::from(rows)), rows_area);
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One [`ValueBar`] line per point; pie slices are scaled against 100 %.
fn value_bars<'a>(spec: &ChartSpec, width: u16, theme: &'a Theme) -> Vec<Line<'a>> {
    let label_width = spec
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    if spec.kind == ChartKind::Pie {
        return spec
            .shares()
            .iter()
            .enumerate()
            .map(|(i, (label, pct))| {
                ValueBar::new(label, *pct, 100.0, format!("{pct:.1}%"), theme)
                    .label_width(label_width)
                    .index(i)
                    .width(width)
                    .to_line()
            })
            .collect();
    }

    let max = spec.max_value();
    spec.points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            ValueBar::new(&p.label, p.value, max, format_point(spec, p.value), theme)
                .label_width(label_width)
                .index(i)
                .width(width)
                .to_line()
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::models::ChartPoint;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn spec(kind: ChartKind, y_label: &str, points: &[(&str, f64)]) -> ChartSpec {
        ChartSpec {
            title: "Test Chart".to_string(),
            kind,
            x_label: "Label".to_string(),
            y_label: y_label.to_string(),
            points: points
                .iter()
                .map(|(l, v)| ChartPoint {
                    label: l.to_string(),
                    value: *v,
                })
                .collect(),
        }
    }

    fn draw(spec: &ChartSpec, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_chart(frame, area, spec, &theme);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_line_chart_does_not_panic() {
        let s = spec(
            ChartKind::Line,
            "Total Sales",
            &[("2024-01", 100.0), ("2024-02", 250.0), ("2024-03", 80.0)],
        );
        let screen = draw(&s, 80, 20);
        assert!(screen.contains("Test Chart"));
    }

    #[test]
    fn test_render_single_point_line_does_not_panic() {
        let s = spec(ChartKind::Line, "Total Sales", &[("2024", 10.0)]);
        draw(&s, 40, 10);
    }

    #[test]
    fn test_render_bar_chart_does_not_panic() {
        let s = spec(
            ChartKind::Bar,
            "Total Price",
            &[("C1", 300.0), ("C2", 120.5), ("C3", 0.0)],
        );
        draw(&s, 60, 15);
        draw(&s, 5, 4);
    }

    #[test]
    fn test_render_pie_chart_lists_slices() {
        let s = spec(
            ChartKind::Pie,
            "Orders",
            &[("UPS", 3.0), ("FEDEX", 1.0)],
        );
        let screen = draw(&s, 70, 12);
        assert!(screen.contains("UPS"));
        assert!(screen.contains("75.0%"));
    }

    #[test]
    fn test_render_empty_chart_shows_placeholder() {
        let s = spec(ChartKind::Bar, "Total Price", &[]);
        assert!(draw(&s, 40, 6).contains("No data to plot"));
    }

    #[test]
    fn test_format_point_by_kind() {
        let bar_price = spec(ChartKind::Bar, "Total Price", &[]);
        let bar_qty = spec(ChartKind::Bar, "Qty Returned", &[]);
        let line = spec(ChartKind::Line, "Total Sales", &[]);
        assert_eq!(format_point(&bar_price, 1234.5), "$1,234.50");
        assert_eq!(format_point(&bar_qty, 12.0), "12");
        assert_eq!(format_point(&line, 5.0), "$5.00");
    }

    #[test]
    fn test_chart_to_text() {
        let s = spec(ChartKind::Bar, "Total Price", &[("A", 100.0), ("BB", 50.0)]);
        let text = chart_to_text(&s, 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Test Chart");
        assert_eq!(lines[1], "----------");
        assert_eq!(lines[2], "A   ██████████ $100.00");
        assert_eq!(lines[3], "BB  █████░░░░░ $50.00");
    }

    #[test]
    fn test_chart_to_text_pie_shows_percentages() {
        let s = spec(ChartKind::Pie, "Orders", &[("UPS", 1.0), ("DHL", 1.0)]);
        let text = chart_to_text(&s, 10);
        assert!(text.contains("UPS  █████░░░░░ 50.0%"), "{text}");
    }
}
