//! Scrollable chat transcript.
//!
//! Each turn is a speaker line followed by its markdown body. Only the inline
//! markup the assistant emits is styled: `**bold**` and `` `code` `` spans.
//! Markdown table rows are already column-aligned and are shown as-is.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use assistant_core::models::{Message, Role, Transcript};

use crate::themes::Theme;

/// Render `transcript` into `area`.
///
/// `scroll_back` is the number of rows scrolled up from the newest line.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    transcript: &Transcript,
    scroll_back: u16,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(" Chat ");
    let inner = block.inner(area);

    let lines = if transcript.is_empty() {
        welcome_lines(theme)
    } else {
        transcript_lines(transcript, theme)
    };

    let total = wrapped_height(&lines, inner.width);
    let top = max_scroll(total, inner.height).saturating_sub(scroll_back);

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((top, 0)),
        area,
    );
}

/// All transcript turns as styled lines.
pub fn transcript_lines<'a>(transcript: &'a Transcript, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for message in transcript.messages() {
        lines.extend(message_lines(message, theme));
        lines.push(Line::from(""));
    }
    lines
}

/// Speaker line plus body for one turn.
pub fn message_lines<'a>(message: &'a Message, theme: &Theme) -> Vec<Line<'a>> {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("{speaker}:"),
        theme.role_style(message.role),
    ))];
    for raw in message.content.lines() {
        if raw.trim_start().starts_with('|') {
            lines.push(Line::from(Span::styled(raw, theme.table_row)));
        } else {
            lines.push(markdown_line(raw, theme));
        }
    }
    lines
}

/// Style `**bold**` and `` `code` `` spans in one line of text.
///
/// Unterminated markers are shown literally.
pub fn markdown_line<'a>(text: &'a str, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let bold = rest.find("**");
        let code = rest.find('`');
        let (start, marker) = match (bold, code) {
            (Some(b), Some(c)) if c < b => (c, "`"),
            (Some(b), _) => (b, "**"),
            (None, Some(c)) => (c, "`"),
            (None, None) => break,
        };

        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };

        if start > 0 {
            spans.push(Span::styled(&rest[..start], theme.text));
        }
        let style = if marker == "`" { theme.code } else { theme.bold };
        spans.push(Span::styled(&after[..end], style));
        rest = &after[end + marker.len()..];
    }

    if !rest.is_empty() {
        spans.push(Span::styled(rest, theme.text));
    }
    Line::from(spans)
}

/// Rows `lines` occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Largest useful scroll offset: the one that shows the newest line last.
pub fn max_scroll(total: u16, visible: u16) -> u16 {
    total.saturating_sub(visible)
}

fn welcome_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Ask a question about your sales data.",
            theme.text,
        )),
        Line::from(Span::styled(
            "For example: \"total sales\", \"top 10 selling items\", \"monthly sales trend\".",
            theme.dim,
        )),
        Line::from(Span::styled("Type \"help\" for more.", theme.dim)),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
