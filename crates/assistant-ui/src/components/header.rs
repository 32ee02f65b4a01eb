use crate::themes::Theme;
use assistant_core::formatting::format_number;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Chat screen header, four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. `[ data file | N rows | timezone ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded dataset, or a placeholder.
    pub data_file: &'a str,
    pub rows: usize,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(data_file: &'a str, rows: usize, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            data_file,
            rows,
            timezone,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let rows = format!("{} rows", format_number(self.rows as f64, 0));

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_accent),
                Span::styled(" BI ASSISTANT ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.data_file, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(rows, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
