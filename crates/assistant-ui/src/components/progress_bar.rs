use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a bar.
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding labels).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// Number of filled cells for `value` out of `max` in a bar `width` wide.
pub fn filled_cells(value: f64, max: f64, width: u16) -> u16 {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let ratio = (value / max).min(1.0);
    (ratio * width as f64).round() as u16
}

// ── ValueBar ─────────────────────────────────────────────────────────────────

/// One labelled horizontal bar scaled against a maximum.
///
/// Renders as `label  ████░░░░ text`, with the label padded to
/// `label_width` so a column of bars lines up.
pub struct ValueBar<'a> {
    pub label: String,
    pub label_width: usize,
    pub value: f64,
    pub max: f64,
    /// Text shown after the bar (formatted value or percentage).
    pub text: String,
    /// Position in the series; picks the fill colour.
    pub index: usize,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> ValueBar<'a> {
    pub fn new(label: &str, value: f64, max: f64, text: String, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            label_width: label.chars().count(),
            value,
            max,
            text,
            index: 0,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let filled = filled_cells(self.value, self.max, self.config.width);
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(
                format!("{:<w$}  ", self.label, w = self.label_width),
                self.theme.label,
            ),
            Span::styled(filled_str, self.theme.series_style(self.index)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", self.text), self.theme.value),
        ])
    }
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// A proportional multi-coloured bar, one segment per slice of a whole.
///
/// Short `label: pct%` legends follow the bar.
pub struct ShareBar<'a> {
    /// Ordered `(label, percentage)` pairs summing to at most 100.
    pub shares: Vec<(String, f64)>,
    pub theme: &'a Theme,
    pub width: u16,
}

impl<'a> ShareBar<'a> {
    pub fn new(shares: Vec<(String, f64)>, theme: &'a Theme) -> Self {
        Self {
            shares,
            theme,
            width: 40,
        }
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let mut spans: Vec<Span<'a>> = Vec::new();

        for (i, (_, pct)) in self.shares.iter().enumerate() {
            let chars = ((*pct / 100.0) * self.width as f64).round() as usize;
            if chars > 0 {
                spans.push(Span::styled("█".repeat(chars), self.theme.series_style(i)));
            }
        }

        spans.push(Span::raw(" "));

        for (i, (label, pct)) in self.shares.iter().enumerate() {
            if *pct > 0.0 {
                spans.push(Span::styled(
                    format!("{}: {:.0}% ", label, pct),
                    self.theme.series_style(i),
                ));
            }
        }

        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
