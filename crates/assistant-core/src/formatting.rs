use crate::models::{Ranking, ValueKind};

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use assistant_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a scaled epsilon so exact binary midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount as a dollar string with two decimal places and
/// thousands separators.
///
/// # Examples
///
/// ```
/// use assistant_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56),  "$1,234.56");
/// assert_eq!(format_currency(0.0),      "$0.00");
/// assert_eq!(format_currency(-9.99),    "$-9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("$-{}", format_number(amount.abs(), 2))
    } else {
        format!("${}", format_number(amount, 2))
    }
}

/// Format a value according to its [`ValueKind`].
///
/// Quantities are whole numbers and print without decimals.
pub fn format_value(value: f64, kind: ValueKind) -> String {
    match kind {
        ValueKind::Currency => format_currency(value),
        ValueKind::Quantity => format_number(value, 0),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use assistant_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Render a ranking as a two-column markdown table.
///
/// ```text
/// | Item ID | Total Price |
/// |:--------|------------:|
/// | A-100   |     $120.00 |
/// ```
pub fn ranking_to_markdown(ranking: &Ranking) -> String {
    let cells: Vec<(String, String)> = ranking
        .rows
        .iter()
        .map(|r| (r.key.clone(), format_value(r.value, ranking.value_kind)))
        .collect();

    let key_width = cells
        .iter()
        .map(|(k, _)| k.chars().count())
        .chain(std::iter::once(ranking.key_column.chars().count()))
        .max()
        .unwrap_or(0);
    let value_width = cells
        .iter()
        .map(|(_, v)| v.chars().count())
        .chain(std::iter::once(ranking.value_column.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format!(
        "| {:<kw$} | {:>vw$} |",
        ranking.key_column,
        ranking.value_column,
        kw = key_width,
        vw = value_width
    ));
    lines.push(format!(
        "|:{}|{}:|",
        "-".repeat(key_width + 1),
        "-".repeat(value_width + 1)
    ));
    for (key, value) in &cells {
        lines.push(format!(
            "| {:<kw$} | {:>vw$} |",
            key,
            value,
            kw = key_width,
            vw = value_width
        ));
    }
    lines.join("\n")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankedRow;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── format_currency / format_value ───────────────────────────────────────

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_234.56), "$1,234.56");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-9.99), "$-9.99");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_format_value_by_kind() {
        assert_eq!(format_value(1500.0, ValueKind::Currency), "$1,500.00");
        assert_eq!(format_value(1500.0, ValueKind::Quantity), "1,500");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage() {
        assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
        assert!((percentage(1.0, 3.0, 2) - 33.33).abs() < 1e-2);
    }

    // ── ranking_to_markdown ──────────────────────────────────────────────────

    #[test]
    fn test_ranking_to_markdown_layout() {
        let ranking = Ranking {
            key_column: "Item ID".to_string(),
            value_column: "Total Price".to_string(),
            value_kind: ValueKind::Currency,
            rows: vec![
                RankedRow {
                    key: "A-100".to_string(),
                    value: 1200.0,
                },
                RankedRow {
                    key: "B".to_string(),
                    value: 5.5,
                },
            ],
        };
        let md = ranking_to_markdown(&ranking);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Item ID | Total Price |");
        assert_eq!(lines[1], "|:--------|------------:|");
        assert_eq!(lines[2], "| A-100   |   $1,200.00 |");
        assert_eq!(lines[3], "| B       |       $5.50 |");
    }

    #[test]
    fn test_ranking_to_markdown_empty_has_header_only() {
        let ranking = Ranking {
            key_column: "Customer ID".to_string(),
            value_column: "Qty Returned".to_string(),
            value_kind: ValueKind::Quantity,
            rows: vec![],
        };
        assert_eq!(ranking_to_markdown(&ranking).lines().count(), 2);
    }

    #[test]
    fn test_group_thousands_via_format_number() {
        assert_eq!(format_number(5.0, 0), "5");
        assert_eq!(format_number(1234.0, 0), "1,234");
    }
}
