//! Spreadsheet and CSV loading for the BI assistant.
//!
//! Reads the first worksheet of an Excel/ODS workbook (via [`calamine`]) or a
//! CSV file (via [`csv`]) and converts every row into a [`SalesRecord`].
//! Cells are coerced leniently: dates that cannot be parsed become `None`,
//! blank quantities become zero and non-numeric prices become `None`.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use assistant_core::error::{AssistantError, Result};
use assistant_core::models::{columns, Dataset, SalesRecord};
use assistant_core::time_utils::parse_datetime_str;

/// File extensions the loader accepts, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Whether `path` has an extension the loader can read.
pub fn is_supported(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Load the sales dataset from `path`.
///
/// Errors when the file is missing, has an unsupported extension, or cannot
/// be parsed at all. Individual malformed cells never fail the load.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(AssistantError::DataPathNotFound(path.to_path_buf()));
    }

    let dataset = match extension_of(path).as_deref() {
        Some("csv") => load_csv(path)?,
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => load_spreadsheet(path)?,
        _ => return Err(AssistantError::UnsupportedFormat(path.to_path_buf())),
    };

    info!(
        "Loaded {} rows ({} columns) from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

// ── Raw cells ─────────────────────────────────────────────────────────────────

/// Source-independent cell value used before column coercion.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl RawCell {
    fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    fn from_calamine(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::String(s) => RawCell::from_text(s),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::DateTime(_) => cell
                .as_datetime()
                .map(RawCell::DateTime)
                .unwrap_or(RawCell::Empty),
            Data::DateTimeIso(s) => parse_datetime_str(s)
                .map(RawCell::DateTime)
                .unwrap_or_else(|| RawCell::from_text(s)),
            Data::DurationIso(s) => RawCell::from_text(s),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

// ── Readers ───────────────────────────────────────────────────────────────────

fn load_spreadsheet(path: &Path) -> Result<Dataset> {
    let spreadsheet_err = |message: String| AssistantError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_err("workbook has no worksheets".to_string()))?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        debug!("First worksheet of {} is empty", path.display());
        return Ok(Dataset::empty());
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|c| match c {
            Data::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .collect();

    let raw_rows = rows.map(|row| row.iter().map(RawCell::from_calamine).collect());
    Ok(build_dataset(headers, raw_rows))
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let csv_err = |e: csv::Error| AssistantError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut raw_rows: Vec<Vec<RawCell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        raw_rows.push(record.iter().map(RawCell::from_text).collect());
    }

    Ok(build_dataset(headers, raw_rows))
}

// ── Row assembly ──────────────────────────────────────────────────────────────

/// Positions of the known columns within a header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    const KNOWN: [&'static str; 9] = [
        columns::ORDER_DATE,
        columns::ORDER_RELEASE_DATE,
        columns::DATE_SHIPPED,
        columns::ITEM_ID,
        columns::CUSTOMER_ID,
        columns::SHIP_CODE,
        columns::QTY_ORDERED,
        columns::QTY_RETURNED,
        columns::TOTAL_PRICE,
    ];

    fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        for name in Self::KNOWN {
            // First occurrence wins for duplicated headers.
            if let Some(idx) = headers.iter().position(|h| h == name) {
                positions.insert(name, idx);
            }
        }
        Self { positions }
    }

    fn cell<'r>(&self, row: &'r [RawCell], name: &str) -> &'r RawCell {
        const EMPTY: &RawCell = &RawCell::Empty;
        self.positions
            .get(name)
            .and_then(|&idx| row.get(idx))
            .unwrap_or(EMPTY)
    }
}

fn build_dataset<I>(headers: Vec<String>, rows: I) -> Dataset
where
    I: IntoIterator<Item = Vec<RawCell>>,
{
    let index = ColumnIndex::new(&headers);
    let mut unparsed_dates: HashMap<&'static str, usize> = HashMap::new();
    let mut records = Vec::new();

    for row in rows {
        if row.iter().all(RawCell::is_empty) {
            continue;
        }

        let mut date = |name: &'static str| {
            let cell = index.cell(&row, name);
            let parsed = to_datetime(cell);
            if parsed.is_none() && !cell.is_empty() {
                *unparsed_dates.entry(name).or_default() += 1;
            }
            parsed
        };
        let order_date = date(columns::ORDER_DATE);
        let order_release_date = date(columns::ORDER_RELEASE_DATE);
        let date_shipped = date(columns::DATE_SHIPPED);

        records.push(SalesRecord {
            order_date,
            order_release_date,
            date_shipped,
            item_id: to_identifier(index.cell(&row, columns::ITEM_ID)),
            customer_id: to_identifier(index.cell(&row, columns::CUSTOMER_ID)),
            ship_code: to_identifier(index.cell(&row, columns::SHIP_CODE)),
            qty_ordered: to_quantity(index.cell(&row, columns::QTY_ORDERED)),
            qty_returned: to_quantity(index.cell(&row, columns::QTY_RETURNED)),
            total_price: to_price(index.cell(&row, columns::TOTAL_PRICE)),
        });
    }

    for (column, count) in &unparsed_dates {
        warn!("{} value(s) in \"{}\" could not be parsed as dates", count, column);
    }

    Dataset::new(headers, records)
}

// ── Cell coercion ─────────────────────────────────────────────────────────────

/// Excel's day zero for serial date numbers (1900 date system).
fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn to_datetime(cell: &RawCell) -> Option<NaiveDateTime> {
    match cell {
        RawCell::DateTime(dt) => Some(*dt),
        RawCell::Text(s) => parse_datetime_str(s),
        // Serial numbers in a date column that was not formatted as a date.
        RawCell::Number(serial) if (1.0..2_958_466.0).contains(serial) => {
            let millis = (serial * 86_400_000.0).round() as i64;
            excel_epoch().map(|epoch| epoch + Duration::milliseconds(millis))
        }
        _ => None,
    }
}

fn to_identifier(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Text(s) => s.clone(),
        RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        RawCell::Number(n) => n.to_string(),
        RawCell::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
    }
}

fn to_quantity(cell: &RawCell) -> i64 {
    match cell {
        RawCell::Number(n) if n.is_finite() => n.round() as i64,
        RawCell::Text(s) => s
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| n.round() as i64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn to_price(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Number(n) if n.is_finite() => Some(*n),
        RawCell::Text(s) => s
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        _ => None,
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "Order Date,Order Release Date,Date Shipped,Item ID,Customer ID,Ship Code,Qty Ordered,Qty Returned,Total Price";

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", HEADER).unwrap();
        write!(f, "{}", body).unwrap();
        path
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_csv_full_rows() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(
            &tmp,
            "sales.csv",
            "2024-01-15,2024-01-16,2024-01-18,A1,C1,UPS,3,1,120.50\n\
             2024-02-01,,not-a-date,B2,C2,FEDEX,2,0,\"$1,000.00\"\n",
        );

        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns.len(), 9);
        assert!(ds.has_column(columns::SHIP_CODE));

        let first = &ds.records[0];
        assert_eq!(first.order_date.map(|d| d.date()), Some(ymd(2024, 1, 15)));
        assert_eq!(first.date_shipped.map(|d| d.date()), Some(ymd(2024, 1, 18)));
        assert_eq!(first.item_id, "A1");
        assert_eq!(first.customer_id, "C1");
        assert_eq!(first.ship_code, "UPS");
        assert_eq!(first.qty_ordered, 3);
        assert_eq!(first.qty_returned, 1);
        assert_eq!(first.total_price, Some(120.50));

        let second = &ds.records[1];
        assert!(second.order_release_date.is_none());
        assert!(second.date_shipped.is_none(), "malformed date coerces to None");
        assert_eq!(second.total_price, Some(1000.0));
    }

    #[test]
    fn test_load_csv_skips_blank_rows() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(
            &tmp,
            "sales.csv",
            "2024-01-15,,,A1,C1,UPS,1,0,10\n,,,,,,,,\n2024-01-16,,,A2,C1,UPS,1,0,5\n",
        );
        assert_eq!(load_dataset(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_load_csv_without_optional_column() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("partial.csv");
        std::fs::write(
            &path,
            "Customer ID,Item ID,Total Price\nC1,I1,10\nC2,I2,oops\n",
        )
        .unwrap();

        let ds = load_dataset(&path).unwrap();
        assert!(!ds.has_column(columns::SHIP_CODE));
        assert_eq!(ds.records[0].ship_code, "");
        assert_eq!(ds.records[0].qty_ordered, 0);
        assert_eq!(ds.records[1].total_price, None);
    }

    #[test]
    fn test_load_header_only_csv_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "empty.csv", "");
        let ds = load_dataset(&path).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.columns.len(), 9);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_dataset(&tmp.path().join("Sales_data (1).xlsx")).unwrap_err();
        assert!(matches!(err, AssistantError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sales.parquet");
        std::fs::write(&path, b"PAR1").unwrap();
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, AssistantError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_corrupt_workbook_is_spreadsheet_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, AssistantError::Spreadsheet { .. }));
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("Sales_data (1).xlsx")));
        assert!(is_supported(Path::new("SALES.CSV")));
        assert!(is_supported(Path::new("book.ods")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    // ── Cell coercion ─────────────────────────────────────────────────────────

    #[test]
    fn test_identifier_from_whole_float_has_no_decimal() {
        assert_eq!(to_identifier(&RawCell::Number(1001.0)), "1001");
        assert_eq!(to_identifier(&RawCell::Number(12.5)), "12.5");
        assert_eq!(to_identifier(&RawCell::Text("C-9".to_string())), "C-9");
        assert_eq!(to_identifier(&RawCell::Empty), "");
    }

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(to_quantity(&RawCell::Number(4.0)), 4);
        assert_eq!(to_quantity(&RawCell::Text("1,200".to_string())), 1200);
        assert_eq!(to_quantity(&RawCell::Text("n/a".to_string())), 0);
        assert_eq!(to_quantity(&RawCell::Empty), 0);
    }

    #[test]
    fn test_price_coercion() {
        assert_eq!(to_price(&RawCell::Number(9.99)), Some(9.99));
        assert_eq!(to_price(&RawCell::Text("$2,500.10".to_string())), Some(2500.10));
        assert_eq!(to_price(&RawCell::Text("free".to_string())), None);
        assert_eq!(to_price(&RawCell::Empty), None);
    }

    #[test]
    fn test_datetime_from_excel_serial() {
        // 45306 is 2024-01-15 in the 1900 date system.
        let dt = to_datetime(&RawCell::Number(45306.0)).unwrap();
        assert_eq!(dt.date(), ymd(2024, 1, 15));
        assert!(to_datetime(&RawCell::Number(-3.0)).is_none());
    }

    #[test]
    fn test_calamine_cells() {
        assert_eq!(RawCell::from_calamine(&Data::Empty), RawCell::Empty);
        assert_eq!(RawCell::from_calamine(&Data::Int(7)), RawCell::Number(7.0));
        assert_eq!(
            RawCell::from_calamine(&Data::String("  UPS ".to_string())),
            RawCell::Text("UPS".to_string())
        );
        assert_eq!(
            RawCell::from_calamine(&Data::DateTimeIso("2024-03-01T10:00:00".to_string())),
            RawCell::DateTime(ymd(2024, 3, 1).and_hms_opt(10, 0, 0).unwrap())
        );
    }
}
