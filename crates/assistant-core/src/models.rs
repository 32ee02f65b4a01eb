use chrono::NaiveDateTime;
use std::fmt;

/// Header names of the sales spreadsheet columns.
pub mod columns {
    pub const ORDER_DATE: &str = "Order Date";
    pub const ORDER_RELEASE_DATE: &str = "Order Release Date";
    pub const DATE_SHIPPED: &str = "Date Shipped";
    pub const ITEM_ID: &str = "Item ID";
    pub const CUSTOMER_ID: &str = "Customer ID";
    pub const SHIP_CODE: &str = "Ship Code";
    pub const QTY_ORDERED: &str = "Qty Ordered";
    pub const QTY_RETURNED: &str = "Qty Returned";
    pub const TOTAL_PRICE: &str = "Total Price";

    /// Columns coerced to date/time values at load time.
    pub const DATE_COLUMNS: [&str; 3] = [ORDER_DATE, ORDER_RELEASE_DATE, DATE_SHIPPED];
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// One order line read from the sales spreadsheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesRecord {
    /// When the order was placed; `None` when the cell was blank or unparseable.
    pub order_date: Option<NaiveDateTime>,
    /// When the order was released to the warehouse.
    pub order_release_date: Option<NaiveDateTime>,
    /// When the order left the warehouse.
    pub date_shipped: Option<NaiveDateTime>,
    pub item_id: String,
    pub customer_id: String,
    /// Shipping method code; empty when the cell was blank.
    pub ship_code: String,
    pub qty_ordered: i64,
    pub qty_returned: i64,
    /// Line total in currency units; `None` when blank or non-numeric.
    pub total_price: Option<f64>,
}

/// The in-memory snapshot of the sales spreadsheet.
///
/// Loaded once per process and shared read-only; there is no write path.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header names present in the source file, in file order.
    pub columns: Vec<String>,
    /// Rows in file order.
    pub records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    /// A dataset with no columns and no rows, substituted when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source file carried a column with this header.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Whether every named column is present.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has_column(n))
    }
}

// ── Aggregate results ─────────────────────────────────────────────────────────

/// How the numeric value of a ranking row should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Currency,
    Quantity,
}

/// One `(key, value)` pair of a ranked aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub key: String,
    pub value: f64,
}

/// An ordered top/bottom-N result of a group-by aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Header of the grouping column, e.g. `"Item ID"`.
    pub key_column: String,
    /// Header of the reduced column, e.g. `"Total Price"`.
    pub value_column: String,
    pub value_kind: ValueKind,
    pub rows: Vec<RankedRow>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Group keys in rank order.
    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.key.as_str()).collect()
    }
}

/// Shape of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Time-ordered trend.
    Line,
    /// Ranked comparison.
    Bar,
    /// Categorical share.
    Pie,
}

/// One labelled data point of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Renderer-independent description of a single chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// Sum of all point values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Largest point value, or `0.0` for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Each point's share of the total as `(label, percentage)` pairs.
    ///
    /// Returns all-zero shares when the total is not positive.
    pub fn shares(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.points
            .iter()
            .map(|p| {
                let pct = if total > 0.0 {
                    p.value / total * 100.0
                } else {
                    0.0
                };
                (p.label.clone(), pct)
            })
            .collect()
    }
}

// ── Optional-column results ───────────────────────────────────────────────────

/// Data the source file did not provide, so a question cannot be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    /// No `Ship Code` column.
    ShippingMethod,
    /// No `Customer ID` or no `Total Price` column.
    CustomerRevenue,
}

impl MissingData {
    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            MissingData::ShippingMethod => "Shipping method data not available.",
            MissingData::CustomerRevenue => "Customer or revenue data not available.",
        }
    }
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of an aggregation that depends on an optional column.
///
/// Distinguishes "the file has no such data" from a computed (possibly empty)
/// answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Available(T),
    Unavailable(MissingData),
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Availability<U> {
        match self {
            Availability::Available(v) => Availability::Available(f(v)),
            Availability::Unavailable(m) => Availability::Unavailable(m),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable(_) => None,
        }
    }
}

// ── Transcript ────────────────────────────────────────────────────────────────

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Structured payload shown next to an assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Table(Ranking),
    Chart(ChartSpec),
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    /// Markdown text of the turn.
    pub content: String,
    pub attachment: Option<Attachment>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachment: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Append-only record of the chat for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent attachment of any turn, used by the attachment pane.
    pub fn latest_attachment(&self) -> Option<&Attachment> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.attachment.as_ref())
    }
}
