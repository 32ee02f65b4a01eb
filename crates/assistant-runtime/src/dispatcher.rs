//! Maps a free-text question to one handler.
//!
//! Routing is a walk over [`INTENT_TABLE`]: an ordered list of
//! `(intent, phrases, needs_chart_cue)` rows. The first row with a phrase
//! contained in the normalised question wins. Chart rows sit at the top and
//! only match when the question also asks for a chart, graph, plot or trend.
//! Anything else gets [`NOT_UNDERSTOOD`].

use std::sync::LazyLock;

use regex::Regex;

/// The single reply for a question no row matches.
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand your question. \
     Try asking about sales trends, top customers, or order details.";

/// Words that select the chart rows of the table.
pub const CHART_CUES: [&str; 4] = ["chart", "graph", "plot", "trend"];

/// Largest count accepted from a `top N` phrase.
pub const MAX_TOP_N: usize = 100;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(top|bottom|least)\s+(\d{1,3})\b").expect("regex is valid")
});

// ── Intents ───────────────────────────────────────────────────────────────────

/// Every question the assistant knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MonthlySalesTrendChart,
    YearlySalesTrendChart,
    CustomerReturnsChart,
    TopCustomersChart,
    BottomCustomersChart,
    ShippingMethodChart,
    TopSellingItemsChart,
    TopCustomersBySpendingChart,

    TopSellingItems,
    CustomerWithMostReturns,
    TotalSales,
    AverageOrderValue,
    MostFrequentCustomer,
    LeastSellingItems,
    TopCustomersBySpending,
    ProductsWithHighestQuantitySold,
    BusiestSalesDay,
    MostReturnedItem,
    MostOrdered,
    OrdersShippedThisWeek,
    TopCustomersByRevenue,
    MostUsedShippingMethod,
    BottomCustomersByRevenue,

    Help,
}

impl Intent {
    pub fn is_chart(&self) -> bool {
        matches!(
            self,
            Intent::MonthlySalesTrendChart
                | Intent::YearlySalesTrendChart
                | Intent::CustomerReturnsChart
                | Intent::TopCustomersChart
                | Intent::BottomCustomersChart
                | Intent::ShippingMethodChart
                | Intent::TopSellingItemsChart
                | Intent::TopCustomersBySpendingChart
        )
    }
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub phrases: &'static [&'static str],
    pub needs_chart_cue: bool,
}

const fn chart(intent: Intent, phrases: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        phrases,
        needs_chart_cue: true,
    }
}

const fn answer(intent: Intent, phrases: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        phrases,
        needs_chart_cue: false,
    }
}

const SHIPPING_PHRASES: &[&str] = &[
    "shipping method used the most",
    "shipping method was used the most",
];

/// Routing table, in match order.
pub const INTENT_TABLE: &[IntentRule] = &[
    chart(Intent::MonthlySalesTrendChart, &["monthly sales trend"]),
    chart(Intent::YearlySalesTrendChart, &["yearly sales trend"]),
    chart(Intent::CustomerReturnsChart, &["customer with most returns"]),
    chart(
        Intent::TopCustomersChart,
        &["top customers contributing to revenue"],
    ),
    chart(
        Intent::BottomCustomersChart,
        &[
            "bottom customers contributing to revenue",
            "bottom customers contributing the least to revenue",
            "bottom customers contributing least to revenue",
        ],
    ),
    chart(Intent::ShippingMethodChart, SHIPPING_PHRASES),
    chart(Intent::TopSellingItemsChart, &["top selling items"]),
    chart(
        Intent::TopCustomersBySpendingChart,
        &["top customers by spending"],
    ),
    answer(Intent::TopSellingItems, &["top selling items"]),
    answer(Intent::CustomerWithMostReturns, &["customer with most returns"]),
    answer(Intent::TotalSales, &["total sales"]),
    answer(Intent::AverageOrderValue, &["average order value"]),
    answer(Intent::MostFrequentCustomer, &["most frequent customer"]),
    answer(Intent::LeastSellingItems, &["least selling items"]),
    answer(Intent::TopCustomersBySpending, &["top customers by spending"]),
    answer(
        Intent::ProductsWithHighestQuantitySold,
        &["products with highest quantity sold"],
    ),
    answer(Intent::BusiestSalesDay, &["busiest sales day"]),
    answer(Intent::MostReturnedItem, &["most returned item"]),
    answer(Intent::MostOrdered, &["most ordered"]),
    answer(Intent::OrdersShippedThisWeek, &["orders shipped this week"]),
    answer(
        Intent::TopCustomersByRevenue,
        &["top customers contributing to revenue"],
    ),
    answer(Intent::MostUsedShippingMethod, SHIPPING_PHRASES),
    answer(
        Intent::BottomCustomersByRevenue,
        &[
            "bottom customers by revenue",
            "bottom customers contributing least to revenue",
            "bottom customers contributing the least to revenue",
        ],
    ),
    answer(Intent::Help, &["help", "what can i ask", "what can you do"]),
];

// ── Routing ───────────────────────────────────────────────────────────────────

/// Outcome of routing one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Matched {
        intent: Intent,
        /// Count from a `top N` / `bottom N` / `least N` phrase, if any.
        top_n: Option<usize>,
    },
    NotUnderstood,
}

/// Route `query` through [`INTENT_TABLE`].
pub fn route(query: &str) -> Route {
    let normalized = normalize(query);
    let (top_n, stripped) = extract_count(&normalized);
    let has_cue = has_chart_cue(&stripped);

    let matched = INTENT_TABLE.iter().find(|rule| {
        (!rule.needs_chart_cue || has_cue) && rule.phrases.iter().any(|p| stripped.contains(p))
    });

    match matched {
        Some(rule) => {
            tracing::debug!(query = %stripped, intent = ?rule.intent, ?top_n, "routed");
            Route::Matched {
                intent: rule.intent,
                top_n,
            }
        }
        None => {
            tracing::debug!(query = %stripped, "no intent matched");
            Route::NotUnderstood
        }
    }
}

/// Example questions for the help reply, one per row.
pub fn example_questions() -> Vec<String> {
    INTENT_TABLE
        .iter()
        .filter(|rule| rule.intent != Intent::Help)
        .map(|rule| {
            let phrase = rule.phrases[0];
            if rule.needs_chart_cue && !has_chart_cue(phrase) {
                format!("show a chart of {phrase}")
            } else {
                phrase.to_string()
            }
        })
        .collect()
}

/// Lowercase, trim and collapse runs of whitespace.
fn normalize(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pull a count out of `top N` style phrases and drop the digits.
fn extract_count(query: &str) -> (Option<usize>, String) {
    let top_n = COUNT_RE
        .captures(query)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| (1..=MAX_TOP_N).contains(n));
    let stripped = COUNT_RE.replace_all(query, "$1");
    (top_n, normalize(&stripped))
}

fn has_chart_cue(query: &str) -> bool {
    CHART_CUES.iter().any(|cue| query.contains(cue))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
