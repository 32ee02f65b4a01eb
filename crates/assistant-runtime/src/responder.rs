//! Executes a routed intent against the dataset and renders the reply.

use chrono::NaiveDate;

use assistant_core::error::Result;
use assistant_core::formatting::{format_currency, format_number, ranking_to_markdown};
use assistant_core::models::{
    Attachment, Availability, ChartSpec, Dataset, Message, MissingData, Ranking,
};
use assistant_data::aggregations::{self as agg, DEFAULT_TOP_N};
use assistant_data::charts;

use crate::dispatcher::{Intent, Route, NOT_UNDERSTOOD};

/// What the assistant says back, before it is rendered to markdown.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Scalar { label: &'static str, value: String },
    Table { title: String, ranking: Ranking },
    Chart(ChartSpec),
    Unavailable(MissingData),
    Help(Vec<String>),
    NotUnderstood,
}

impl Reply {
    /// Render as an assistant chat message.
    pub fn to_message(&self) -> Message {
        match self {
            Reply::Scalar { label, value } => {
                Message::assistant(format!("**{label}:** `{value}`"))
            }
            Reply::Table { title, ranking } => Message::assistant(format!(
                "**{title}**\n\n{}",
                ranking_to_markdown(ranking)
            ))
            .with_attachment(Attachment::Table(ranking.clone())),
            Reply::Chart(spec) => Message::assistant(format!("Here is the {}:", spec.title))
                .with_attachment(Attachment::Chart(spec.clone())),
            Reply::Unavailable(missing) => Message::assistant(missing.message()),
            Reply::Help(examples) => {
                let mut text = String::from("You can ask me things like:");
                for q in examples {
                    text.push_str("\n- ");
                    text.push_str(q);
                }
                Message::assistant(text)
            }
            Reply::NotUnderstood => Message::assistant(NOT_UNDERSTOOD),
        }
    }
}

/// Runs intents with a configured default count for ranked answers.
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    default_top_n: usize,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Responder {
    pub fn new(default_top_n: usize) -> Self {
        Self {
            default_top_n: default_top_n.max(1),
        }
    }

    /// Answer `route` over `ds`. `today` anchors "this week".
    pub fn respond(&self, route: &Route, ds: &Dataset, today: NaiveDate) -> Result<Reply> {
        let (intent, n) = match *route {
            Route::Matched { intent, top_n } => (intent, top_n.unwrap_or(self.default_top_n)),
            Route::NotUnderstood => return Ok(Reply::NotUnderstood),
        };

        let reply = match intent {
            // ── Charts ────────────────────────────────────────────────────
            Intent::MonthlySalesTrendChart => Reply::Chart(charts::monthly_sales_trend(ds)?),
            Intent::YearlySalesTrendChart => Reply::Chart(charts::yearly_sales_trend(ds)?),
            Intent::CustomerReturnsChart => Reply::Chart(charts::customer_return_chart(ds, n)?),
            Intent::TopCustomersChart => Reply::Chart(charts::top_customers_chart(ds, n)?),
            Intent::BottomCustomersChart => {
                available(charts::bottom_customers_chart(ds, n), Reply::Chart)
            }
            Intent::ShippingMethodChart => {
                available(charts::shipping_method_pie_chart(ds), Reply::Chart)
            }
            Intent::TopSellingItemsChart => {
                Reply::Chart(charts::top_selling_products_chart(ds, n)?)
            }
            Intent::TopCustomersBySpendingChart => {
                Reply::Chart(charts::top_customers_by_spending_chart(ds, n)?)
            }

            // ── Scalars ───────────────────────────────────────────────────
            Intent::TotalSales => scalar("Total Sales", format_currency(agg::total_sales(ds)?)),
            Intent::AverageOrderValue => scalar(
                "Average Order Value",
                format_currency(agg::average_order_value(ds)?),
            ),
            Intent::MostFrequentCustomer => {
                scalar("Most Frequent Customer", agg::most_frequent_customer(ds)?)
            }
            Intent::CustomerWithMostReturns => scalar(
                "Customer with Most Returns",
                agg::customer_with_most_returns(ds)?,
            ),
            Intent::BusiestSalesDay => scalar(
                "Busiest Sales Day",
                agg::busiest_sales_day(ds)?.format("%Y-%m-%d").to_string(),
            ),
            Intent::MostReturnedItem => scalar("Most Returned Item", agg::most_returned_item(ds)?),
            Intent::MostOrdered => scalar("Most Ordered Item", agg::most_ordered(ds)?),
            Intent::OrdersShippedThisWeek => scalar(
                "Orders Shipped This Week",
                format_number(agg::orders_shipped_this_week(ds, today)? as f64, 0),
            ),
            Intent::MostUsedShippingMethod => {
                available(agg::most_used_shipping_method(ds)?, |m| {
                    scalar("Most Used Shipping Method", m)
                })
            }

            // ── Rankings ──────────────────────────────────────────────────
            Intent::TopSellingItems => table(
                format!("Top {n} Selling Items"),
                agg::top_selling_items(ds, n)?,
            ),
            Intent::LeastSellingItems => table(
                format!("Least {n} Selling Items"),
                agg::least_selling_items(ds, n)?,
            ),
            Intent::TopCustomersBySpending => table(
                format!("Top {n} Customers by Spending"),
                agg::top_customers_by_spending(ds, n)?,
            ),
            Intent::ProductsWithHighestQuantitySold => table(
                format!("Top {n} Products by Quantity Sold"),
                agg::products_with_highest_quantity_sold(ds, n)?,
            ),
            Intent::TopCustomersByRevenue => table(
                format!("Top {n} Revenue-Contributing Customers"),
                agg::top_customers_by_revenue(ds, n)?,
            ),
            Intent::BottomCustomersByRevenue => {
                available(agg::bottom_customers_by_revenue(ds, n), |ranking| {
                    table(format!("Bottom {n} Revenue-Contributing Customers"), ranking)
                })
            }

            Intent::Help => Reply::Help(crate::dispatcher::example_questions()),
        };
        Ok(reply)
    }
}

fn scalar(label: &'static str, value: String) -> Reply {
    Reply::Scalar { label, value }
}

fn table(title: String, ranking: Ranking) -> Reply {
    Reply::Table { title, ranking }
}

fn available<T>(value: Availability<T>, f: impl FnOnce(T) -> Reply) -> Reply {
    match value {
        Availability::Available(v) => f(v),
        Availability::Unavailable(missing) => Reply::Unavailable(missing),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::route;
    use crate::test_support::{sample, ymd};
    use assistant_core::error::AssistantError;
    use assistant_core::models::{columns, ChartKind};

    fn ask(query: &str, ds: &Dataset) -> Result<Reply> {
        Responder::default().respond(&route(query), ds, ymd(2024, 1, 10))
    }

    #[test]
    fn test_total_sales_scalar_message() {
        let reply = ask("what are the total sales?", &sample()).unwrap();
        assert_eq!(
            reply,
            Reply::Scalar {
                label: "Total Sales",
                value: "$1,255.50".to_string(),
            }
        );
        assert_eq!(reply.to_message().content, "**Total Sales:** `$1,255.50`");
    }

    #[test]
    fn test_ranking_reply_has_table_and_attachment() {
        let reply = ask("top 2 selling items", &sample()).unwrap();
        let msg = reply.to_message();
        assert!(msg.content.starts_with("**Top 2 Selling Items**"));
        assert!(msg.content.contains("| Item ID | Total Price |"));
        match msg.attachment {
            Some(Attachment::Table(r)) => assert_eq!(r.keys(), vec!["I1", "I2"]),
            other => panic!("unexpected attachment: {other:?}"),
        }
    }

    #[test]
    fn test_chart_reply() {
        let reply = ask("monthly sales trend", &sample()).unwrap();
        let msg = reply.to_message();
        assert_eq!(msg.content, "Here is the Monthly Sales Trend:");
        match msg.attachment {
            Some(Attachment::Chart(c)) => assert_eq!(c.kind, ChartKind::Line),
            other => panic!("unexpected attachment: {other:?}"),
        }
    }

    #[test]
    fn test_default_top_n_from_responder() {
        let reply = Responder::new(1)
            .respond(&route("top selling items"), &sample(), ymd(2024, 1, 10))
            .unwrap();
        match reply {
            Reply::Table { title, ranking } => {
                assert_eq!(title, "Top 1 Selling Items");
                assert_eq!(ranking.len(), 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_orders_shipped_this_week_uses_today() {
        let reply = ask("orders shipped this week", &sample()).unwrap();
        assert_eq!(
            reply.to_message().content,
            "**Orders Shipped This Week:** `2`"
        );
        let reply = Responder::default()
            .respond(&route("orders shipped this week"), &sample(), ymd(2031, 1, 1))
            .unwrap();
        assert_eq!(
            reply.to_message().content,
            "**Orders Shipped This Week:** `0`"
        );
    }

    #[test]
    fn test_missing_ship_code_is_unavailable() {
        let mut ds = sample();
        ds.columns.retain(|c| c != columns::SHIP_CODE);
        let reply = ask("which shipping method was used the most?", &ds).unwrap();
        assert_eq!(reply, Reply::Unavailable(MissingData::ShippingMethod));
        assert_eq!(
            reply.to_message().content,
            "Shipping method data not available."
        );
    }

    #[test]
    fn test_not_understood_message() {
        let reply = ask("sing me a song", &sample()).unwrap();
        assert_eq!(reply, Reply::NotUnderstood);
        assert_eq!(reply.to_message().content, NOT_UNDERSTOOD);
    }

    #[test]
    fn test_empty_dataset_errors_instead_of_panicking() {
        let err = ask("total sales", &Dataset::empty()).unwrap_err();
        assert!(matches!(err, AssistantError::MissingColumn(_)));
        assert!(ask("busiest sales day", &Dataset::empty()).is_err());
        assert_eq!(
            ask("bottom customers by revenue", &Dataset::empty()).unwrap(),
            Reply::Unavailable(MissingData::CustomerRevenue)
        );
    }

    #[test]
    fn test_every_intent_answers_on_sample() {
        let ds = sample();
        for rule in crate::dispatcher::INTENT_TABLE {
            let route = Route::Matched {
                intent: rule.intent,
                top_n: None,
            };
            let reply = Responder::default().respond(&route, &ds, ymd(2024, 1, 10));
            assert!(reply.is_ok(), "{:?}: {:?}", rule.intent, reply);
        }
    }

    #[test]
    fn test_help_lists_examples() {
        let msg = ask("help", &sample()).unwrap().to_message();
        assert!(msg.content.starts_with("You can ask me things like:"));
        assert!(msg.content.contains("\n- total sales"));
    }
}
