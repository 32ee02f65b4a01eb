//! Summary statistics and ranked subsets over the sales dataset.
//!
//! Every function is pure over a borrowed [`Dataset`]. Groups are kept in
//! first-seen order and ranked with a stable sort, so ties always resolve to
//! the key that appeared first in the file. Rows with a blank grouping key or
//! a missing date are skipped by the functions that group on them.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};

use assistant_core::error::{AssistantError, Result};
use assistant_core::models::{
    columns, Availability, Dataset, MissingData, RankedRow, Ranking, SalesRecord, ValueKind,
};
use assistant_core::time_utils::week_bounds;

/// Row count used by ranked answers when the question names none.
pub const DEFAULT_TOP_N: usize = 5;

// ── Scalars ───────────────────────────────────────────────────────────────────

/// Sum of `Total Price` over every row. Blank prices count as zero.
pub fn total_sales(ds: &Dataset) -> Result<f64> {
    require(ds, &[columns::TOTAL_PRICE])?;
    Ok(ds.records.iter().filter_map(|r| r.total_price).sum())
}

/// Mean `Total Price` over rows that have a price.
pub fn average_order_value(ds: &Dataset) -> Result<f64> {
    require(ds, &[columns::TOTAL_PRICE])?;
    let prices: Vec<f64> = ds.records.iter().filter_map(|r| r.total_price).collect();
    if prices.is_empty() {
        return Err(empty("average order value"));
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// The `Customer ID` that appears on the most rows.
pub fn most_frequent_customer(ds: &Dataset) -> Result<String> {
    require(ds, &[columns::CUSTOMER_ID])?;
    mode(ds.records.iter().map(|r| r.customer_id.as_str()).filter(|c| !c.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| empty("most frequent customer"))
}

/// The customer whose summed `Qty Returned` is highest.
pub fn customer_with_most_returns(ds: &Dataset) -> Result<String> {
    require(ds, &[columns::CUSTOMER_ID, columns::QTY_RETURNED])?;
    arg_max(group_sum(ds, |r| &r.customer_id, |r| r.qty_returned as f64))
        .ok_or_else(|| empty("customer with most returns"))
}

/// The item whose summed `Qty Returned` is highest.
pub fn most_returned_item(ds: &Dataset) -> Result<String> {
    require(ds, &[columns::ITEM_ID, columns::QTY_RETURNED])?;
    arg_max(group_sum(ds, |r| &r.item_id, |r| r.qty_returned as f64))
        .ok_or_else(|| empty("most returned item"))
}

/// The item whose summed `Qty Ordered` is highest.
pub fn most_ordered(ds: &Dataset) -> Result<String> {
    require(ds, &[columns::ITEM_ID, columns::QTY_ORDERED])?;
    arg_max(group_sum(ds, |r| &r.item_id, |r| r.qty_ordered as f64))
        .ok_or_else(|| empty("most ordered item"))
}

/// The calendar day with the most order lines.
pub fn busiest_sales_day(ds: &Dataset) -> Result<NaiveDate> {
    require(ds, &[columns::ORDER_DATE])?;
    mode(ds.records.iter().filter_map(|r| r.order_date.map(|d| d.date())))
        .ok_or_else(|| empty("busiest sales day"))
}

/// Rows whose `Date Shipped` falls in the Monday–Sunday week containing
/// `today`.
pub fn orders_shipped_this_week(ds: &Dataset, today: NaiveDate) -> Result<usize> {
    require(ds, &[columns::DATE_SHIPPED])?;
    let (monday, sunday) = week_bounds(today);
    Ok(ds
        .records
        .iter()
        .filter_map(|r| r.date_shipped.map(|d| d.date()))
        .filter(|d| (monday..=sunday).contains(d))
        .count())
}

/// The most common `Ship Code`, or [`MissingData::ShippingMethod`] when the
/// file has no such column.
pub fn most_used_shipping_method(ds: &Dataset) -> Result<Availability<String>> {
    if !ds.has_column(columns::SHIP_CODE) {
        return Ok(Availability::Unavailable(MissingData::ShippingMethod));
    }
    mode(ds.records.iter().map(|r| r.ship_code.as_str()).filter(|s| !s.is_empty()))
        .map(|s| Availability::Available(s.to_string()))
        .ok_or_else(|| empty("most used shipping method"))
}

// ── Rankings ──────────────────────────────────────────────────────────────────

/// Items with the highest summed `Total Price`.
pub fn top_selling_items(ds: &Dataset, n: usize) -> Result<Ranking> {
    item_revenue(ds, n, Order::Largest)
}

/// Items with the lowest summed `Total Price`.
pub fn least_selling_items(ds: &Dataset, n: usize) -> Result<Ranking> {
    item_revenue(ds, n, Order::Smallest)
}

/// Customers with the highest summed `Total Price`.
pub fn top_customers_by_spending(ds: &Dataset, n: usize) -> Result<Ranking> {
    customer_revenue(ds, n, Order::Largest)
}

/// Customers contributing the most revenue.
///
/// Same ranking as [`top_customers_by_spending`]; both questions are asked.
pub fn top_customers_by_revenue(ds: &Dataset, n: usize) -> Result<Ranking> {
    customer_revenue(ds, n, Order::Largest)
}

/// Customers contributing the least revenue, or
/// [`MissingData::CustomerRevenue`] when either column is absent.
pub fn bottom_customers_by_revenue(ds: &Dataset, n: usize) -> Availability<Ranking> {
    if !ds.has_columns(&[columns::CUSTOMER_ID, columns::TOTAL_PRICE]) {
        return Availability::Unavailable(MissingData::CustomerRevenue);
    }
    Availability::Available(ranking(
        columns::CUSTOMER_ID,
        columns::TOTAL_PRICE,
        ValueKind::Currency,
        rank(
            group_sum(ds, |r| &r.customer_id, price),
            n,
            Order::Smallest,
        ),
    ))
}

/// Items with the highest summed `Qty Ordered`.
pub fn products_with_highest_quantity_sold(ds: &Dataset, n: usize) -> Result<Ranking> {
    require(ds, &[columns::ITEM_ID, columns::QTY_ORDERED])?;
    Ok(ranking(
        columns::ITEM_ID,
        columns::QTY_ORDERED,
        ValueKind::Quantity,
        rank(
            group_sum(ds, |r| &r.item_id, |r| r.qty_ordered as f64),
            n,
            Order::Largest,
        ),
    ))
}

/// Customers with the highest summed `Qty Returned`.
pub fn customer_returns(ds: &Dataset, n: usize) -> Result<Ranking> {
    require(ds, &[columns::CUSTOMER_ID, columns::QTY_RETURNED])?;
    Ok(ranking(
        columns::CUSTOMER_ID,
        columns::QTY_RETURNED,
        ValueKind::Quantity,
        rank(
            group_sum(ds, |r| &r.customer_id, |r| r.qty_returned as f64),
            n,
            Order::Largest,
        ),
    ))
}

// ── Time series and shares ────────────────────────────────────────────────────

/// Summed `Total Price` per `"YYYY-MM"` month of `Order Date`, oldest first.
pub fn monthly_sales(ds: &Dataset) -> Result<Vec<(String, f64)>> {
    require(ds, &[columns::ORDER_DATE, columns::TOTAL_PRICE])?;
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for r in &ds.records {
        if let Some(d) = r.order_date {
            *map.entry(d.format("%Y-%m").to_string()).or_default() += price(r);
        }
    }
    Ok(map.into_iter().collect())
}

/// Summed `Total Price` per calendar year of `Order Date`, oldest first.
pub fn yearly_sales(ds: &Dataset) -> Result<Vec<(i32, f64)>> {
    require(ds, &[columns::ORDER_DATE, columns::TOTAL_PRICE])?;
    let mut map: BTreeMap<i32, f64> = BTreeMap::new();
    for r in &ds.records {
        if let Some(d) = r.order_date {
            *map.entry(d.year()).or_default() += price(r);
        }
    }
    Ok(map.into_iter().collect())
}

/// Row count per `Ship Code`, most used first.
pub fn shipping_method_counts(ds: &Dataset) -> Availability<Vec<(String, usize)>> {
    if !ds.has_column(columns::SHIP_CODE) {
        return Availability::Unavailable(MissingData::ShippingMethod);
    }
    let mut counts = value_counts(
        ds.records
            .iter()
            .map(|r| r.ship_code.as_str())
            .filter(|s| !s.is_empty()),
    );
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Availability::Available(
        counts
            .into_iter()
            .map(|(k, c)| (k.to_string(), c))
            .collect(),
    )
}

// ── Internal helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Largest,
    Smallest,
}

fn require(ds: &Dataset, names: &[&str]) -> Result<()> {
    match names.iter().find(|n| !ds.has_column(n)) {
        Some(missing) => Err(AssistantError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

fn empty(what: &str) -> AssistantError {
    AssistantError::EmptyDataset(what.to_string())
}

fn price(r: &SalesRecord) -> f64 {
    r.total_price.unwrap_or(0.0)
}

fn item_revenue(ds: &Dataset, n: usize, order: Order) -> Result<Ranking> {
    require(ds, &[columns::ITEM_ID, columns::TOTAL_PRICE])?;
    Ok(ranking(
        columns::ITEM_ID,
        columns::TOTAL_PRICE,
        ValueKind::Currency,
        rank(group_sum(ds, |r| &r.item_id, price), n, order),
    ))
}

fn customer_revenue(ds: &Dataset, n: usize, order: Order) -> Result<Ranking> {
    require(ds, &[columns::CUSTOMER_ID, columns::TOTAL_PRICE])?;
    Ok(ranking(
        columns::CUSTOMER_ID,
        columns::TOTAL_PRICE,
        ValueKind::Currency,
        rank(group_sum(ds, |r| &r.customer_id, price), n, order),
    ))
}

/// Sum `value` per non-blank `key`, in first-seen key order.
fn group_sum<'a>(
    ds: &'a Dataset,
    key: impl Fn(&'a SalesRecord) -> &'a String,
    value: impl Fn(&SalesRecord) -> f64,
) -> Vec<(&'a str, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, f64)> = Vec::new();
    for r in &ds.records {
        let k = key(r).as_str();
        if k.is_empty() {
            continue;
        }
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k, 0.0));
            groups.len() - 1
        });
        groups[slot].1 += value(r);
    }
    groups
}

/// Keep the `n` largest or smallest groups; ties stay in first-seen order.
fn rank(mut groups: Vec<(&str, f64)>, n: usize, order: Order) -> Vec<RankedRow> {
    match order {
        Order::Largest => groups.sort_by(|a, b| b.1.total_cmp(&a.1)),
        Order::Smallest => groups.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }
    groups
        .into_iter()
        .take(n)
        .map(|(key, value)| RankedRow {
            key: key.to_string(),
            value,
        })
        .collect()
}

/// Key of the first group holding the maximum value.
fn arg_max(groups: Vec<(&str, f64)>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (k, v) in groups {
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((k, v)),
        }
    }
    best.map(|(k, _)| k.to_string())
}

/// Occurrence count per value, in first-seen order.
fn value_counts<T: Eq + Hash + Copy>(values: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for v in values {
        let slot = *index.entry(v).or_insert_with(|| {
            counts.push((v, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }
    counts
}

/// Most frequent value; the first to appear wins a tie.
fn mode<T: Eq + Hash + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (v, c) in value_counts(values) {
        match best {
            Some((_, bc)) if c <= bc => {}
            _ => best = Some((v, c)),
        }
    }
    best.map(|(v, _)| v)
}

fn ranking(key_column: &str, value_column: &str, kind: ValueKind, rows: Vec<RankedRow>) -> Ranking {
    Ranking {
        key_column: key_column.to_string(),
        value_column: value_column.to_string(),
        value_kind: kind,
        rows,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
