//! Chart descriptions built from the aggregation library.
//!
//! Nothing here draws; each function returns a [`ChartSpec`] that the UI (or
//! the one-shot printer) renders however it likes.

use assistant_core::error::Result;
use assistant_core::models::{
    columns, Availability, ChartKind, ChartPoint, ChartSpec, Dataset, Ranking,
};

use crate::aggregations;

/// Total sales per month as a line.
pub fn monthly_sales_trend(ds: &Dataset) -> Result<ChartSpec> {
    let points = aggregations::monthly_sales(ds)?
        .into_iter()
        .map(|(month, value)| ChartPoint { label: month, value })
        .collect();
    Ok(line("Monthly Sales Trend", "Month", points))
}

/// Total sales per year as a line.
pub fn yearly_sales_trend(ds: &Dataset) -> Result<ChartSpec> {
    let points = aggregations::yearly_sales(ds)?
        .into_iter()
        .map(|(year, value)| ChartPoint {
            label: year.to_string(),
            value,
        })
        .collect();
    Ok(line("Yearly Sales Trend", "Year", points))
}

pub fn customer_return_chart(ds: &Dataset, n: usize) -> Result<ChartSpec> {
    let ranking = aggregations::customer_returns(ds, n)?;
    Ok(bar(
        format!("Top {n} Customers with Most Returns"),
        &ranking,
    ))
}

pub fn top_customers_chart(ds: &Dataset, n: usize) -> Result<ChartSpec> {
    let ranking = aggregations::top_customers_by_revenue(ds, n)?;
    Ok(bar(format!("Top {n} Revenue-Contributing Customers"), &ranking))
}

pub fn bottom_customers_chart(ds: &Dataset, n: usize) -> Availability<ChartSpec> {
    aggregations::bottom_customers_by_revenue(ds, n).map(|ranking| {
        bar(
            format!("Bottom {n} Revenue-Contributing Customers"),
            &ranking,
        )
    })
}

pub fn top_selling_products_chart(ds: &Dataset, n: usize) -> Result<ChartSpec> {
    let ranking = aggregations::top_selling_items(ds, n)?;
    Ok(bar(format!("Top {n} Selling Products"), &ranking))
}

pub fn top_customers_by_spending_chart(ds: &Dataset, n: usize) -> Result<ChartSpec> {
    let ranking = aggregations::top_customers_by_spending(ds, n)?;
    Ok(bar(format!("Top {n} Customers by Spending"), &ranking))
}

/// Share of orders per shipping method.
pub fn shipping_method_pie_chart(ds: &Dataset) -> Availability<ChartSpec> {
    aggregations::shipping_method_counts(ds).map(|counts| ChartSpec {
        title: "Most Used Shipping Methods".to_string(),
        kind: ChartKind::Pie,
        x_label: columns::SHIP_CODE.to_string(),
        y_label: "Orders".to_string(),
        points: counts
            .into_iter()
            .map(|(label, count)| ChartPoint {
                label,
                value: count as f64,
            })
            .collect(),
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn line(title: &str, x_label: &str, points: Vec<ChartPoint>) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        kind: ChartKind::Line,
        x_label: x_label.to_string(),
        y_label: "Total Sales".to_string(),
        points,
    }
}

fn bar(title: String, ranking: &Ranking) -> ChartSpec {
    ChartSpec {
        title,
        kind: ChartKind::Bar,
        x_label: ranking.key_column.clone(),
        y_label: ranking.value_column.clone(),
        points: ranking
            .rows
            .iter()
            .map(|r| ChartPoint {
                label: r.key.clone(),
                value: r.value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregations::tests::sample;
    use assistant_core::error::AssistantError;
    use assistant_core::models::MissingData;

    #[test]
    fn test_monthly_sales_trend_is_line_in_period_order() {
        let chart = monthly_sales_trend(&sample()).unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.title, "Monthly Sales Trend");
        let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);
        assert_eq!(chart.total(), 455.5);
    }

    #[test]
    fn test_yearly_sales_trend() {
        let chart = yearly_sales_trend(&sample()).unwrap();
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[1].label, "2024");
        assert_eq!(chart.max_value(), 355.5);
    }

    #[test]
    fn test_bar_chart_titles_follow_requested_count() {
        let chart = top_selling_products_chart(&sample(), 2).unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.title, "Top 2 Selling Products");
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].label, "I1");
        assert_eq!(chart.x_label, "Item ID");

        assert_eq!(
            customer_return_chart(&sample(), 5).unwrap().title,
            "Top 5 Customers with Most Returns"
        );
        assert_eq!(
            top_customers_chart(&sample(), 5).unwrap().title,
            "Top 5 Revenue-Contributing Customers"
        );
        assert_eq!(
            top_customers_by_spending_chart(&sample(), 3).unwrap().title,
            "Top 3 Customers by Spending"
        );
    }

    #[test]
    fn test_bottom_customers_chart() {
        let chart = bottom_customers_chart(&sample(), 5).into_option().unwrap();
        assert_eq!(chart.title, "Bottom 5 Revenue-Contributing Customers");
        assert_eq!(chart.points[0].label, "C3");
    }

    #[test]
    fn test_shipping_pie_shares() {
        let chart = shipping_method_pie_chart(&sample()).into_option().unwrap();
        assert_eq!(chart.kind, ChartKind::Pie);
        let shares = chart.shares();
        assert_eq!(shares[0].0, "UPS");
        assert!((shares[0].1 - 400.0 / 7.0).abs() < 1e-9);
        let total: f64 = shares.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shipping_pie_without_column_is_unavailable() {
        let mut ds = sample();
        ds.columns.retain(|c| c != columns::SHIP_CODE);
        assert_eq!(
            shipping_method_pie_chart(&ds),
            Availability::Unavailable(MissingData::ShippingMethod)
        );
    }

    #[test]
    fn test_trend_on_empty_dataset_is_missing_column() {
        assert!(matches!(
            monthly_sales_trend(&Dataset::empty()),
            Err(AssistantError::MissingColumn(_))
        ));
    }
}
