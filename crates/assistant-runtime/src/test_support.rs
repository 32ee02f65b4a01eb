use chrono::NaiveDate;

use assistant_core::models::{columns, Dataset, SalesRecord};

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(
    order_date: NaiveDate,
    shipped: Option<NaiveDate>,
    item: &str,
    customer: &str,
    ship: &str,
    qty: (i64, i64),
    price: f64,
) -> SalesRecord {
    SalesRecord {
        order_date: order_date.and_hms_opt(10, 0, 0),
        order_release_date: order_date.and_hms_opt(12, 0, 0),
        date_shipped: shipped.and_then(|d| d.and_hms_opt(8, 0, 0)),
        item_id: item.to_string(),
        customer_id: customer.to_string(),
        ship_code: ship.to_string(),
        qty_ordered: qty.0,
        qty_returned: qty.1,
        total_price: Some(price),
    }
}

/// Four order lines; total sales $1,255.50, two shipped in the week of
/// 2024-01-10.
pub(crate) fn sample() -> Dataset {
    let columns = [
        columns::ORDER_DATE,
        columns::ORDER_RELEASE_DATE,
        columns::DATE_SHIPPED,
        columns::ITEM_ID,
        columns::CUSTOMER_ID,
        columns::SHIP_CODE,
        columns::QTY_ORDERED,
        columns::QTY_RETURNED,
        columns::TOTAL_PRICE,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    Dataset::new(
        columns,
        vec![
            record(ymd(2024, 1, 2), Some(ymd(2024, 1, 8)), "I1", "C1", "UPS", (2, 0), 500.0),
            record(ymd(2024, 1, 3), Some(ymd(2024, 1, 9)), "I2", "C2", "DHL", (1, 1), 250.0),
            record(ymd(2024, 2, 1), Some(ymd(2024, 2, 5)), "I1", "C2", "UPS", (3, 0), 400.0),
            record(ymd(2024, 2, 14), None, "I3", "C3", "UPS", (1, 2), 105.5),
        ],
    )
}
