//! Realized-earnings rollups. All year and month bucketing happens here in
//! Rust on UTC timestamps, so every storage backend agrees on boundaries.

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::{BigDecimal, Zero};
use chrono::Datelike;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::share_lot_queries;
use crate::errors::AppError;
use crate::models::{
    MonthlyEarnings, MonthlyEarningsByStockReport, MonthlyEarningsReport, SoldLotRecord,
    StockMonthEarnings,
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub async fn monthly(
    pool: &PgPool,
    user_id: Uuid,
    year: i32,
) -> Result<MonthlyEarningsReport, AppError> {
    let records = share_lot_queries::fetch_sold_with_stock(pool, user_id).await?;
    Ok(bucket_monthly(&records, year))
}

pub async fn monthly_by_stock(
    pool: &PgPool,
    user_id: Uuid,
    year: i32,
) -> Result<MonthlyEarningsByStockReport, AppError> {
    let records = share_lot_queries::fetch_sold_with_stock(pool, user_id).await?;
    Ok(bucket_monthly_by_stock(&records, year))
}

fn bucket_monthly(records: &[SoldLotRecord], year: i32) -> MonthlyEarningsReport {
    let mut months: Vec<MonthlyEarnings> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| MonthlyEarnings {
            month: name.to_string(),
            month_number: index as u32 + 1,
            earnings: BigDecimal::zero(),
            count: 0,
        })
        .collect();

    for record in records.iter().filter(|r| r.sell_date.year() == year) {
        let index = record.sell_date.month() as usize - 1;
        months[index].earnings += record.realized_gain();
        months[index].count += 1;
    }

    let mut total = BigDecimal::zero();
    for month in &mut months {
        month.earnings = month.earnings.round(2);
        total += &month.earnings;
    }

    MonthlyEarningsReport {
        year,
        months,
        total: total.round(2),
    }
}

fn bucket_monthly_by_stock(records: &[SoldLotRecord], year: i32) -> MonthlyEarningsByStockReport {
    let in_year: Vec<&SoldLotRecord> = records
        .iter()
        .filter(|r| r.sell_date.year() == year)
        .collect();

    // Only stocks with at least one sale this year make the list; months
    // then zero-fill each listed stock.
    let stocks: Vec<String> = in_year
        .iter()
        .map(|r| r.stock_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut months: Vec<StockMonthEarnings> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let per_stock: BTreeMap<String, BigDecimal> = stocks
                .iter()
                .map(|stock| (stock.clone(), BigDecimal::zero()))
                .collect();
            StockMonthEarnings {
                month: name.to_string(),
                month_number: index as u32 + 1,
                per_stock,
                total: BigDecimal::zero(),
            }
        })
        .collect();

    for record in &in_year {
        let index = record.sell_date.month() as usize - 1;
        let gain = record.realized_gain();
        if let Some(earnings) = months[index].per_stock.get_mut(&record.stock_name) {
            *earnings += gain;
        }
    }

    let mut total = BigDecimal::zero();
    for month in &mut months {
        let mut month_total = BigDecimal::zero();
        for earnings in month.per_stock.values_mut() {
            *earnings = earnings.round(2);
            month_total += &*earnings;
        }
        month.total = month_total.round(2);
        total += &month.total;
    }

    MonthlyEarningsByStockReport {
        year,
        stocks,
        months,
        total: total.round(2),
    }
}
