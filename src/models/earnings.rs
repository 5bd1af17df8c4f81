use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::FromRow;

// A sold lot with its stock name, the raw material for earnings rollups.
#[derive(Debug, Clone, FromRow)]
pub struct SoldLotRecord {
    pub stock_name: String,
    pub shares: i32,
    pub buy_price_per_share: BigDecimal,
    pub sell_price_per_share: BigDecimal,
    pub sell_date: chrono::DateTime<chrono::Utc>,
}

impl SoldLotRecord {
    /// (sell - buy) x shares.
    pub fn realized_gain(&self) -> BigDecimal {
        (&self.sell_price_per_share - &self.buy_price_per_share) * BigDecimal::from(self.shares)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyEarnings {
    pub month: String,
    pub month_number: u32,
    pub earnings: BigDecimal,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyEarningsReport {
    pub year: i32,
    pub months: Vec<MonthlyEarnings>,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockMonthEarnings {
    pub month: String,
    pub month_number: u32,
    pub per_stock: BTreeMap<String, BigDecimal>,
    pub total: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyEarningsByStockReport {
    pub year: i32,
    pub stocks: Vec<String>,
    pub months: Vec<StockMonthEarnings>,
    pub total: BigDecimal,
}
