use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::share_lot_queries::{self, ActiveLotTotals, SoldLotTotals};
use crate::db::stock_queries;
use crate::errors::AppError;
use crate::models::{Holding, Stock};

/// Per-stock holdings, newest stock first. Everything is recomputed from
/// the lots on every call; there is no cached balance to invalidate.
pub async fn holdings(pool: &PgPool, user_id: Uuid) -> Result<Vec<Holding>, AppError> {
    let stocks = stock_queries::fetch_all(pool, user_id).await?;
    let active: HashMap<Uuid, ActiveLotTotals> =
        share_lot_queries::active_totals_by_stock(pool, user_id)
            .await?
            .into_iter()
            .map(|row| (row.stock_id, row))
            .collect();
    let sold: HashMap<Uuid, SoldLotTotals> = share_lot_queries::sold_totals_by_stock(pool, user_id)
        .await?
        .into_iter()
        .map(|row| (row.stock_id, row))
        .collect();

    let holdings = stocks
        .iter()
        .map(|stock| build_holding(stock, active.get(&stock.id), sold.get(&stock.id)))
        .collect();
    Ok(holdings)
}

fn build_holding(
    stock: &Stock,
    active: Option<&ActiveLotTotals>,
    sold: Option<&SoldLotTotals>,
) -> Holding {
    let current_shares = active.map(|totals| totals.current_shares).unwrap_or(0);
    let total_invested = active
        .map(|totals| totals.total_invested.clone())
        .unwrap_or_else(BigDecimal::zero);
    // Stocks with no active lots report an average of zero, not a
    // division error.
    let avg_buy_price = if current_shares > 0 {
        (&total_invested / BigDecimal::from(current_shares)).round(2)
    } else {
        BigDecimal::zero()
    };
    let actual_earned = sold
        .map(|totals| totals.actual_earned.clone())
        .unwrap_or_else(BigDecimal::zero);

    Holding {
        stock_id: stock.id,
        stock_name: stock.stock_name.clone(),
        created_at: stock.created_at,
        current_shares,
        avg_buy_price,
        total_invested: total_invested.round(2),
        actual_earned: actual_earned.round(2),
    }
}
