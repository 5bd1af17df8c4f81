use bigdecimal::BigDecimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{ShareLot, SoldLotRecord};

#[derive(Debug, FromRow)]
pub struct ActiveLotTotals {
    pub stock_id: Uuid,
    pub current_shares: i64,
    pub total_invested: BigDecimal,
}

#[derive(Debug, FromRow)]
pub struct SoldLotTotals {
    pub stock_id: Uuid,
    pub actual_earned: BigDecimal,
}

pub async fn insert(conn: &mut PgConnection, lot: &ShareLot) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO share_lots
           (id, user_id, stock_id, buy_transaction_id, shares, buy_price_per_share, buy_date,
            sell_transaction_id, sell_price_per_share, sell_date, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(lot.id)
    .bind(lot.user_id)
    .bind(lot.stock_id)
    .bind(lot.buy_transaction_id)
    .bind(lot.shares)
    .bind(&lot.buy_price_per_share)
    .bind(lot.buy_date)
    .bind(lot.sell_transaction_id)
    .bind(&lot.sell_price_per_share)
    .bind(lot.sell_date)
    .bind(&lot.status)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_active_by_stock(
    pool: &PgPool,
    stock_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<ShareLot>, sqlx::Error> {
    sqlx::query_as::<_, ShareLot>(
        "SELECT * FROM share_lots
         WHERE stock_id = $1 AND user_id = $2 AND status = 'active'
         ORDER BY buy_date ASC",
    )
    .bind(stock_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Locks the requested lots for the duration of the enclosing transaction;
/// a concurrent sell touching any of the same rows blocks here and then
/// sees them as no longer active.
pub async fn fetch_active_for_update(
    conn: &mut PgConnection,
    ids: &[Uuid],
    user_id: Uuid,
    stock_id: Uuid,
) -> Result<Vec<ShareLot>, sqlx::Error> {
    sqlx::query_as::<_, ShareLot>(
        "SELECT * FROM share_lots
         WHERE id = ANY($1) AND user_id = $2 AND stock_id = $3 AND status = 'active'
         FOR UPDATE",
    )
    .bind(ids)
    .bind(user_id)
    .bind(stock_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn fetch_one_for_update(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<ShareLot>, sqlx::Error> {
    sqlx::query_as::<_, ShareLot>(
        "SELECT * FROM share_lots
         WHERE id = $1 AND user_id = $2
         FOR UPDATE",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn mark_sold(
    conn: &mut PgConnection,
    ids: &[Uuid],
    sell_transaction_id: Uuid,
    sell_price_per_share: &BigDecimal,
    sell_date: chrono::DateTime<chrono::Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE share_lots
         SET sell_transaction_id = $2, sell_price_per_share = $3, sell_date = $4, status = 'sold'
         WHERE id = ANY($1)",
    )
    .bind(ids)
    .bind(sell_transaction_id)
    .bind(sell_price_per_share)
    .bind(sell_date)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update_fields(
    conn: &mut PgConnection,
    id: Uuid,
    buy_date: chrono::DateTime<chrono::Utc>,
    buy_price_per_share: &BigDecimal,
    shares: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE share_lots
         SET buy_date = $2, buy_price_per_share = $3, shares = $4
         WHERE id = $1",
    )
    .bind(id)
    .bind(buy_date)
    .bind(buy_price_per_share)
    .bind(shares)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete_one(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM share_lots WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Un-sell every lot that pointed at one of the given sell transactions.
pub async fn revert_sold_by_sell_transactions(
    conn: &mut PgConnection,
    sell_transaction_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE share_lots
         SET sell_transaction_id = NULL, sell_price_per_share = NULL, sell_date = NULL,
             status = 'active'
         WHERE sell_transaction_id = ANY($1)",
    )
    .bind(sell_transaction_ids)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Orphan the lots of deleted buy transactions: the weak reference is
/// cleared, the lots themselves stay untouched.
pub async fn clear_buy_references(
    conn: &mut PgConnection,
    buy_transaction_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE share_lots
         SET buy_transaction_id = NULL
         WHERE buy_transaction_id = ANY($1)",
    )
    .bind(buy_transaction_ids)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_stock(
    conn: &mut PgConnection,
    stock_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM share_lots WHERE stock_id = $1")
        .bind(stock_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn active_totals_by_stock(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ActiveLotTotals>, sqlx::Error> {
    sqlx::query_as::<_, ActiveLotTotals>(
        "SELECT
           stock_id,
           COALESCE(SUM(shares), 0) AS current_shares,
           COALESCE(SUM(shares * buy_price_per_share), 0) AS total_invested
         FROM share_lots
         WHERE user_id = $1 AND status = 'active'
         GROUP BY stock_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn sold_totals_by_stock(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SoldLotTotals>, sqlx::Error> {
    sqlx::query_as::<_, SoldLotTotals>(
        "SELECT
           stock_id,
           COALESCE(SUM((sell_price_per_share - buy_price_per_share) * shares), 0) AS actual_earned
         FROM share_lots
         WHERE user_id = $1 AND status = 'sold' AND sell_date IS NOT NULL
         GROUP BY stock_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Every sold lot for the user, joined with its stock name. Month and year
/// bucketing happens in Rust on the UTC timestamps, never in SQL.
pub async fn fetch_sold_with_stock(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SoldLotRecord>, sqlx::Error> {
    sqlx::query_as::<_, SoldLotRecord>(
        "SELECT
           s.stock_name,
           sl.shares,
           sl.buy_price_per_share,
           sl.sell_price_per_share,
           sl.sell_date
         FROM share_lots sl
         JOIN stocks s ON sl.stock_id = s.id
         WHERE sl.user_id = $1 AND sl.status = 'sold' AND sl.sell_date IS NOT NULL
         ORDER BY sl.sell_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
