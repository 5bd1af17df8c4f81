use bigdecimal::BigDecimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{AnnotatedTransaction, Transaction};

#[derive(Debug, FromRow)]
pub struct TransactionKindRow {
    pub id: Uuid,
    pub transaction_type: String,
}

pub async fn insert(conn: &mut PgConnection, tx: &Transaction) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO transactions
           (id, user_id, stock_id, transaction_type, shares, price_per_share, total_amount, transaction_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(tx.id)
    .bind(tx.user_id)
    .bind(tx.stock_id)
    .bind(&tx.transaction_type)
    .bind(tx.shares)
    .bind(&tx.price_per_share)
    .bind(&tx.total_amount)
    .bind(tx.transaction_date)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_by_stock(
    pool: &PgPool,
    stock_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT id, user_id, stock_id, transaction_type, shares, price_per_share, total_amount, transaction_date
         FROM transactions
         WHERE stock_id = $1
         ORDER BY transaction_date DESC",
    )
    .bind(stock_id)
    .fetch_all(pool)
    .await
}

// earned_amount is recomputed at read time from the lots each sell
// transaction closed; buys always carry zero.
pub async fn fetch_all_annotated(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AnnotatedTransaction>, sqlx::Error> {
    sqlx::query_as::<_, AnnotatedTransaction>(
        "SELECT
           t.id,
           t.stock_id,
           s.stock_name,
           t.transaction_type,
           t.shares,
           t.price_per_share,
           t.total_amount,
           t.transaction_date,
           CASE
             WHEN t.transaction_type = 'sell' THEN
               COALESCE(
                 (SELECT SUM((sl.sell_price_per_share - sl.buy_price_per_share) * sl.shares)
                  FROM share_lots sl
                  WHERE sl.sell_transaction_id = t.id),
                 0
               )
             ELSE 0
           END AS earned_amount
         FROM transactions t
         JOIN stocks s ON t.stock_id = s.id
         WHERE t.user_id = $1
         ORDER BY t.transaction_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_owned_for_update(
    conn: &mut PgConnection,
    ids: &[Uuid],
    user_id: Uuid,
) -> Result<Vec<TransactionKindRow>, sqlx::Error> {
    sqlx::query_as::<_, TransactionKindRow>(
        "SELECT id, transaction_type
         FROM transactions
         WHERE id = ANY($1) AND user_id = $2
         FOR UPDATE",
    )
    .bind(ids)
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn delete_many(
    conn: &mut PgConnection,
    ids: &[Uuid],
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = ANY($1) AND user_id = $2")
        .bind(ids)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Shrink a buy transaction after one of its lots is deleted. The decrement
/// uses the transaction's own stored price_per_share, which may have
/// diverged from the lot's buy price through independent edits.
pub async fn decrement_shares(
    conn: &mut PgConnection,
    id: Uuid,
    shares: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE transactions
         SET shares = shares - $2,
             total_amount = total_amount - ($2 * price_per_share)
         WHERE id = $1",
    )
    .bind(id)
    .bind(shares)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_shares(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT shares FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn delete_one(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Re-sync a buy transaction with its edited lot.
pub async fn update_buy_fields(
    conn: &mut PgConnection,
    id: Uuid,
    shares: i32,
    price_per_share: &BigDecimal,
    total_amount: &BigDecimal,
    transaction_date: chrono::DateTime<chrono::Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE transactions
         SET shares = $2, price_per_share = $3, total_amount = $4, transaction_date = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(shares)
    .bind(price_per_share)
    .bind(total_amount)
    .bind(transaction_date)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete_by_stock(
    conn: &mut PgConnection,
    stock_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE stock_id = $1")
        .bind(stock_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
