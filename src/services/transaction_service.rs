use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{stock_queries, transaction_queries};
use crate::errors::AppError;
use crate::models::{AnnotatedTransaction, Transaction};

/// Transactions for one stock, newest first.
pub async fn list_for_stock(
    pool: &PgPool,
    user_id: Uuid,
    stock_id: Uuid,
) -> Result<Vec<Transaction>, AppError> {
    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    let transactions = transaction_queries::fetch_by_stock(pool, stock_id).await?;
    Ok(transactions)
}

/// Every transaction for the caller, newest first, with realized gain
/// attributed to sells at read time.
pub async fn list_all(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AnnotatedTransaction>, AppError> {
    let transactions = transaction_queries::fetch_all_annotated(pool, user_id).await?;
    Ok(transactions)
}
