use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Stock;

pub async fn insert(pool: &PgPool, stock: Stock) -> Result<Stock, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "INSERT INTO stocks (id, user_id, stock_name, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, user_id, stock_name, created_at",
    )
    .bind(stock.id)
    .bind(stock.user_id)
    .bind(&stock.stock_name)
    .bind(stock.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "SELECT id, user_id, stock_name, created_at
         FROM stocks
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_name(
    pool: &PgPool,
    user_id: Uuid,
    stock_name: &str,
) -> Result<Option<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "SELECT id, user_id, stock_name, created_at
         FROM stocks
         WHERE user_id = $1 AND stock_name = $2",
    )
    .bind(user_id)
    .bind(stock_name)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_name_excluding(
    pool: &PgPool,
    user_id: Uuid,
    stock_name: &str,
    exclude_id: Uuid,
) -> Result<Option<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "SELECT id, user_id, stock_name, created_at
         FROM stocks
         WHERE user_id = $1 AND stock_name = $2 AND id != $3",
    )
    .bind(user_id)
    .bind(stock_name)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "SELECT id, user_id, stock_name, created_at
         FROM stocks
         WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn rename(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    stock_name: &str,
) -> Result<Option<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        "UPDATE stocks
         SET stock_name = $3
         WHERE id = $1 AND user_id = $2
         RETURNING id, user_id, stock_name, created_at",
    )
    .bind(id)
    .bind(user_id)
    .bind(stock_name)
    .fetch_optional(pool)
    .await
}

pub async fn delete(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stocks WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
