use sqlx::PgPool;
use uuid::Uuid;

use crate::db::stock_queries;
use crate::errors::AppError;
use crate::models::{CreateStock, Stock, UpdateStock};

pub async fn create(pool: &PgPool, user_id: Uuid, input: CreateStock) -> Result<Stock, AppError> {
    let name = input.stock_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Stock name is required".into()));
    }

    if stock_queries::fetch_by_name(pool, user_id, name).await?.is_some() {
        return Err(AppError::Validation(
            "Stock already exists in your portfolio".into(),
        ));
    }

    let stock = stock_queries::insert(pool, Stock::new(user_id, name.to_string())).await?;
    Ok(stock)
}

pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Stock>, AppError> {
    let stocks = stock_queries::fetch_all(pool, user_id).await?;
    Ok(stocks)
}

pub async fn rename(
    pool: &PgPool,
    user_id: Uuid,
    stock_id: Uuid,
    input: UpdateStock,
) -> Result<Stock, AppError> {
    let name = input.stock_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Stock name is required".into()));
    }

    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    if stock_queries::fetch_by_name_excluding(pool, user_id, name, stock_id)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Stock name already exists".into()));
    }

    let stock = stock_queries::rename(pool, stock_id, user_id, name)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;
    Ok(stock)
}
