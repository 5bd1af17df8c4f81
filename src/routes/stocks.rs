use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    CreateStock, SellLotsRequest, SellOutcome, ShareLot, Stock, Transaction, UpdateStock,
};
use crate::services::{lot_service, stock_service, transaction_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_stock))
        .route("/", get(list_stocks))
        .route("/:stock_id", put(rename_stock))
        .route("/:stock_id", delete(delete_stock))
        .route("/:stock_id/transactions", get(list_stock_transactions))
        .route("/:stock_id/share-lots", get(list_share_lots))
        .route("/:stock_id/sell-lots", post(sell_lots))
}

pub async fn create_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<CreateStock>,
) -> Result<(StatusCode, Json<Stock>), AppError> {
    info!("POST /api/stocks - Creating stock");

    let stock = stock_service::create(&state.pool, user.user_id, data).await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

pub async fn list_stocks(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Stock>>, AppError> {
    info!("GET /api/stocks - Listing stocks");

    let stocks = stock_service::list(&state.pool, user.user_id).await?;
    Ok(Json(stocks))
}

pub async fn rename_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stock_id): Path<Uuid>,
    Json(data): Json<UpdateStock>,
) -> Result<Json<Stock>, AppError> {
    info!("PUT /api/stocks/{} - Renaming stock", stock_id);

    let stock = stock_service::rename(&state.pool, user.user_id, stock_id, data).await?;
    Ok(Json(stock))
}

pub async fn delete_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stock_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!("DELETE /api/stocks/{} - Deleting stock", stock_id);

    lot_service::delete_stock(&state.pool, user.user_id, stock_id)
        .await
        .map_err(|e| {
            error!("Failed to delete stock {}: {}", stock_id, e);
            e
        })?;
    Ok(Json(json!({})))
}

pub async fn list_stock_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stock_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    info!("GET /api/stocks/{}/transactions - Listing transactions", stock_id);

    let transactions =
        transaction_service::list_for_stock(&state.pool, user.user_id, stock_id).await?;
    Ok(Json(transactions))
}

pub async fn list_share_lots(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stock_id): Path<Uuid>,
) -> Result<Json<Vec<ShareLot>>, AppError> {
    info!("GET /api/stocks/{}/share-lots - Listing active lots", stock_id);

    let lots = lot_service::list_active_lots(&state.pool, user.user_id, stock_id).await?;
    Ok(Json(lots))
}

pub async fn sell_lots(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stock_id): Path<Uuid>,
    Json(data): Json<SellLotsRequest>,
) -> Result<(StatusCode, Json<SellOutcome>), AppError> {
    info!(
        "POST /api/stocks/{}/sell-lots - Selling {} lots",
        stock_id,
        data.lot_ids.len()
    );

    let outcome = lot_service::record_sell(&state.pool, user.user_id, stock_id, data)
        .await
        .map_err(|e| {
            error!("Failed to sell lots for stock {}: {}", stock_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
