use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    AnnotatedTransaction, BuyOutcome, CreateTransaction, DeleteTransactionsRequest,
    TransactionType,
};
use crate::services::{lot_service, transaction_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_transaction))
        .route("/", get(list_transactions))
        .route("/", delete(delete_transactions))
}

// Buys come through here and open their lot atomically; sells must go
// through the sell-lots endpoint so a sell transaction can never exist
// without the lots it closed.
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<CreateTransaction>,
) -> Result<(StatusCode, Json<BuyOutcome>), AppError> {
    info!("POST /api/transactions - Creating transaction");

    if data.transaction_type != TransactionType::Buy {
        return Err(AppError::Validation(
            "Sell transactions must be created through the sell-lots endpoint".into(),
        ));
    }

    let outcome = lot_service::record_buy(
        &state.pool,
        user.user_id,
        data.stock_id,
        data.shares,
        data.price_per_share,
        data.transaction_date,
    )
    .await
    .map_err(|e| {
        error!("Failed to record buy: {}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<AnnotatedTransaction>>, AppError> {
    info!("GET /api/transactions - Listing transactions");

    let transactions = transaction_service::list_all(&state.pool, user.user_id).await?;
    Ok(Json(transactions))
}

pub async fn delete_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<DeleteTransactionsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!(
        "DELETE /api/transactions - Deleting {} transactions",
        data.transaction_ids.len()
    );

    let deleted_count =
        lot_service::delete_transactions(&state.pool, user.user_id, &data.transaction_ids)
            .await
            .map_err(|e| {
                error!("Failed to delete transactions: {}", e);
                e
            })?;

    Ok(Json(json!({ "deleted_count": deleted_count })))
}
