use axum::extract::{Path, State};
use axum::routing::{delete, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{DeletedLot, EditShareLot, ShareLot};
use crate::services::lot_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:lot_id", put(edit_lot))
        .route("/:lot_id", delete(delete_lot))
}

pub async fn edit_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(lot_id): Path<Uuid>,
    Json(data): Json<EditShareLot>,
) -> Result<Json<ShareLot>, AppError> {
    info!("PUT /api/share-lots/{} - Editing lot", lot_id);

    let lot = lot_service::edit_lot(&state.pool, user.user_id, lot_id, data)
        .await
        .map_err(|e| {
            error!("Failed to edit lot {}: {}", lot_id, e);
            e
        })?;
    Ok(Json(lot))
}

pub async fn delete_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<DeletedLot>, AppError> {
    info!("DELETE /api/share-lots/{} - Deleting lot", lot_id);

    let deleted = lot_service::delete_lot(&state.pool, user.user_id, lot_id)
        .await
        .map_err(|e| {
            error!("Failed to delete lot {}: {}", lot_id, e);
            e
        })?;
    Ok(Json(deleted))
}
