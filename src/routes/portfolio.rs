use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::Holding;
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_portfolio))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Holding>>, AppError> {
    info!("GET /api/portfolio - Computing holdings");

    let holdings = portfolio_service::holdings(&state.pool, user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to compute holdings: {}", e);
            e
        })?;
    Ok(Json(holdings))
}
