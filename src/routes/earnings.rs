use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Datelike;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{MonthlyEarningsByStockReport, MonthlyEarningsReport};
use crate::services::earnings_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

impl YearQuery {
    fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Utc::now().year())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(monthly_earnings))
        .route("/monthly-by-stock", get(monthly_earnings_by_stock))
}

pub async fn monthly_earnings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Json<MonthlyEarningsReport>, AppError> {
    let year = query.year_or_current();
    info!("GET /api/earnings/monthly - year {}", year);

    let report = earnings_service::monthly(&state.pool, user.user_id, year).await?;
    Ok(Json(report))
}

pub async fn monthly_earnings_by_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Json<MonthlyEarningsByStockReport>, AppError> {
    let year = query.year_or_current();
    info!("GET /api/earnings/monthly-by-stock - year {}", year);

    let report = earnings_service::monthly_by_stock(&state.pool, user.user_id, year).await?;
    Ok(Json(report))
}
