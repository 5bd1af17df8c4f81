use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::auth::{self, AuthUser};
use crate::db::user_queries;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User, UserInfo};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    info!("POST /api/auth/register - Registering user");

    if data.username.trim().is_empty() || data.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    if user_queries::fetch_by_username(&state.pool, data.username.trim())
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Username already exists".into()));
    }

    let hash = auth::hash_password(&data.password)?;
    let user = User::new(data.username.trim().to_string(), hash);
    user_queries::insert(&state.pool, &user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        AppError::Db(e)
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "user_id": user.id }))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("POST /api/auth/login - Logging in user");

    if data.username.trim().is_empty() || data.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    let user = user_queries::fetch_by_username(&state.pool, data.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth::verify_password(&data.password, &user.password) {
        return Err(AppError::Unauthorized);
    }

    let token = auth::issue_token(&state.config.jwt_secret, &user)?;
    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
        },
    }))
}

pub async fn profile(user: AuthUser) -> Json<UserInfo> {
    info!("GET /api/auth/profile - Fetching profile");

    Json(UserInfo {
        id: user.user_id,
        username: user.username,
    })
}
