use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{auth, earnings, health, portfolio, share_lots, stocks, transactions};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/transactions", transactions::router())
        .nest("/api/share-lots", share_lots::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/earnings", earnings::router())
        .layer(cors)
        .with_state(state)
}
