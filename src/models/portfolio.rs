use bigdecimal::BigDecimal;
use serde::Serialize;
use uuid::Uuid;

// Per-stock holdings view, computed fresh from lots on every read.
#[derive(Debug, Clone, Serialize)]
pub struct Holding {
    pub stock_id: Uuid,
    pub stock_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub current_shares: i64,
    pub avg_buy_price: BigDecimal,
    pub total_invested: BigDecimal,
    pub actual_earned: BigDecimal,
}
