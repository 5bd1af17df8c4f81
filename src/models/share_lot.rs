use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Transaction;

pub const LOT_ACTIVE: &str = "active";

// One batch of shares from a single buy event. buy_transaction_id is a weak
// reference: it goes NULL when the originating transaction is deleted, the
// lot itself survives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stock_id: Uuid,
    pub buy_transaction_id: Option<Uuid>,
    pub shares: i32,
    pub buy_price_per_share: BigDecimal,
    pub buy_date: chrono::DateTime<chrono::Utc>,
    pub sell_transaction_id: Option<Uuid>,
    pub sell_price_per_share: Option<BigDecimal>,
    pub sell_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
}

impl ShareLot {
    /// The lot a buy transaction spawns: shares, price and date are copied
    /// verbatim from the transaction.
    pub fn from_buy(tx: &Transaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: tx.user_id,
            stock_id: tx.stock_id,
            buy_transaction_id: Some(tx.id),
            shares: tx.shares,
            buy_price_per_share: tx.price_per_share.clone(),
            buy_date: tx.transaction_date,
            sell_transaction_id: None,
            sell_price_per_share: None,
            sell_date: None,
            status: LOT_ACTIVE.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LOT_ACTIVE
    }
}

#[derive(Debug, Deserialize)]
pub struct EditShareLot {
    pub buy_date: chrono::DateTime<chrono::Utc>,
    pub buy_price_per_share: BigDecimal,
    pub shares: i32,
}

#[derive(Debug, Deserialize)]
pub struct SellLotsRequest {
    pub lot_ids: Vec<Uuid>,
    pub sell_price_per_share: BigDecimal,
    pub sell_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SellOutcome {
    pub transaction_id: Uuid,
    pub total_shares: i32,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct DeletedLot {
    pub deleted_shares: i32,
    pub stock_id: Uuid,
}
