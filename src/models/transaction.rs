use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
        }
    }
}

// A buy or sell event in the journal. total_amount is fixed at creation
// (shares x price) and is only adjusted through lot deletion, never
// recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stock_id: Uuid,
    pub transaction_type: String,
    pub shares: i32,
    pub price_per_share: BigDecimal,
    pub total_amount: BigDecimal,
    pub transaction_date: chrono::DateTime<chrono::Utc>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        stock_id: Uuid,
        transaction_type: TransactionType,
        shares: i32,
        price_per_share: BigDecimal,
        transaction_date: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let total_amount = BigDecimal::from(shares) * &price_per_share;
        Self {
            id: Uuid::new_v4(),
            user_id,
            stock_id,
            transaction_type: transaction_type.as_str().to_string(),
            shares,
            price_per_share,
            total_amount,
            transaction_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub stock_id: Uuid,
    pub transaction_type: TransactionType,
    pub shares: i32,
    pub price_per_share: BigDecimal,
    pub transaction_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTransactionsRequest {
    pub transaction_ids: Vec<Uuid>,
}

// Journal row joined with its stock name and the realized gain attributed
// to it at read time (always zero for buys).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnnotatedTransaction {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub stock_name: String,
    pub transaction_type: String,
    pub shares: i32,
    pub price_per_share: BigDecimal,
    pub total_amount: BigDecimal,
    pub transaction_date: chrono::DateTime<chrono::Utc>,
    pub earned_amount: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct BuyOutcome {
    pub transaction_id: Uuid,
    pub lot_id: Uuid,
}
