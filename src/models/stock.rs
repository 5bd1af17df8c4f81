use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stock {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub stock_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Stock {
    pub fn new(user_id: uuid::Uuid, stock_name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            stock_name,
            created_at: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStock {
    pub stock_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStock {
    pub stock_name: String,
}
