pub(crate) mod share_lot_queries;
pub(crate) mod stock_queries;
pub(crate) mod transaction_queries;
pub(crate) mod user_queries;
