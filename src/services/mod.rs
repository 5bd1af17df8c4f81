pub(crate) mod earnings_service;
pub(crate) mod lot_service;
pub(crate) mod portfolio_service;
pub(crate) mod stock_service;
pub(crate) mod transaction_service;
