mod earnings;
mod portfolio;
mod share_lot;
mod stock;
mod transaction;
mod user;

pub use earnings::{
    MonthlyEarnings, MonthlyEarningsByStockReport, MonthlyEarningsReport, SoldLotRecord,
    StockMonthEarnings,
};
pub use portfolio::Holding;
pub use share_lot::{DeletedLot, EditShareLot, SellLotsRequest, SellOutcome, ShareLot};
pub use stock::{CreateStock, Stock, UpdateStock};
pub use transaction::{
    AnnotatedTransaction, BuyOutcome, CreateTransaction, DeleteTransactionsRequest, Transaction,
    TransactionType,
};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, UserInfo};
