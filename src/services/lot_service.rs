//! Share-lot accounting: every buy opens exactly one lot, sells close the
//! lots the caller picked, and edits and deletions keep lots and their
//! originating transactions consistent. All multi-step mutations run inside
//! a single database transaction.

use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{share_lot_queries, stock_queries, transaction_queries};
use crate::errors::AppError;
use crate::models::{
    BuyOutcome, DeletedLot, EditShareLot, SellLotsRequest, SellOutcome, ShareLot, Transaction,
    TransactionType,
};

fn ensure_positive(shares: i32, price: &BigDecimal) -> Result<(), AppError> {
    if shares <= 0 || price <= &BigDecimal::zero() {
        return Err(AppError::Validation(
            "Shares and price must be positive".into(),
        ));
    }
    Ok(())
}

fn sell_totals(lots: &[ShareLot], price_per_share: &BigDecimal) -> (i32, BigDecimal) {
    let total_shares: i32 = lots.iter().map(|lot| lot.shares).sum();
    let total_amount = BigDecimal::from(total_shares) * price_per_share;
    (total_shares, total_amount)
}

/// Record a buy: one journal entry plus exactly one active lot copied from
/// it, atomically.
pub async fn record_buy(
    pool: &PgPool,
    user_id: Uuid,
    stock_id: Uuid,
    shares: i32,
    price_per_share: BigDecimal,
    transaction_date: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<BuyOutcome, AppError> {
    ensure_positive(shares, &price_per_share)?;

    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    let date = transaction_date.unwrap_or_else(chrono::Utc::now);
    let buy = Transaction::new(
        user_id,
        stock_id,
        TransactionType::Buy,
        shares,
        price_per_share,
        date,
    );
    let lot = ShareLot::from_buy(&buy);

    let mut db_tx = pool.begin().await?;
    transaction_queries::insert(&mut db_tx, &buy).await?;
    share_lot_queries::insert(&mut db_tx, &lot).await?;
    db_tx.commit().await?;

    Ok(BuyOutcome {
        transaction_id: buy.id,
        lot_id: lot.id,
    })
}

/// Sell the exact lots the caller selected. The fetch locks the rows and
/// requires the full requested set to still be active; anything less means
/// a concurrent sell or a stale selection, and nothing is written.
pub async fn record_sell(
    pool: &PgPool,
    user_id: Uuid,
    stock_id: Uuid,
    request: SellLotsRequest,
) -> Result<SellOutcome, AppError> {
    if request.lot_ids.is_empty() {
        return Err(AppError::Validation(
            "Please select at least one lot to sell".into(),
        ));
    }
    if request.sell_price_per_share <= BigDecimal::zero() {
        return Err(AppError::Validation("Sell price must be positive".into()));
    }

    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    let date = request.sell_date.unwrap_or_else(chrono::Utc::now);

    let mut db_tx = pool.begin().await?;

    let lots = share_lot_queries::fetch_active_for_update(
        &mut db_tx,
        &request.lot_ids,
        user_id,
        stock_id,
    )
    .await?;
    if lots.len() != request.lot_ids.len() {
        return Err(AppError::Conflict(
            "Some selected lots are not available for sale".into(),
        ));
    }

    let (total_shares, total_amount) = sell_totals(&lots, &request.sell_price_per_share);
    let sell = Transaction::new(
        user_id,
        stock_id,
        TransactionType::Sell,
        total_shares,
        request.sell_price_per_share.clone(),
        date,
    );
    transaction_queries::insert(&mut db_tx, &sell).await?;
    share_lot_queries::mark_sold(
        &mut db_tx,
        &request.lot_ids,
        sell.id,
        &request.sell_price_per_share,
        date,
    )
    .await?;

    db_tx.commit().await?;

    Ok(SellOutcome {
        transaction_id: sell.id,
        total_shares,
        total_amount,
    })
}

/// Edit an active lot and re-sync its originating buy transaction so the
/// 1:1 pair stays consistent. Sold lots are immutable.
pub async fn edit_lot(
    pool: &PgPool,
    user_id: Uuid,
    lot_id: Uuid,
    input: EditShareLot,
) -> Result<ShareLot, AppError> {
    if input.shares <= 0 || input.buy_price_per_share <= BigDecimal::zero() {
        return Err(AppError::Validation(
            "Valid buy date, price, and shares are required".into(),
        ));
    }

    let mut db_tx = pool.begin().await?;

    let lot = share_lot_queries::fetch_one_for_update(&mut db_tx, lot_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Share lot not found".into()))?;
    if !lot.is_active() {
        return Err(AppError::Conflict("Sold lots cannot be edited".into()));
    }

    share_lot_queries::update_fields(
        &mut db_tx,
        lot_id,
        input.buy_date,
        &input.buy_price_per_share,
        input.shares,
    )
    .await?;

    if let Some(buy_transaction_id) = lot.buy_transaction_id {
        let total_amount = BigDecimal::from(input.shares) * &input.buy_price_per_share;
        transaction_queries::update_buy_fields(
            &mut db_tx,
            buy_transaction_id,
            input.shares,
            &input.buy_price_per_share,
            &total_amount,
            input.buy_date,
        )
        .await?;
    }

    db_tx.commit().await?;

    Ok(ShareLot {
        shares: input.shares,
        buy_price_per_share: input.buy_price_per_share,
        buy_date: input.buy_date,
        ..lot
    })
}

/// Delete an active lot and shrink its originating buy transaction by the
/// lot's shares. The decrement is priced at the transaction's stored
/// price_per_share rather than the lot's buy price; the two can diverge
/// through independent edits. A transaction left at zero shares is removed.
pub async fn delete_lot(
    pool: &PgPool,
    user_id: Uuid,
    lot_id: Uuid,
) -> Result<DeletedLot, AppError> {
    let mut db_tx = pool.begin().await?;

    let lot = share_lot_queries::fetch_one_for_update(&mut db_tx, lot_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Share lot not found".into()))?;
    if !lot.is_active() {
        return Err(AppError::Conflict("Sold lots cannot be deleted".into()));
    }

    share_lot_queries::delete_one(&mut db_tx, lot_id).await?;

    if let Some(buy_transaction_id) = lot.buy_transaction_id {
        transaction_queries::decrement_shares(&mut db_tx, buy_transaction_id, lot.shares).await?;
        if let Some(remaining) = transaction_queries::fetch_shares(&mut db_tx, buy_transaction_id).await? {
            if remaining <= 0 {
                transaction_queries::delete_one(&mut db_tx, buy_transaction_id).await?;
            }
        }
    }

    db_tx.commit().await?;

    Ok(DeletedLot {
        deleted_shares: lot.shares,
        stock_id: lot.stock_id,
    })
}

/// Delete a batch of transactions. Sell deletions revert their lots to
/// active with sell fields cleared; buy deletions orphan their lots by
/// nulling the weak originating reference. All-or-nothing: a partial match
/// on the requested ids writes nothing.
pub async fn delete_transactions(
    pool: &PgPool,
    user_id: Uuid,
    transaction_ids: &[Uuid],
) -> Result<u64, AppError> {
    if transaction_ids.is_empty() {
        return Err(AppError::Validation(
            "Please select at least one transaction to delete".into(),
        ));
    }

    let mut db_tx = pool.begin().await?;

    let rows =
        transaction_queries::fetch_owned_for_update(&mut db_tx, transaction_ids, user_id).await?;
    if rows.len() != transaction_ids.len() {
        return Err(AppError::Validation(
            "Some transactions not found or not accessible".into(),
        ));
    }

    let sell_ids: Vec<Uuid> = rows
        .iter()
        .filter(|row| row.transaction_type == "sell")
        .map(|row| row.id)
        .collect();
    let buy_ids: Vec<Uuid> = rows
        .iter()
        .filter(|row| row.transaction_type == "buy")
        .map(|row| row.id)
        .collect();

    if !sell_ids.is_empty() {
        share_lot_queries::revert_sold_by_sell_transactions(&mut db_tx, &sell_ids).await?;
    }
    if !buy_ids.is_empty() {
        share_lot_queries::clear_buy_references(&mut db_tx, &buy_ids).await?;
    }

    let deleted = transaction_queries::delete_many(&mut db_tx, transaction_ids, user_id).await?;

    db_tx.commit().await?;

    Ok(deleted)
}

/// Delete a stock and everything hanging off it, in dependency order.
pub async fn delete_stock(pool: &PgPool, user_id: Uuid, stock_id: Uuid) -> Result<(), AppError> {
    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    let mut db_tx = pool.begin().await?;
    share_lot_queries::delete_by_stock(&mut db_tx, stock_id).await?;
    transaction_queries::delete_by_stock(&mut db_tx, stock_id).await?;
    stock_queries::delete(&mut db_tx, stock_id, user_id).await?;
    db_tx.commit().await?;

    Ok(())
}

/// Active lots for the sell picker, oldest purchase first.
pub async fn list_active_lots(
    pool: &PgPool,
    user_id: Uuid,
    stock_id: Uuid,
) -> Result<Vec<ShareLot>, AppError> {
    stock_queries::fetch_one(pool, stock_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".into()))?;

    let lots = share_lot_queries::fetch_active_by_stock(pool, stock_id, user_id).await?;
    Ok(lots)
}
