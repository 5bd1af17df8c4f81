/// Lot accounting business-logic tests.
///
/// These tests exercise the accounting rules against an in-memory ledger:
/// - buys open exactly one lot each
/// - selective sells close the chosen lots under one sell transaction
/// - deleting a sell transaction reverts its lots to active
/// - deleting a lot shrinks its originating buy transaction
/// - holdings and earnings are pure functions of lot state
///
/// NOTE: These tests validate the business rules end to end. Full
/// integration tests against a live database require a running Postgres.

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// In-memory ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Buy,
    Sell,
}

#[derive(Debug, Clone)]
struct TxRow {
    id: Uuid,
    kind: Kind,
    shares: i32,
    price: BigDecimal,
    total: BigDecimal,
}

#[derive(Debug, Clone)]
struct LotRow {
    id: Uuid,
    buy_transaction_id: Option<Uuid>,
    shares: i32,
    buy_price: BigDecimal,
    sell_transaction_id: Option<Uuid>,
    sell_price: Option<BigDecimal>,
    active: bool,
}

#[derive(Debug, Default)]
struct Ledger {
    transactions: Vec<TxRow>,
    lots: Vec<LotRow>,
    shares_removed_via_lot_delete: i64,
}

#[derive(Debug, PartialEq)]
enum LedgerError {
    Conflict,
    Validation,
}

impl Ledger {
    fn record_buy(&mut self, shares: i32, price: &str) -> (Uuid, Uuid) {
        let price = BigDecimal::from_str(price).unwrap();
        let tx = TxRow {
            id: Uuid::new_v4(),
            kind: Kind::Buy,
            shares,
            price: price.clone(),
            total: BigDecimal::from(shares) * &price,
        };
        let lot = LotRow {
            id: Uuid::new_v4(),
            buy_transaction_id: Some(tx.id),
            shares,
            buy_price: price,
            sell_transaction_id: None,
            sell_price: None,
            active: true,
        };
        let ids = (tx.id, lot.id);
        self.transactions.push(tx);
        self.lots.push(lot);
        ids
    }

    fn record_sell(&mut self, lot_ids: &[Uuid], price: &str) -> Result<Uuid, LedgerError> {
        if lot_ids.is_empty() {
            return Err(LedgerError::Validation);
        }
        let price = BigDecimal::from_str(price).unwrap();

        // The fetch-then-verify-count guard: every requested lot must still
        // be active, otherwise nothing is written.
        let available: Vec<Uuid> = self
            .lots
            .iter()
            .filter(|lot| lot.active && lot_ids.contains(&lot.id))
            .map(|lot| lot.id)
            .collect();
        if available.len() != lot_ids.len() {
            return Err(LedgerError::Conflict);
        }

        let total_shares: i32 = self
            .lots
            .iter()
            .filter(|lot| lot_ids.contains(&lot.id))
            .map(|lot| lot.shares)
            .sum();
        let tx = TxRow {
            id: Uuid::new_v4(),
            kind: Kind::Sell,
            shares: total_shares,
            price: price.clone(),
            total: BigDecimal::from(total_shares) * &price,
        };
        let tx_id = tx.id;
        self.transactions.push(tx);

        for lot in self.lots.iter_mut().filter(|lot| lot_ids.contains(&lot.id)) {
            lot.active = false;
            lot.sell_transaction_id = Some(tx_id);
            lot.sell_price = Some(price.clone());
        }
        Ok(tx_id)
    }

    fn delete_transactions(&mut self, ids: &[Uuid]) -> Result<usize, LedgerError> {
        let owned: Vec<&TxRow> = self
            .transactions
            .iter()
            .filter(|tx| ids.contains(&tx.id))
            .collect();
        if owned.len() != ids.len() {
            return Err(LedgerError::Validation);
        }

        let sell_ids: Vec<Uuid> = owned
            .iter()
            .filter(|tx| tx.kind == Kind::Sell)
            .map(|tx| tx.id)
            .collect();
        let buy_ids: Vec<Uuid> = owned
            .iter()
            .filter(|tx| tx.kind == Kind::Buy)
            .map(|tx| tx.id)
            .collect();

        for lot in &mut self.lots {
            if let Some(sell_tx) = lot.sell_transaction_id {
                if sell_ids.contains(&sell_tx) {
                    lot.active = true;
                    lot.sell_transaction_id = None;
                    lot.sell_price = None;
                }
            }
            if let Some(buy_tx) = lot.buy_transaction_id {
                if buy_ids.contains(&buy_tx) {
                    lot.buy_transaction_id = None;
                }
            }
        }

        let before = self.transactions.len();
        self.transactions.retain(|tx| !ids.contains(&tx.id));
        Ok(before - self.transactions.len())
    }

    fn delete_lot(&mut self, lot_id: Uuid) -> Result<i32, LedgerError> {
        let lot = self
            .lots
            .iter()
            .find(|lot| lot.id == lot_id)
            .cloned()
            .ok_or(LedgerError::Validation)?;
        if !lot.active {
            return Err(LedgerError::Conflict);
        }

        self.lots.retain(|l| l.id != lot_id);
        self.shares_removed_via_lot_delete += lot.shares as i64;

        if let Some(buy_tx_id) = lot.buy_transaction_id {
            let mut empty = false;
            if let Some(tx) = self.transactions.iter_mut().find(|tx| tx.id == buy_tx_id) {
                // Decrement priced at the transaction's own stored price,
                // not the lot's buy price.
                tx.shares -= lot.shares;
                tx.total = &tx.total - BigDecimal::from(lot.shares) * &tx.price;
                empty = tx.shares <= 0;
            }
            if empty {
                self.transactions.retain(|tx| tx.id != buy_tx_id);
            }
        }
        Ok(lot.shares)
    }

    fn current_shares(&self) -> i64 {
        self.lots
            .iter()
            .filter(|lot| lot.active)
            .map(|lot| lot.shares as i64)
            .sum()
    }

    fn total_invested(&self) -> BigDecimal {
        self.lots
            .iter()
            .filter(|lot| lot.active)
            .map(|lot| BigDecimal::from(lot.shares) * &lot.buy_price)
            .sum()
    }

    fn avg_buy_price(&self) -> BigDecimal {
        let shares = self.current_shares();
        if shares > 0 {
            self.total_invested() / BigDecimal::from(shares)
        } else {
            BigDecimal::zero()
        }
    }

    fn actual_earned(&self) -> BigDecimal {
        self.lots
            .iter()
            .filter(|lot| !lot.active)
            .map(|lot| {
                (lot.sell_price.as_ref().unwrap() - &lot.buy_price) * BigDecimal::from(lot.shares)
            })
            .sum()
    }

    fn total_bought(&self) -> i64 {
        // All buy shares ever recorded, reconstructed from surviving buys
        // plus shares peeled off through lot deletion.
        self.transactions
            .iter()
            .filter(|tx| tx.kind == Kind::Buy)
            .map(|tx| tx.shares as i64)
            .sum()
    }
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_buy_then_sell() {
    let mut ledger = Ledger::default();
    let (_, lot_id) = ledger.record_buy(10, "100.00");

    assert_eq!(ledger.current_shares(), 10);
    assert_eq!(ledger.avg_buy_price(), dec("100.00"));
    assert_eq!(ledger.total_invested(), dec("1000.00"));
    assert_eq!(ledger.actual_earned(), BigDecimal::zero());

    let sell_tx = ledger.record_sell(&[lot_id], "120.00").unwrap();

    assert_eq!(ledger.current_shares(), 0);
    assert_eq!(ledger.actual_earned(), dec("200.00"));

    let sell = ledger
        .transactions
        .iter()
        .find(|tx| tx.id == sell_tx)
        .unwrap();
    assert_eq!(sell.shares, 10);
    assert_eq!(sell.total, dec("1200.00"));
}

// ---------------------------------------------------------------------------
// Selective sell across lots
// ---------------------------------------------------------------------------

#[test]
fn test_partial_sell_across_lots_nets_to_zero() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(5, "10.00");
    let (_, lot_b) = ledger.record_buy(5, "20.00");

    let sell_tx = ledger.record_sell(&[lot_a, lot_b], "15.00").unwrap();

    let sell = ledger
        .transactions
        .iter()
        .find(|tx| tx.id == sell_tx)
        .unwrap();
    assert_eq!(sell.shares, 10);
    assert_eq!(sell.price, dec("15.00"));
    assert_eq!(sell.total, dec("150.00"));

    // +25 on the cheap lot, -25 on the expensive one
    assert_eq!(ledger.actual_earned(), BigDecimal::zero());
}

#[test]
fn test_sell_leaves_unselected_lots_untouched() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(5, "10.00");
    let (_, _lot_b) = ledger.record_buy(7, "12.00");

    ledger.record_sell(&[lot_a], "11.00").unwrap();

    assert_eq!(ledger.current_shares(), 7);
    assert_eq!(ledger.actual_earned(), dec("5.00"));
}

// ---------------------------------------------------------------------------
// Sell atomicity and the availability guard
// ---------------------------------------------------------------------------

#[test]
fn test_sell_with_unavailable_lot_changes_nothing() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(5, "10.00");
    let (_, lot_b) = ledger.record_buy(5, "20.00");
    ledger.record_sell(&[lot_b], "25.00").unwrap();

    let tx_count = ledger.transactions.len();
    let earned_before = ledger.actual_earned();

    // lot_b is already sold, so the whole request must be rejected
    let result = ledger.record_sell(&[lot_a, lot_b], "30.00");
    assert_eq!(result.unwrap_err(), LedgerError::Conflict);

    assert_eq!(ledger.transactions.len(), tx_count);
    assert_eq!(ledger.current_shares(), 5);
    assert_eq!(ledger.actual_earned(), earned_before);
}

#[test]
fn test_overlapping_sells_exactly_one_wins() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(5, "10.00");
    let (_, lot_b) = ledger.record_buy(5, "10.00");

    // Two requests race for lot_a; the store serializes them, so the
    // second observes lot_a as no longer active and loses cleanly.
    let first = ledger.record_sell(&[lot_a], "12.00");
    let second = ledger.record_sell(&[lot_a, lot_b], "12.00");

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), LedgerError::Conflict);
    assert_eq!(ledger.current_shares(), 5);
    assert_eq!(
        ledger
            .transactions
            .iter()
            .filter(|tx| tx.kind == Kind::Sell)
            .count(),
        1
    );
}

#[test]
fn test_sell_requires_at_least_one_lot() {
    let mut ledger = Ledger::default();
    ledger.record_buy(5, "10.00");

    assert_eq!(
        ledger.record_sell(&[], "12.00").unwrap_err(),
        LedgerError::Validation
    );
}

// ---------------------------------------------------------------------------
// Deleting transactions
// ---------------------------------------------------------------------------

#[test]
fn test_deleting_sell_transaction_reverts_lots() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(5, "10.00");
    let (_, lot_b) = ledger.record_buy(5, "20.00");
    let sell_tx = ledger.record_sell(&[lot_a, lot_b], "15.00").unwrap();

    assert_eq!(ledger.current_shares(), 0);

    let deleted = ledger.delete_transactions(&[sell_tx]).unwrap();
    assert_eq!(deleted, 1);

    // The shares are held again and no sell residue remains
    assert_eq!(ledger.current_shares(), 10);
    assert_eq!(ledger.actual_earned(), BigDecimal::zero());
    assert!(ledger
        .lots
        .iter()
        .all(|lot| lot.active && lot.sell_transaction_id.is_none() && lot.sell_price.is_none()));
}

#[test]
fn test_deleting_buy_transaction_orphans_its_lot() {
    let mut ledger = Ledger::default();
    let (buy_tx, lot_id) = ledger.record_buy(5, "10.00");

    ledger.delete_transactions(&[buy_tx]).unwrap();

    let lot = ledger.lots.iter().find(|lot| lot.id == lot_id).unwrap();
    assert!(lot.active);
    assert_eq!(lot.buy_transaction_id, None);
    assert_eq!(ledger.current_shares(), 5);
}

#[test]
fn test_delete_transactions_is_all_or_nothing() {
    let mut ledger = Ledger::default();
    let (buy_tx, _) = ledger.record_buy(5, "10.00");
    let unknown = Uuid::new_v4();

    let result = ledger.delete_transactions(&[buy_tx, unknown]);
    assert_eq!(result.unwrap_err(), LedgerError::Validation);
    assert_eq!(ledger.transactions.len(), 1);
}

// ---------------------------------------------------------------------------
// Deleting lots (orphan correction)
// ---------------------------------------------------------------------------

#[test]
fn test_deleting_last_lot_removes_its_transaction() {
    let mut ledger = Ledger::default();
    let (buy_tx, lot_id) = ledger.record_buy(5, "10.00");

    let deleted_shares = ledger.delete_lot(lot_id).unwrap();
    assert_eq!(deleted_shares, 5);
    assert!(ledger.transactions.iter().all(|tx| tx.id != buy_tx));
    assert_eq!(ledger.current_shares(), 0);
}

#[test]
fn test_deleting_sold_lot_is_rejected() {
    let mut ledger = Ledger::default();
    let (_, lot_id) = ledger.record_buy(5, "10.00");
    ledger.record_sell(&[lot_id], "12.00").unwrap();

    assert_eq!(ledger.delete_lot(lot_id).unwrap_err(), LedgerError::Conflict);
}

#[test]
fn test_lot_delete_decrement_uses_transaction_price() {
    let mut ledger = Ledger::default();
    let (buy_tx, lot_id) = ledger.record_buy(10, "10.00");

    // The lot's buy price diverges from the transaction's stored price
    if let Some(lot) = ledger.lots.iter_mut().find(|lot| lot.id == lot_id) {
        lot.buy_price = dec("99.00");
        lot.shares = 4;
    }

    ledger.delete_lot(lot_id).unwrap();

    // 4 shares at the transaction's 10.00, not the lot's 99.00
    let tx = ledger.transactions.iter().find(|tx| tx.id == buy_tx).unwrap();
    assert_eq!(tx.shares, 6);
    assert_eq!(tx.total, dec("60.00"));
}

// ---------------------------------------------------------------------------
// Conservation and read purity
// ---------------------------------------------------------------------------

#[test]
fn test_share_conservation_across_operations() {
    let mut ledger = Ledger::default();
    let (_, lot_a) = ledger.record_buy(10, "10.00");
    let (_, lot_b) = ledger.record_buy(20, "12.00");
    let (_, lot_c) = ledger.record_buy(5, "8.00");

    ledger.record_sell(&[lot_a], "15.00").unwrap();
    ledger.delete_lot(lot_c).unwrap();

    let active: i64 = ledger.current_shares();
    let sold: i64 = ledger
        .lots
        .iter()
        .filter(|lot| !lot.active)
        .map(|lot| lot.shares as i64)
        .sum();

    assert_eq!(active, 20);
    assert_eq!(sold, 10);

    // active + sold == every buy share ever recorded - shares removed
    // through lot deletion
    let bought_ever = ledger.total_bought() + ledger.shares_removed_via_lot_delete;
    assert_eq!(bought_ever, 35);
    assert_eq!(active + sold, bought_ever - ledger.shares_removed_via_lot_delete);

    // lot_b untouched
    let lot = ledger.lots.iter().find(|lot| lot.id == lot_b).unwrap();
    assert!(lot.active);
}

#[test]
fn test_holdings_reads_are_idempotent() {
    let mut ledger = Ledger::default();
    let (_, lot_id) = ledger.record_buy(10, "100.00");
    ledger.record_sell(&[lot_id], "120.00").unwrap();

    assert_eq!(ledger.actual_earned(), ledger.actual_earned());
    assert_eq!(ledger.current_shares(), ledger.current_shares());
}

#[test]
fn test_avg_buy_price_guards_zero_shares() {
    let ledger = Ledger::default();
    assert_eq!(ledger.avg_buy_price(), BigDecimal::zero());
}
