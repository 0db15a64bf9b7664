//! Transactional application of ledger mutations
//!
//! [`with_transaction`] is the only way the operations touch the store: it
//! commits when the body succeeds and rolls back when it fails, so no
//! partial write is ever visible to a later read.

use crate::shake::ShakeOutcome;
use pyggpot_core::{LedgerStore, LedgerTransaction, PotError, Result};
use tracing::{debug, warn};

/// Persist a shake's updates and deletions on an open transaction.
///
/// Stops at the first failing write; the caller's transaction is then
/// rolled back by [`with_transaction`].
pub fn apply_outcome<T>(tx: &mut T, outcome: &ShakeOutcome) -> Result<()>
where
    T: LedgerTransaction + ?Sized,
{
    for row in &outcome.updated {
        tx.update_row(row)?;
    }
    for id in &outcome.deleted {
        tx.delete_row(*id)?;
    }
    debug!(
        updated = outcome.updated.len(),
        deleted = outcome.deleted.len(),
        "shake applied"
    );
    Ok(())
}

/// Run `body` inside one store transaction.
///
/// Commits when `body` returns `Ok`, rolls back when it returns `Err`.
/// Begin and commit failures surface as [`PotError::Store`].
pub fn with_transaction<'s, S, T, F>(store: &'s S, operation: &str, body: F) -> Result<T>
where
    S: LedgerStore + ?Sized,
    F: FnOnce(&mut S::Transaction<'s>) -> Result<T>,
{
    let mut tx = store.begin().map_err(|err| {
        warn!(operation, error = %err, "could not begin transaction");
        PotError::from(err)
    })?;

    match body(&mut tx) {
        Ok(value) => {
            tx.commit().map_err(|err| {
                warn!(operation, error = %err, "commit failed, transaction discarded");
                PotError::from(err)
            })?;
            Ok(value)
        }
        Err(err) => {
            tx.rollback();
            warn!(operation, error = %err, "transaction rolled back");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shake::shake_pot;
    use assert_matches::assert_matches;
    use pyggpot_core::{Denomination, PotId, StoreError};
    use pyggpot_effects::MemoryLedgerHandler;
    use pyggpot_testkit::{seed_pot, FaultyLedgerHandler, ScriptedRandom};

    const POT: PotId = PotId(9);

    #[test]
    fn body_error_rolls_back_earlier_writes() {
        let store = MemoryLedgerHandler::new();
        seed_pot(&store, POT, &[(Denomination::Gold, 3)]).unwrap();

        let result: Result<()> = with_transaction(&store, "test", |tx| {
            let mut rows = tx.fetch_rows(POT)?;
            rows[0].count = 1;
            tx.update_row(&rows[0])?;
            Err(PotError::validation("abort after write"))
        });

        assert_matches!(result, Err(PotError::Validation { .. }));
        assert_eq!(store.snapshot(POT)[0].count, 3);
    }

    #[test]
    fn commit_publishes_writes() {
        let store = MemoryLedgerHandler::new();
        seed_pot(&store, POT, &[(Denomination::Silver, 4)]).unwrap();

        with_transaction(&store, "test", |tx| {
            let rows = tx.fetch_rows(POT)?;
            let outcome = shake_pot(&rows, 4, &ScriptedRandom::new([0]))?;
            apply_outcome(tx, &outcome)
        })
        .unwrap();

        assert!(store.snapshot(POT).is_empty());
    }

    #[test]
    fn failed_delete_leaves_updates_unpublished() {
        let inner = MemoryLedgerHandler::new();
        seed_pot(
            &inner,
            POT,
            &[(Denomination::Gold, 1), (Denomination::Gold, 5)],
        )
        .unwrap();
        let store = FaultyLedgerHandler::new(inner.clone()).fail_delete_at(1);

        let result = with_transaction(&store, "test", |tx| {
            let rows = tx.fetch_rows(POT)?;
            // Three gold draws: empties row 1, takes two from row 2.
            let outcome = shake_pot(&rows, 3, &ScriptedRandom::new([0]))?;
            apply_outcome(tx, &outcome)
        });

        assert_matches!(result, Err(PotError::Store(StoreError::WriteFailed(_))));
        let counts: Vec<u64> = inner.snapshot(POT).iter().map(|row| row.count).collect();
        assert_eq!(counts, vec![1, 5]);
    }

    #[test]
    fn begin_failure_never_runs_body() {
        let store = FaultyLedgerHandler::new(MemoryLedgerHandler::new()).fail_begin();
        let mut ran = false;

        let result = with_transaction(&store, "test", |_tx| {
            ran = true;
            Ok(())
        });

        assert_matches!(result, Err(PotError::Store(StoreError::BeginFailed(_))));
        assert!(!ran);
    }

    #[test]
    fn commit_failure_surfaces_as_store_error() {
        let inner = MemoryLedgerHandler::new();
        let store = FaultyLedgerHandler::new(inner.clone()).fail_commit();

        let result = with_transaction(&store, "test", |tx| {
            tx.insert_row(pyggpot_core::NewLedgerRow {
                pot_id: POT,
                denomination: Denomination::Bronze,
                count: 2,
            })?;
            Ok(())
        });

        assert_matches!(result, Err(PotError::Store(StoreError::CommitFailed(_))));
        assert!(inner.snapshot(POT).is_empty());
    }
}
