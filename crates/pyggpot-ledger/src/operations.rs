//! Add / Remove / List operations
//!
//! Each call runs to completion inside exactly one store transaction.

use crate::apply::{apply_outcome, with_transaction};
use crate::shake::shake_pot;
use crate::validation::{ensure_capacity, validate_entries};
use pyggpot_core::{
    Coins, LedgerStore, LedgerTransaction, NewLedgerRow, PotError, PotId, RandomEffects,
    RemovalSummary, Result,
};
use tracing::{info, instrument};

/// Coin ledger service over a store and a randomness source.
///
/// The randomness source is shared by every removal this ledger performs;
/// swap in a seeded or scripted handler to make removals reproducible.
#[derive(Debug, Clone)]
pub struct CoinLedger<S, R> {
    store: S,
    random: R,
}

impl<S, R> CoinLedger<S, R>
where
    S: LedgerStore,
    R: RandomEffects,
{
    /// Create a ledger service.
    pub fn new(store: S, random: R) -> Self {
        Self { store, random }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The randomness source used for removals.
    pub fn random(&self) -> &R {
        &self.random
    }

    /// Insert one new row per entry and return the entries as confirmation.
    ///
    /// Entries are never merged into existing rows. The batch is validated
    /// up front; one bad entry rejects all of them and nothing is written.
    /// A batch that would push the pot past [`Coins::MAX_COUNT`] coins is
    /// rejected the same way.
    #[instrument(skip_all, fields(pot = %pot, entries = entries.len()))]
    pub fn add_coins(&self, pot: PotId, entries: &[Coins]) -> Result<Vec<Coins>> {
        let validated = validate_entries(entries)?;

        let inserted = with_transaction(&self.store, "add_coins", |tx| {
            ensure_capacity(&tx.fetch_rows(pot)?, &validated)?;
            validated
                .iter()
                .map(|&(denomination, count)| {
                    tx.insert_row(NewLedgerRow {
                        pot_id: pot,
                        denomination,
                        count,
                    })
                    .map_err(PotError::from)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        info!(rows = inserted.len(), "coins added");
        Ok(entries.to_vec())
    }

    /// Shake up to `count` coins out of a pot.
    ///
    /// Removes `min(count, available)` coins; asking for more than the pot
    /// holds is not an error. Returns what was removed per denomination.
    #[instrument(skip_all, fields(pot = %pot, requested = count))]
    pub fn remove_coins(&self, pot: PotId, count: u64) -> Result<Vec<Coins>> {
        self.remove_with(pot, count, RemovalSummary::to_coins)
    }

    /// Like [`remove_coins`](Self::remove_coins) but returns the summary
    /// itself.
    #[instrument(skip_all, fields(pot = %pot, requested = count))]
    pub fn shake(&self, pot: PotId, count: u64) -> Result<RemovalSummary> {
        self.remove_with(pot, count, |removed| Ok(removed.clone()))
    }

    /// Shake, apply and `render` the summary in one transaction, so a render
    /// failure rolls the removal back.
    fn remove_with<T>(
        &self,
        pot: PotId,
        count: u64,
        render: impl FnOnce(&RemovalSummary) -> Result<T>,
    ) -> Result<T> {
        let (rendered, removed) = with_transaction(&self.store, "remove_coins", |tx| {
            let rows = tx.fetch_rows(pot)?;
            let outcome = shake_pot(&rows, count, &self.random)?;
            apply_outcome(tx, &outcome)?;
            Ok((render(&outcome.removed)?, outcome.removed.total()))
        })?;

        info!(removed, "coins removed");
        Ok(rendered)
    }

    /// Current rows of a pot, one entry per row, unaggregated.
    ///
    /// A pot with no rows yields an empty list.
    #[instrument(skip_all, fields(pot = %pot))]
    pub fn list_coins(&self, pot: PotId) -> Result<Vec<Coins>> {
        let rows = with_transaction(&self.store, "list_coins", |tx| Ok(tx.fetch_rows(pot)?))?;
        rows.iter().map(Coins::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pyggpot_core::{Denomination, StoreError};
    use pyggpot_effects::{MemoryLedgerHandler, SeededRandomHandler};
    use pyggpot_testkit::{FaultyLedgerHandler, ScriptedRandom};

    const POT: PotId = PotId(1);

    #[test]
    fn add_then_list_shows_unmerged_rows() {
        let ledger = CoinLedger::new(MemoryLedgerHandler::new(), ScriptedRandom::new([0]));
        let batch = [
            Coins::new(Denomination::Gold, 2),
            Coins::new(Denomination::Gold, 5),
            Coins::new(Denomination::Bronze, 1),
        ];

        assert_eq!(ledger.add_coins(POT, &batch).unwrap(), batch.to_vec());
        assert_eq!(ledger.list_coins(POT).unwrap(), batch.to_vec());
    }

    #[test]
    fn pots_are_isolated() {
        let ledger = CoinLedger::new(MemoryLedgerHandler::new(), SeededRandomHandler::with_seed(3));
        ledger
            .add_coins(PotId(1), &[Coins::new(Denomination::Silver, 4)])
            .unwrap();
        ledger
            .add_coins(PotId(2), &[Coins::new(Denomination::Gold, 4)])
            .unwrap();

        let removed = ledger.remove_coins(PotId(1), 10).unwrap();

        assert_eq!(removed, vec![Coins::new(Denomination::Silver, 4)]);
        assert!(ledger.list_coins(PotId(1)).unwrap().is_empty());
        assert_eq!(
            ledger.list_coins(PotId(2)).unwrap(),
            vec![Coins::new(Denomination::Gold, 4)]
        );
    }

    #[test]
    fn invalid_batch_never_opens_a_transaction() {
        let store = FaultyLedgerHandler::new(MemoryLedgerHandler::new()).fail_begin();
        let ledger = CoinLedger::new(store, ScriptedRandom::new([0]));

        let result = ledger.add_coins(POT, &[Coins::new(Denomination::Unknown, 1)]);

        assert_matches!(result, Err(PotError::Validation { .. }));
    }

    #[test]
    fn failed_insert_keeps_earlier_inserts_out() {
        let inner = MemoryLedgerHandler::new();
        let store = FaultyLedgerHandler::new(inner.clone()).fail_insert_at(2);
        let ledger = CoinLedger::new(store, ScriptedRandom::new([0]));

        let result = ledger.add_coins(
            POT,
            &[
                Coins::new(Denomination::Gold, 1),
                Coins::new(Denomination::Silver, 1),
            ],
        );

        assert_matches!(result, Err(PotError::Store(StoreError::WriteFailed(_))));
        assert!(inner.snapshot(POT).is_empty());
    }

    #[test]
    fn read_failure_surfaces_from_list() {
        let store = FaultyLedgerHandler::new(MemoryLedgerHandler::new()).fail_read();
        let ledger = CoinLedger::new(store, ScriptedRandom::new([0]));

        assert_matches!(
            ledger.list_coins(POT),
            Err(PotError::Store(StoreError::ReadFailed(_)))
        );
    }

    #[test]
    fn ledger_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoinLedger<MemoryLedgerHandler, SeededRandomHandler>>();
    }

    #[test]
    fn shake_reports_summary_by_denomination() {
        let ledger = CoinLedger::new(MemoryLedgerHandler::new(), ScriptedRandom::new([0, 3]));
        ledger
            .add_coins(
                POT,
                &[
                    Coins::new(Denomination::Gold, 1),
                    Coins::new(Denomination::Bronze, 3),
                ],
            )
            .unwrap();

        // draw 0 of 4 → gold; draw 3 of 3 wraps to 0 → bronze
        let summary = ledger.shake(POT, 2).unwrap();

        assert_eq!(summary.removed(Denomination::Gold), 1);
        assert_eq!(summary.removed(Denomination::Bronze), 1);
        assert_eq!(
            ledger.list_coins(POT).unwrap(),
            vec![Coins::new(Denomination::Bronze, 2)]
        );
    }
}
