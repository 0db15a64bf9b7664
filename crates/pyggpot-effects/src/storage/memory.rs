//! In-memory ledger handler

use super::staging::StagedTable;
use super::table::LedgerTable;
use parking_lot::Mutex;
use pyggpot_core::{
    LedgerRow, LedgerStore, LedgerTransaction, NewLedgerRow, PotId, RowId, StoreError,
};
use std::sync::Arc;

/// In-memory transactional ledger.
///
/// Clones share the same table, so a test can keep a handle for inspection
/// while a `CoinLedger` owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerHandler {
    table: Arc<Mutex<LedgerTable>>,
}

impl MemoryLedgerHandler {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows of a pot.
    ///
    /// Blocks while a transaction is open on this ledger.
    pub fn snapshot(&self, pot: PotId) -> Vec<LedgerRow> {
        self.table.lock().fetch(pot)
    }

    /// Committed row count across all pots.
    pub fn row_count(&self) -> usize {
        self.table.lock().len()
    }
}

/// Open transaction on a [`MemoryLedgerHandler`].
pub struct MemoryTransaction<'a> {
    table: StagedTable<'a>,
}

impl MemoryTransaction<'_> {
    /// Whether this transaction has written anything yet.
    pub fn has_staged_writes(&self) -> bool {
        self.table.has_writes()
    }
}

impl LedgerStore for MemoryLedgerHandler {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        Ok(MemoryTransaction {
            table: StagedTable::new(self.table.lock()),
        })
    }
}

impl LedgerTransaction for MemoryTransaction<'_> {
    fn fetch_rows(&mut self, pot: PotId) -> Result<Vec<LedgerRow>, StoreError> {
        Ok(self.table.fetch(pot))
    }

    fn insert_row(&mut self, row: NewLedgerRow) -> Result<LedgerRow, StoreError> {
        self.table.insert(row)
    }

    fn update_row(&mut self, row: &LedgerRow) -> Result<(), StoreError> {
        self.table.update(row)
    }

    fn delete_row(&mut self, id: RowId) -> Result<(), StoreError> {
        self.table.delete(id)
    }

    fn commit(self) -> Result<(), StoreError> {
        self.table.commit_with(|_| Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyggpot_core::Denomination;

    fn gold(count: u64) -> NewLedgerRow {
        NewLedgerRow {
            pot_id: PotId(1),
            denomination: Denomination::Gold,
            count,
        }
    }

    #[test]
    fn commit_publishes_staged_rows() {
        let store = MemoryLedgerHandler::new();
        let mut tx = store.begin().unwrap();
        tx.insert_row(gold(3)).unwrap();
        tx.commit().unwrap();

        assert_eq!(store.snapshot(PotId(1))[0].count, 3);
    }

    #[test]
    fn dropped_transaction_discards_writes() {
        let store = MemoryLedgerHandler::new();
        {
            let mut tx = store.begin().unwrap();
            tx.insert_row(gold(3)).unwrap();
        }
        let mut tx = store.begin().unwrap();
        tx.insert_row(gold(1)).unwrap();
        tx.rollback();

        assert_eq!(store.row_count(), 0);
    }

    #[test]
    fn transaction_reads_its_own_writes() {
        let store = MemoryLedgerHandler::new();
        let mut tx = store.begin().unwrap();
        let row = tx.insert_row(gold(2)).unwrap();

        assert_eq!(tx.fetch_rows(PotId(1)).unwrap(), vec![row]);
    }

    #[test]
    fn read_only_transaction_stages_nothing() {
        let store = MemoryLedgerHandler::new();
        let mut tx = store.begin().unwrap();
        tx.insert_row(gold(4)).unwrap();
        tx.commit().unwrap();

        let mut tx = store.begin().unwrap();
        assert_eq!(tx.fetch_rows(PotId(1)).unwrap().len(), 1);
        assert!(!tx.has_staged_writes());

        tx.insert_row(gold(1)).unwrap();
        assert!(tx.has_staged_writes());
    }

    #[test]
    fn clones_share_the_table() {
        let store = MemoryLedgerHandler::new();
        let other = store.clone();
        let mut tx = other.begin().unwrap();
        tx.insert_row(gold(1)).unwrap();
        tx.commit().unwrap();

        assert_eq!(store.row_count(), 1);
    }
}
