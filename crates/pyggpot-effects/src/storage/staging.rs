//! Copy-on-write staging shared by the ledger transactions

use super::table::LedgerTable;
use parking_lot::MutexGuard;
use pyggpot_core::{LedgerRow, NewLedgerRow, PotId, RowId, StoreError};

/// Committed table held under its lock, plus a private copy taken on the
/// first write.
///
/// Reads go to the copy once it exists, so a transaction sees its own
/// writes. A read-only transaction never copies the table.
pub(crate) struct StagedTable<'a> {
    committed: MutexGuard<'a, LedgerTable>,
    staged: Option<LedgerTable>,
}

impl<'a> StagedTable<'a> {
    pub(crate) fn new(committed: MutexGuard<'a, LedgerTable>) -> Self {
        Self {
            committed,
            staged: None,
        }
    }

    pub(crate) fn has_writes(&self) -> bool {
        self.staged.is_some()
    }

    fn view(&self) -> &LedgerTable {
        self.staged.as_ref().unwrap_or(&*self.committed)
    }

    fn writable(&mut self) -> &mut LedgerTable {
        let committed = &self.committed;
        self.staged
            .get_or_insert_with(|| LedgerTable::clone(committed))
    }

    pub(crate) fn fetch(&self, pot: PotId) -> Vec<LedgerRow> {
        self.view().fetch(pot)
    }

    pub(crate) fn insert(&mut self, row: NewLedgerRow) -> Result<LedgerRow, StoreError> {
        self.writable().insert(row)
    }

    pub(crate) fn update(&mut self, row: &LedgerRow) -> Result<(), StoreError> {
        self.writable().update(row)
    }

    pub(crate) fn delete(&mut self, id: RowId) -> Result<(), StoreError> {
        self.writable().delete(id)
    }

    /// Hand the staged copy to `publish` and, when it succeeds, make it the
    /// committed table. Nothing is published when the copy is unchanged.
    pub(crate) fn commit_with(
        self,
        publish: impl FnOnce(&LedgerTable) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let Self {
            mut committed,
            staged,
        } = self;
        let Some(staged) = staged else {
            return Ok(());
        };
        if *committed == staged {
            return Ok(());
        }
        publish(&staged)?;
        *committed = staged;
        Ok(())
    }
}
