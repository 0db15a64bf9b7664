//! Ledger store effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `pyggpot-effects` (memory and file handlers)
//! - **Usage**: `pyggpot-ledger` operations, always through one transaction
//!
//! Every row access happens on a transaction handle. Handlers must give each
//! transaction a stable view of the rows it reads and must keep concurrent
//! transactions from losing each other's updates.

use crate::errors::StoreError;
use crate::types::{LedgerRow, NewLedgerRow, PotId, RowId};
use std::sync::Arc;

/// Row access scoped to one open transaction.
///
/// Writes become visible to other transactions only after [`commit`].
/// Dropping the handle without committing discards them.
///
/// [`commit`]: LedgerTransaction::commit
pub trait LedgerTransaction {
    /// All rows of a pot, ordered by ascending row id.
    fn fetch_rows(&mut self, pot: PotId) -> Result<Vec<LedgerRow>, StoreError>;

    /// Insert a new row and return it with its assigned id.
    fn insert_row(&mut self, row: NewLedgerRow) -> Result<LedgerRow, StoreError>;

    /// Overwrite an existing row.
    fn update_row(&mut self, row: &LedgerRow) -> Result<(), StoreError>;

    /// Delete an existing row.
    fn delete_row(&mut self, id: RowId) -> Result<(), StoreError>;

    /// Publish all writes made through this handle.
    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;

    /// Discard all writes made through this handle.
    fn rollback(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// A transactional store of ledger rows.
pub trait LedgerStore {
    /// Transaction handle type
    type Transaction<'a>: LedgerTransaction
    where
        Self: 'a;

    /// Open a transaction.
    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    type Transaction<'a> = S::Transaction<'a> where Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        (**self).begin()
    }
}
