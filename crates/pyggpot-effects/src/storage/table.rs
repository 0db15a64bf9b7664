//! Row table shared by the ledger handlers

use pyggpot_core::{Coins, LedgerRow, NewLedgerRow, PotId, RowId, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// All ledger rows of a store, keyed by row id.
///
/// Row ids are handed out from a monotonically increasing counter and never
/// reused, so iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTable {
    next_id: u64,
    rows: BTreeMap<RowId, LedgerRow>,
}

impl LedgerTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of one pot in ascending row-id order.
    pub fn fetch(&self, pot: PotId) -> Vec<LedgerRow> {
        self.rows
            .values()
            .filter(|row| row.pot_id == pot)
            .cloned()
            .collect()
    }

    /// Insert a row under the next free id.
    ///
    /// Fails once the id counter is exhausted; ids are never reused.
    pub fn insert(&mut self, row: NewLedgerRow) -> Result<LedgerRow, StoreError> {
        let id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::WriteFailed("row id counter exhausted".into()))?;
        self.next_id = id;
        let row = row.with_id(RowId(id));
        debug!(
            row = %row.id,
            pot = %row.pot_id,
            kind = %row.denomination,
            count = row.count,
            "insert row"
        );
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    /// Overwrite an existing row.
    pub fn update(&mut self, row: &LedgerRow) -> Result<(), StoreError> {
        let slot = self
            .rows
            .get_mut(&row.id)
            .ok_or(StoreError::RowNotFound(row.id))?;
        debug!(row = %row.id, from = slot.count, to = row.count, "update row");
        *slot = row.clone();
        Ok(())
    }

    /// Delete an existing row.
    pub fn delete(&mut self, id: RowId) -> Result<(), StoreError> {
        self.rows.remove(&id).ok_or(StoreError::RowNotFound(id))?;
        debug!(row = %id, "delete row");
        Ok(())
    }

    /// Number of rows across all pots.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// On-disk layout of a ledger table.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LedgerFile {
    pub(crate) version: u32,
    pub(crate) next_id: u64,
    pub(crate) rows: Vec<LedgerRow>,
}

impl LedgerFile {
    pub(crate) const VERSION: u32 = 1;
}

impl From<&LedgerTable> for LedgerFile {
    fn from(table: &LedgerTable) -> Self {
        Self {
            version: Self::VERSION,
            next_id: table.next_id,
            rows: table.rows.values().cloned().collect(),
        }
    }
}

impl TryFrom<LedgerFile> for LedgerTable {
    type Error = StoreError;

    fn try_from(file: LedgerFile) -> Result<Self, Self::Error> {
        if file.version != LedgerFile::VERSION {
            return Err(StoreError::ReadFailed(format!(
                "unsupported ledger file version {}",
                file.version
            )));
        }
        let mut rows = BTreeMap::new();
        for row in file.rows {
            if row.id.0 > file.next_id {
                return Err(StoreError::ReadFailed(format!(
                    "{} is beyond the id counter {}",
                    row.id, file.next_id
                )));
            }
            if row.count > Coins::MAX_COUNT {
                return Err(StoreError::ReadFailed(format!(
                    "{} holds {} coins, more than {}",
                    row.id,
                    row.count,
                    Coins::MAX_COUNT
                )));
            }
            if rows.insert(row.id, row).is_some() {
                return Err(StoreError::ReadFailed("duplicate row id".into()));
            }
        }
        Ok(Self {
            next_id: file.next_id,
            rows,
        })
    }
}
