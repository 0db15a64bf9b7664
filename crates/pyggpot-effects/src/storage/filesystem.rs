//! JSON-file ledger handler
//!
//! The whole table lives in one JSON document. A commit writes the staged
//! table to a sibling `.tmp` file, syncs it, and renames it over the ledger
//! file, so a reader of the file sees either the old ledger or the new one.

use super::staging::StagedTable;
use super::table::{LedgerFile, LedgerTable};
use parking_lot::Mutex;
use pyggpot_core::{
    LedgerRow, LedgerStore, LedgerTransaction, NewLedgerRow, PotId, RowId, StoreError,
};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Transactional ledger persisted to a JSON file.
#[derive(Debug)]
pub struct FileLedgerHandler {
    path: PathBuf,
    table: Mutex<LedgerTable>,
}

impl FileLedgerHandler {
    /// Open the ledger at `path`, starting empty when the file does not
    /// exist yet. The file is only created by the first commit.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match fs::read(&path) {
            Ok(bytes) => {
                let file: LedgerFile = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::ReadFailed(format!(
                        "Failed to parse ledger file {}: {e}",
                        path.display()
                    ))
                })?;
                LedgerTable::try_from(file)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => LedgerTable::new(),
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "Failed to read ledger file {}: {e}",
                    path.display()
                )))
            }
        };

        info!(path = %path.display(), rows = table.len(), "ledger opened");
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Committed rows of a pot.
    ///
    /// Blocks while a transaction is open on this ledger.
    pub fn snapshot(&self, pot: PotId) -> Vec<LedgerRow> {
        self.table.lock().fetch(pot)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self, table: &LedgerTable) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&LedgerFile::from(table))
            .map_err(|e| StoreError::CommitFailed(format!("Failed to encode ledger: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::CommitFailed(format!("Failed to create directory: {e}"))
            })?;
        }

        let temp = self.temp_path();
        write_synced(&temp, &bytes).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::CommitFailed(format!("Failed to write file: {e}"))
        })?;
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::CommitFailed(format!("Failed to replace ledger file: {e}"))
        })?;
        if let Err(e) = sync_parent(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not sync ledger directory");
        }

        debug!(path = %self.path.display(), rows = table.len(), "ledger persisted");
        Ok(())
    }
}

/// Write `bytes` to `path` and flush them to disk before returning.
fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Make the rename itself durable.
#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => File::open(parent)?.sync_all(),
        None => File::open(".")?.sync_all(),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Open transaction on a [`FileLedgerHandler`].
pub struct FileTransaction<'a> {
    handler: &'a FileLedgerHandler,
    table: StagedTable<'a>,
}

impl FileTransaction<'_> {
    /// Whether this transaction has written anything yet.
    pub fn has_staged_writes(&self) -> bool {
        self.table.has_writes()
    }
}

impl LedgerStore for FileLedgerHandler {
    type Transaction<'a> = FileTransaction<'a>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        Ok(FileTransaction {
            handler: self,
            table: StagedTable::new(self.table.lock()),
        })
    }
}

impl LedgerTransaction for FileTransaction<'_> {
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
        let handler = self.handler;
        self.table.commit_with(|staged| handler.persist(staged))
    }
}
