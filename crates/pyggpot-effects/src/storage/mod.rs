//! Layer 3: Ledger Store Handlers
//!
//! Both handlers share the same staging model: `begin` locks the committed
//! [`LedgerTable`], and the first write takes a private copy of it. `commit`
//! publishes the copy; dropping the transaction throws the copy away.

mod filesystem;
mod memory;
mod staging;
mod table;

pub use filesystem::{FileLedgerHandler, FileTransaction};
pub use memory::{MemoryLedgerHandler, MemoryTransaction};
pub use table::LedgerTable;
