//! # Pyggpot Effects - Layer 3: Effect Handlers
//!
//! **Purpose**: Concrete implementations of the effect traits defined in
//! `pyggpot-core`.
//!
//! - [`MemoryLedgerHandler`]: transactional ledger held in process memory
//! - [`FileLedgerHandler`]: the same ledger persisted to a JSON file
//! - [`SeededRandomHandler`]: ChaCha20 generator, time-seeded or fixed-seed
//!
//! **Layer Constraint**: NO scripted or fault-injecting handlers here; those
//! belong in `pyggpot-testkit`.
//!
//! Both ledger handlers serialise transactions: `begin` holds the table lock
//! until the transaction commits or is dropped. That gives every transaction
//! a stable snapshot and rules out lost updates between concurrent removals.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Random effect handlers
pub mod random;

/// Ledger store handlers
pub mod storage;

pub use random::SeededRandomHandler;
pub use storage::{
    FileLedgerHandler, FileTransaction, LedgerTable, MemoryLedgerHandler, MemoryTransaction,
};
