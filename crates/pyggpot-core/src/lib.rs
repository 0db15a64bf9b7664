//! # Pyggpot Core - Layer 1: Foundation
//!
//! **Purpose**: Define the vocabulary shared by every pyggpot crate.
//!
//! # Architecture Constraints
//!
//! **Layer 1 has no workspace dependencies.**
//! - YES Domain types (pots, ledger rows, denominations, coin entries)
//! - YES Unified error types
//! - YES Effect trait definitions (randomness, ledger store)
//! - NO effect handler implementations (use `pyggpot-effects`)
//! - NO sampling or transaction orchestration (use `pyggpot-ledger`)
//!
//! ## Core Concepts
//!
//! - **Pot**: an opaque id that ledger rows point at; nothing else is persisted
//! - **Ledger row**: `(id, pot, denomination, count)`; rows are never merged
//! - **Effects**: traits describing *what* side effects the ledger needs;
//!   handlers in other crates decide *how*

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Effect trait definitions
pub mod effects;

/// Unified error types
pub mod errors;

/// Domain types
pub mod types;

pub use effects::{LedgerStore, LedgerTransaction, RandomEffects};
pub use errors::{PotError, Result, StoreError};
pub use types::{
    Coins, Denomination, LedgerRow, NewLedgerRow, PotId, RemovalSummary, RowId,
    UnknownDenomination,
};
