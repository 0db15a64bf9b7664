//! # Pyggpot Ledger - Layer 2: Domain
//!
//! **Purpose**: Remove coins from pots proportionally at random, and apply
//! every ledger change atomically.
//!
//! # Architecture Constraints
//!
//! **Layer 2 depends only on pyggpot-core** (foundation).
//! - YES Pure proportional sampler over an in-memory snapshot
//! - YES Transaction orchestration over the `LedgerStore` effect
//! - YES Add / Remove / List operations
//! - NO store or randomness handlers (use `pyggpot-effects`)
//! - NO transport or process wiring (use `pyggpot-cli`)
//!
//! ## Control flow of a removal
//!
//! ```text
//! begin ──▶ fetch_rows(pot) ──▶ shake_pot(snapshot, n, random)
//!                                      │
//!                     commit ◀── apply_outcome(updates, deletes)
//! ```
//!
//! Any failure before commit rolls the transaction back, so a removal is
//! all-or-nothing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Transactional application of ledger mutations
pub mod apply;

/// Add / Remove / List operations
pub mod operations;

/// Proportional sampler
pub mod shake;

/// Input validation for coin entries
pub mod validation;

pub use apply::{apply_outcome, with_transaction};
pub use operations::CoinLedger;
pub use shake::{shake_pot, ShakeOutcome};
pub use validation::{ensure_capacity, validate_entries};
