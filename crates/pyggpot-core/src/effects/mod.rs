//! Layer 1: Core Effect Trait Definitions
//!
//! Pure trait definitions for the side effects the ledger needs.
//! This module defines **what** effects can be performed; handlers define **how**.
//!
//! ## Infrastructure Effects (`pyggpot-effects`)
//! - **Random**: uniform integers for the proportional sampler
//! - **Ledger**: transactional row storage
//!
//! ## Testing Effects (`pyggpot-testkit`)
//! - Scripted randomness and fault-injecting stores
//!
//! All ledger code is parameterized by these traits, so the sampler can run
//! against a fixed draw sequence and the operations against an in-memory store.

pub mod ledger;
pub mod random;

pub use ledger::{LedgerStore, LedgerTransaction};
pub use random::RandomEffects;
