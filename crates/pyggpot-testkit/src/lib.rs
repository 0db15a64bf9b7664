//! # Pyggpot Testkit - Layer 8: Testing Infrastructure
//!
//! Deterministic and fault-injecting stand-ins for the effect traits, plus
//! fixtures for seeding pots.
//!
//! - [`ScriptedRandom`]: replays a fixed sequence of draws
//! - [`FaultyLedgerHandler`]: wraps any store and fails a chosen operation
//! - [`seed_pot`], [`denomination_totals`], [`arb_pot`]: fixtures and
//!   proptest strategies
//! - [`record_spans`]: captures the tracing spans a closure opens

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Fault-injecting ledger store
pub mod faulty;

/// Pot fixtures and proptest strategies
pub mod fixtures;

/// Scripted randomness
pub mod scripted;

/// Tracing span capture
pub mod spans;

pub use faulty::{FaultyLedgerHandler, FaultyTransaction};
pub use fixtures::{arb_denomination, arb_pot, denomination_totals, seed_pot};
pub use scripted::ScriptedRandom;
pub use spans::record_spans;
