//! Smart Lending Ledger
//!
//! Key/value ledger substrate the lending workflow runs on.
//!
//! # Architecture
//!
//! - **Transactions**: Every invocation runs against a buffered write set
//! - **Single Writer**: One invocation is fully applied before the next begins
//! - **Atomic Commit**: Write set and log record land together or not at all
//! - **Transaction Log**: Append-only, sequential heights
//!
//! # Invariants
//!
//! - Failed invocations leave no trace in committed state
//! - Deterministic replay: same headers and inputs → same bytes

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod stub;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use storage::{MemoryStore, RocksStore, StateStore};
pub use stub::{LedgerStub, Transaction};
pub use types::{TxHeader, TxRecord, WriteSet};
