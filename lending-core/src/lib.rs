//! Smart Lending Workflow Core
//!
//! Auto-loan application workflow running on a replicated key/value ledger.
//!
//! # Architecture
//!
//! A creation request flows:
//!
//! 1. **Validation**: Parse raw input, reject duplicates
//! 2. **Persist**: Record the application in status `Applied`
//! 3. **Evaluation**: Every panel lender quotes through one shared rule
//! 4. **Transition**: Advance to `QuotationsReceived`
//! 5. **Audit + Persist**: Append transaction metadata, write
//!
//! A confirmation request loads the application, applies the target status
//! (marking the winning quote), audits, and writes.

#![forbid(unsafe_code)]
//!
//! # Invariants
//!
//! - Identity and borrower facts never change after creation
//! - Quotations are solicited exactly once
//! - At most one winning quotation, set only by confirmation
//! - Deterministic replay: bidding numbers come from persisted state

#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod audit;
pub mod bidding;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod lending;
pub mod metrics;
pub mod repository;
pub mod types;
pub mod validation;
pub mod workflow;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use evaluation::{LenderProfile, QuoteEngine};
pub use lending::{ConfirmRequest, SmartLending};
pub use metrics::Metrics;
pub use types::{
    AcceptStatus, BiddingDetails, EvaluationParams, InterestType, LoanApplication, LoanStatus,
    TransactionMetadata,
};
pub use validation::ApplicationInput;
