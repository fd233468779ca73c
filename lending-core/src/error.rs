//! Error types for the lending workflow

use crate::types::LoanStatus;
use thiserror::Error;

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Workflow errors. Every variant is terminal for the invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing creation/confirmation fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Application number already taken
    #[error("Application already exists: {0}")]
    DuplicateApplication(String),

    /// Confirmation or query against a missing application
    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    /// No quotation with the given bidding number
    #[error("Unknown bid {bidding_number} for application {application_number}")]
    UnknownBid {
        /// Application the bid was looked up in
        application_number: String,
        /// Bidding number that did not match
        bidding_number: u64,
    },

    /// Status change not permitted by the workflow
    #[error("Invalid transition from {from} to {target}: {reason}")]
    InvalidTransition {
        /// Status the application is in
        from: LoanStatus,
        /// Requested target, as supplied
        target: String,
        /// Why the transition was refused
        reason: String,
    },

    /// Ledger get/put or transaction metadata failure
    #[error("Ledger error: {0}")]
    Storage(#[from] lending_ledger::Error),

    /// Stored record could not be encoded or decoded
    #[error("Record codec error for {key}: {source}")]
    Codec {
        /// State key of the record
        key: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable label for the error kind.
    ///
    /// Codec failures are storage failures from the caller's point of view.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::DuplicateApplication(_) => "duplicate_application",
            Error::UnknownApplication(_) => "unknown_application",
            Error::UnknownBid { .. } => "unknown_bid",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Storage(_) | Error::Codec { .. } => "storage",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }

    /// True for ledger and record codec failures
    pub fn is_storage(&self) -> bool {
        self.kind() == "storage"
    }
}
