//! Core types for the ledger substrate
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Deterministic iteration order (BTreeMap write sets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identity of one invocation against the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    /// Transaction ID assigned by the substrate
    pub tx_id: String,

    /// Transaction timestamp assigned by the substrate
    pub timestamp: DateTime<Utc>,

    /// Opaque identity of the invoking party
    pub caller: Option<Vec<u8>>,
}

impl TxHeader {
    /// Fresh header with a UUIDv7 transaction ID and the current time
    pub fn new(caller: Option<Vec<u8>>) -> Self {
        Self {
            tx_id: Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            caller,
        }
    }

    /// Header with explicit values, used for replay
    pub fn fixed(
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        caller: Option<Vec<u8>>,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            caller,
        }
    }
}

/// Writes buffered by a transaction, keyed by state key
pub type WriteSet = BTreeMap<String, Vec<u8>>;

/// Entry in the append-only transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Sequential commit height (0-based)
    pub height: u64,

    /// Transaction ID
    pub tx_id: String,

    /// Transaction timestamp
    pub timestamp: DateTime<Utc>,

    /// Keys written by the transaction
    pub keys: Vec<String>,
}
