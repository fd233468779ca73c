//! The narrow interface the workflow core sees of the ledger
//!
//! A [`Transaction`] is the per-invocation view: reads fall through its
//! buffered write set to committed state, writes stay buffered until the
//! owning [`Ledger`](crate::Ledger) commits them.

use crate::{
    error::{Error, Result},
    storage::StateStore,
    types::{TxHeader, WriteSet},
};
use chrono::{DateTime, Utc};

/// Key/value access plus transaction metadata for one invocation
pub trait LedgerStub {
    /// Current value for a key, if any
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a value for a key
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Transaction ID of the running invocation
    fn tx_id(&self) -> Result<String>;

    /// Timestamp of the running invocation
    fn tx_timestamp(&self) -> Result<DateTime<Utc>>;

    /// Identity of the invoking party, if supplied
    fn caller_metadata(&self) -> Option<Vec<u8>>;
}

/// One in-flight invocation against a state store
#[derive(Debug)]
pub struct Transaction<'a, S: StateStore + ?Sized> {
    store: &'a S,
    header: TxHeader,
    writes: WriteSet,
}

impl<'a, S: StateStore + ?Sized> Transaction<'a, S> {
    /// Open a transaction over committed state
    pub fn new(store: &'a S, header: TxHeader) -> Self {
        Self {
            store,
            header,
            writes: WriteSet::new(),
        }
    }

    /// Transaction header
    pub fn header(&self) -> &TxHeader {
        &self.header
    }

    /// Buffered writes
    pub fn write_set(&self) -> &WriteSet {
        &self.writes
    }

    pub(crate) fn into_parts(self) -> (TxHeader, WriteSet) {
        (self.header, self.writes)
    }
}

impl<S: StateStore + ?Sized> LedgerStub for Transaction<'_, S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.store.get(key),
        }
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidKey("key must not be empty".to_string()));
        }
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn tx_id(&self) -> Result<String> {
        if self.header.tx_id.is_empty() {
            return Err(Error::Transaction("transaction ID unavailable".to_string()));
        }
        Ok(self.header.tx_id.clone())
    }

    fn tx_timestamp(&self) -> Result<DateTime<Utc>> {
        Ok(self.header.timestamp)
    }

    fn caller_metadata(&self) -> Option<Vec<u8>> {
        self.header.caller.clone()
    }
}
