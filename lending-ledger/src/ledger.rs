//! Ledger orchestration layer
//!
//! Runs invocations one at a time against a [`StateStore`], committing each
//! invocation's write set atomically or not at all.
//!
//! # Example
//!
//! ```
//! use lending_ledger::{Ledger, LedgerStub};
//!
//! let ledger = Ledger::in_memory();
//! ledger
//!     .execute(None, |stub| -> lending_ledger::Result<()> {
//!         stub.put_state("A100", b"{}".to_vec())
//!     })
//!     .unwrap();
//!
//! assert!(ledger.get_state("A100").unwrap().is_some());
//! assert_eq!(ledger.history().unwrap().len(), 1);
//! ```

use crate::{
    storage::{MemoryStore, RocksStore, StateStore},
    stub::Transaction,
    types::{TxHeader, TxRecord},
    Config, Error, Result,
};
use parking_lot::Mutex;
use std::fmt;

/// Main ledger interface
pub struct Ledger<S: StateStore> {
    /// Committed state and transaction log
    store: S,

    /// Single-writer lock: one invocation fully applied before the next begins
    writer: Mutex<()>,
}

impl Ledger<MemoryStore> {
    /// Ledger over an in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl Ledger<RocksStore> {
    /// Open a RocksDB-backed ledger
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(RocksStore::open(config)?))
    }
}

impl<S: StateStore> Ledger<S> {
    /// Wrap a state store
    pub fn new(store: S) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Run an invocation under a fresh transaction header.
    ///
    /// The write set is committed only when `f` returns `Ok`.
    pub fn execute<T, E, F>(&self, caller: Option<Vec<u8>>, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_, S>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        self.execute_with(TxHeader::new(caller), f)
    }

    /// Run an invocation under a caller-supplied header (replay).
    pub fn execute_with<T, E, F>(&self, header: TxHeader, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_, S>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let _guard = self.writer.lock();

        let mut tx = Transaction::new(&self.store, header);
        let output = match f(&mut tx) {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(
                    tx_id = %tx.header().tx_id,
                    pending_writes = tx.write_set().len(),
                    "Invocation failed, write set discarded"
                );
                return Err(err);
            }
        };

        let (header, writes) = tx.into_parts();
        if writes.is_empty() {
            return Ok(output);
        }

        let record = TxRecord {
            height: self.store.next_height()?,
            tx_id: header.tx_id,
            timestamp: header.timestamp,
            keys: writes.keys().cloned().collect(),
        };
        self.store.commit(&writes, &record)?;

        tracing::info!(
            height = record.height,
            tx_id = %record.tx_id,
            keys = record.keys.len(),
            "Transaction committed"
        );

        Ok(output)
    }

    /// Read committed state outside any transaction
    pub fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key)
    }

    /// Transaction log in commit order
    pub fn history(&self) -> Result<Vec<TxRecord>> {
        self.store.tx_log()
    }

    /// Underlying state store
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: StateStore + fmt::Debug> fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger").field("store", &self.store).finish()
    }
}
