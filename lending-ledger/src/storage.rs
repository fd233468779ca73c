//! Committed state behind the ledger
//!
//! # Column Families (RocksDB)
//!
//! - `state` - Current value per key
//! - `txlog` - Append-only transaction log (key: big-endian height)

use crate::{
    error::{Error, Result},
    types::{TxRecord, WriteSet},
    Config,
};
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::collections::BTreeMap;
use std::fmt;

/// Column family names
const CF_STATE: &str = "state";
const CF_TXLOG: &str = "txlog";

/// Committed key/value state plus the transaction log.
///
/// `commit` must apply the write set and the log record atomically.
pub trait StateStore: Send + Sync {
    /// Read committed value for a key
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Height the next committed transaction will receive
    fn next_height(&self) -> Result<u64>;

    /// Apply a write set and append its log record
    fn commit(&self, writes: &WriteSet, record: &TxRecord) -> Result<()>;

    /// Full transaction log in commit order
    fn tx_log(&self) -> Result<Vec<TxRecord>>;
}

#[derive(Default)]
struct MemoryInner {
    state: BTreeMap<String, Vec<u8>>,
    log: Vec<TxRecord>,
}

/// In-memory state store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MemoryStore")
            .field("keys", &inner.state.len())
            .field("height", &inner.log.len())
            .finish()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.read().state.get(key).cloned())
    }

    fn next_height(&self) -> Result<u64> {
        Ok(self.inner.read().log.len() as u64)
    }

    fn commit(&self, writes: &WriteSet, record: &TxRecord) -> Result<()> {
        let mut inner = self.inner.write();
        for (key, value) in writes {
            inner.state.insert(key.clone(), value.clone());
        }
        inner.log.push(record.clone());
        Ok(())
    }

    fn tx_log(&self) -> Result<Vec<TxRecord>> {
        Ok(self.inner.read().log.clone())
    }
}

/// RocksDB-backed state store
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_STATE, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_TXLOG, Self::cf_options_txlog()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = ?path, service = %config.service_name, "Opened RocksDB state store");

        Ok(Self { db })
    }

    fn cf_options_state() -> Options {
        let mut opts = Options::default();
        // Application records are read on every invocation
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_txlog() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }
}

impl fmt::Debug for RocksStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksStore")
            .field("path", &self.db.path())
            .finish()
    }
}

impl StateStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_handle(CF_STATE)?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    fn next_height(&self) -> Result<u64> {
        let cf = self.cf_handle(CF_TXLOG)?;

        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _) = item?;
                let bytes = <[u8; 8]>::try_from(&key[..])
                    .map_err(|_| Error::Storage("Malformed txlog key".to_string()))?;
                Ok(u64::from_be_bytes(bytes) + 1)
            }
            None => Ok(0),
        }
    }

    fn commit(&self, writes: &WriteSet, record: &TxRecord) -> Result<()> {
        let mut batch = WriteBatch::default();

        let cf_state = self.cf_handle(CF_STATE)?;
        for (key, value) in writes {
            batch.put_cf(cf_state, key.as_bytes(), value);
        }

        let cf_txlog = self.cf_handle(CF_TXLOG)?;
        batch.put_cf(cf_txlog, record.height.to_be_bytes(), bincode::serialize(record)?);

        // Atomic commit
        self.db.write(batch)?;

        tracing::debug!(height = record.height, tx_id = %record.tx_id, "Write set committed");

        Ok(())
    }

    fn tx_log(&self) -> Result<Vec<TxRecord>> {
        let cf = self.cf_handle(CF_TXLOG)?;

        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }

        Ok(records)
    }
}
