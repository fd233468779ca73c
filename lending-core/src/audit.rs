//! Audit trail capture
//!
//! One [`TransactionMetadata`] is appended per persist. A missing transaction
//! ID fails the write; a missing timestamp or caller identity does not.

use crate::{
    types::{LoanApplication, LoanStatus, TransactionMetadata},
    Result,
};
use lending_ledger::LedgerStub;

/// Capture metadata for a write of an application in `status`
pub fn capture<L: LedgerStub + ?Sized>(stub: &L, status: LoanStatus) -> Result<TransactionMetadata> {
    let transaction_id = stub.tx_id()?;

    let transaction_timestamp = match stub.tx_timestamp() {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            tracing::warn!(
                tx_id = %transaction_id,
                error = %err,
                "Transaction timestamp unavailable, recording without it"
            );
            None
        }
    };

    let caller_metadata = stub.caller_metadata().unwrap_or_default();

    Ok(TransactionMetadata {
        application_state: status,
        transaction_id,
        transaction_timestamp,
        caller_metadata,
    })
}

/// Append metadata for the application's current status
pub fn record<L: LedgerStub + ?Sized>(stub: &L, application: &mut LoanApplication) -> Result<()> {
    let metadata = capture(stub, application.status)?;
    application.transactions.push(metadata);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::{DateTime, Utc};
    use lending_ledger::{Ledger, TxHeader};

    /// Stub whose metadata calls can be made to fail
    struct FlakyStub {
        tx_id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    }

    impl LedgerStub for FlakyStub {
        fn get_state(&self, _key: &str) -> lending_ledger::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn put_state(&mut self, _key: &str, _value: Vec<u8>) -> lending_ledger::Result<()> {
            Ok(())
        }

        fn tx_id(&self) -> lending_ledger::Result<String> {
            self.tx_id
                .clone()
                .ok_or_else(|| lending_ledger::Error::Transaction("no tx id".to_string()))
        }

        fn tx_timestamp(&self) -> lending_ledger::Result<DateTime<Utc>> {
            self.timestamp
                .ok_or_else(|| lending_ledger::Error::Transaction("no timestamp".to_string()))
        }

        fn caller_metadata(&self) -> Option<Vec<u8>> {
            None
        }
    }

    #[test]
    fn test_capture_from_ledger() {
        let ledger = Ledger::in_memory();
        let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let header = TxHeader::fixed("tx-1", time, Some(b"dealer-9".to_vec()));

        let metadata = ledger
            .execute_with(header, |stub| capture(stub, LoanStatus::Applied))
            .unwrap();

        assert_eq!(metadata.application_state, LoanStatus::Applied);
        assert_eq!(metadata.transaction_id, "tx-1");
        assert_eq!(metadata.transaction_timestamp, Some(time));
        assert_eq!(metadata.caller_metadata, b"dealer-9".to_vec());
    }

    #[test]
    fn test_missing_caller_and_timestamp_are_not_fatal() {
        let stub = FlakyStub {
            tx_id: Some("tx-2".to_string()),
            timestamp: None,
        };

        let metadata = capture(&stub, LoanStatus::QuotationsReceived).unwrap();
        assert!(metadata.transaction_timestamp.is_none());
        assert!(metadata.caller_metadata.is_empty());
    }

    #[test]
    fn test_missing_tx_id_is_fatal() {
        let stub = FlakyStub {
            tx_id: None,
            timestamp: Some(Utc::now()),
        };

        let err = capture(&stub, LoanStatus::Applied).unwrap_err();
        assert!(matches!(err, Error::Storage(lending_ledger::Error::Transaction(_))));
    }
}
