//! Application records over the ledger stub
//!
//! Records are stored as JSON under their application number and always
//! decoded into an owned value; decode failures are surfaced, never skipped.

use crate::{types::LoanApplication, Error, Result};
use lending_ledger::LedgerStub;

/// Whether a record exists under the application number
pub fn exists<L: LedgerStub + ?Sized>(stub: &L, application_number: &str) -> Result<bool> {
    Ok(stub.get_state(application_number)?.is_some())
}

/// Load a record if present
pub fn find<L: LedgerStub + ?Sized>(
    stub: &L,
    application_number: &str,
) -> Result<Option<LoanApplication>> {
    let Some(bytes) = stub.get_state(application_number)? else {
        return Ok(None);
    };

    let application = serde_json::from_slice(&bytes).map_err(|source| Error::Codec {
        key: application_number.to_string(),
        source,
    })?;
    Ok(Some(application))
}

/// Load a record that must exist
pub fn load<L: LedgerStub + ?Sized>(stub: &L, application_number: &str) -> Result<LoanApplication> {
    find(stub, application_number)?
        .ok_or_else(|| Error::UnknownApplication(application_number.to_string()))
}

/// Serialized form returned to callers and stored on the ledger
pub fn encode(application: &LoanApplication) -> Result<Vec<u8>> {
    serde_json::to_vec(application).map_err(|source| Error::Codec {
        key: application.application_number.clone(),
        source,
    })
}

/// Write a record under its application number
pub fn save<L: LedgerStub + ?Sized>(stub: &mut L, application: &LoanApplication) -> Result<()> {
    let bytes = encode(application)?;
    stub.put_state(&application.application_number, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanStatus;
    use lending_ledger::{Ledger, LedgerStub};
    use rust_decimal::Decimal;

    fn application(number: &str) -> LoanApplication {
        LoanApplication {
            application_number: number.to_string(),
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            loan_amount: Decimal::new(2_000_050, 2),
            ssn: "1234567".to_string(),
            age: 35,
            monthly_income: Decimal::new(400_000, 2),
            credit_score: 650,
            status: LoanStatus::Applied,
            quotations: vec![],
            transactions: vec![],
            next_bidding_number: 1,
        }
    }

    #[test]
    fn test_save_then_load_is_lossless() {
        let ledger = Ledger::in_memory();
        let original = application("A100");

        ledger
            .execute(None, |stub| save(stub, &original))
            .unwrap();

        let loaded = ledger.execute(None, |stub| load(stub, "A100")).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.loan_amount.to_string(), "20000.50");
    }

    #[test]
    fn test_load_missing_is_unknown_application() {
        let ledger = Ledger::in_memory();

        let err = ledger.execute(None, |stub| load(stub, "A404")).unwrap_err();
        assert!(matches!(err, Error::UnknownApplication(n) if n == "A404"));

        let found = ledger.execute(None, |stub| find(stub, "A404")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_corrupt_record_is_a_storage_error() {
        let ledger = Ledger::in_memory();
        ledger
            .execute(None, |stub| -> Result<()> {
                stub.put_state("A100", b"not json".to_vec())?;
                Ok(())
            })
            .unwrap();

        let err = ledger.execute(None, |stub| find(stub, "A100")).unwrap_err();
        assert!(err.is_storage());

        assert!(ledger.execute(None, |stub| exists(stub, "A100")).unwrap());
    }
}
