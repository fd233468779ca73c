//! Lending workflow service
//!
//! Two layers of entry points:
//!
//! - Handlers (`create_loan_application`, `confirm_bid`) run inside a ledger
//!   invocation against its [`LedgerStub`]. They either complete or fail
//!   before anything they wrote is committed.
//! - Submissions (`submit_application`, `submit_confirmation`) run a handler
//!   as a whole [`Ledger`] invocation and record metrics for the committed
//!   outcome, commit failures included.
//!
//! # Example
//!
//! ```
//! use lending_core::{ApplicationInput, Config, ConfirmRequest, LoanStatus, Metrics, SmartLending};
//! use lending_ledger::Ledger;
//!
//! let lending = SmartLending::new(&Config::default(), Metrics::new().unwrap()).unwrap();
//! let ledger = Ledger::in_memory();
//!
//! let input = ApplicationInput::from_args(&[
//!     "A100", "Toyota", "Corolla", "20000", "1234567", "35", "4000", "650",
//! ])
//! .unwrap();
//! let application = lending.submit_application(&ledger, None, &input).unwrap();
//! assert_eq!(application.status, LoanStatus::QuotationsReceived);
//!
//! let bid = application.quotations[0].bidding_number;
//! let request = ConfirmRequest::new("A100", bid, LoanStatus::BidAccepted);
//! let confirmed = ledger
//!     .execute(None, |stub| lending.confirm_bid(stub, &request))
//!     .unwrap();
//! assert_eq!(confirmed.winning_bid().map(|q| q.bidding_number), Some(bid));
//! assert_eq!(lending.metrics().applications_created.get(), 1);
//! ```

use crate::{
    audit,
    bidding::BiddingNumberAllocator,
    evaluation::QuoteEngine,
    metrics::Metrics,
    repository,
    types::{BiddingNumber, LoanApplication, LoanStatus},
    validation::{self, ApplicationInput},
    workflow, Config, Error, Result,
};
use lending_ledger::{Ledger, LedgerStub, StateStore};

/// Number of positional confirmation arguments
pub const CONFIRM_ARG_COUNT: usize = 3;

/// Bid confirmation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// Application to confirm
    pub application_number: String,
    /// Quote selected (ignored for `BidRejected`)
    pub bidding_number: BiddingNumber,
    /// Requested status code; only `BidAccepted` and `BidRejected` apply
    pub target_code: i64,
}

impl ConfirmRequest {
    /// Create request
    pub fn new(
        application_number: impl Into<String>,
        bidding_number: BiddingNumber,
        target_status: LoanStatus,
    ) -> Self {
        Self::with_code(
            application_number,
            bidding_number,
            i64::from(target_status.code()),
        )
    }

    /// Create request from a raw status code, checked when the request is applied
    pub fn with_code(
        application_number: impl Into<String>,
        bidding_number: BiddingNumber,
        target_code: i64,
    ) -> Self {
        Self {
            application_number: application_number.into(),
            bidding_number,
            target_code,
        }
    }

    /// Requested status, if the code names one
    pub fn target_status(&self) -> Option<LoanStatus> {
        LoanStatus::from_code(self.target_code)
    }

    /// Build from positional arguments: number, bidding number, status
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != CONFIRM_ARG_COUNT {
            return Err(Error::InvalidInput(format!(
                "expected {} arguments, got {}",
                CONFIRM_ARG_COUNT,
                args.len()
            )));
        }

        let application_number = args[0].as_ref();
        if application_number.is_empty() {
            return Err(Error::InvalidInput("application number is empty".to_string()));
        }

        let bidding_number = args[1].as_ref().parse::<BiddingNumber>().map_err(|_| {
            Error::InvalidInput(format!("bidding number is not valid: {:?}", args[1].as_ref()))
        })?;

        // Numeric codes pass through; an unknown code is a bad transition, not bad input
        let raw = args[2].as_ref().trim();
        let target_code = match raw.parse::<i64>() {
            Ok(code) => code,
            Err(_) => raw
                .parse::<LoanStatus>()
                .map(|status| i64::from(status.code()))
                .map_err(|e| Error::InvalidInput(e.to_string()))?,
        };

        Ok(Self::with_code(application_number, bidding_number, target_code))
    }
}

/// The lending workflow core
#[derive(Debug)]
pub struct SmartLending {
    /// Lender panel evaluation
    engine: QuoteEngine,

    /// Metrics sink
    metrics: Metrics,
}

impl SmartLending {
    /// Create service from configuration and a metrics sink
    pub fn new(config: &Config, metrics: Metrics) -> Result<Self> {
        let engine = QuoteEngine::new(config.panel.clone())?;

        tracing::info!(
            service = %config.service_name,
            lenders = engine.panel().len(),
            "Lending workflow initialized"
        );

        Ok(Self { engine, metrics })
    }

    /// Quote engine in use
    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    /// Metrics sink
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Validate, persist, solicit quotes from every lender, persist again.
    pub fn create_loan_application<L: LedgerStub + ?Sized>(
        &self,
        stub: &mut L,
        input: &ApplicationInput,
    ) -> Result<LoanApplication> {
        let mut application = validation::validate(stub, input)?;
        self.persist(stub, &mut application)?;

        let params = application.evaluation_params();
        let mut allocator = BiddingNumberAllocator::for_application(&application);
        let quotations = self.engine.evaluate(&params, &mut allocator);
        allocator.store(&mut application);

        workflow::receive_quotations(&mut application, quotations)?;
        self.persist(stub, &mut application)?;

        Ok(application)
    }

    /// Select the winning quote, or reject all quotes.
    pub fn confirm_bid<L: LedgerStub + ?Sized>(
        &self,
        stub: &mut L,
        request: &ConfirmRequest,
    ) -> Result<LoanApplication> {
        let mut application = repository::load(stub, &request.application_number)?;

        let target = request
            .target_status()
            .ok_or_else(|| Error::InvalidTransition {
                from: application.status,
                target: request.target_code.to_string(),
                reason: "unknown status code".to_string(),
            })?;

        workflow::confirm(&mut application, request.bidding_number, target)?;
        self.persist(stub, &mut application)?;

        Ok(application)
    }

    /// Run [`create_loan_application`](Self::create_loan_application) as one
    /// ledger invocation and record its committed outcome.
    pub fn submit_application<S: StateStore>(
        &self,
        ledger: &Ledger<S>,
        caller: Option<Vec<u8>>,
        input: &ApplicationInput,
    ) -> Result<LoanApplication> {
        let result = ledger.execute(caller, |stub| self.create_loan_application(stub, input));

        match &result {
            Ok(application) => {
                let accepted = application.quotations.iter().filter(|q| q.is_accepted()).count();
                self.metrics
                    .record_application_created(accepted, application.quotations.len() - accepted);

                tracing::info!(
                    application_number = %application.application_number,
                    status = %application.status,
                    accepted,
                    "Loan application created"
                );
            }
            Err(err) => self.observe_failure("create_loan_application", &input.application_number, err),
        }

        result
    }

    /// Run [`confirm_bid`](Self::confirm_bid) as one ledger invocation and
    /// record its committed outcome.
    pub fn submit_confirmation<S: StateStore>(
        &self,
        ledger: &Ledger<S>,
        caller: Option<Vec<u8>>,
        request: &ConfirmRequest,
    ) -> Result<LoanApplication> {
        let result = ledger.execute(caller, |stub| self.confirm_bid(stub, request));

        match &result {
            Ok(application) => {
                let outcome = match application.status {
                    LoanStatus::BidAccepted => "bid_accepted",
                    _ => "bid_rejected",
                };
                self.metrics.record_bid_confirmed(outcome);
            }
            Err(err) => self.observe_failure("confirm_bid", &request.application_number, err),
        }

        result
    }

    /// Read an application without modifying it
    pub fn get_application_details<L: LedgerStub + ?Sized>(
        &self,
        stub: &L,
        application_number: &str,
    ) -> Result<LoanApplication> {
        repository::load(stub, application_number).map_err(|err| {
            self.observe_failure("get_application_details", application_number, &err);
            err
        })
    }

    /// Append the audit entry, then write. The stored record carries its own entry.
    fn persist<L: LedgerStub + ?Sized>(&self, stub: &mut L, application: &mut LoanApplication) -> Result<()> {
        audit::record(stub, application)?;
        repository::save(stub, application)
    }

    fn observe_failure(&self, operation: &str, application_number: &str, err: &Error) {
        self.metrics.record_failure(operation, err.kind());
        tracing::warn!(
            operation,
            application_number = %application_number,
            kind = err.kind(),
            error = %err,
            "Invocation rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_request_from_args() {
        let request = ConfirmRequest::from_args(&["A100", "3", "2"]).unwrap();
        assert_eq!(request, ConfirmRequest::new("A100", 3, LoanStatus::BidAccepted));

        let named = ConfirmRequest::from_args(&["A100", "3", "BID_REJECTED"]).unwrap();
        assert_eq!(named.target_status(), Some(LoanStatus::BidRejected));

        // Well-formed codes are carried as-is and judged against the application
        let unknown = ConfirmRequest::from_args(&["A100", "3", "7"]).unwrap();
        assert_eq!(unknown.target_code, 7);
        assert_eq!(unknown.target_status(), None);
    }

    #[test]
    fn test_confirm_request_rejects_bad_args() {
        let cases: [&[&str]; 5] = [
            &["A100", "3"],
            &["", "3", "2"],
            &["A100", "three", "2"],
            &["A100", "-3", "2"],
            &["A100", "3", "ACCEPTED"],
        ];

        for args in cases {
            assert!(
                matches!(ConfirmRequest::from_args(args), Err(Error::InvalidInput(_))),
                "{:?}",
                args
            );
        }
    }

    fn created(lending: &SmartLending) -> Ledger<lending_ledger::MemoryStore> {
        let ledger = Ledger::in_memory();
        let input = ApplicationInput::from_args(&[
            "A100", "Toyota", "Corolla", "20000", "1234567", "35", "4000", "650",
        ])
        .unwrap();
        lending.submit_application(&ledger, None, &input).unwrap();
        ledger
    }

    #[test]
    fn test_unknown_status_code_is_invalid_transition() {
        let lending = SmartLending::new(&Config::default(), Metrics::new().unwrap()).unwrap();
        let ledger = created(&lending);
        let before = ledger.get_state("A100").unwrap();

        for code in ["7", "5", "-1"] {
            let request = ConfirmRequest::from_args(&["A100", "1", code]).unwrap();
            let err = lending.submit_confirmation(&ledger, None, &request).unwrap_err();

            assert_eq!(err.kind(), "invalid_transition", "{}", code);
            assert!(matches!(
                err,
                Error::InvalidTransition { from: LoanStatus::QuotationsReceived, ref target, .. } if target == code
            ));
        }
        assert_eq!(ledger.get_state("A100").unwrap(), before);
    }

    #[test]
    fn test_unknown_application_checked_before_status_code() {
        let lending = SmartLending::new(&Config::default(), Metrics::new().unwrap()).unwrap();
        let ledger = Ledger::in_memory();

        let request = ConfirmRequest::with_code("A404", 1, 7);
        let err = lending.submit_confirmation(&ledger, None, &request).unwrap_err();
        assert!(matches!(err, Error::UnknownApplication(_)));
    }

    #[test]
    fn test_handlers_leave_metrics_to_submissions() {
        let lending = SmartLending::new(&Config::default(), Metrics::new().unwrap()).unwrap();
        let ledger = Ledger::in_memory();
        let input = ApplicationInput::from_args(&[
            "A200", "Honda", "Civic", "15000", "7654321", "40", "2500", "550",
        ])
        .unwrap();

        ledger
            .execute(None, |stub| lending.create_loan_application(stub, &input))
            .unwrap();
        assert_eq!(lending.metrics().applications_created.get(), 0);
    }

    #[test]
    fn test_empty_panel_rejected() {
        let config = Config {
            panel: vec![],
            ..Config::default()
        };
        assert!(matches!(
            SmartLending::new(&config, Metrics::new().unwrap()),
            Err(Error::Config(_))
        ));
    }
}
