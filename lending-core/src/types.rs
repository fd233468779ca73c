//! Core types for the lending workflow
//!
//! All types are designed for:
//! - Lossless JSON round-trips (camelCase field names)
//! - Exact arithmetic (Decimal for amounts and rates)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lender identifier within the configured panel
pub type LenderId = u32;

/// Quote identifier, unique within one application
pub type BiddingNumber = u64;

/// Application lifecycle status.
///
/// ```text
/// Applied → QuotationsReceived → BidAccepted | BidRejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum LoanStatus {
    /// Application accepted for evaluation
    #[default]
    Applied = 0,
    /// Lender quotes attached
    QuotationsReceived = 1,
    /// Borrower accepted one quote (terminal)
    BidAccepted = 2,
    /// Borrower rejected all quotes (terminal)
    BidRejected = 3,
}

impl LoanStatus {
    /// Numeric status code
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Status for a numeric code
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Applied),
            1 => Some(Self::QuotationsReceived),
            2 => Some(Self::BidAccepted),
            3 => Some(Self::BidRejected),
            _ => None,
        }
    }

    /// SCREAMING_SNAKE_CASE name, as serialized
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::QuotationsReceived => "QUOTATIONS_RECEIVED",
            Self::BidAccepted => "BID_ACCEPTED",
            Self::BidRejected => "BID_REJECTED",
        }
    }

    /// No further quote solicitation or confirmation once terminal
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::BidAccepted | Self::BidRejected)
    }

    /// Whether the workflow permits moving from `self` to `target`
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Applied, Self::QuotationsReceived)
                | (Self::QuotationsReceived, Self::BidAccepted)
                | (Self::QuotationsReceived, Self::BidRejected)
        )
    }

    /// Valid next states
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Applied => vec![Self::QuotationsReceived],
            Self::QuotationsReceived => vec![Self::BidAccepted, Self::BidRejected],
            Self::BidAccepted | Self::BidRejected => vec![],
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown loan status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for LoanStatus {
    type Err = ParseStatusError;

    /// Accepts the numeric code or the serialized name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| ParseStatusError(s.to_string()));
        }
        match s {
            "APPLIED" => Ok(Self::Applied),
            "QUOTATIONS_RECEIVED" => Ok(Self::QuotationsReceived),
            "BID_ACCEPTED" => Ok(Self::BidAccepted),
            "BID_REJECTED" => Ok(Self::BidRejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Interest type a lender prices with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    /// Simple interest
    Simple,
    /// Floating interest
    Floating,
}

impl fmt::Display for InterestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestType::Simple => f.write_str("simple"),
            InterestType::Floating => f.write_str("floating"),
        }
    }
}

/// Lender decision on an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AcceptStatus {
    /// Lender declined
    Rejected = 0,
    /// Lender quoted
    Accepted = 1,
}

/// One lender's answer to an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingDetails {
    /// Owning application (back-reference)
    pub application_number: String,

    /// Unique within the owning application
    pub bidding_number: BiddingNumber,

    /// Lender that produced the quote
    pub lender_id: LenderId,

    /// Amount the lender will lend (zero when rejected)
    pub sanctioned_amount: Decimal,

    /// Lender's interest type
    pub interest_type: InterestType,

    /// Annual rate in percent (zero when rejected)
    pub interest_rate: Decimal,

    /// Accept/reject decision
    pub application_accept_status: AcceptStatus,

    /// Present iff rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Set only by bid confirmation
    #[serde(default)]
    pub is_winning_bid: bool,
}

impl BiddingDetails {
    /// Lender quoted terms
    pub fn is_accepted(&self) -> bool {
        self.application_accept_status == AcceptStatus::Accepted
    }
}

/// Audit record appended on every persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetadata {
    /// Status at the time of the write
    pub application_state: LoanStatus,

    /// Ledger transaction ID
    pub transaction_id: String,

    /// Ledger transaction time; absent if the ledger could not supply it
    #[serde(default)]
    pub transaction_timestamp: Option<DateTime<Utc>>,

    /// Caller identity bytes; empty if none were supplied
    #[serde(default)]
    pub caller_metadata: Vec<u8>,
}

/// Loan application aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    /// Globally unique, immutable identity
    pub application_number: String,

    /// Vehicle make
    pub make: String,

    /// Vehicle model
    pub model: String,

    /// Requested amount (positive)
    pub loan_amount: Decimal,

    /// Borrower SSN
    pub ssn: String,

    /// Borrower age
    pub age: u32,

    /// Borrower monthly income (non-negative)
    pub monthly_income: Decimal,

    /// Borrower credit score
    pub credit_score: i32,

    /// Workflow status
    pub status: LoanStatus,

    /// Lender quotes, in panel order
    #[serde(default)]
    pub quotations: Vec<BiddingDetails>,

    /// Audit trail, in write order
    #[serde(default)]
    pub transactions: Vec<TransactionMetadata>,

    /// Next bidding number the allocator will issue
    #[serde(default)]
    pub next_bidding_number: BiddingNumber,
}

impl LoanApplication {
    /// Quotation with the given bidding number
    pub fn quotation(&self, bidding_number: BiddingNumber) -> Option<&BiddingDetails> {
        self.quotations
            .iter()
            .find(|q| q.bidding_number == bidding_number)
    }

    /// Quotation from the given lender
    pub fn quotation_from(&self, lender_id: LenderId) -> Option<&BiddingDetails> {
        self.quotations.iter().find(|q| q.lender_id == lender_id)
    }

    /// The confirmed winning quotation, if any
    pub fn winning_bid(&self) -> Option<&BiddingDetails> {
        self.quotations.iter().find(|q| q.is_winning_bid)
    }

    /// Underwriting projection handed to lender rules
    pub fn evaluation_params(&self) -> EvaluationParams {
        EvaluationParams {
            application_number: self.application_number.clone(),
            loan_amount: self.loan_amount,
            ssn: self.ssn.clone(),
            age: self.age,
            monthly_income: self.monthly_income,
            credit_score: self.credit_score,
        }
    }
}

/// Read-only underwriting fields of an application. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationParams {
    /// Application being evaluated
    pub application_number: String,
    /// Requested amount
    pub loan_amount: Decimal,
    /// Borrower SSN
    pub ssn: String,
    /// Borrower age
    pub age: u32,
    /// Borrower monthly income
    pub monthly_income: Decimal,
    /// Borrower credit score
    pub credit_score: i32,
}
