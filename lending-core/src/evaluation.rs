//! Quote evaluation engine
//!
//! Every lender on the panel runs the same acceptance and pricing rule,
//! parameterized only by its [`LenderProfile`]. Lenders never see each
//! other's quotes; quotes are returned in panel order.
//!
//! # Acceptance (first match wins)
//!
//! 1. credit score < 300
//! 2. age < 18
//! 3. SSN not exactly 7 characters
//! 4. monthly income < 1000.00
//!
//! # Pricing
//!
//! `rate = 5.0 + Δcredit + Δage + Δincome`, all brackets strictly open.

use crate::{
    bidding::BiddingNumberAllocator,
    types::{AcceptStatus, BiddingDetails, BiddingNumber, EvaluationParams, InterestType, LenderId},
    Error, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Required SSN length in characters
pub const SSN_LENGTH: usize = 7;

/// Static configuration of one lender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderProfile {
    /// Lender identity
    pub id: LenderId,
    /// Interest type the lender prices with
    pub interest_type: InterestType,
}

impl LenderProfile {
    /// Create profile
    pub const fn new(id: LenderId, interest_type: InterestType) -> Self {
        Self { id, interest_type }
    }
}

/// The four-lender panel, alternating simple/floating
pub fn default_panel() -> Vec<LenderProfile> {
    vec![
        LenderProfile::new(1, InterestType::Simple),
        LenderProfile::new(2, InterestType::Floating),
        LenderProfile::new(3, InterestType::Simple),
        LenderProfile::new(4, InterestType::Floating),
    ]
}

/// Reasons a lender declines an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Credit score below 300
    CreditScore,
    /// Age below 18
    Age,
    /// SSN of the wrong length
    Ssn,
    /// Monthly income below 1000.00
    MonthlyIncome,
}

impl Rejection {
    /// Reason recorded on the quote
    pub const fn reason(&self) -> &'static str {
        match self {
            Rejection::CreditScore => "Not meeting credit score requirements",
            Rejection::Age => "Not meeting age requirements",
            Rejection::Ssn => "Invalid SSN",
            Rejection::MonthlyIncome => "Not meeting monthly income requirements",
        }
    }
}

/// First failing acceptance check, if any
pub fn screen(params: &EvaluationParams) -> Option<Rejection> {
    if params.credit_score < 300 {
        Some(Rejection::CreditScore)
    } else if params.age < 18 {
        Some(Rejection::Age)
    } else if params.ssn.chars().count() != SSN_LENGTH {
        Some(Rejection::Ssn)
    } else if params.monthly_income < Decimal::from(1000) {
        Some(Rejection::MonthlyIncome)
    } else {
        None
    }
}

/// Base annual rate before adjustments
pub fn base_rate() -> Decimal {
    Decimal::new(50, 1)
}

fn quarter() -> Decimal {
    Decimal::new(25, 2)
}

fn half() -> Decimal {
    Decimal::new(50, 2)
}

/// Credit adjustment: (500, 700) → 0.25, (300, 500) → 0.50
pub fn credit_adjustment(credit_score: i32) -> Decimal {
    if credit_score > 500 && credit_score < 700 {
        quarter()
    } else if credit_score > 300 && credit_score < 500 {
        half()
    } else {
        Decimal::ZERO
    }
}

/// Age adjustment: (30, 50) → 0.25, over 50 → 0.50
pub fn age_adjustment(age: u32) -> Decimal {
    if age > 30 && age < 50 {
        quarter()
    } else if age > 50 {
        half()
    } else {
        Decimal::ZERO
    }
}

/// Income adjustment: (1000, 3000) → 0.50, over 3000 → 0.25
pub fn income_adjustment(monthly_income: Decimal) -> Decimal {
    let low = Decimal::from(1000);
    let high = Decimal::from(3000);

    if monthly_income > low && monthly_income < high {
        half()
    } else if monthly_income > high {
        quarter()
    } else {
        Decimal::ZERO
    }
}

/// Priced rate for an accepted application
pub fn interest_rate(params: &EvaluationParams) -> Decimal {
    base_rate()
        + credit_adjustment(params.credit_score)
        + age_adjustment(params.age)
        + income_adjustment(params.monthly_income)
}

/// Run the shared rule for one lender
pub fn quote(
    lender: &LenderProfile,
    params: &EvaluationParams,
    bidding_number: BiddingNumber,
) -> BiddingDetails {
    let mut details = BiddingDetails {
        application_number: params.application_number.clone(),
        bidding_number,
        lender_id: lender.id,
        sanctioned_amount: Decimal::ZERO,
        interest_type: lender.interest_type,
        interest_rate: Decimal::ZERO,
        application_accept_status: AcceptStatus::Rejected,
        rejection_reason: None,
        is_winning_bid: false,
    };

    match screen(params) {
        Some(rejection) => {
            details.rejection_reason = Some(rejection.reason().to_string());
        }
        None => {
            details.application_accept_status = AcceptStatus::Accepted;
            details.sanctioned_amount = params.loan_amount;
            details.interest_rate = interest_rate(params);
        }
    }

    details
}

/// Fans an application out over the lender panel
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    panel: Vec<LenderProfile>,
}

impl QuoteEngine {
    /// Engine over a panel; the panel must be non-empty with distinct ids
    pub fn new(panel: Vec<LenderProfile>) -> Result<Self> {
        validate_panel(&panel)?;
        Ok(Self { panel })
    }

    /// Configured panel, in quote order
    pub fn panel(&self) -> &[LenderProfile] {
        &self.panel
    }

    /// One quote per lender, in panel order
    pub fn evaluate(
        &self,
        params: &EvaluationParams,
        allocator: &mut BiddingNumberAllocator,
    ) -> Vec<BiddingDetails> {
        self.panel
            .iter()
            .map(|lender| {
                let details = quote(lender, params, allocator.issue());

                tracing::debug!(
                    application_number = %params.application_number,
                    lender_id = lender.id,
                    bidding_number = details.bidding_number,
                    accepted = details.is_accepted(),
                    rate = %details.interest_rate,
                    "Lender quote evaluated"
                );

                details
            })
            .collect()
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self {
            panel: default_panel(),
        }
    }
}

/// Panel must be non-empty with distinct lender ids
pub fn validate_panel(panel: &[LenderProfile]) -> Result<()> {
    if panel.is_empty() {
        return Err(Error::Config("lender panel is empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for lender in panel {
        if !seen.insert(lender.id) {
            return Err(Error::Config(format!("duplicate lender id {}", lender.id)));
        }
    }

    Ok(())
}
