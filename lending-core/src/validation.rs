//! Creation input validation
//!
//! Turns the raw, externally supplied creation fields into a well-formed
//! [`LoanApplication`] in status `Applied`. The only side effect is the
//! read used for the duplicate check.

use crate::{
    repository,
    types::{LoanApplication, LoanStatus},
    Error, Result,
};
use lending_ledger::LedgerStub;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of positional creation arguments
pub const CREATE_ARG_COUNT: usize = 8;

/// First bidding number issued for a new application
pub const FIRST_BIDDING_NUMBER: u64 = 1;

/// Raw creation fields, as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationInput {
    /// Application number
    pub application_number: String,
    /// Vehicle make
    pub make: String,
    /// Vehicle model
    pub model: String,
    /// Loan amount (decimal)
    pub loan_amount: String,
    /// SSN
    pub ssn: String,
    /// Age (integer)
    pub age: String,
    /// Monthly income (decimal)
    pub monthly_income: String,
    /// Credit score (integer)
    pub credit_score: String,
}

impl ApplicationInput {
    /// Build from positional arguments in creation order
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != CREATE_ARG_COUNT {
            return Err(Error::InvalidInput(format!(
                "expected {} arguments, got {}",
                CREATE_ARG_COUNT,
                args.len()
            )));
        }

        let arg = |i: usize| args[i].as_ref().to_string();
        Ok(Self {
            application_number: arg(0),
            make: arg(1),
            model: arg(2),
            loan_amount: arg(3),
            ssn: arg(4),
            age: arg(5),
            monthly_income: arg(6),
            credit_score: arg(7),
        })
    }
}

/// Parse and check creation input, then reject duplicates.
pub fn validate<L: LedgerStub + ?Sized>(stub: &L, input: &ApplicationInput) -> Result<LoanApplication> {
    let application = parse(input)?;

    if repository::exists(stub, &application.application_number)? {
        return Err(Error::DuplicateApplication(application.application_number));
    }

    Ok(application)
}

/// Field-level checks, no store access
pub fn parse(input: &ApplicationInput) -> Result<LoanApplication> {
    if input.application_number.is_empty() {
        return Err(Error::InvalidInput("application number is empty".to_string()));
    }

    let loan_amount = parse_field::<Decimal>("loan amount", &input.loan_amount)?;
    if loan_amount <= Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "loan amount must be positive, got {}",
            loan_amount
        )));
    }

    let age = parse_field::<u32>("age", &input.age)?;

    let monthly_income = parse_field::<Decimal>("monthly income", &input.monthly_income)?;
    if monthly_income < Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "monthly income must not be negative, got {}",
            monthly_income
        )));
    }

    let credit_score = parse_field::<i32>("credit score", &input.credit_score)?;

    Ok(LoanApplication {
        application_number: input.application_number.clone(),
        make: input.make.clone(),
        model: input.model.clone(),
        loan_amount,
        ssn: input.ssn.clone(),
        age,
        monthly_income,
        credit_score,
        status: LoanStatus::Applied,
        quotations: Vec::new(),
        transactions: Vec::new(),
        next_bidding_number: FIRST_BIDDING_NUMBER,
    })
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| Error::InvalidInput(format!("{} is not a valid number: {:?}", name, raw)))
}
