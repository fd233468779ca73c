//! Property-based tests for lending invariants
//!
//! These tests use proptest to verify:
//! - Rejection order: the first failing check decides the reason
//! - Pricing bounds: accepted rates stay within base plus adjustments
//! - Bidding numbers are distinct within an application
//! - Confirmation marks at most one winner and never mutates on failure

use lending_core::{
    bidding::BiddingNumberAllocator,
    evaluation::{self, LenderProfile, Rejection},
    AcceptStatus, ApplicationInput, Config, ConfirmRequest, EvaluationParams, InterestType,
    LoanStatus, Metrics, QuoteEngine, SmartLending,
};
use lending_ledger::Ledger;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating monthly incomes (non-negative, cents precision)
fn income_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating SSNs of arbitrary length
fn ssn_strategy() -> impl Strategy<Value = String> {
    "[0-9]{0,10}"
}

fn params_strategy() -> impl Strategy<Value = EvaluationParams> {
    (
        (1i64..100_000_00i64).prop_map(|cents| Decimal::new(cents, 2)),
        ssn_strategy(),
        0u32..100,
        income_strategy(),
        -100i32..900,
    )
        .prop_map(|(loan_amount, ssn, age, monthly_income, credit_score)| EvaluationParams {
            application_number: "P100".to_string(),
            loan_amount,
            ssn,
            age,
            monthly_income,
            credit_score,
        })
}

/// Strategy for generating applicant input that passes validation
fn input_strategy() -> impl Strategy<Value = ApplicationInput> {
    (
        "[A-Z][0-9]{3}",
        1u32..100_000,
        "[0-9]{5,9}",
        0u32..90,
        0u32..10_000,
        0i32..900,
    )
        .prop_map(
            |(application_number, loan_amount, ssn, age, monthly_income, credit_score)| {
                ApplicationInput {
                    application_number,
                    make: "Toyota".to_string(),
                    model: "Corolla".to_string(),
                    loan_amount: loan_amount.to_string(),
                    ssn,
                    age: age.to_string(),
                    monthly_income: monthly_income.to_string(),
                    credit_score: credit_score.to_string(),
                }
            },
        )
}

fn lender() -> LenderProfile {
    LenderProfile::new(1, InterestType::Simple)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Credit score below 300 is always the recorded reason
    #[test]
    fn prop_low_credit_rejected_first(params in params_strategy(), credit_score in -100i32..300) {
        let params = EvaluationParams { credit_score, ..params };

        let details = evaluation::quote(&lender(), &params, 1);

        prop_assert_eq!(details.application_accept_status, AcceptStatus::Rejected);
        prop_assert_eq!(
            details.rejection_reason.as_deref(),
            Some(Rejection::CreditScore.reason())
        );
        prop_assert_eq!(details.sanctioned_amount, Decimal::ZERO);
        prop_assert_eq!(details.interest_rate, Decimal::ZERO);
    }

    /// Property: Applicants passing every check are accepted at the requested amount
    #[test]
    fn prop_eligible_applicants_accepted(
        params in params_strategy(),
        age in 18u32..100,
        credit_score in 300i32..900,
        income_cents in 1000_00i64..10_000_00i64,
        ssn in "[0-9]{7}",
    ) {
        let params = EvaluationParams {
            age,
            credit_score,
            monthly_income: Decimal::new(income_cents, 2),
            ssn,
            ..params
        };

        let details = evaluation::quote(&lender(), &params, 1);

        prop_assert!(details.is_accepted());
        prop_assert!(details.rejection_reason.is_none());
        prop_assert_eq!(details.sanctioned_amount, params.loan_amount);
    }

    /// Property: Screening and quoting agree
    #[test]
    fn prop_quote_follows_screen(params in params_strategy()) {
        let details = evaluation::quote(&lender(), &params, 1);

        match evaluation::screen(&params) {
            Some(rejection) => {
                prop_assert!(!details.is_accepted());
                prop_assert_eq!(details.rejection_reason.as_deref(), Some(rejection.reason()));
            }
            None => {
                prop_assert!(details.is_accepted());
                prop_assert_eq!(details.interest_rate, evaluation::interest_rate(&params));
            }
        }
    }

    /// Property: Accepted rates lie in [5.00, 6.50]
    #[test]
    fn prop_rate_bounds(params in params_strategy()) {
        let rate = evaluation::interest_rate(&params);

        prop_assert!(rate >= evaluation::base_rate());
        prop_assert!(rate <= Decimal::new(650, 2));
        prop_assert_eq!(
            rate,
            evaluation::base_rate()
                + evaluation::credit_adjustment(params.credit_score)
                + evaluation::age_adjustment(params.age)
                + evaluation::income_adjustment(params.monthly_income)
        );
    }

    /// Property: Every lender quotes and bidding numbers never repeat
    #[test]
    fn prop_bidding_numbers_distinct(params in params_strategy(), start in 1u64..1_000_000) {
        let engine = QuoteEngine::default();
        let mut allocator = BiddingNumberAllocator::resume(start);

        let quotes = engine.evaluate(&params, &mut allocator);

        prop_assert_eq!(quotes.len(), engine.panel().len());
        for (quote, offset) in quotes.iter().zip(0u64..) {
            prop_assert_eq!(quote.bidding_number, start + offset);
        }
        prop_assert_eq!(allocator.peek(), start + quotes.len() as u64);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: Confirmation marks exactly the chosen accepted quote or fails without writing
    #[test]
    fn prop_confirm_marks_at_most_one_winner(input in input_strategy(), pick in 0u64..8) {
        let lending = SmartLending::new(&Config::default(), Metrics::new().unwrap()).unwrap();
        let ledger = Ledger::in_memory();
        let number = input.application_number.clone();

        let created = ledger
            .execute(None, |stub| lending.create_loan_application(stub, &input))
            .unwrap();
        prop_assert_eq!(created.status, LoanStatus::QuotationsReceived);
        prop_assert_eq!(created.transactions.len(), 2);

        let before = ledger.get_state(&number).unwrap();
        let request = ConfirmRequest::new(number.clone(), pick, LoanStatus::BidAccepted);
        let result = ledger.execute(None, |stub| lending.confirm_bid(stub, &request));

        match created.quotation(pick) {
            Some(quote) if quote.is_accepted() => {
                let confirmed = result.unwrap();
                prop_assert_eq!(confirmed.status, LoanStatus::BidAccepted);
                let winners: Vec<_> = confirmed
                    .quotations
                    .iter()
                    .filter(|q| q.is_winning_bid)
                    .map(|q| q.bidding_number)
                    .collect();
                prop_assert_eq!(winners, vec![pick]);
            }
            _ => {
                prop_assert!(result.is_err());
                prop_assert_eq!(ledger.get_state(&number).unwrap(), before);
            }
        }
    }
}
