//! Application workflow state machine
//!
//! ```text
//! Applied ──quotes──▶ QuotationsReceived ──confirm──▶ BidAccepted
//!                                        └─confirm──▶ BidRejected
//! ```
//!
//! Transitions mutate the in-memory application only; callers persist.

use crate::{
    types::{BiddingDetails, BiddingNumber, LoanApplication, LoanStatus},
    Error, Result,
};

/// Attach the panel's quotes and advance to `QuotationsReceived`.
///
/// Quotes are solicited exactly once per application.
pub fn receive_quotations(
    application: &mut LoanApplication,
    quotations: Vec<BiddingDetails>,
) -> Result<()> {
    let target = LoanStatus::QuotationsReceived;

    if !application.status.can_transition_to(target) {
        return Err(Error::InvalidTransition {
            from: application.status,
            target: target.to_string(),
            reason: "quotes can only be received for a new application".to_string(),
        });
    }

    if !application.quotations.is_empty() {
        return Err(Error::InvalidTransition {
            from: application.status,
            target: target.to_string(),
            reason: "quotations already received".to_string(),
        });
    }

    application.quotations = quotations;
    application.status = target;

    tracing::info!(
        application_number = %application.application_number,
        quotations = application.quotations.len(),
        accepted = application.quotations.iter().filter(|q| q.is_accepted()).count(),
        "Quotations received"
    );

    Ok(())
}

/// Apply a confirmation to an application awaiting one.
///
/// `BidAccepted` marks the quote with `bidding_number` as the winner;
/// `BidRejected` marks nothing. Nothing is changed on error.
pub fn confirm(
    application: &mut LoanApplication,
    bidding_number: BiddingNumber,
    target: LoanStatus,
) -> Result<()> {
    if application.status != LoanStatus::QuotationsReceived {
        let reason = if application.status.is_terminal() {
            "application already confirmed"
        } else {
            "application has no quotations yet"
        };
        return Err(Error::InvalidTransition {
            from: application.status,
            target: target.to_string(),
            reason: reason.to_string(),
        });
    }

    if !target.is_terminal() || !application.status.can_transition_to(target) {
        return Err(Error::InvalidTransition {
            from: application.status,
            target: target.to_string(),
            reason: "target must be BID_ACCEPTED or BID_REJECTED".to_string(),
        });
    }

    if target == LoanStatus::BidAccepted {
        let index = application
            .quotations
            .iter()
            .position(|q| q.bidding_number == bidding_number)
            .ok_or_else(|| Error::UnknownBid {
                application_number: application.application_number.clone(),
                bidding_number,
            })?;

        if !application.quotations[index].is_accepted() {
            return Err(Error::InvalidTransition {
                from: application.status,
                target: target.to_string(),
                reason: format!("bid {} was rejected by its lender", bidding_number),
            });
        }

        application.quotations[index].is_winning_bid = true;
    }

    application.status = target;

    tracing::info!(
        application_number = %application.application_number,
        bidding_number,
        status = %target,
        "Bid confirmed"
    );

    Ok(())
}
