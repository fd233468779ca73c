//! Bidding number allocation
//!
//! Numbers come from a per-application counter persisted on the application
//! itself, so replaying the same invocation yields the same numbers.

use crate::types::{BiddingNumber, LoanApplication};
use crate::validation::FIRST_BIDDING_NUMBER;

/// Monotonic bidding number source for one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiddingNumberAllocator {
    next: BiddingNumber,
}

impl BiddingNumberAllocator {
    /// Resume from a stored counter; unset counters start at the first number
    pub fn resume(next: BiddingNumber) -> Self {
        Self {
            next: next.max(FIRST_BIDDING_NUMBER),
        }
    }

    /// Resume from an application's stored counter
    pub fn for_application(application: &LoanApplication) -> Self {
        Self::resume(application.next_bidding_number)
    }

    /// Issue the next number
    pub fn issue(&mut self) -> BiddingNumber {
        let number = self.next;
        self.next += 1;
        number
    }

    /// Number the next `issue` will return
    pub fn peek(&self) -> BiddingNumber {
        self.next
    }

    /// Write the counter back to the application
    pub fn store(&self, application: &mut LoanApplication) {
        application.next_bidding_number = self.next;
    }
}
