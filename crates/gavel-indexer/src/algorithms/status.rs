//! # Lifecycle Derivation
//!
//! Pure derivations from one struct read plus one details read. Status is a
//! function of the reads alone, never carried over from a prior projection.

use crate::domain::{
    datetime_from_unix, AuctionDetails, AuctionStatus, ContractStatus, RawAuctionState, U256,
};
use chrono::{DateTime, Duration, Utc};

/// Derives the domain lifecycle status.
///
/// The ledger's `Closed`/`Paid` distinction collapses to `Ended` here. An
/// `Open` auction whose remaining time hit zero is also `Ended`: the deadline
/// passed but the contract has not transitioned yet, a legitimate transient
/// condition.
#[must_use]
pub fn derive_status(state: &RawAuctionState, details: &AuctionDetails) -> AuctionStatus {
    match state.status {
        ContractStatus::Open if details.seconds_remaining > 0 => AuctionStatus::Active,
        ContractStatus::Open => AuctionStatus::Ended,
        ContractStatus::Closed | ContractStatus::Paid => AuctionStatus::Ended,
    }
}

/// Display price: the current price once a bid has been accepted (the
/// contract leaves it at zero until then), else the opening price.
#[must_use]
pub fn display_price(state: &RawAuctionState) -> U256 {
    if state.current_price.is_zero() {
        state.initial_price
    } else {
        state.current_price
    }
}

/// Nominal start of the bidding window. The ledger records no start time, so
/// a configured nominal duration is subtracted from the deadline; an
/// approximation, not ground truth.
#[must_use]
pub fn derive_start_time(deadline: u64, auction_duration_secs: u64) -> DateTime<Utc> {
    datetime_from_unix(deadline) - Duration::seconds(auction_duration_secs as i64)
}
