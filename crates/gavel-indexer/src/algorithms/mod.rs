//! # Algorithms Module
//!
//! Pure functions behind the read-model: bid ranking and lifecycle status
//! derivation. Everything here is deterministic and clock-free; the caller
//! supplies any time values.

mod ranking;
mod status;

pub use ranking::rank_bids;
pub use status::{derive_start_time, derive_status, display_price};
