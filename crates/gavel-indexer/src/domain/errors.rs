//! # Domain Errors
//!
//! Error taxonomy for the read-model core. Most variants are recovered
//! locally by a fallback; only `NotFound` is routinely surfaced to callers.

use super::value_objects::AuctionIndex;
use thiserror::Error;

/// Read-model error types.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// A remote read failed after exhausting its retry budget. Carries the
    /// last underlying error; never stands in for a zero value.
    #[error("rpc unavailable for '{label}' after {attempts} attempts: {reason}")]
    RpcUnavailable {
        /// Diagnostic label of the logical call.
        label: String,
        /// Attempts made before giving up.
        attempts: u32,
        /// Last underlying transport error.
        reason: String,
    },

    /// A log or struct did not match the expected shape. Recovered by
    /// skipping just the offending item, never by aborting the batch.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Requested auction index is out of range. Distinct from an auction
    /// that exists with zero bids.
    #[error("auction {index} does not exist")]
    NotFound {
        /// Requested index.
        index: AuctionIndex,
    },

    /// The metadata enrichment store failed. Recovered by placeholder
    /// substitution.
    #[error("metadata lookup failed: {0}")]
    Metadata(String),
}

impl IndexerError {
    /// Shorthand for a transport-layer failure message.
    #[must_use]
    pub fn rpc(label: impl Into<String>, attempts: u32, reason: impl Into<String>) -> Self {
        Self::RpcUnavailable {
            label: label.into(),
            attempts,
            reason: reason.into(),
        }
    }
}
