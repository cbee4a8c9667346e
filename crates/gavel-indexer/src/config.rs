//! # Indexer Configuration
//!
//! Tunables for the read-model core: retry budget, projection fan-out, the
//! nominal auction duration, and the listing-cache TTL.

use crate::domain::Address;
use serde::{Deserialize, Serialize};

/// Retry budget for one logical RPC call. Every call gets its own full
/// budget; there is no budget shared across calls.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per logical call, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per retry.
    pub base_backoff_ms: u64,
    /// Backoff cap.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
            max_backoff_ms: 2_000,
        }
    }
}

/// Read-model configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Address of the auction contract.
    pub contract_address: Address,
    /// Retry budget applied to every remote read.
    pub retry: RetryPolicy,
    /// Nominal auction duration used to back-compute start times.
    pub auction_duration_secs: u64,
    /// Upper bound on concurrently running projections.
    pub max_concurrent_projections: usize,
    /// Listing-cache time to live.
    pub cache_ttl_secs: u64,
    /// Listing-cache capacity (entries).
    pub cache_capacity: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::ZERO,
            retry: RetryPolicy::default(),
            auction_duration_secs: 7 * 24 * 3600,
            max_concurrent_projections: 8,
            cache_ttl_secs: 30,
            cache_capacity: 16,
        }
    }
}

impl IndexerConfig {
    /// Create a config for testing (tight timings, no real backoff waits).
    pub fn for_testing() -> Self {
        Self {
            contract_address: Address::new([0xc0; 20]),
            retry: RetryPolicy {
                max_attempts: 3,
                base_backoff_ms: 1,
                max_backoff_ms: 4,
            },
            auction_duration_secs: 3_600,
            max_concurrent_projections: 4,
            cache_ttl_secs: 30,
            cache_capacity: 8,
        }
    }
}
