//! # Retrying RPC Decorator
//!
//! Wraps any [`LedgerRpc`] transport with bounded retry and exponential
//! backoff. The only component that talks to the network sits behind this
//! decorator; everything above it sees either a value or a typed
//! `RpcUnavailable`, never a silent zero.

use crate::config::RetryPolicy;
use crate::domain::{
    AuctionDetails, AuctionIndex, Block, IndexerError, LogEntry, LogFilter, RawAuctionState,
};
use crate::ports::outbound::LedgerRpc;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retrying decorator over a raw ledger transport.
///
/// Each logical call gets its own full retry budget; retries within one call
/// are sequential, while separate calls proceed independently.
pub struct RetryingLedger<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: LedgerRpc> RetryingLedger<T> {
    /// Wraps a transport with the given retry policy.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Runs one logical call with up to `max_attempts` tries.
    ///
    /// The label is used purely for diagnostics: retry warnings and the
    /// final `RpcUnavailable` both carry it.
    async fn with_retry<R, F, Fut>(&self, label: &str, op: F) -> Result<R, IndexerError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, IndexerError>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut delay = Duration::from_millis(self.policy.base_backoff_ms);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("[indexer] '{label}' recovered on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < attempts {
                        warn!(
                            "[indexer] '{label}' attempt {attempt}/{attempts} failed: {last_error}; retrying in {delay:?}"
                        );
                        tokio::time::sleep(delay).await;
                        delay = (delay * 2).min(Duration::from_millis(self.policy.max_backoff_ms));
                    }
                }
            }
        }

        Err(IndexerError::rpc(label, attempts, last_error))
    }
}

#[async_trait]
impl<T: LedgerRpc> LedgerRpc for RetryingLedger<T> {
    async fn auction_count(&self) -> Result<u64, IndexerError> {
        self.with_retry("auction_count", || self.inner.auction_count())
            .await
    }

    async fn auction_state(&self, index: AuctionIndex) -> Result<RawAuctionState, IndexerError> {
        self.with_retry(&format!("auction_state({index})"), || {
            self.inner.auction_state(index)
        })
        .await
    }

    async fn auction_details(&self, index: AuctionIndex) -> Result<AuctionDetails, IndexerError> {
        self.with_retry(&format!("auction_details({index})"), || {
            self.inner.auction_details(index)
        })
        .await
    }

    async fn bid_count(&self, index: AuctionIndex) -> Result<u64, IndexerError> {
        self.with_retry(&format!("bid_count({index})"), || {
            self.inner.bid_count(index)
        })
        .await
    }

    async fn fetch_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, IndexerError> {
        self.with_retry("fetch_logs", || self.inner.fetch_logs(filter))
            .await
    }

    async fn block_by_number(&self, number: u64) -> Result<Block, IndexerError> {
        self.with_retry(&format!("block({number})"), || {
            self.inner.block_by_number(number)
        })
        .await
    }
}
