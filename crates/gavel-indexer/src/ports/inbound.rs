//! # Inbound Ports
//!
//! The query API this core offers to collaborators (UI backend, admin
//! tooling, statistics).

use crate::domain::{Auction, AuctionIndex, Bid, ContractStats, IndexerError};
use async_trait::async_trait;

/// Auction query API - inbound port.
///
/// All results are recomputed from fresh ledger reads per call (modulo the
/// explicitly injected listing cache); nothing here mutates the ledger.
#[async_trait]
pub trait AuctionQueryApi: Send + Sync {
    /// List every auction the contract knows about. Per-index projection
    /// failures shorten the list; they never fail it.
    async fn list_auctions(&self) -> Vec<Auction>;

    /// Project a single auction.
    ///
    /// # Errors
    /// - `NotFound` if the index is out of range
    /// - `RpcUnavailable` if a required read fails after retries
    async fn auction(&self, index: AuctionIndex) -> Result<Auction, IndexerError>;

    /// Reconstruct the ordered bid ledger for one auction. An existing
    /// auction with no recoverable bids yields an empty list, not an error.
    ///
    /// # Errors
    /// - `NotFound` if the index is out of range
    async fn bid_history(&self, index: AuctionIndex) -> Result<Vec<Bid>, IndexerError>;

    /// Contract-wide statistics folded from the full listing.
    async fn stats(&self) -> ContractStats;
}
