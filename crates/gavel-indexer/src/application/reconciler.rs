//! # Bid Ledger Reconciliation
//!
//! Rebuilds the ordered bid ledger for one auction from the most reliable
//! data available. Three strategies are tried in order; the first one that
//! produces a non-empty, successfully decoded set wins:
//!
//! 1. Topic-filtered log scan over the full chain history.
//! 2. Symbolic-name log scan with the shape-tolerant decoder. The two
//!    decode paths disagree on malformed or layout-mismatched logs, so
//!    running both maximizes the chance of a usable ledger.
//! 3. Synthesis of the single current leading bid from the struct read.
//!
//! Total failure of the chain degrades to an empty ledger, logged but never
//! propagated: callers cannot distinguish "no bids" from "service degraded".

use crate::algorithms::rank_bids;
use crate::domain::{
    bid_placed_topic, datetime_from_unix, try_decode_indexed, try_decode_shaped, Address,
    AuctionIndex, Bid, BidEvent, IndexerError, LogEntry, LogFilter, BID_PLACED_NAME,
};
use crate::ports::outbound::{Clock, LedgerRpc};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reconstruction strategies, in fallback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// Query by event-signature topic, decode the indexed layout.
    TopicScan,
    /// Query by symbolic event name, decode whichever layout the log carries.
    ShapedScan,
    /// Synthesize the current leading bid from the struct read.
    StateFallback,
}

const STRATEGY_CHAIN: [Strategy; 3] = [
    Strategy::TopicScan,
    Strategy::ShapedScan,
    Strategy::StateFallback,
];

/// Reconciles one auction's bid ledger from logs, with state fallback.
pub struct BidReconciler<R, C> {
    rpc: Arc<R>,
    clock: Arc<C>,
    contract_address: Address,
}

impl<R: LedgerRpc, C: Clock> BidReconciler<R, C> {
    /// Builds a reconciler reading from `rpc` for one contract address.
    pub fn new(rpc: Arc<R>, clock: Arc<C>, contract_address: Address) -> Self {
        Self {
            rpc,
            clock,
            contract_address,
        }
    }

    /// Produces the ordered, ranked bid ledger for one auction.
    ///
    /// Never fails: an unreconstructable ledger comes back empty with the
    /// degradation logged.
    pub async fn bid_history(&self, auction_id: AuctionIndex) -> Vec<Bid> {
        for strategy in STRATEGY_CHAIN {
            match self.run_strategy(strategy, auction_id).await {
                Ok(bids) if !bids.is_empty() => {
                    debug!(
                        "[indexer] auction {auction_id}: {} bids via {strategy:?}",
                        bids.len()
                    );
                    return rank_bids(bids);
                }
                Ok(_) => {
                    debug!("[indexer] auction {auction_id}: {strategy:?} produced no bids");
                }
                Err(e) => {
                    warn!("[indexer] auction {auction_id}: {strategy:?} failed: {e}");
                }
            }
        }
        Vec::new()
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        auction_id: AuctionIndex,
    ) -> Result<Vec<Bid>, IndexerError> {
        match strategy {
            Strategy::TopicScan => {
                let filter = LogFilter::by_topic(self.contract_address, bid_placed_topic());
                self.scan_logs(auction_id, &filter, try_decode_indexed).await
            }
            Strategy::ShapedScan => {
                let filter = LogFilter::by_event(self.contract_address, BID_PLACED_NAME);
                self.scan_logs(auction_id, &filter, try_decode_shaped).await
            }
            Strategy::StateFallback => self.synthesize_from_state(auction_id).await,
        }
    }

    /// Shared log-scan body for both query paths. A log that fails to decode
    /// is skipped on its own; one bad log never aborts the scan.
    async fn scan_logs(
        &self,
        auction_id: AuctionIndex,
        filter: &LogFilter,
        decode: fn(&LogEntry) -> Option<BidEvent>,
    ) -> Result<Vec<Bid>, IndexerError> {
        let logs = self.rpc.fetch_logs(filter).await?;

        let mut bids = Vec::new();
        for log in &logs {
            let Some(event) = decode(log) else {
                debug!(
                    "[indexer] skipping undecodable log {} of tx {}",
                    log.log_index, log.tx_hash
                );
                continue;
            };
            if event.auction_id != auction_id {
                continue;
            }

            let observed_at = self.timestamp_for(log.block_number).await;
            bids.push(Bid::from_log(
                auction_id,
                event.bidder,
                event.amount,
                log.tx_hash,
                log.log_index,
                observed_at,
            ));
        }
        Ok(bids)
    }

    /// Resolves a bid's timestamp from its containing block, degrading to
    /// wall clock for that one bid if the block fetch fails.
    async fn timestamp_for(&self, block_number: u64) -> DateTime<Utc> {
        match self.rpc.block_by_number(block_number).await {
            Ok(block) => datetime_from_unix(block.timestamp),
            Err(e) => {
                warn!(
                    "[indexer] block {block_number} fetch failed ({e}); timestamping bid with wall clock"
                );
                self.clock.now()
            }
        }
    }

    /// Strategy 3: the struct read only knows the current leading bid, so a
    /// degraded ledger has at most that one entry. No bidder and no bids
    /// means a legitimately empty ledger.
    async fn synthesize_from_state(
        &self,
        auction_id: AuctionIndex,
    ) -> Result<Vec<Bid>, IndexerError> {
        let state = self.rpc.auction_state(auction_id).await?;
        if state.has_no_bidder() {
            return Ok(Vec::new());
        }
        Ok(vec![Bid::from_state(
            auction_id,
            state.bidder,
            state.current_price,
            self.clock.now(),
        )])
    }
}
