//! # Auction State Projection
//!
//! Combines one struct read and one details read into the domain `Auction`
//! record, enriched with optional off-chain metadata. The two reads are
//! issued in parallel and may straddle a ledger state change; that narrow
//! staleness window is accepted, the ledger offers no snapshot isolation.

use crate::algorithms::{derive_start_time, derive_status, display_price};
use crate::domain::{
    datetime_from_unix, Auction, AuctionIndex, AuctionMetadata, IndexerError, RawAuctionState,
};
use crate::ports::outbound::{LedgerRpc, MetadataStore};
use std::sync::Arc;
use tracing::warn;

/// Deterministic placeholder image, content-addressed by auction index.
fn placeholder_image(index: AuctionIndex) -> String {
    format!("https://picsum.photos/seed/auction-{index}/600/400")
}

/// Deterministic placeholder description synthesized from the bid count.
fn placeholder_description(bid_count: u64) -> String {
    match bid_count {
        0 => "On-chain auction awaiting its first bid.".to_string(),
        1 => "On-chain auction with 1 recorded bid.".to_string(),
        n => format!("On-chain auction with {n} recorded bids."),
    }
}

/// Projects ledger reads into domain `Auction` records.
pub struct AuctionProjector<R, M> {
    rpc: Arc<R>,
    metadata: Arc<M>,
    auction_duration_secs: u64,
}

impl<R: LedgerRpc, M: MetadataStore> AuctionProjector<R, M> {
    /// Builds a projector over the given transport and enrichment store.
    pub fn new(rpc: Arc<R>, metadata: Arc<M>, auction_duration_secs: u64) -> Self {
        Self {
            rpc,
            metadata,
            auction_duration_secs,
        }
    }

    /// Projects one auction. Metadata problems never fail the projection;
    /// a failed struct or details read does.
    ///
    /// # Errors
    /// - `RpcUnavailable` if either structural read fails after retries
    pub async fn project(&self, index: AuctionIndex) -> Result<Auction, IndexerError> {
        let (state, details) = tokio::join!(
            self.rpc.auction_state(index),
            self.rpc.auction_details(index)
        );
        let state = state?;
        let details = details?;

        let status = derive_status(&state, &details);
        let (title, description, artwork_url) = self.enrich(index, &state).await;

        Ok(Auction {
            id: index,
            title,
            description,
            artwork_url,
            start_price: state.initial_price,
            current_bid: display_price(&state),
            total_bids: state.bid_count,
            status,
            start_time: derive_start_time(state.deadline, self.auction_duration_secs),
            end_time: datetime_from_unix(state.deadline),
            winner: if state.bidder.is_zero() {
                None
            } else {
                Some(state.bidder)
            },
        })
    }

    /// Resolves display fields: metadata where present, deterministic
    /// placeholders on a miss, a partial hit, or a store failure.
    async fn enrich(&self, index: AuctionIndex, state: &RawAuctionState) -> (String, String, String) {
        let metadata = match self.metadata.metadata_for(index).await {
            Ok(hit) => hit.unwrap_or_default(),
            Err(e) => {
                warn!("[indexer] metadata lookup for auction {index} failed: {e}; using placeholders");
                AuctionMetadata::default()
            }
        };

        let title = metadata.title.unwrap_or_else(|| {
            if state.name.is_empty() {
                format!("Auction {index}")
            } else {
                state.name.clone()
            }
        });
        let description = metadata
            .description
            .unwrap_or_else(|| placeholder_description(state.bid_count));
        let artwork_url = metadata.image_url.unwrap_or_else(|| placeholder_image(index));

        (title, description, artwork_url)
    }
}
