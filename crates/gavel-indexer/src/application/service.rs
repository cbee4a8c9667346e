//! # Aggregate Query Service
//!
//! The inbound-port implementation: full listings, single-auction lookups,
//! bid histories, and contract-wide statistics. Projections fan out
//! concurrently under a semaphore bound so a large auction count cannot
//! overwhelm the RPC endpoint; one broken auction never blanks the list.

use crate::adapters::TtlCache;
use crate::application::projector::AuctionProjector;
use crate::application::reconciler::BidReconciler;
use crate::config::IndexerConfig;
use crate::domain::{
    Auction, AuctionIndex, AuctionStatus, Bid, ContractStats, IndexerError,
};
use crate::ports::inbound::AuctionQueryApi;
use crate::ports::outbound::{Clock, LedgerRpc, MetadataStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

const LISTING_KEY: &str = "listing";

/// Aggregate service over the projector and reconciler.
///
/// The listing cache is an explicit collaborator handed in at construction,
/// not process-wide state; pass a fake clock and a scripted transport to
/// test every timing path.
pub struct AuctionService<R, M, C> {
    rpc: Arc<R>,
    projector: AuctionProjector<R, M>,
    reconciler: BidReconciler<R, C>,
    clock: Arc<C>,
    cache: TtlCache<&'static str, Vec<Auction>>,
    fan_out: Arc<Semaphore>,
}

impl<R: LedgerRpc, M: MetadataStore, C: Clock> AuctionService<R, M, C> {
    /// Wires the service from its collaborators.
    pub fn new(
        rpc: Arc<R>,
        metadata: Arc<M>,
        clock: Arc<C>,
        cache: TtlCache<&'static str, Vec<Auction>>,
        config: &IndexerConfig,
    ) -> Self {
        let projector = AuctionProjector::new(
            Arc::clone(&rpc),
            metadata,
            config.auction_duration_secs,
        );
        let reconciler = BidReconciler::new(
            Arc::clone(&rpc),
            Arc::clone(&clock),
            config.contract_address,
        );
        let fan_out = Arc::new(Semaphore::new(config.max_concurrent_projections.max(1)));

        Self {
            rpc,
            projector,
            reconciler,
            clock,
            cache,
            fan_out,
        }
    }

    /// Projects every known index concurrently, keeping index order in the
    /// output and skipping (with a log line) any index that fails.
    async fn project_all(&self) -> Vec<Auction> {
        let count = match self.rpc.auction_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!("[indexer] auction count read failed: {e}; returning empty listing");
                return Vec::new();
            }
        };

        let projections = (0..count).map(|index| {
            let fan_out = Arc::clone(&self.fan_out);
            async move {
                let _permit = match fan_out.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return None,
                };
                match self.projector.project(index).await {
                    Ok(auction) => Some(auction),
                    Err(e) => {
                        warn!("[indexer] auction {index} projection failed: {e}; skipping");
                        None
                    }
                }
            }
        });

        futures::future::join_all(projections)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn known_count(&self) -> Result<u64, IndexerError> {
        self.rpc.auction_count().await
    }
}

#[async_trait]
impl<R: LedgerRpc, M: MetadataStore, C: Clock> AuctionQueryApi for AuctionService<R, M, C> {
    async fn list_auctions(&self) -> Vec<Auction> {
        if let Some(cached) = self.cache.get(&LISTING_KEY, self.clock.now()) {
            debug!("[indexer] serving listing from cache ({} auctions)", cached.len());
            return cached;
        }

        let auctions = self.project_all().await;
        self.cache
            .insert(LISTING_KEY, auctions.clone(), self.clock.now());
        auctions
    }

    async fn auction(&self, index: AuctionIndex) -> Result<Auction, IndexerError> {
        if index >= self.known_count().await? {
            return Err(IndexerError::NotFound { index });
        }
        self.projector.project(index).await
    }

    async fn bid_history(&self, index: AuctionIndex) -> Result<Vec<Bid>, IndexerError> {
        if index >= self.known_count().await? {
            return Err(IndexerError::NotFound { index });
        }

        let bids = self.reconciler.bid_history(index).await;
        if let Ok(expected) = self.rpc.bid_count(index).await {
            if (bids.len() as u64) < expected {
                warn!(
                    "[indexer] auction {index}: ledger reports {expected} bids, reconstruction recovered {}",
                    bids.len()
                );
            }
        }
        Ok(bids)
    }

    async fn stats(&self) -> ContractStats {
        let auctions = self.list_auctions().await;

        let mut stats = ContractStats {
            total_auctions: auctions.len() as u64,
            ..ContractStats::default()
        };
        for auction in &auctions {
            match auction.status {
                AuctionStatus::Active => stats.active_auctions += 1,
                AuctionStatus::Ended => {
                    stats.ended_auctions += 1;
                    if auction.winner.is_some() {
                        stats.total_volume += auction.current_bid;
                    }
                }
                AuctionStatus::Upcoming | AuctionStatus::Cancelled => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, AuctionDetails, ContractStatus, RawAuctionState, U256};
    use crate::ports::outbound::{FixedClock, MockLedger, MockMetadata};

    const NOW_UNIX: u64 = 1_700_010_000;

    fn open_auction(name: &str, bidder: Address, price: u64) -> (RawAuctionState, AuctionDetails) {
        (
            RawAuctionState {
                name: name.to_string(),
                initial_price: U256::from(100),
                current_price: U256::from(price),
                bidder,
                deadline: NOW_UNIX + 3_600,
                bid_count: u64::from(price > 0),
                status: ContractStatus::Open,
            },
            AuctionDetails {
                current_winner: bidder,
                current_price: U256::from(price),
                seconds_remaining: 3_600,
                status: ContractStatus::Open,
            },
        )
    }

    fn ended_auction(bidder: Address, price: u64) -> (RawAuctionState, AuctionDetails) {
        (
            RawAuctionState {
                name: "closed lot".to_string(),
                initial_price: U256::from(100),
                current_price: U256::from(price),
                bidder,
                deadline: NOW_UNIX - 100,
                bid_count: u64::from(price > 0),
                status: ContractStatus::Paid,
            },
            AuctionDetails {
                current_winner: bidder,
                current_price: U256::from(price),
                seconds_remaining: 0,
                status: ContractStatus::Paid,
            },
        )
    }

    fn service(ledger: MockLedger) -> AuctionService<MockLedger, MockMetadata, FixedClock> {
        service_with_clock(ledger, FixedClock::at_unix(NOW_UNIX))
    }

    fn service_with_clock(
        ledger: MockLedger,
        clock: FixedClock,
    ) -> AuctionService<MockLedger, MockMetadata, FixedClock> {
        let config = IndexerConfig::for_testing();
        AuctionService::new(
            Arc::new(ledger),
            Arc::new(MockMetadata::new()),
            Arc::new(clock),
            TtlCache::new(config.cache_capacity, config.cache_ttl_secs),
            &config,
        )
    }

    #[tokio::test]
    async fn test_list_returns_every_auction_in_index_order() {
        let ledger = MockLedger::new();
        for i in 0..5 {
            let (state, details) = open_auction(&format!("lot {i}"), Address::ZERO, 0);
            ledger.add_auction(state, details);
        }

        let listing = service(ledger).list_auctions().await;
        assert_eq!(listing.len(), 5);
        let ids: Vec<u64> = listing.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_one_broken_index_shortens_the_list() {
        let ledger = MockLedger::new();
        for i in 0..5 {
            let (state, details) = open_auction(&format!("lot {i}"), Address::ZERO, 0);
            ledger.add_auction(state, details);
        }
        ledger.fail_index(3);

        let listing = service(ledger).list_auctions().await;
        assert_eq!(listing.len(), 4);
        assert!(listing.iter().all(|a| a.id != 3));
    }

    #[tokio::test]
    async fn test_count_outage_yields_empty_listing() {
        let ledger = MockLedger::new();
        ledger.set_transient_failures(100);

        let listing = service(ledger).list_auctions().await;
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_get_auction_out_of_range_is_not_found() {
        let ledger = MockLedger::new();
        let (state, details) = open_auction("lot", Address::ZERO, 0);
        ledger.add_auction(state, details);

        let result = service(ledger).auction(7).await;
        assert!(matches!(result, Err(IndexerError::NotFound { index: 7 })));
    }

    #[tokio::test]
    async fn test_bid_history_out_of_range_is_not_found() {
        let ledger = MockLedger::new();

        let result = service(ledger).bid_history(0).await;
        assert!(matches!(result, Err(IndexerError::NotFound { index: 0 })));
    }

    #[tokio::test]
    async fn test_bid_history_empty_for_existing_auction_is_ok() {
        let ledger = MockLedger::new();
        let (state, details) = open_auction("lot", Address::ZERO, 0);
        ledger.add_auction(state, details);

        let bids = service(ledger).bid_history(0).await.unwrap();
        assert!(bids.is_empty());
    }

    #[tokio::test]
    async fn test_stats_on_zero_auctions_is_all_zero() {
        let stats = service(MockLedger::new()).stats().await;
        assert_eq!(stats.total_auctions, 0);
        assert_eq!(stats.active_auctions, 0);
        assert_eq!(stats.ended_auctions, 0);
        assert_eq!(stats.total_volume, U256::zero());
    }

    #[tokio::test]
    async fn test_stats_folds_status_counts_and_volume() {
        let ledger = MockLedger::new();
        let (state, details) = open_auction("live", Address::new([1u8; 20]), 50);
        ledger.add_auction(state, details);
        let (state, details) = ended_auction(Address::new([2u8; 20]), 300);
        ledger.add_auction(state, details);
        let (state, details) = ended_auction(Address::new([3u8; 20]), 200);
        ledger.add_auction(state, details);
        // Ended without a winner contributes no volume
        let (state, details) = ended_auction(Address::ZERO, 0);
        ledger.add_auction(state, details);

        let stats = service(ledger).stats().await;
        assert_eq!(stats.total_auctions, 4);
        assert_eq!(stats.active_auctions, 1);
        assert_eq!(stats.ended_auctions, 3);
        assert_eq!(stats.total_volume, U256::from(500));
    }

    #[tokio::test]
    async fn test_listing_cache_serves_within_ttl() {
        let ledger = MockLedger::new();
        let (state, details) = open_auction("lot", Address::ZERO, 0);
        ledger.add_auction(state, details);
        let service = service(ledger);

        let first = service.list_auctions().await;
        let calls_after_first = service.rpc.call_count();
        let second = service.list_auctions().await;

        assert_eq!(first, second);
        assert_eq!(service.rpc.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn test_listing_cache_expires_with_the_injected_clock() {
        let ledger = MockLedger::new();
        let (state, details) = open_auction("lot", Address::ZERO, 0);
        ledger.add_auction(state, details);
        let clock = FixedClock::at_unix(NOW_UNIX);
        let service = service_with_clock(ledger, clock);

        service.list_auctions().await;
        let calls_after_first = service.rpc.call_count();

        service.clock.advance_secs(IndexerConfig::for_testing().cache_ttl_secs + 1);
        service.list_auctions().await;
        assert!(service.rpc.call_count() > calls_after_first);
    }
}
