//! # Outbound Ports
//!
//! Traits for external dependencies: the ledger RPC transport, the metadata
//! enrichment store, and the wall clock. Mock implementations for testing
//! live alongside the traits.

use crate::domain::{
    bid_placed_topic, encode_indexed, encode_inline, Address, AuctionDetails, AuctionIndex,
    AuctionMetadata, Block, Hash, IndexerError, LogEntry, LogFilter, RawAuctionState, U256,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Raw ledger transport - outbound port.
///
/// One implementation per RPC endpoint; the retrying decorator wraps any of
/// them. All reads are unauthenticated and address a fixed contract.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Total number of auctions the contract has created.
    async fn auction_count(&self) -> Result<u64, IndexerError>;

    /// Verbatim struct read for one auction.
    async fn auction_state(&self, index: AuctionIndex) -> Result<RawAuctionState, IndexerError>;

    /// Ledger-computed details view for one auction.
    async fn auction_details(&self, index: AuctionIndex) -> Result<AuctionDetails, IndexerError>;

    /// Accepted-bid count for one auction.
    async fn bid_count(&self, index: AuctionIndex) -> Result<u64, IndexerError>;

    /// Log query by signature topic or symbolic event shape.
    async fn fetch_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, IndexerError>;

    /// Block fetch, used solely to timestamp bids.
    async fn block_by_number(&self, number: u64) -> Result<Block, IndexerError>;
}

/// Metadata enrichment store - outbound port.
///
/// Supplies human-authored display fields keyed by auction index. Absence is
/// a normal, expected outcome; this store is consulted, never required.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up enrichment fields for one auction.
    async fn metadata_for(
        &self,
        index: AuctionIndex,
    ) -> Result<Option<AuctionMetadata>, IndexerError>;
}

/// Wall clock - outbound port, injectable so tests control time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct MockLedgerState {
    auctions: Vec<(RawAuctionState, AuctionDetails)>,
    logs: Vec<LogEntry>,
    blocks: HashMap<u64, Block>,
    fail_indices: HashSet<AuctionIndex>,
    fail_topic_queries: bool,
    fail_named_queries: bool,
    fail_blocks: bool,
    transient_failures: u32,
    calls: u32,
}

/// Scriptable in-memory ledger for testing: seeded auctions, synthetic logs,
/// and injectable failures (per index, per query path, or transient).
#[derive(Default)]
pub struct MockLedger {
    state: Mutex<MockLedgerState>,
}

impl MockLedger {
    /// Contract address all synthetic logs are emitted from.
    pub const CONTRACT: Address = Address([0xc0; 20]);

    /// Empty mock ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one auction; returns its index.
    pub fn add_auction(&self, state: RawAuctionState, details: AuctionDetails) -> AuctionIndex {
        let mut inner = self.state.lock();
        inner.auctions.push((state, details));
        (inner.auctions.len() - 1) as AuctionIndex
    }

    /// Appends an indexed-layout bid log. The transaction hash is derived
    /// from block number and log index so re-seeding is deterministic.
    pub fn add_indexed_bid_log(
        &self,
        auction_id: AuctionIndex,
        bidder: Address,
        amount: U256,
        block_number: u64,
        log_index: u64,
    ) {
        let (topics, data) = encode_indexed(auction_id, bidder, amount);
        self.push_log(topics, data, block_number, log_index);
    }

    /// Appends an inline-layout bid log (older contract builds).
    pub fn add_inline_bid_log(
        &self,
        auction_id: AuctionIndex,
        bidder: Address,
        amount: U256,
        block_number: u64,
        log_index: u64,
    ) {
        let (topics, data) = encode_inline(auction_id, bidder, amount);
        self.push_log(topics, data, block_number, log_index);
    }

    /// Appends an arbitrary raw log (malformed fixtures).
    pub fn add_raw_log(&self, log: LogEntry) {
        self.state.lock().logs.push(log);
    }

    /// Records a block timestamp.
    pub fn set_block(&self, number: u64, timestamp: u64) {
        self.state.lock().blocks.insert(
            number,
            Block {
                number,
                timestamp,
            },
        );
    }

    /// Makes struct/details/bid-count reads for one index fail.
    pub fn fail_index(&self, index: AuctionIndex) {
        self.state.lock().fail_indices.insert(index);
    }

    /// Makes topic-filtered log queries fail.
    pub fn set_fail_topic_queries(&self, fail: bool) {
        self.state.lock().fail_topic_queries = fail;
    }

    /// Makes symbolic-name log queries fail.
    pub fn set_fail_named_queries(&self, fail: bool) {
        self.state.lock().fail_named_queries = fail;
    }

    /// Makes block fetches fail.
    pub fn set_fail_blocks(&self, fail: bool) {
        self.state.lock().fail_blocks = fail;
    }

    /// Makes the next `n` calls (any method) fail, then recover.
    pub fn set_transient_failures(&self, n: u32) {
        self.state.lock().transient_failures = n;
    }

    /// Total calls observed across all methods.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.state.lock().calls
    }

    fn push_log(&self, topics: Vec<Hash>, data: Vec<u8>, block_number: u64, log_index: u64) {
        let mut tx = [0u8; 32];
        tx[..8].copy_from_slice(&block_number.to_be_bytes());
        tx[8..16].copy_from_slice(&log_index.to_be_bytes());
        self.state.lock().logs.push(LogEntry {
            address: Self::CONTRACT,
            topics,
            data,
            block_number,
            tx_hash: Hash::new(tx),
            log_index,
        });
    }

    /// Counts the call and consumes one transient failure if armed.
    fn admit(&self, label: &str) -> Result<(), IndexerError> {
        let mut inner = self.state.lock();
        inner.calls += 1;
        if inner.transient_failures > 0 {
            inner.transient_failures -= 1;
            return Err(IndexerError::rpc(label, 1, "mock transient failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn auction_count(&self) -> Result<u64, IndexerError> {
        self.admit("auction_count")?;
        Ok(self.state.lock().auctions.len() as u64)
    }

    async fn auction_state(&self, index: AuctionIndex) -> Result<RawAuctionState, IndexerError> {
        self.admit("auction_state")?;
        let inner = self.state.lock();
        if inner.fail_indices.contains(&index) {
            return Err(IndexerError::rpc("auction_state", 1, "mock index failure"));
        }
        inner
            .auctions
            .get(index as usize)
            .map(|(state, _)| state.clone())
            .ok_or(IndexerError::NotFound { index })
    }

    async fn auction_details(&self, index: AuctionIndex) -> Result<AuctionDetails, IndexerError> {
        self.admit("auction_details")?;
        let inner = self.state.lock();
        if inner.fail_indices.contains(&index) {
            return Err(IndexerError::rpc("auction_details", 1, "mock index failure"));
        }
        inner
            .auctions
            .get(index as usize)
            .map(|(_, details)| details.clone())
            .ok_or(IndexerError::NotFound { index })
    }

    async fn bid_count(&self, index: AuctionIndex) -> Result<u64, IndexerError> {
        self.admit("bid_count")?;
        let inner = self.state.lock();
        if inner.fail_indices.contains(&index) {
            return Err(IndexerError::rpc("bid_count", 1, "mock index failure"));
        }
        inner
            .auctions
            .get(index as usize)
            .map(|(state, _)| state.bid_count)
            .ok_or(IndexerError::NotFound { index })
    }

    async fn fetch_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, IndexerError> {
        self.admit("fetch_logs")?;
        let inner = self.state.lock();
        if filter.topic0.is_some() && inner.fail_topic_queries {
            return Err(IndexerError::rpc("fetch_logs", 1, "mock topic-query failure"));
        }
        if filter.event.is_some() && inner.fail_named_queries {
            return Err(IndexerError::rpc("fetch_logs", 1, "mock named-query failure"));
        }

        let logs = inner
            .logs
            .iter()
            .filter(|log| log.address == filter.address && log.block_number >= filter.from_block)
            .filter(|log| match (&filter.topic0, &filter.event) {
                (Some(topic), _) => log.topics.first() == Some(topic),
                (None, Some(_)) => log.topics.first() == Some(&bid_placed_topic()),
                (None, None) => true,
            })
            .cloned()
            .collect();
        Ok(logs)
    }

    async fn block_by_number(&self, number: u64) -> Result<Block, IndexerError> {
        self.admit("block_by_number")?;
        let inner = self.state.lock();
        if inner.fail_blocks {
            return Err(IndexerError::rpc("block_by_number", 1, "mock block failure"));
        }
        inner
            .blocks
            .get(&number)
            .copied()
            .ok_or_else(|| IndexerError::rpc("block_by_number", 1, "unknown block"))
    }
}

/// Scriptable metadata store for testing.
#[derive(Default)]
pub struct MockMetadata {
    entries: Mutex<HashMap<AuctionIndex, AuctionMetadata>>,
    should_fail: Mutex<bool>,
}

impl MockMetadata {
    /// Empty store: every lookup is a miss.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds enrichment fields for one auction.
    pub fn insert(&self, index: AuctionIndex, metadata: AuctionMetadata) {
        self.entries.lock().insert(index, metadata);
    }

    /// Makes every lookup fail.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl MetadataStore for MockMetadata {
    async fn metadata_for(
        &self,
        index: AuctionIndex,
    ) -> Result<Option<AuctionMetadata>, IndexerError> {
        if *self.should_fail.lock() {
            return Err(IndexerError::Metadata("mock store failure".to_string()));
        }
        Ok(self.entries.lock().get(&index).cloned())
    }
}

/// Settable clock for testing.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock pinned to a unix-seconds instant.
    #[must_use]
    pub fn at_unix(secs: u64) -> Self {
        Self {
            now: Mutex::new(crate::domain::datetime_from_unix(secs)),
        }
    }

    /// Moves the clock forward.
    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.lock();
        *now += chrono::Duration::seconds(secs as i64);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
