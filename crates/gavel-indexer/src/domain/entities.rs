//! # Domain Entities
//!
//! Read-only projections of ledger history. Every type here is created fresh
//! on each query; a newer read supersedes an older one, nothing is merged.

use super::value_objects::{Address, AuctionIndex, Hash, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Converts a ledger unix-seconds field to a UTC timestamp.
#[must_use]
pub fn datetime_from_unix(secs: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs as i64, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// =============================================================================
// LEDGER-NATIVE STATE
// =============================================================================

/// Auction status as stored by the contract itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Accepting bids (subject to the deadline).
    Open,
    /// Deadline reached and settlement started.
    Closed,
    /// Winning bid paid out.
    Paid,
}

impl ContractStatus {
    /// Decodes the contract's status word. Unknown discriminants are rejected
    /// rather than mapped to a default.
    #[must_use]
    pub fn from_word(word: u8) -> Option<Self> {
        match word {
            0 => Some(Self::Open),
            1 => Some(Self::Closed),
            2 => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Verbatim contract struct for one auction, as returned by a struct read.
///
/// Immutable once read; a fresh read supersedes any prior one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuctionState {
    /// Human-readable auction name recorded on the ledger.
    pub name: String,
    /// Opening price.
    pub initial_price: U256,
    /// Highest accepted bid so far (zero until the first bid).
    pub current_price: U256,
    /// Current leading bidder; `Address::ZERO` means none.
    pub bidder: Address,
    /// Bidding deadline, unix seconds.
    pub deadline: u64,
    /// Number of accepted bids.
    pub bid_count: u64,
    /// Ledger-native status.
    pub status: ContractStatus,
}

impl RawAuctionState {
    /// Returns true if the ledger records no leading bidder.
    #[must_use]
    pub fn has_no_bidder(&self) -> bool {
        self.bidder.is_zero() || self.bid_count == 0
    }
}

/// Point-in-time derived view computed by the ledger itself.
///
/// Used only to corroborate [`RawAuctionState`]; the two are never merged
/// field-by-field across separate RPC calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDetails {
    /// Current leading bidder.
    pub current_winner: Address,
    /// Highest accepted bid.
    pub current_price: U256,
    /// Remaining bidding time, computed by the ledger, not locally.
    pub seconds_remaining: u64,
    /// Ledger-native status.
    pub status: ContractStatus,
}

// =============================================================================
// LOG QUERY TYPES
// =============================================================================

/// One raw log entry from the event interface. The `data` payload is opaque
/// until decoded against a known event layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting contract address.
    pub address: Address,
    /// Indexed topics (topic 0 is the event signature).
    pub topics: Vec<Hash>,
    /// Non-indexed payload, ABI-encoded.
    pub data: Vec<u8>,
    /// Block containing the log.
    pub block_number: u64,
    /// Transaction that emitted the log.
    pub tx_hash: Hash,
    /// Position within the block's log list.
    pub log_index: u64,
}

/// A block header fetched solely for its timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block number.
    pub number: u64,
    /// Unix timestamp.
    pub timestamp: u64,
}

/// Log query filter: by signature topic or by symbolic event name, over the
/// full chain history of one contract address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilter {
    /// Contract address to query.
    pub address: Address,
    /// Event-signature hash to match against topic 0, if filtering by topic.
    pub topic0: Option<Hash>,
    /// Symbolic event name, if filtering by shape.
    pub event: Option<String>,
    /// First block of the scanned range (0 = earliest).
    pub from_block: u64,
}

impl LogFilter {
    /// Filter by raw event-signature topic over the entire chain history.
    #[must_use]
    pub fn by_topic(address: Address, topic0: Hash) -> Self {
        Self {
            address,
            topic0: Some(topic0),
            event: None,
            from_block: 0,
        }
    }

    /// Filter by symbolic event name over the entire chain history.
    #[must_use]
    pub fn by_event(address: Address, event: impl Into<String>) -> Self {
        Self {
            address,
            topic0: None,
            event: Some(event.into()),
            from_block: 0,
        }
    }
}

// =============================================================================
// RECONSTRUCTED BID LEDGER
// =============================================================================

/// One historical bid, reconstructed from a log or synthesized from state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Deterministic identity; re-derivation over the same source data is
    /// idempotent.
    pub id: String,
    /// Auction the bid belongs to.
    pub auction_id: AuctionIndex,
    /// Bidding account.
    pub bidder: Address,
    /// Bid amount.
    pub amount: U256,
    /// Emitting transaction. `None` marks a bid derived from current state
    /// rather than a discrete transaction.
    pub tx_hash: Option<Hash>,
    /// Block timestamp when available, wall clock at read time as a degraded
    /// fallback.
    pub observed_at: DateTime<Utc>,
    /// Whether this bid currently leads the auction. Computed, not
    /// ledger-native.
    pub is_winning: bool,
}

impl Bid {
    /// Builds a bid reconstructed from a decoded log entry.
    #[must_use]
    pub fn from_log(
        auction_id: AuctionIndex,
        bidder: Address,
        amount: U256,
        tx_hash: Hash,
        log_index: u64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("0x{}-{log_index}", hex::encode(tx_hash.as_bytes())),
            auction_id,
            bidder,
            amount,
            tx_hash: Some(tx_hash),
            observed_at,
            is_winning: false,
        }
    }

    /// Builds the single synthesized bid for the current leading bidder when
    /// no log history could be reconstructed.
    #[must_use]
    pub fn from_state(
        auction_id: AuctionIndex,
        bidder: Address,
        amount: U256,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("auction-{auction_id}-state"),
            auction_id,
            bidder,
            amount,
            tx_hash: None,
            observed_at,
            is_winning: true,
        }
    }
}

// =============================================================================
// DOMAIN PROJECTION
// =============================================================================

/// Derived lifecycle status exposed to collaborators.
///
/// `Upcoming` and `Cancelled` are not currently produced by any ledger state
/// this core observes; they exist so the enum is total for collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    /// Not yet open for bidding.
    Upcoming,
    /// Open and inside the bidding window.
    Active,
    /// Bidding window over (covers the ledger's Closed and Paid states).
    Ended,
    /// Withdrawn before completion.
    Cancelled,
}

/// Optional human-authored fields from the enrichment store. A hit may still
/// leave individual fields unset; unset fields fall back like a miss.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionMetadata {
    /// Title override.
    pub title: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Artwork image URL.
    pub image_url: Option<String>,
}

/// The auction record exposed to collaborators: ledger truth plus metadata
/// enrichment, recomputed per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// Ledger-native auction index.
    pub id: AuctionIndex,
    /// Display title (metadata override, else the ledger name).
    pub title: String,
    /// Display description (metadata, else synthesized from bid count).
    pub description: String,
    /// Artwork image URL (metadata, else a deterministic placeholder).
    pub artwork_url: String,
    /// Opening price.
    pub start_price: U256,
    /// Display price: current price once a bid exists, else the start price.
    pub current_bid: U256,
    /// Number of accepted bids.
    pub total_bids: u64,
    /// Derived lifecycle status.
    pub status: AuctionStatus,
    /// Nominal start of the bidding window (back-computed).
    pub start_time: DateTime<Utc>,
    /// End of the bidding window.
    pub end_time: DateTime<Utc>,
    /// Current leading bidder, if any.
    pub winner: Option<Address>,
}

/// Contract-wide statistics folded from the full auction list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    /// Total auctions known to the contract.
    pub total_auctions: u64,
    /// Auctions currently accepting bids.
    pub active_auctions: u64,
    /// Auctions whose bidding window is over.
    pub ended_auctions: u64,
    /// Sum of winning bids across ended auctions with a winner.
    pub total_volume: U256,
}
