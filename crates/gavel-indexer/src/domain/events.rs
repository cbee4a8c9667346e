//! # Bid Event Schema
//!
//! Decoding for the contract's `BidPlaced` event. Two payload layouts exist
//! in chain history:
//!
//! - **Indexed layout** (current contract builds): the auction index is an
//!   indexed topic, bidder and amount sit in the data payload.
//! - **Inline layout** (older builds): nothing is indexed beyond the
//!   signature; all three fields sit in the data payload.
//!
//! Decoding is typed: each path returns `Option<BidEvent>` and a log that
//! fails to decode is skipped by the caller, never aborts a scan.

use super::entities::LogEntry;
use super::value_objects::{Address, Hash, U256};
use sha3::{Digest, Keccak256};

/// Canonical event signature.
pub const BID_PLACED_SIGNATURE: &str = "BidPlaced(uint256,address,uint256)";

/// Symbolic event name used by shape-based log queries.
pub const BID_PLACED_NAME: &str = "BidPlaced";

/// Keccak-256 of the canonical signature, matched against topic 0.
#[must_use]
pub fn bid_placed_topic() -> Hash {
    let digest = Keccak256::digest(BID_PLACED_SIGNATURE.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Hash::new(bytes)
}

/// One decoded `BidPlaced` emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BidEvent {
    /// Auction the bid targets.
    pub auction_id: u64,
    /// Bidding account.
    pub bidder: Address,
    /// Bid amount.
    pub amount: U256,
}

/// Reads the i-th 32-byte word of an ABI data payload.
fn word(data: &[u8], i: usize) -> Option<&[u8]> {
    let start = i.checked_mul(32)?;
    let end = start.checked_add(32)?;
    data.get(start..end)
}

fn word_u256(data: &[u8], i: usize) -> Option<U256> {
    word(data, i).map(U256::from_big_endian)
}

/// Reads a left-padded address word; nonzero padding marks a malformed log.
fn word_address(data: &[u8], i: usize) -> Option<Address> {
    let w = word(data, i)?;
    if w[..12] != [0u8; 12] {
        return None;
    }
    Address::from_slice(&w[12..])
}

fn u256_as_index(value: U256) -> Option<u64> {
    if value > U256::from(u64::MAX) {
        return None;
    }
    Some(value.as_u64())
}

/// Decodes the indexed layout: `topics = [signature, auction_id]`,
/// `data = bidder ‖ amount`.
#[must_use]
pub fn try_decode_indexed(log: &LogEntry) -> Option<BidEvent> {
    if log.topics.first() != Some(&bid_placed_topic()) {
        return None;
    }
    let id_topic = log.topics.get(1)?;
    let auction_id = u256_as_index(U256::from_big_endian(id_topic.as_bytes()))?;
    let bidder = word_address(&log.data, 0)?;
    let amount = word_u256(&log.data, 1)?;
    Some(BidEvent {
        auction_id,
        bidder,
        amount,
    })
}

/// Decodes the inline layout: `topics = [signature]`,
/// `data = auction_id ‖ bidder ‖ amount`.
#[must_use]
pub fn try_decode_inline(log: &LogEntry) -> Option<BidEvent> {
    if log.topics.first() != Some(&bid_placed_topic()) {
        return None;
    }
    if log.topics.len() != 1 {
        return None;
    }
    let auction_id = u256_as_index(word_u256(&log.data, 0)?)?;
    let bidder = word_address(&log.data, 1)?;
    let amount = word_u256(&log.data, 2)?;
    Some(BidEvent {
        auction_id,
        bidder,
        amount,
    })
}

/// Shape-tolerant decoder used by the symbolic-name scan: accepts either
/// layout, whichever the log actually carries.
#[must_use]
pub fn try_decode_shaped(log: &LogEntry) -> Option<BidEvent> {
    try_decode_inline(log).or_else(|| try_decode_indexed(log))
}

// =============================================================================
// PAYLOAD ENCODERS (fixtures and round-trip tests)
// =============================================================================

fn u256_word(value: U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

fn address_word(addr: Address) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(addr.as_bytes());
    bytes
}

/// Encodes the indexed layout for a synthetic log.
#[must_use]
pub fn encode_indexed(auction_id: u64, bidder: Address, amount: U256) -> (Vec<Hash>, Vec<u8>) {
    let topics = vec![
        bid_placed_topic(),
        Hash::new(u256_word(U256::from(auction_id))),
    ];
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&address_word(bidder));
    data.extend_from_slice(&u256_word(amount));
    (topics, data)
}

/// Encodes the inline layout for a synthetic log.
#[must_use]
pub fn encode_inline(auction_id: u64, bidder: Address, amount: U256) -> (Vec<Hash>, Vec<u8>) {
    let topics = vec![bid_placed_topic()];
    let mut data = Vec::with_capacity(96);
    data.extend_from_slice(&u256_word(U256::from(auction_id)));
    data.extend_from_slice(&address_word(bidder));
    data.extend_from_slice(&u256_word(amount));
    (topics, data)
}
