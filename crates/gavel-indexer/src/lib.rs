//! # Gavel Indexer
//!
//! Read-model core for a timed-auction platform whose single source of truth
//! is a smart contract reachable only through request/response RPC.
//!
//! ## Purpose
//!
//! The ledger offers no push notifications and no guaranteed log
//! completeness per call. This crate reconstructs, from whatever the
//! endpoint will give it:
//!
//! - an ordered, ranked bid ledger per auction (three fallback strategies)
//! - a derived auction lifecycle state collaborators can treat as
//!   authoritative
//! - contract-wide statistics over the full auction set
//!
//! It observes and reconstructs only; placing bids and creating auctions
//! belong to an external signer.
//!
//! ## Module Structure
//!
//! ```text
//! gavel-indexer/
//! ├── domain/          # Value objects, entities, bid-event decoding, errors
//! ├── algorithms/      # Pure bid ranking and lifecycle derivation
//! ├── ports/           # API trait (inbound) + dependency traits (outbound)
//! ├── adapters/        # Retrying RPC decorator, TTL cache, system clock
//! ├── application/     # Reconciler, projector, aggregate service
//! └── config.rs        # IndexerConfig / RetryPolicy
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{RetryingLedger, SystemClock, TtlCache};
pub use application::{AuctionProjector, AuctionService, BidReconciler};
pub use config::{IndexerConfig, RetryPolicy};
pub use domain::{
    Address, Auction, AuctionDetails, AuctionIndex, AuctionMetadata, AuctionStatus, Bid, Block,
    ContractStats, ContractStatus, Hash, IndexerError, LogEntry, LogFilter, RawAuctionState, U256,
};
pub use ports::{AuctionQueryApi, Clock, LedgerRpc, MetadataStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
