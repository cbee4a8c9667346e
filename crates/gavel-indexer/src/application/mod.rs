//! # Application Module
//!
//! Orchestration over the domain and outbound ports: bid-ledger
//! reconciliation, auction projection, and the aggregate query service.

pub mod projector;
pub mod reconciler;
pub mod service;

pub use projector::AuctionProjector;
pub use reconciler::BidReconciler;
pub use service::AuctionService;
