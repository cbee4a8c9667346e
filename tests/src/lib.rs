//! # Gavel Test Suite
//!
//! Unified test crate for cross-component flows: the aggregate service
//! wired over the retrying transport decorator, a scripted mock ledger, and
//! an injected clock.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end query flows against a scripted ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gavel-tests
//! ```

pub mod integration;

/// Installs a compact tracing subscriber so degraded-path warnings show up
/// under `RUST_LOG=gavel_indexer=debug`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}
