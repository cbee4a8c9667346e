//! # Domain Module
//!
//! Core types for the auction read-model: ledger-native state, the
//! reconstructed bid ledger, and the projected auction record.

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
