//! Port contracts for the tracker core.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod store;

pub use store::{TrackerStore, TrackerStoreError, TrackerStoreResult};
