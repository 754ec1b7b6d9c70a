//! Project, board, task and tag tracking for Kanri.
//!
//! This module implements the tracker's consistency and ordering rules:
//! board positions are assigned append-only and stay unique per project,
//! tasks only ever move between boards of their own project, tag slugs are
//! normalized and associated idempotently, and every lookup is scoped to the
//! requesting principal so that foreign entities are indistinguishable from
//! missing ones. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
