//! Kanri: consistency and ordering core for a kanban-style project tracker.
//!
//! This crate implements the invariant-bearing heart of a project/task
//! tracker: board ordering within a project, task movement between boards,
//! tag slug normalization with idempotent association, and the
//! ownership-scoped visibility rule applied to every entity lookup. Request
//! routing, authentication and process bootstrap live outside this crate and
//! talk to it through the service layer.
//!
//! # Architecture
//!
//! Kanri follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`tracker`]: projects, boards, tasks and tags with their ordering,
//!   movement and ownership rules

pub mod tracker;
