//! `PostgreSQL` adapters for tracker persistence.

mod models;
mod schema;
mod store;

pub use store::{PostgresTrackerStore, TrackerPgPool};
