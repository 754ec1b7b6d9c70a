//! Unit and service tests for the tracker core.
#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod lifecycle_tests;
mod ordering_tests;
mod support;
