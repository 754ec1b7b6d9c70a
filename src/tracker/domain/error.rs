//! Error types for tracker domain validation.

use thiserror::Error;

/// Errors returned while constructing domain tracker values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyBoardName,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The tag text contains no alphanumeric characters to slug.
    #[error("tag text '{0}' normalizes to an empty slug")]
    UnusableTagText(String),

    /// The board position is negative.
    #[error("board position {0} must not be negative")]
    NegativePosition(i64),
}
