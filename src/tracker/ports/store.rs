//! Store port for tracker persistence.
//!
//! The store is the only shared mutable resource in the tracker: services
//! hold no in-process state and every operation is bounded by store round
//! trips. Implementations are expected to be constructed once at process
//! start and passed in explicitly; there is no ambient global connection.

use crate::tracker::domain::{
    Board, BoardChanges, BoardId, BoardPosition, BoardVisibility, Project, ProjectId, Tag, Task,
    TaskChanges, TaskId, TaskTagAssociation,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type TrackerStoreResult<T> = Result<T, TrackerStoreError>;

/// Tracker persistence contract.
///
/// Lookups model absence as `Ok(None)`, never as an error. Partial updates
/// against a row that vanished concurrently are silent no-ops; callers
/// resolve entities through the access gate immediately beforehand.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Stores a new project together with its initial boards, atomically:
    /// either every row commits or none does.
    async fn insert_project(
        &self,
        project: &Project,
        boards: &[Board],
    ) -> TrackerStoreResult<()>;

    /// Finds a project by identifier.
    async fn project_by_id(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>>;

    /// Stores a new board.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::PositionTaken`] when the board is visible
    /// and another board of the same project already holds its position. The
    /// uniqueness check is atomic with the insert; concurrent creations in
    /// one project can never both commit the same position.
    async fn insert_board(&self, board: &Board) -> TrackerStoreResult<()>;

    /// Finds a board by identifier.
    async fn board_by_id(&self, id: BoardId) -> TrackerStoreResult<Option<Board>>;

    /// Returns a project's boards filtered by visibility. Visible boards are
    /// sorted ascending by position, hidden boards by creation time.
    async fn boards_by_project(
        &self,
        project: ProjectId,
        visibility: BoardVisibility,
    ) -> TrackerStoreResult<Vec<Board>>;

    /// Applies a partial update to a board, writing `updated_at` only when
    /// the patch is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::PositionTaken`] when the patch places the
    /// board on a position already held within its project.
    async fn update_board(
        &self,
        id: BoardId,
        changes: &BoardChanges,
        updated_at: DateTime<Utc>,
    ) -> TrackerStoreResult<()>;

    /// Stores a new task.
    async fn insert_task(&self, task: &Task) -> TrackerStoreResult<()>;

    /// Finds a task by identifier.
    async fn task_by_id(&self, id: TaskId) -> TrackerStoreResult<Option<Task>>;

    /// Returns a project's tasks, sorted by title.
    async fn tasks_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Task>>;

    /// Returns a board's tasks, sorted by title.
    async fn tasks_by_board(&self, board: BoardId) -> TrackerStoreResult<Vec<Task>>;

    /// Applies a partial update to a task, writing `updated_at` only when
    /// the patch is non-empty.
    async fn update_task(
        &self,
        id: TaskId,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> TrackerStoreResult<()>;

    /// Deletes a task and its tag associations. Deleting an absent task is a
    /// no-op.
    async fn delete_task(&self, id: TaskId) -> TrackerStoreResult<()>;

    /// Asserts a tag row and its task association in one atomic step.
    /// Idempotent: rows that already exist are left untouched and the call
    /// succeeds.
    async fn apply_task_tag(
        &self,
        tag: &Tag,
        association: &TaskTagAssociation,
    ) -> TrackerStoreResult<()>;

    /// Returns a project's tags, sorted by slug.
    async fn tags_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Tag>>;

    /// Returns every task-tag association of a project, sorted by task and
    /// slug.
    async fn associations_by_project(
        &self,
        project: ProjectId,
    ) -> TrackerStoreResult<Vec<TaskTagAssociation>>;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerStoreError {
    /// A visible board of the project already holds the position.
    #[error("position {position} already taken in project {project}")]
    PositionTaken {
        /// Project whose visible board set was contended.
        project: ProjectId,
        /// The position both writers tried to claim.
        position: BoardPosition,
    },

    /// Persistence-layer failure.
    #[error("store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerStoreError {
    /// Wraps a persistence-layer failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
