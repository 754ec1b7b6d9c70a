//! Task movement between boards.
//!
//! A move only ever repositions a task within its own project's board set.
//! The destination and source boards are resolved with the same ownership
//! checks, a cross-project destination is rejected as an unknown project,
//! and a same-board move is a pure no-op: no write is issued and no
//! timestamp is bumped.

use crate::tracker::domain::{
    BoardId, FieldPatch, PrincipalId, ProjectId, TaskChanges, TaskId,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use crate::tracker::services::access::{AccessError, AccessGate};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Result type for movement operations.
pub type MovementResult<T> = Result<T, MovementError>;

/// Errors returned while moving a task.
#[derive(Debug, Clone, Error)]
pub enum MovementError {
    /// Task, board or project resolution failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The task's stored project reference disagrees with its board's
    /// project. This guards against stale rows; it never fires while the
    /// cross-entity invariant holds.
    #[error("task {task} is not consistent with project {expected}")]
    ProjectMismatch {
        /// The inconsistent task.
        task: TaskId,
        /// The project the task's board belongs to.
        expected: ProjectId,
    },

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TrackerStoreError),
}

/// Validates and executes task moves.
pub struct TaskMovementService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    gate: AccessGate<S>,
    clock: Arc<C>,
}

impl<S, C> TaskMovementService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a new movement service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let gate = AccessGate::new(Arc::clone(&store));
        Self { store, gate, clock }
    }

    /// Moves `task_id` onto `destination`, leaving the task's project
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::TaskNotFound`] when the task is absent or not
    /// owned, [`AccessError::BoardNotFound`] when either board is absent,
    /// and [`AccessError::ProjectNotFound`] when either board's project has
    /// a foreign owner or the destination lies in a different project.
    pub async fn move_task(
        &self,
        task_id: TaskId,
        destination: BoardId,
        principal: PrincipalId,
    ) -> MovementResult<()> {
        let (task, _) = self.gate.task(task_id, principal).await?;
        let (destination_board, destination_project) =
            self.gate.project_board(destination, principal).await?;
        let (source_board, source_project) =
            self.gate.project_board(task.board(), principal).await?;

        // Boards and tasks are project-scoped; a cross-project "move" is not
        // an operation, and the foreign project stays unacknowledged.
        if destination_project.id() != source_project.id() {
            return Err(AccessError::ProjectNotFound(destination_project.id()).into());
        }
        if task.project() != destination_project.id() {
            return Err(MovementError::ProjectMismatch {
                task: task.id(),
                expected: destination_project.id(),
            });
        }

        if destination_board.id() == source_board.id() {
            debug!(task = %task.id(), board = %destination_board.id(), "task already on board");
            return Ok(());
        }

        let changes = TaskChanges {
            board: FieldPatch::Set(destination_board.id()),
            ..TaskChanges::default()
        };
        self.store
            .update_task(task.id(), &changes, self.clock.utc())
            .await?;
        Ok(())
    }
}
