//! Ownership-scoped entity resolution.
//!
//! Every read or mutation of a project, board or task starts here. The gate
//! resolves the entity, walks up to its owning project and compares the
//! project's owner against the requesting principal. Absence and foreign
//! ownership collapse into the same error: callers can never distinguish
//! "does not exist" from "exists but is not yours".

use crate::tracker::domain::{Board, BoardId, PrincipalId, Project, ProjectId, Task, TaskId};
use crate::tracker::ports::{TrackerStore, TrackerStoreError, TrackerStoreResult};
use std::sync::Arc;
use thiserror::Error;

/// Result type for gate resolutions.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors returned by ownership-scoped resolution.
///
/// The not-found variants cover both true absence and ownership mismatch.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// The project does not exist for this principal.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The board does not exist for this principal.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The task does not exist for this principal.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The store failed before ownership could be established.
    #[error(transparent)]
    Store(#[from] TrackerStoreError),
}

/// Resolves entities and enforces the ownership rule for one store.
pub struct AccessGate<S> {
    store: Arc<S>,
}

impl<S> Clone for AccessGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> AccessGate<S>
where
    S: TrackerStore,
{
    /// Creates a gate over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves a project owned by `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::ProjectNotFound`] when the project is absent or
    /// owned by someone else.
    pub async fn project(&self, id: ProjectId, principal: PrincipalId) -> AccessResult<Project> {
        let fetch = async {
            Ok(self
                .store
                .project_by_id(id)
                .await?
                .map(|project| ((), project)))
        };
        let ((), project) = resolve_owned(fetch, principal, AccessError::ProjectNotFound(id), |_| {
            AccessError::ProjectNotFound(id)
        })
        .await?;
        Ok(project)
    }

    /// Resolves a board owned by `principal`, together with its project.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BoardNotFound`] when the board is absent or its
    /// project is owned by someone else.
    pub async fn board(
        &self,
        id: BoardId,
        principal: PrincipalId,
    ) -> AccessResult<(Board, Project)> {
        resolve_owned(
            self.board_with_project(id),
            principal,
            AccessError::BoardNotFound(id),
            |_| AccessError::BoardNotFound(id),
        )
        .await
    }

    /// Resolves a board within a project the principal must own, reporting a
    /// foreign owner as an unknown *project* rather than an unknown board.
    ///
    /// Task creation and movement use this split: the board id the caller
    /// sent resolves normally, but the project it belongs to is not theirs
    /// to see.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BoardNotFound`] when the board is absent and
    /// [`AccessError::ProjectNotFound`] when its project has a foreign owner.
    pub async fn project_board(
        &self,
        id: BoardId,
        principal: PrincipalId,
    ) -> AccessResult<(Board, Project)> {
        resolve_owned(
            self.board_with_project(id),
            principal,
            AccessError::BoardNotFound(id),
            |project| AccessError::ProjectNotFound(project.id()),
        )
        .await
    }

    /// Resolves a task owned by `principal`, together with its project.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::TaskNotFound`] when the task is absent or its
    /// project is owned by someone else.
    pub async fn task(&self, id: TaskId, principal: PrincipalId) -> AccessResult<(Task, Project)> {
        let fetch = async {
            let Some(task) = self.store.task_by_id(id).await? else {
                return Ok(None);
            };
            let Some(project) = self.store.project_by_id(task.project()).await? else {
                return Ok(None);
            };
            Ok(Some((task, project)))
        };
        resolve_owned(fetch, principal, AccessError::TaskNotFound(id), |_| {
            AccessError::TaskNotFound(id)
        })
        .await
    }

    /// Fetches a board and its owning project. A board whose project row is
    /// gone resolves to `None`; a dangling child is invisible.
    async fn board_with_project(
        &self,
        id: BoardId,
    ) -> TrackerStoreResult<Option<(Board, Project)>> {
        let Some(board) = self.store.board_by_id(id).await? else {
            return Ok(None);
        };
        let Some(project) = self.store.project_by_id(board.project()).await? else {
            return Ok(None);
        };
        Ok(Some((board, project)))
    }
}

/// The single ownership policy: resolve, then require the owning project's
/// owner to match the principal. `missing` is returned for absence and
/// `foreign` produces the error for an ownership mismatch; passing the same
/// error for both makes the two outcomes indistinguishable.
async fn resolve_owned<T, F, E>(
    fetch: F,
    principal: PrincipalId,
    missing: AccessError,
    foreign: E,
) -> AccessResult<(T, Project)>
where
    F: Future<Output = TrackerStoreResult<Option<(T, Project)>>>,
    E: FnOnce(&Project) -> AccessError,
{
    let resolved = fetch.await?;
    let Some((entity, project)) = resolved else {
        return Err(missing);
    };
    if project.owner() != principal {
        return Err(foreign(&project));
    }
    Ok((entity, project))
}
