//! Project lifecycle orchestration.
//!
//! The lifecycle service is the surface the request-handling layer talks to.
//! It composes the access gate with the ordering, movement and tagging
//! services, and owns the one piece of provisioning policy in the tracker:
//! every new project starts with the three default boards.

use crate::tracker::domain::{
    Board, BoardChanges, BoardId, BoardName, BoardPosition, BoardVisibility, FieldPatch,
    PrincipalId, Project, ProjectId, ProjectName, TagSlug, Task, TaskId, TaskTitle, TaskWithTags,
    TrackerDomainError,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use crate::tracker::services::access::{AccessError, AccessGate};
use crate::tracker::services::movement::{MovementError, TaskMovementService};
use crate::tracker::services::ordering::{OrderingError, OrderingService};
use crate::tracker::services::tagging::{TagError, TagService};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Names of the boards provisioned with every new project, in position
/// order.
const DEFAULT_BOARD_NAMES: [&str; 3] = ["Backlog", "Work in progress", "Done"];

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Errors returned by lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),

    /// Entity resolution failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Board position assignment failed.
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    /// Task movement failed.
    #[error(transparent)]
    Movement(#[from] MovementError),

    /// Tag application failed.
    #[error(transparent)]
    Tags(#[from] TagError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TrackerStoreError),
}

/// Builder-style partial update for a board.
///
/// Only fields explicitly requested are written: an absent field is left
/// alone, and `place_at(BoardPosition::FIRST)` is a real placement at
/// position `0`, distinct from not touching the position at all. Making a
/// hidden board visible always goes through [`EditBoardRequest::place_at`];
/// there is no automatic tail append on unhide.
#[derive(Debug, Clone, Default)]
pub struct EditBoardRequest {
    name: Option<String>,
    position: FieldPatch<Option<BoardPosition>>,
}

impl EditBoardRequest {
    /// Creates an empty request that would write nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the board.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Places the board at an explicit position, making it visible.
    #[must_use]
    pub const fn place_at(mut self, position: BoardPosition) -> Self {
        self.position = FieldPatch::Set(Some(position));
        self
    }

    /// Clears the board's position, hiding it.
    #[must_use]
    pub const fn hide(mut self) -> Self {
        self.position = FieldPatch::Set(None);
        self
    }

    /// Validates the request into a board patch.
    fn into_changes(self) -> Result<BoardChanges, TrackerDomainError> {
        let name = self
            .name
            .map(BoardName::new)
            .transpose()?
            .map_or(FieldPatch::Keep, FieldPatch::Set);
        Ok(BoardChanges {
            name,
            position: self.position,
        })
    }
}

/// A project's boards split by visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardsOverview {
    /// Boards with a position, sorted ascending by position.
    pub visible: Vec<Board>,
    /// Boards without a position, sorted by creation time.
    pub hidden: Vec<Board>,
}

/// Orchestrates project, board and task operations for resolved principals.
pub struct ProjectLifecycleService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    gate: AccessGate<S>,
    ordering: OrderingService<S, C>,
    movement: TaskMovementService<S, C>,
    tags: TagService<S, C>,
    clock: Arc<C>,
}

impl<S, C> ProjectLifecycleService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle service over one store and clock.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            gate: AccessGate::new(Arc::clone(&store)),
            ordering: OrderingService::new(Arc::clone(&store), Arc::clone(&clock)),
            movement: TaskMovementService::new(Arc::clone(&store), Arc::clone(&clock)),
            tags: TagService::new(Arc::clone(&store), Arc::clone(&clock)),
            store,
            clock,
        }
    }

    /// Creates a project for `owner` and provisions its default boards
    /// ("Backlog", "Work in progress", "Done" at positions 0, 1, 2) in one
    /// atomic store step: a provisioning failure leaves no project behind.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Domain`] when the name is empty, or
    /// [`LifecycleError::Store`] when provisioning fails.
    pub async fn create_project(
        &self,
        name: &str,
        owner: PrincipalId,
    ) -> LifecycleResult<Project> {
        let project_name = ProjectName::new(name)?;
        let project = Project::new(project_name, owner, &*self.clock);
        let boards = self.default_boards(project.id())?;
        self.store.insert_project(&project, &boards).await?;
        Ok(project)
    }

    /// Creates a board in a project the principal owns. Visible boards
    /// append at the project's current tail position.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::ProjectNotFound`] when the project is absent
    /// or not owned, [`LifecycleError::Domain`] when the name is empty, or
    /// [`LifecycleError::Ordering`] when position assignment fails.
    pub async fn create_board(
        &self,
        project_id: ProjectId,
        name: &str,
        hidden: bool,
        principal: PrincipalId,
    ) -> LifecycleResult<Board> {
        let board_name = BoardName::new(name)?;
        let project = self.gate.project(project_id, principal).await?;
        Ok(self.ordering.create_board(&project, board_name, hidden).await?)
    }

    /// Applies a partial update to a board. An empty request writes nothing
    /// and bumps no timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BoardNotFound`] when the board is absent or
    /// not owned, [`LifecycleError::Domain`] when a requested name is empty,
    /// or [`LifecycleError::Store`] when the write fails (including
    /// [`TrackerStoreError::PositionTaken`] for an explicit position that is
    /// already held).
    pub async fn edit_board(
        &self,
        board_id: BoardId,
        request: EditBoardRequest,
        principal: PrincipalId,
    ) -> LifecycleResult<()> {
        let (board, _) = self.gate.board(board_id, principal).await?;
        let changes = request.into_changes()?;
        if changes.is_empty() {
            return Ok(());
        }
        self.store
            .update_board(board.id(), &changes, self.clock.utc())
            .await?;
        Ok(())
    }

    /// Creates a task on a board the principal owns and applies its tags.
    ///
    /// The task commits before the tags do; a tag failure surfaces while the
    /// task and any earlier tags remain (see [`TagService::apply_tags`]).
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BoardNotFound`] when the board is absent,
    /// [`AccessError::ProjectNotFound`] when its project has a foreign
    /// owner, [`LifecycleError::Domain`] when the title is empty, or
    /// [`LifecycleError::Tags`] when tag application fails.
    pub async fn create_task(
        &self,
        board_id: BoardId,
        title: &str,
        tags: &[String],
        principal: PrincipalId,
    ) -> LifecycleResult<Task> {
        let task_title = TaskTitle::new(title)?;
        let (board, project) = self.gate.project_board(board_id, principal).await?;
        let task = Task::new(project.id(), board.id(), task_title, &*self.clock);
        self.store.insert_task(&task).await?;
        self.tags.apply_tags(&task, &project, tags).await?;
        Ok(task)
    }

    /// Deletes a task the principal owns, along with its tag associations.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::TaskNotFound`] when the task is absent or not
    /// owned.
    pub async fn delete_task(
        &self,
        task_id: TaskId,
        principal: PrincipalId,
    ) -> LifecycleResult<()> {
        let (task, _) = self.gate.task(task_id, principal).await?;
        self.store.delete_task(task.id()).await?;
        Ok(())
    }

    /// Moves a task onto another board of its project.
    ///
    /// # Errors
    ///
    /// See [`TaskMovementService::move_task`].
    pub async fn move_task(
        &self,
        task_id: TaskId,
        destination: BoardId,
        principal: PrincipalId,
    ) -> LifecycleResult<()> {
        Ok(self.movement.move_task(task_id, destination, principal).await?)
    }

    /// Lists a project's boards, split into visible and hidden sets.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::ProjectNotFound`] when the project is absent
    /// or not owned.
    pub async fn list_boards(
        &self,
        project_id: ProjectId,
        principal: PrincipalId,
    ) -> LifecycleResult<BoardsOverview> {
        let project = self.gate.project(project_id, principal).await?;
        let visible = self
            .store
            .boards_by_project(project.id(), BoardVisibility::Visible)
            .await?;
        let hidden = self
            .store
            .boards_by_project(project.id(), BoardVisibility::Hidden)
            .await?;
        Ok(BoardsOverview { visible, hidden })
    }

    /// Lists the tasks sitting on one board the principal owns, sorted by
    /// title.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BoardNotFound`] when the board is absent or
    /// not owned.
    pub async fn list_board_tasks(
        &self,
        board_id: BoardId,
        principal: PrincipalId,
    ) -> LifecycleResult<Vec<Task>> {
        let (board, _) = self.gate.board(board_id, principal).await?;
        Ok(self.store.tasks_by_board(board.id()).await?)
    }

    /// Lists a project's tasks with their tag slugs, sorted by title.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::ProjectNotFound`] when the project is absent
    /// or not owned.
    pub async fn list_tasks(
        &self,
        project_id: ProjectId,
        principal: PrincipalId,
    ) -> LifecycleResult<Vec<TaskWithTags>> {
        let project = self.gate.project(project_id, principal).await?;
        let tasks = self.store.tasks_by_project(project.id()).await?;
        let associations = self.store.associations_by_project(project.id()).await?;

        let mut slugs_by_task: HashMap<TaskId, Vec<TagSlug>> = HashMap::new();
        for association in associations {
            slugs_by_task
                .entry(association.task())
                .or_default()
                .push(association.slug().clone());
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let tags = slugs_by_task.remove(&task.id()).unwrap_or_default();
                TaskWithTags { task, tags }
            })
            .collect())
    }

    /// Builds the default boards for a freshly created project.
    fn default_boards(&self, project: ProjectId) -> Result<Vec<Board>, TrackerDomainError> {
        let mut boards = Vec::with_capacity(DEFAULT_BOARD_NAMES.len());
        let mut position = BoardPosition::FIRST;
        for name in DEFAULT_BOARD_NAMES {
            let board_name = BoardName::new(name)?;
            boards.push(Board::new(
                project,
                board_name,
                Some(position),
                &*self.clock,
            ));
            position = position.next();
        }
        Ok(boards)
    }
}
