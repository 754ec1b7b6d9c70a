//! Thread-safe in-memory tracker store.
//!
//! Every operation takes the single state lock once, which makes each store
//! call atomic: the visible-position uniqueness check happens under the same
//! lock as the insert, matching the transactional guarantees the port
//! documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::tracker::domain::{
    Board, BoardChanges, BoardId, BoardPosition, BoardVisibility, Project, ProjectId, Tag,
    TagSlug, Task, TaskChanges, TaskId, TaskTagAssociation,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError, TrackerStoreResult};

/// Thread-safe in-memory tracker store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    projects: HashMap<ProjectId, Project>,
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
    tags: HashMap<(ProjectId, TagSlug), Tag>,
    associations: HashMap<(TaskId, ProjectId, TagSlug), TaskTagAssociation>,
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock to a store failure.
fn poisoned(err: &dyn fmt::Display) -> TrackerStoreError {
    TrackerStoreError::unavailable(std::io::Error::other(err.to_string()))
}

/// Reports whether another board of `project` already holds `position`.
fn position_conflict(
    state: &StoreState,
    project: ProjectId,
    position: BoardPosition,
    exclude: Option<BoardId>,
) -> bool {
    state.boards.values().any(|existing| {
        existing.project() == project
            && Some(existing.id()) != exclude
            && existing.position() == Some(position)
    })
}

/// Rejects `board` when its position is already held in its project.
fn check_board_insert(state: &StoreState, board: &Board) -> TrackerStoreResult<()> {
    let Some(position) = board.position() else {
        return Ok(());
    };
    if position_conflict(state, board.project(), position, Some(board.id())) {
        return Err(TrackerStoreError::PositionTaken {
            project: board.project(),
            position,
        });
    }
    Ok(())
}

#[async_trait]
impl TrackerStore for InMemoryTrackerStore {
    async fn insert_project(
        &self,
        project: &Project,
        boards: &[Board],
    ) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        // Validate the whole batch, including against itself, before
        // touching state so a rejected board leaves no partially
        // provisioned project.
        let mut claimed = HashSet::new();
        for board in boards {
            check_board_insert(&state, board)?;
            if let Some(position) = board.position() {
                if !claimed.insert((board.project(), position)) {
                    return Err(TrackerStoreError::PositionTaken {
                        project: board.project(),
                        position,
                    });
                }
            }
        }
        state.projects.insert(project.id(), project.clone());
        for board in boards {
            state.boards.insert(board.id(), board.clone());
        }
        Ok(())
    }

    async fn project_by_id(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn insert_board(&self, board: &Board) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        check_board_insert(&state, board)?;
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn board_by_id(&self, id: BoardId) -> TrackerStoreResult<Option<Board>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.boards.get(&id).cloned())
    }

    async fn boards_by_project(
        &self,
        project: ProjectId,
        visibility: BoardVisibility,
    ) -> TrackerStoreResult<Vec<Board>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|board| board.project() == project && board.visibility() == visibility)
            .cloned()
            .collect();
        match visibility {
            BoardVisibility::Visible => boards.sort_by_key(Board::position),
            BoardVisibility::Hidden => boards.sort_by_key(Board::created_at),
        }
        Ok(boards)
    }

    async fn update_board(
        &self,
        id: BoardId,
        changes: &BoardChanges,
        updated_at: DateTime<Utc>,
    ) -> TrackerStoreResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let Some(current) = state.boards.get(&id) else {
            return Ok(());
        };
        if let Some(Some(position)) = changes.position.as_set() {
            if position_conflict(&state, current.project(), *position, Some(id)) {
                return Err(TrackerStoreError::PositionTaken {
                    project: current.project(),
                    position: *position,
                });
            }
        }
        let Some(board) = state.boards.get_mut(&id) else {
            return Ok(());
        };
        board.apply_changes(changes, updated_at);
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn task_by_id(&self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn tasks_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project() == project)
            .cloned()
            .collect();
        sort_by_title(&mut tasks);
        Ok(tasks)
    }

    async fn tasks_by_board(&self, board: BoardId) -> TrackerStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.board() == board)
            .cloned()
            .collect();
        sort_by_title(&mut tasks);
        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: TaskId,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> TrackerStoreResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(());
        };
        task.apply_changes(changes, updated_at);
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.tasks.remove(&id);
        state.associations.retain(|(task, _, _), _| *task != id);
        Ok(())
    }

    async fn apply_task_tag(
        &self,
        tag: &Tag,
        association: &TaskTagAssociation,
    ) -> TrackerStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state
            .tags
            .entry((tag.project(), tag.slug().clone()))
            .or_insert_with(|| tag.clone());
        state
            .associations
            .entry((
                association.task(),
                association.project(),
                association.slug().clone(),
            ))
            .or_insert_with(|| association.clone());
        Ok(())
    }

    async fn tags_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Tag>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|tag| tag.project() == project)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.slug().cmp(b.slug()));
        Ok(tags)
    }

    async fn associations_by_project(
        &self,
        project: ProjectId,
    ) -> TrackerStoreResult<Vec<TaskTagAssociation>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        let mut associations: Vec<TaskTagAssociation> = state
            .associations
            .values()
            .filter(|association| association.project() == project)
            .cloned()
            .collect();
        associations.sort_by(|a, b| (a.task(), a.slug()).cmp(&(b.task(), b.slug())));
        Ok(associations)
    }
}

/// Sorts tasks by title, then id for a stable tie-break.
fn sort_by_title(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        (a.title().as_str(), a.id()).cmp(&(b.title().as_str(), b.id()))
    });
}
