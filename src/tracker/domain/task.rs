//! Task aggregate root.

use super::{BoardId, FieldPatch, ProjectId, TagSlug, TaskId, TrackerDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, trimmed, non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyTaskTitle`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyTaskTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task aggregate root.
///
/// Invariant: `project` always equals the owning project of `board`. Moves
/// rewrite the board reference only; the project reference never changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    project: ProjectId,
    board: BoardId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task title.
    pub title: TaskTitle,
    /// Persisted owning project reference.
    pub project: ProjectId,
    /// Persisted owning board reference.
    pub board: BoardId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task on `board` under `project`.
    #[must_use]
    pub fn new(project: ProjectId, board: BoardId, title: TaskTitle, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            project,
            board,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            project: data.project,
            board: data.board,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the owning project reference.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the owning board reference.
    #[must_use]
    pub const fn board(&self) -> BoardId {
        self.board
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update, bumping `updated_at` only when at least one
    /// field was written.
    pub fn apply_changes(&mut self, changes: &TaskChanges, updated_at: DateTime<Utc>) {
        let mut dirty = false;
        if let FieldPatch::Set(title) = &changes.title {
            self.title = title.clone();
            dirty = true;
        }
        dirty |= changes.board.apply_to(&mut self.board);
        if dirty {
            self.updated_at = updated_at;
        }
    }
}

/// Partial update for a task record.
///
/// There is deliberately no project field: a move repositions a task within
/// its project's board set, never across projects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskChanges {
    /// Replacement title, when changed.
    pub title: FieldPatch<TaskTitle>,
    /// Replacement board reference, when changed.
    pub board: FieldPatch<BoardId>,
}

impl TaskChanges {
    /// Returns `true` when no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.title.is_set() && !self.board.is_set()
    }
}

/// Read model pairing a task with its derived tag slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithTags {
    /// The task record.
    pub task: Task,
    /// Slugs of every tag associated with the task, sorted.
    pub tags: Vec<TagSlug>,
}
