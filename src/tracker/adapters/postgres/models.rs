//! Diesel row models for tracker persistence.

use super::schema::{boards, projects, tags, task_tags, tasks};
use crate::tracker::domain::{
    Board, BoardId, BoardName, BoardPosition, PersistedBoardData, PersistedProjectData,
    PersistedTaskData, PrincipalId, Project, ProjectId, ProjectName, Tag, TagSlug, Task, TaskId,
    TaskTagAssociation, TaskTitle,
};
use crate::tracker::ports::{TrackerStoreError, TrackerStoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for project records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Project name.
    pub name: String,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Builds a row from a domain project.
    #[must_use]
    pub fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id().into_inner(),
            name: project.name().as_str().to_owned(),
            owner_id: project.owner().into_inner(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }

    /// Converts the row back into a domain project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Unavailable`] when the stored name no
    /// longer passes domain validation.
    pub fn into_domain(self) -> TrackerStoreResult<Project> {
        let name = ProjectName::new(self.name).map_err(TrackerStoreError::unavailable)?;
        Ok(Project::from_persisted(PersistedProjectData {
            id: ProjectId::from_uuid(self.id),
            name,
            owner: PrincipalId::from_uuid(self.owner_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Row model for board records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Board name.
    pub name: String,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Sort position; null for hidden boards.
    pub position: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BoardRow {
    /// Builds a row from a domain board.
    #[must_use]
    pub fn from_domain(board: &Board) -> Self {
        Self {
            id: board.id().into_inner(),
            name: board.name().as_str().to_owned(),
            project_id: board.project().into_inner(),
            position: board.position().map(BoardPosition::value),
            created_at: board.created_at(),
            updated_at: board.updated_at(),
        }
    }

    /// Converts the row back into a domain board.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Unavailable`] when the stored name or
    /// position no longer passes domain validation.
    pub fn into_domain(self) -> TrackerStoreResult<Board> {
        let name = BoardName::new(self.name).map_err(TrackerStoreError::unavailable)?;
        let position = self
            .position
            .map(BoardPosition::new)
            .transpose()
            .map_err(TrackerStoreError::unavailable)?;
        Ok(Board::from_persisted(PersistedBoardData {
            id: BoardId::from_uuid(self.id),
            name,
            project: ProjectId::from_uuid(self.project_id),
            position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Row model for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Owning board.
    pub board_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    /// Builds a row from a domain task.
    #[must_use]
    pub fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            project_id: task.project().into_inner(),
            board_id: task.board().into_inner(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }

    /// Converts the row back into a domain task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Unavailable`] when the stored title no
    /// longer passes domain validation.
    pub fn into_domain(self) -> TrackerStoreResult<Task> {
        let title = TaskTitle::new(self.title).map_err(TrackerStoreError::unavailable)?;
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            title,
            project: ProjectId::from_uuid(self.project_id),
            board: BoardId::from_uuid(self.board_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Row model for tag records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Normalized slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TagRow {
    /// Builds a row from a domain tag.
    #[must_use]
    pub fn from_domain(tag: &Tag) -> Self {
        Self {
            project_id: tag.project().into_inner(),
            slug: tag.slug().as_str().to_owned(),
            created_at: tag.created_at(),
        }
    }

    /// Converts the row back into a domain tag.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Unavailable`] when the stored slug no
    /// longer normalizes to itself.
    pub fn into_domain(self) -> TrackerStoreResult<Tag> {
        let slug = TagSlug::new(&self.slug).map_err(TrackerStoreError::unavailable)?;
        Ok(Tag::from_persisted(
            ProjectId::from_uuid(self.project_id),
            slug,
            self.created_at,
        ))
    }
}

/// Row model for task-tag association records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskTagRow {
    /// Tagged task.
    pub task_id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Associated tag slug.
    pub tag_slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskTagRow {
    /// Builds a row from a domain association.
    #[must_use]
    pub fn from_domain(association: &TaskTagAssociation) -> Self {
        Self {
            task_id: association.task().into_inner(),
            project_id: association.project().into_inner(),
            tag_slug: association.slug().as_str().to_owned(),
            created_at: association.created_at(),
        }
    }

    /// Converts the row back into a domain association.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Unavailable`] when the stored slug no
    /// longer normalizes to itself.
    pub fn into_domain(self) -> TrackerStoreResult<TaskTagAssociation> {
        let slug = TagSlug::new(&self.tag_slug).map_err(TrackerStoreError::unavailable)?;
        Ok(TaskTagAssociation::from_persisted(
            TaskId::from_uuid(self.task_id),
            ProjectId::from_uuid(self.project_id),
            slug,
            self.created_at,
        ))
    }
}
