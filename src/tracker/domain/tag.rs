//! Project-scoped tags and their task associations.

use super::{ProjectId, TaskId, TrackerDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized tag slug: lowercase, with runs of non-alphanumeric input
/// collapsed to a single `-` and stripped from both ends.
///
/// `"Bug"`, `"bug"` and `"BUG!"` all normalize to the slug `bug`; within one
/// project they are the same tag.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TagSlug(String);

impl TagSlug {
    /// Normalizes free-text tag input into a slug.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::UnusableTagText`] when nothing
    /// alphanumeric survives normalization.
    pub fn new(raw: &str) -> Result<Self, TrackerDomainError> {
        let mut slug = String::with_capacity(raw.len());
        let mut pending_separator = false;
        for ch in raw.chars() {
            if ch.is_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_separator = true;
            }
        }

        if slug.is_empty() {
            return Err(TrackerDomainError::UnusableTagText(raw.to_owned()));
        }
        Ok(Self(slug))
    }

    /// Returns the slug as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TagSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag record, identified by its `(project, slug)` pair. The same text can
/// exist as distinct tags in different projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    project: ProjectId,
    slug: TagSlug,
    created_at: DateTime<Utc>,
}

impl Tag {
    /// Creates a tag record for `project`.
    #[must_use]
    pub fn new(project: ProjectId, slug: TagSlug, clock: &impl Clock) -> Self {
        Self {
            project,
            slug,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a tag from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        project: ProjectId,
        slug: TagSlug,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            project,
            slug,
            created_at,
        }
    }

    /// Returns the owning project reference.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the tag slug.
    #[must_use]
    pub const fn slug(&self) -> &TagSlug {
        &self.slug
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Many-to-many edge between a task and a project-scoped tag, identified by
/// its `(task, project, slug)` triple. Re-asserting an existing edge is a
/// no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTagAssociation {
    task: TaskId,
    project: ProjectId,
    slug: TagSlug,
    created_at: DateTime<Utc>,
}

impl TaskTagAssociation {
    /// Creates an association edge.
    #[must_use]
    pub fn new(task: TaskId, project: ProjectId, slug: TagSlug, clock: &impl Clock) -> Self {
        Self {
            task,
            project,
            slug,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an association from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        task: TaskId,
        project: ProjectId,
        slug: TagSlug,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task,
            project,
            slug,
            created_at,
        }
    }

    /// Returns the task reference.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the owning project reference.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the tag slug.
    #[must_use]
    pub const fn slug(&self) -> &TagSlug {
        &self.slug
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
