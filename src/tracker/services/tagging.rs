//! Tag normalization and idempotent association.
//!
//! Raw tag texts normalize to project-scoped slugs before anything touches
//! the store, so a bad input aborts the whole call without a write.
//! Application is then per-slug: each tag row and its task association are
//! asserted in one atomic, idempotent store step, and a store failure on the
//! Nth slug leaves the earlier slugs applied. There is no rollback across
//! the list.

use crate::tracker::domain::{
    Project, Tag, TagSlug, Task, TaskTagAssociation, TrackerDomainError,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tagging operations.
pub type TagResult<T> = Result<T, TagError>;

/// Errors returned while applying tags.
#[derive(Debug, Clone, Error)]
pub enum TagError {
    /// Tag text failed slug normalization.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TrackerStoreError),
}

/// Normalizes tag input and maintains task-tag associations.
pub struct TagService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TagService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a new tag service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Applies `raw_tags` to `task`, creating missing tag rows lazily.
    ///
    /// Duplicates in the input collapse to one association. `task` must
    /// belong to `project`; callers resolve the pair through the access gate.
    /// Returns the applied slugs, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Domain`] when any text normalizes to an empty
    /// slug (before any write), or [`TagError::Store`] when a store step
    /// fails (earlier slugs stay applied).
    pub async fn apply_tags(
        &self,
        task: &Task,
        project: &Project,
        raw_tags: &[String],
    ) -> TagResult<Vec<TagSlug>> {
        let mut slugs = BTreeSet::new();
        for raw in raw_tags {
            slugs.insert(TagSlug::new(raw)?);
        }

        for slug in &slugs {
            let tag = Tag::new(project.id(), slug.clone(), &*self.clock);
            let association =
                TaskTagAssociation::new(task.id(), project.id(), slug.clone(), &*self.clock);
            self.store.apply_task_tag(&tag, &association).await?;
        }

        Ok(slugs.into_iter().collect())
    }
}
