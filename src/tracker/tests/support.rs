//! Shared fixtures and the mock store used across tracker tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use std::sync::Arc;

use crate::tracker::adapters::memory::InMemoryTrackerStore;
use crate::tracker::domain::{
    Board, BoardChanges, BoardId, BoardVisibility, Project, ProjectId, Tag, Task, TaskChanges,
    TaskId, TaskTagAssociation,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreResult};
use crate::tracker::services::ProjectLifecycleService;

/// Lifecycle service wired to the in-memory store, as used by most tests.
pub type TestLifecycle = ProjectLifecycleService<InMemoryTrackerStore, DefaultClock>;

/// Builds a lifecycle service and hands back its store for direct checks.
pub fn lifecycle_with_store() -> (TestLifecycle, Arc<InMemoryTrackerStore>) {
    let store = Arc::new(InMemoryTrackerStore::new());
    let service = ProjectLifecycleService::new(Arc::clone(&store), Arc::new(DefaultClock));
    (service, store)
}

/// Finds a board by name in a slice, for scenario assertions.
pub fn board_named<'a>(boards: &'a [Board], name: &str) -> &'a Board {
    boards
        .iter()
        .find(|board| board.name().as_str() == name)
        .expect("board with the given name should exist")
}

mockall::mock! {
    /// Mock tracker store for tests that assert on the exact writes issued.
    pub Store {}

    #[async_trait]
    impl TrackerStore for Store {
        async fn insert_project(
            &self,
            project: &Project,
            boards: &[Board],
        ) -> TrackerStoreResult<()>;
        async fn project_by_id(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>>;
        async fn insert_board(&self, board: &Board) -> TrackerStoreResult<()>;
        async fn board_by_id(&self, id: BoardId) -> TrackerStoreResult<Option<Board>>;
        async fn boards_by_project(
            &self,
            project: ProjectId,
            visibility: BoardVisibility,
        ) -> TrackerStoreResult<Vec<Board>>;
        async fn update_board(
            &self,
            id: BoardId,
            changes: &BoardChanges,
            updated_at: DateTime<Utc>,
        ) -> TrackerStoreResult<()>;
        async fn insert_task(&self, task: &Task) -> TrackerStoreResult<()>;
        async fn task_by_id(&self, id: TaskId) -> TrackerStoreResult<Option<Task>>;
        async fn tasks_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Task>>;
        async fn tasks_by_board(&self, board: BoardId) -> TrackerStoreResult<Vec<Task>>;
        async fn update_task(
            &self,
            id: TaskId,
            changes: &TaskChanges,
            updated_at: DateTime<Utc>,
        ) -> TrackerStoreResult<()>;
        async fn delete_task(&self, id: TaskId) -> TrackerStoreResult<()>;
        async fn apply_task_tag(
            &self,
            tag: &Tag,
            association: &TaskTagAssociation,
        ) -> TrackerStoreResult<()>;
        async fn tags_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Tag>>;
        async fn associations_by_project(
            &self,
            project: ProjectId,
        ) -> TrackerStoreResult<Vec<TaskTagAssociation>>;
    }
}
