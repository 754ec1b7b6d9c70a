//! Behavioural integration tests for the tracker core.
//!
//! These tests exercise the full public surface against the in-memory store
//! in realistic flows: provisioning a project, filling its default boards,
//! moving work along and keeping foreign principals locked out.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use kanri::tracker::adapters::memory::InMemoryTrackerStore;
use kanri::tracker::domain::{Board, BoardPosition, PrincipalId};
use kanri::tracker::services::{
    AccessError, LifecycleError, MovementError, ProjectLifecycleService,
};
use mockable::DefaultClock;

type Lifecycle = ProjectLifecycleService<InMemoryTrackerStore, DefaultClock>;

fn lifecycle() -> Lifecycle {
    ProjectLifecycleService::new(
        Arc::new(InMemoryTrackerStore::new()),
        Arc::new(DefaultClock),
    )
}

fn board_named<'a>(boards: &'a [Board], name: &str) -> &'a Board {
    boards
        .iter()
        .find(|board| board.name().as_str() == name)
        .expect("board with the given name should exist")
}

#[tokio::test(flavor = "multi_thread")]
async fn a_task_travels_across_the_default_boards() {
    let service = lifecycle();
    let owner = PrincipalId::new();
    let stranger = PrincipalId::new();

    // Provisioning: three visible boards, fixed names, positions 0..2.
    let project = service
        .create_project("Kanri rollout", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let positions: Vec<i64> = overview
        .visible
        .iter()
        .filter_map(Board::position)
        .map(BoardPosition::value)
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let backlog = board_named(&overview.visible, "Backlog").clone();
    let in_progress = board_named(&overview.visible, "Work in progress").clone();

    let task = service
        .create_task(
            backlog.id(),
            "Wire the move endpoint",
            &["API".to_owned(), "api!".to_owned()],
            owner,
        )
        .await
        .expect("task creation should succeed");

    // A stranger cannot even see the task, let alone move it.
    let denied = service.move_task(task.id(), in_progress.id(), stranger).await;
    assert!(matches!(
        denied,
        Err(LifecycleError::Movement(MovementError::Access(
            AccessError::TaskNotFound(_)
        )))
    ));

    // The owner moves it; the board changes, the project does not.
    service
        .move_task(task.id(), in_progress.id(), owner)
        .await
        .expect("move should succeed");

    let listed = service
        .list_tasks(project.id(), owner)
        .await
        .expect("task listing should succeed");
    let entry = listed.first().expect("one task listed");
    assert_eq!(entry.task.board(), in_progress.id());
    assert_eq!(entry.task.project(), project.id());

    // The duplicate raw tags collapsed into one slug.
    let slugs: Vec<&str> = entry.tags.iter().map(AsRef::as_ref).collect();
    assert_eq!(slugs, vec!["api"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn projects_of_different_owners_stay_fully_isolated() {
    let service = lifecycle();
    let first_owner = PrincipalId::new();
    let second_owner = PrincipalId::new();

    let first = service
        .create_project("First", first_owner)
        .await
        .expect("project creation should succeed");
    let second = service
        .create_project("Second", second_owner)
        .await
        .expect("project creation should succeed");

    // Each owner sees only their own project; the other's is "missing".
    let crossed = service.list_boards(first.id(), second_owner).await;
    assert!(matches!(
        crossed,
        Err(LifecycleError::Access(AccessError::ProjectNotFound(_)))
    ));

    let own = service
        .list_boards(second.id(), second_owner)
        .await
        .expect("own board listing should succeed");
    assert_eq!(own.visible.len(), 3);
}
