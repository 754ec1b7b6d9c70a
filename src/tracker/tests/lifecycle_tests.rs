//! Lifecycle orchestration tests: provisioning, board edits, task flows.

use crate::tracker::domain::{
    Board, BoardName, BoardPosition, PrincipalId, Project, ProjectName, TrackerDomainError,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use crate::tracker::services::{AccessError, EditBoardRequest, LifecycleError};
use crate::tracker::tests::support::{board_named, lifecycle_with_store};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_projects_get_exactly_the_three_default_boards() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();

    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");

    let summary: Vec<(&str, Option<i64>)> = overview
        .visible
        .iter()
        .map(|board| {
            (
                board.name().as_str(),
                board.position().map(BoardPosition::value),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Backlog", Some(0)),
            ("Work in progress", Some(1)),
            ("Done", Some(2)),
        ]
    );
    assert!(overview.hidden.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_project_names_are_rejected() {
    let (service, _) = lifecycle_with_store();
    let result = service.create_project("   ", PrincipalId::new()).await;
    assert!(matches!(
        result,
        Err(LifecycleError::Domain(TrackerDomainError::EmptyProjectName))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioning_commits_all_rows_or_none() {
    let (_, store) = lifecycle_with_store();
    let clock = DefaultClock;
    let project = Project::new(
        ProjectName::new("Half built").expect("valid project name"),
        PrincipalId::new(),
        &clock,
    );
    let duplicate_position = Some(BoardPosition::FIRST);
    let boards = vec![
        Board::new(
            project.id(),
            BoardName::new("One").expect("valid board name"),
            duplicate_position,
            &clock,
        ),
        Board::new(
            project.id(),
            BoardName::new("Two").expect("valid board name"),
            duplicate_position,
            &clock,
        ),
    ];

    let result = store.insert_project(&project, &boards).await;

    assert!(matches!(
        result,
        Err(TrackerStoreError::PositionTaken { .. })
    ));
    let after = store
        .project_by_id(project.id())
        .await
        .expect("project lookup should succeed");
    assert!(after.is_none(), "a rejected batch must leave no project");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_boards_append_after_the_defaults() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");

    let board = service
        .create_board(project.id(), "Review", false, owner)
        .await
        .expect("board creation should succeed");

    assert_eq!(board.position().map(BoardPosition::value), Some(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hidden_boards_are_listed_separately() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");

    service
        .create_board(project.id(), "Icebox", true, owner)
        .await
        .expect("hidden board creation should succeed");

    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    assert_eq!(overview.visible.len(), 3);
    assert_eq!(overview.hidden.len(), 1);
    assert_eq!(
        overview
            .hidden
            .first()
            .expect("one hidden board")
            .name()
            .as_str(),
        "Icebox"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_board_in_a_foreign_project_fails_as_missing() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");

    let result = service
        .create_board(project.id(), "Sneaky", false, PrincipalId::new())
        .await;
    assert!(matches!(
        result,
        Err(LifecycleError::Access(AccessError::ProjectNotFound(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_board_renames_without_touching_the_position() {
    let (service, store) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog").clone();

    service
        .edit_board(backlog.id(), EditBoardRequest::new().rename("Inbox"), owner)
        .await
        .expect("rename should succeed");

    let renamed = store
        .board_by_id(backlog.id())
        .await
        .expect("board lookup should succeed")
        .expect("board should still exist");
    assert_eq!(renamed.name().as_str(), "Inbox");
    assert_eq!(renamed.position(), backlog.position());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_unhidden_board_lands_exactly_where_the_caller_says() {
    let (service, store) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog").clone();

    service
        .edit_board(backlog.id(), EditBoardRequest::new().hide(), owner)
        .await
        .expect("hide should succeed");
    let hidden = store
        .board_by_id(backlog.id())
        .await
        .expect("board lookup should succeed")
        .expect("board should still exist");
    assert_eq!(hidden.position(), None);

    // Position 0 is free again; an explicit placement at 0 must be honored
    // as a real value, not treated as unset.
    service
        .edit_board(
            backlog.id(),
            EditBoardRequest::new().place_at(BoardPosition::FIRST),
            owner,
        )
        .await
        .expect("placement should succeed");
    let placed = store
        .board_by_id(backlog.id())
        .await
        .expect("board lookup should succeed")
        .expect("board should still exist");
    assert_eq!(placed.position(), Some(BoardPosition::FIRST));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_empty_edit_writes_nothing() {
    let (service, store) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog").clone();

    service
        .edit_board(backlog.id(), EditBoardRequest::new(), owner)
        .await
        .expect("empty edit should succeed");

    let untouched = store
        .board_by_id(backlog.id())
        .await
        .expect("board lookup should succeed")
        .expect("board should still exist");
    assert_eq!(untouched.updated_at(), backlog.updated_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_explicit_position_that_is_taken_surfaces_the_conflict() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog").clone();

    // "Work in progress" already holds position 1.
    let result = service
        .edit_board(
            backlog.id(),
            EditBoardRequest::new().place_at(BoardPosition::FIRST.next()),
            owner,
        )
        .await;

    assert!(matches!(
        result,
        Err(LifecycleError::Store(TrackerStoreError::PositionTaken { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_list_with_their_tags_sorted_by_title() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog");

    service
        .create_task(backlog.id(), "Zebra task", &["Late".to_owned()], owner)
        .await
        .expect("task creation should succeed");
    service
        .create_task(backlog.id(), "Alpha task", &["Bug".to_owned()], owner)
        .await
        .expect("task creation should succeed");

    let tasks = service
        .list_tasks(project.id(), owner)
        .await
        .expect("task listing should succeed");
    let titles: Vec<&str> = tasks
        .iter()
        .map(|entry| entry.task.title().as_str())
        .collect();
    assert_eq!(titles, vec!["Alpha task", "Zebra task"]);

    let first = tasks.first().expect("two tasks listed");
    let slugs: Vec<&str> = first.tags.iter().map(AsRef::as_ref).collect();
    assert_eq!(slugs, vec!["bug"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_drops_its_associations_only() {
    let (service, store) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog");

    let doomed = service
        .create_task(backlog.id(), "Doomed", &["shared".to_owned()], owner)
        .await
        .expect("task creation should succeed");
    let survivor = service
        .create_task(backlog.id(), "Survivor", &["shared".to_owned()], owner)
        .await
        .expect("task creation should succeed");

    service
        .delete_task(doomed.id(), owner)
        .await
        .expect("deletion should succeed");

    let associations = store
        .associations_by_project(project.id())
        .await
        .expect("association listing should succeed");
    assert_eq!(associations.len(), 1);
    assert_eq!(
        associations.first().expect("one association").task(),
        survivor.id()
    );
    let tags = store
        .tags_by_project(project.id())
        .await
        .expect("tag listing should succeed");
    assert_eq!(tags.len(), 1, "the tag row itself stays");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_foreign_task_fails_as_missing() {
    let (service, _) = lifecycle_with_store();
    let owner = PrincipalId::new();
    let project = service
        .create_project("Release 1", owner)
        .await
        .expect("project creation should succeed");
    let overview = service
        .list_boards(project.id(), owner)
        .await
        .expect("board listing should succeed");
    let backlog = board_named(&overview.visible, "Backlog");
    let task = service
        .create_task(backlog.id(), "Private", &[], owner)
        .await
        .expect("task creation should succeed");

    let result = service.delete_task(task.id(), PrincipalId::new()).await;
    assert!(matches!(
        result,
        Err(LifecycleError::Access(AccessError::TaskNotFound(_)))
    ));
}
