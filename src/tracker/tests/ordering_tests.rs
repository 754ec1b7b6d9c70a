//! Ordering policy tests: append-only positions, unique under concurrency.

use std::sync::Arc;

use crate::tracker::adapters::memory::InMemoryTrackerStore;
use crate::tracker::domain::{
    Board, BoardName, BoardPosition, BoardVisibility, PrincipalId, Project, ProjectName,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use crate::tracker::services::{OrderingError, OrderingService};
use crate::tracker::tests::support::MockStore;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestOrdering = OrderingService<InMemoryTrackerStore, DefaultClock>;

struct OrderingFixture {
    service: TestOrdering,
    store: Arc<InMemoryTrackerStore>,
    project: Project,
}

#[fixture]
fn fixture() -> OrderingFixture {
    let store = Arc::new(InMemoryTrackerStore::new());
    let clock = Arc::new(DefaultClock);
    let service = OrderingService::new(Arc::clone(&store), Arc::clone(&clock));
    let project = Project::new(
        ProjectName::new("Ordering fixtures").expect("valid project name"),
        PrincipalId::new(),
        &*clock,
    );
    OrderingFixture {
        service,
        store,
        project,
    }
}

fn board_name(value: &str) -> BoardName {
    BoardName::new(value).expect("valid board name")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_visible_board_starts_at_zero(fixture: OrderingFixture) {
    let board = fixture
        .service
        .create_board(&fixture.project, board_name("Backlog"), false)
        .await
        .expect("board creation should succeed");

    assert_eq!(board.position(), Some(BoardPosition::FIRST));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn visible_boards_append_after_the_tail(fixture: OrderingFixture) {
    for name in ["Backlog", "Work in progress", "Done"] {
        fixture
            .service
            .create_board(&fixture.project, board_name(name), false)
            .await
            .expect("board creation should succeed");
    }

    let boards = fixture
        .store
        .boards_by_project(fixture.project.id(), BoardVisibility::Visible)
        .await
        .expect("board listing should succeed");
    let positions: Vec<i64> = boards
        .iter()
        .filter_map(Board::position)
        .map(BoardPosition::value)
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_continues_after_a_positional_gap(fixture: OrderingFixture) {
    let gapped = Board::new(
        fixture.project.id(),
        board_name("Archive"),
        Some(BoardPosition::new(5).expect("valid position")),
        &DefaultClock,
    );
    fixture
        .store
        .insert_board(&gapped)
        .await
        .expect("direct insert should succeed");

    let board = fixture
        .service
        .create_board(&fixture.project, board_name("Backlog"), false)
        .await
        .expect("board creation should succeed");

    assert_eq!(board.position().map(BoardPosition::value), Some(6));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hidden_boards_carry_no_position_and_do_not_shift_the_tail(fixture: OrderingFixture) {
    let hidden = fixture
        .service
        .create_board(&fixture.project, board_name("Icebox"), true)
        .await
        .expect("hidden board creation should succeed");
    assert_eq!(hidden.position(), None);

    let visible = fixture
        .service
        .create_board(&fixture.project, board_name("Backlog"), false)
        .await
        .expect("visible board creation should succeed");
    assert_eq!(visible.position(), Some(BoardPosition::FIRST));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creations_never_share_a_position(fixture: OrderingFixture) {
    let service = Arc::new(fixture.service);
    let mut handles = Vec::new();
    for index in 0..8 {
        let task_service = Arc::clone(&service);
        let project = fixture.project.clone();
        handles.push(tokio::spawn(async move {
            task_service
                .create_board(&project, board_name(&format!("Lane {index}")), false)
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("spawned creation should not panic")
            .expect("board creation should succeed");
    }

    let boards = fixture
        .store
        .boards_by_project(fixture.project.id(), BoardVisibility::Visible)
        .await
        .expect("board listing should succeed");
    let mut positions: Vec<i64> = boards
        .iter()
        .filter_map(Board::position)
        .map(BoardPosition::value)
        .collect();
    positions.sort_unstable();
    positions.dedup();
    assert_eq!(positions.len(), 8, "positions must be unique");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sustained_contention_gives_up_with_a_dedicated_error() {
    let mut store = MockStore::new();
    store
        .expect_boards_by_project()
        .returning(|_, _| Ok(Vec::new()));
    store.expect_insert_board().returning(|board| {
        Err(TrackerStoreError::PositionTaken {
            project: board.project(),
            position: board.position().unwrap_or(BoardPosition::FIRST),
        })
    });

    let clock = Arc::new(DefaultClock);
    let service = OrderingService::new(Arc::new(store), Arc::clone(&clock));
    let project = Project::new(
        ProjectName::new("Contended").expect("valid project name"),
        PrincipalId::new(),
        &*clock,
    );

    let result = service
        .create_board(&project, board_name("Backlog"), false)
        .await;
    assert!(matches!(result, Err(OrderingError::PositionContended(_))));
}
