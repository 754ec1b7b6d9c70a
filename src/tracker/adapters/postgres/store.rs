//! `PostgreSQL` tracker store implementation.
//!
//! Visible-position uniqueness rides on the `boards` table's
//! `(project_id, position)` unique constraint; hidden boards store a null
//! position, which `PostgreSQL` never treats as conflicting. Multi-row
//! mutations (project provisioning, tag application, task deletion) run in
//! one transaction each.

use super::models::{BoardRow, ProjectRow, TagRow, TaskRow, TaskTagRow};
use super::schema::{boards, projects, tags, task_tags, tasks};
use crate::tracker::domain::{
    Board, BoardChanges, BoardId, BoardPosition, BoardVisibility, Project, ProjectId, Tag, Task,
    TaskChanges, TaskId, TaskTagAssociation,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError, TrackerStoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed tracker store.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackerStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerStoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerStoreError::unavailable)?
    }
}

#[async_trait]
impl TrackerStore for PostgresTrackerStore {
    async fn insert_project(
        &self,
        project: &Project,
        boards_to_create: &[Board],
    ) -> TrackerStoreResult<()> {
        let project_row = ProjectRow::from_domain(project);
        let board_rows: Vec<BoardRow> = boards_to_create.iter().map(BoardRow::from_domain).collect();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(projects::table)
                        .values(&project_row)
                        .execute(tx)?;
                    diesel::insert_into(boards::table)
                        .values(&board_rows)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(TrackerStoreError::unavailable)
        })
        .await
    }

    async fn project_by_id(&self, id: ProjectId) -> TrackerStoreResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(TrackerStoreError::unavailable)?;
            row.map(ProjectRow::into_domain).transpose()
        })
        .await
    }

    async fn insert_board(&self, board: &Board) -> TrackerStoreResult<()> {
        let row = BoardRow::from_domain(board);
        let project = board.project();
        let position = board.position();

        self.run_blocking(move |connection| {
            diesel::insert_into(boards::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_position_violation(err, project, position))?;
            Ok(())
        })
        .await
    }

    async fn board_by_id(&self, id: BoardId) -> TrackerStoreResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .find(id.into_inner())
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(TrackerStoreError::unavailable)?;
            row.map(BoardRow::into_domain).transpose()
        })
        .await
    }

    async fn boards_by_project(
        &self,
        project: ProjectId,
        visibility: BoardVisibility,
    ) -> TrackerStoreResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let base = boards::table.filter(boards::project_id.eq(project.into_inner()));
            let rows = match visibility {
                BoardVisibility::Visible => base
                    .filter(boards::position.is_not_null())
                    .order(boards::position.asc())
                    .select(BoardRow::as_select())
                    .load::<BoardRow>(connection),
                BoardVisibility::Hidden => base
                    .filter(boards::position.is_null())
                    .order(boards::created_at.asc())
                    .select(BoardRow::as_select())
                    .load::<BoardRow>(connection),
            }
            .map_err(TrackerStoreError::unavailable)?;
            rows.into_iter().map(BoardRow::into_domain).collect()
        })
        .await
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
        let name_set: Option<String> = changes
            .name
            .as_set()
            .map(|name| name.as_str().to_owned());
        let position_set: Option<Option<i64>> = changes
            .position
            .as_set()
            .map(|position| position.map(BoardPosition::value));
        let target_position = changes.position.as_set().copied().flatten();

        self.run_blocking(move |connection| {
            // The project id is only needed to label a potential position
            // conflict; the unique constraint itself carries correctness.
            let found = boards::table
                .find(id.into_inner())
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(TrackerStoreError::unavailable)?;
            let Some(current) = found else {
                return Ok(());
            };
            let project = ProjectId::from_uuid(current.project_id);

            diesel::update(boards::table.find(id.into_inner()))
                .set((
                    name_set.map(|value| boards::name.eq(value)),
                    position_set.map(|value| boards::position.eq(value)),
                    boards::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| map_position_violation(err, project, target_position))?;
            Ok(())
        })
        .await
    }

    async fn insert_task(&self, task: &Task) -> TrackerStoreResult<()> {
        let row = TaskRow::from_domain(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(TrackerStoreError::unavailable)?;
            Ok(())
        })
        .await
    }

    async fn task_by_id(&self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TrackerStoreError::unavailable)?;
            row.map(TaskRow::into_domain).transpose()
        })
        .await
    }

    async fn tasks_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .order((tasks::title.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TrackerStoreError::unavailable)?;
            rows.into_iter().map(TaskRow::into_domain).collect()
        })
        .await
    }

    async fn tasks_by_board(&self, board: BoardId) -> TrackerStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::board_id.eq(board.into_inner()))
                .order((tasks::title.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TrackerStoreError::unavailable)?;
            rows.into_iter().map(TaskRow::into_domain).collect()
        })
        .await
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
        let title_set: Option<String> = changes
            .title
            .as_set()
            .map(|title| title.as_str().to_owned());
        let board_set: Option<uuid::Uuid> = changes.board.as_set().map(|board| board.into_inner());

        self.run_blocking(move |connection| {
            diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    title_set.map(|value| tasks::title.eq(value)),
                    board_set.map(|value| tasks::board_id.eq(value)),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TrackerStoreError::unavailable)?;
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TrackerStoreResult<()> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::delete(task_tags::table.filter(task_tags::task_id.eq(id.into_inner())))
                        .execute(tx)?;
                    diesel::delete(tasks::table.find(id.into_inner())).execute(tx)?;
                    Ok(())
                })
                .map_err(TrackerStoreError::unavailable)
        })
        .await
    }

    async fn apply_task_tag(
        &self,
        tag: &Tag,
        association: &TaskTagAssociation,
    ) -> TrackerStoreResult<()> {
        let tag_row = TagRow::from_domain(tag);
        let association_row = TaskTagRow::from_domain(association);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(tags::table)
                        .values(&tag_row)
                        .on_conflict_do_nothing()
                        .execute(tx)?;
                    diesel::insert_into(task_tags::table)
                        .values(&association_row)
                        .on_conflict_do_nothing()
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(TrackerStoreError::unavailable)
        })
        .await
    }

    async fn tags_by_project(&self, project: ProjectId) -> TrackerStoreResult<Vec<Tag>> {
        self.run_blocking(move |connection| {
            let rows = tags::table
                .filter(tags::project_id.eq(project.into_inner()))
                .order(tags::slug.asc())
                .select(TagRow::as_select())
                .load::<TagRow>(connection)
                .map_err(TrackerStoreError::unavailable)?;
            rows.into_iter().map(TagRow::into_domain).collect()
        })
        .await
    }

    async fn associations_by_project(
        &self,
        project: ProjectId,
    ) -> TrackerStoreResult<Vec<TaskTagAssociation>> {
        self.run_blocking(move |connection| {
            let rows = task_tags::table
                .filter(task_tags::project_id.eq(project.into_inner()))
                .order((task_tags::task_id.asc(), task_tags::tag_slug.asc()))
                .select(TaskTagRow::as_select())
                .load::<TaskTagRow>(connection)
                .map_err(TrackerStoreError::unavailable)?;
            rows.into_iter().map(TaskTagRow::into_domain).collect()
        })
        .await
    }
}

/// Maps a unique violation on the board position constraint to
/// [`TrackerStoreError::PositionTaken`]; everything else passes through as
/// unavailable.
fn map_position_violation(
    err: DieselError,
    project: ProjectId,
    position: Option<BoardPosition>,
) -> TrackerStoreError {
    match (err, position) {
        (
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info),
            Some(position_value),
        ) if is_position_unique_violation(info.as_ref()) => TrackerStoreError::PositionTaken {
            project,
            position: position_value,
        },
        (other, _) => TrackerStoreError::unavailable(other),
    }
}

/// Recognizes the `(project_id, position)` unique constraint on `boards`.
fn is_position_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name() == Some("boards_project_id_position_key")
}
