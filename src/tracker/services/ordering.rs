//! Board ordering policy.
//!
//! Visible boards of a project carry unique integer positions. New visible
//! boards always append at `max + 1` (or `0` for the first); the store's
//! uniqueness guarantee plus a bounded recompute-and-retry loop keeps the
//! invariant under concurrent creation in the same project. Hidden boards
//! carry no position and never contend.

use crate::tracker::domain::{
    Board, BoardName, BoardPosition, BoardVisibility, Project, ProjectId,
};
use crate::tracker::ports::{TrackerStore, TrackerStoreError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Creations that lose the tail position this many times in a row give up.
const MAX_APPEND_ATTEMPTS: u32 = 5;

/// Result type for ordering operations.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Errors returned by the ordering policy.
#[derive(Debug, Clone, Error)]
pub enum OrderingError {
    /// Concurrent creations kept claiming the tail position faster than this
    /// call could recompute it.
    #[error("could not claim a board position in project {0}")]
    PositionContended(ProjectId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TrackerStoreError),
}

/// Assigns board positions and persists new boards.
pub struct OrderingService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> OrderingService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Creates a new ordering service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a board under `project`, appending visible boards at the
    /// current tail position.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::PositionContended`] when the retry budget is
    /// exhausted, or [`OrderingError::Store`] on store failure.
    pub async fn create_board(
        &self,
        project: &Project,
        name: BoardName,
        hidden: bool,
    ) -> OrderingResult<Board> {
        if hidden {
            let board = Board::new(project.id(), name, None, &*self.clock);
            self.store.insert_board(&board).await?;
            return Ok(board);
        }

        for _attempt in 0..MAX_APPEND_ATTEMPTS {
            let position = self.next_position(project.id()).await?;
            let board = Board::new(project.id(), name.clone(), Some(position), &*self.clock);
            match self.store.insert_board(&board).await {
                Ok(()) => return Ok(board),
                Err(TrackerStoreError::PositionTaken { .. }) => {
                    debug!(
                        project = %project.id(),
                        %position,
                        "tail position claimed concurrently, recomputing",
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(OrderingError::PositionContended(project.id()))
    }

    /// Computes the next tail position among the project's visible boards.
    async fn next_position(&self, project: ProjectId) -> OrderingResult<BoardPosition> {
        let visible = self
            .store
            .boards_by_project(project, BoardVisibility::Visible)
            .await?;
        Ok(visible
            .last()
            .and_then(Board::position)
            .map_or(BoardPosition::FIRST, BoardPosition::next))
    }
}
