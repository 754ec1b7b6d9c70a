//! Board aggregate root and ordering types.

use super::{BoardId, FieldPatch, ProjectId, TrackerDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, trimmed, non-empty board name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardName(String);

impl BoardName {
    /// Creates a validated board name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyBoardName`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyBoardName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BoardName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BoardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative sort position of a visible board within its project.
///
/// Positions are unique per project but need not be contiguous; new visible
/// boards always append at the current tail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BoardPosition(i64);

impl BoardPosition {
    /// The position assigned to the first visible board of a project.
    pub const FIRST: Self = Self(0);

    /// Creates a validated board position.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::NegativePosition`] when the value is
    /// negative.
    pub const fn new(value: i64) -> Result<Self, TrackerDomainError> {
        if value < 0 {
            return Err(TrackerDomainError::NegativePosition(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns the position directly after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a board carries a sort position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardVisibility {
    /// The board has a position and appears in the ordered board list.
    Visible,
    /// The board has no position and is kept out of the ordered list.
    Hidden,
}

/// Board aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    name: BoardName,
    project: ProjectId,
    position: Option<BoardPosition>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Persisted board name.
    pub name: BoardName,
    /// Persisted owning project reference.
    pub project: ProjectId,
    /// Persisted sort position, when the board is visible.
    pub position: Option<BoardPosition>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a new board under `project`; `position: None` means hidden.
    #[must_use]
    pub fn new(
        project: ProjectId,
        name: BoardName,
        position: Option<BoardPosition>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: BoardId::new(),
            name,
            project,
            position,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            project: data.project,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub const fn name(&self) -> &BoardName {
        &self.name
    }

    /// Returns the owning project reference.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the sort position, when the board is visible.
    #[must_use]
    pub const fn position(&self) -> Option<BoardPosition> {
        self.position
    }

    /// Returns whether the board carries a sort position.
    #[must_use]
    pub const fn visibility(&self) -> BoardVisibility {
        match self.position {
            Some(_) => BoardVisibility::Visible,
            None => BoardVisibility::Hidden,
        }
    }

    /// Returns `true` when the board carries a sort position.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.position.is_some()
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
    pub fn apply_changes(&mut self, changes: &BoardChanges, updated_at: DateTime<Utc>) {
        let mut dirty = false;
        if let FieldPatch::Set(name) = &changes.name {
            self.name = name.clone();
            dirty = true;
        }
        dirty |= changes.position.apply_to(&mut self.position);
        if dirty {
            self.updated_at = updated_at;
        }
    }
}

/// Partial update for a board record.
///
/// `position: Set(None)` hides the board; `Set(Some(_))` places it at an
/// explicit position. There is no automatic re-append when a hidden board
/// becomes visible again: callers must choose the target position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardChanges {
    /// Replacement name, when changed.
    pub name: FieldPatch<BoardName>,
    /// Replacement position (or hide instruction), when changed.
    pub position: FieldPatch<Option<BoardPosition>>,
}

impl BoardChanges {
    /// Returns `true` when no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.name.is_set() && !self.position.is_set()
    }
}
