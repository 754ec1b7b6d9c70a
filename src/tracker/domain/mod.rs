//! Domain model for the tracker core.
//!
//! Projects own boards, boards hold tasks, and tasks carry project-scoped
//! tags. All infrastructure concerns stay outside the domain boundary; the
//! types here only encode identity, validation and the patch semantics used
//! for partial updates.

mod board;
mod error;
mod ids;
mod patch;
mod project;
mod tag;
mod task;

pub use board::{Board, BoardChanges, BoardName, BoardPosition, BoardVisibility, PersistedBoardData};
pub use error::TrackerDomainError;
pub use ids::{BoardId, PrincipalId, ProjectId, TaskId};
pub use patch::FieldPatch;
pub use project::{PersistedProjectData, Project, ProjectName};
pub use tag::{Tag, TagSlug, TaskTagAssociation};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskTitle, TaskWithTags};
