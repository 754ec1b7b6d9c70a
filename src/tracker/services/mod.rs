//! Application services for the tracker core.

mod access;
mod lifecycle;
mod movement;
mod ordering;
mod tagging;

pub use access::{AccessError, AccessGate, AccessResult};
pub use lifecycle::{
    BoardsOverview, EditBoardRequest, LifecycleError, LifecycleResult, ProjectLifecycleService,
};
pub use movement::{MovementError, MovementResult, TaskMovementService};
pub use ordering::{OrderingError, OrderingResult, OrderingService};
pub use tagging::{TagError, TagResult, TagService};
