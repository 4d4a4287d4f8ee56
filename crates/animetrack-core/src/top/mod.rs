pub mod drag;
pub mod list;
pub mod reconciler;

pub use drag::{Container, DragEnd, DropLocation};
pub use list::{PositionCorrection, TopList};
pub use reconciler::{AddOutcome, Mutation, Reconciler, ReorderOutcome, SyncState, TopSnapshot};
