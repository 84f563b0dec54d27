//! Shared plumbing for the TUI (task lifecycle, generation tokens).

mod generation;
mod task;

pub use generation::Generation;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, TaskState, Tasks};
