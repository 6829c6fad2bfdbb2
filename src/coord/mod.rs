//! Completion coordination for a batch of units of work
//!
//! Units report through [`Completion`] handles; the [`Coordinator`] counts
//! distinct completions and decides the batch outcome once.

pub mod completion;
pub mod coordinator;
pub mod types;

pub use completion::Completion;
pub use coordinator::Coordinator;
pub use types::{BatchState, CompletionEvent};
