//! Core types for batch coordination

/// Outcome of a batch.
///
/// Moves out of `Pending` exactly once; terminal states never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Failed,
    Succeeded,
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchState::Pending)
    }

    /// Commit a transition out of `Pending`.
    ///
    /// Returns `false` and leaves the state untouched when the batch already
    /// reached a terminal state.
    pub fn commit(&mut self, next: BatchState) -> bool {
        if self.is_terminal() || next == BatchState::Pending {
            return false;
        }
        *self = next;
        true
    }
}

/// A completion reported by the unit of work owning `slot`
#[derive(Debug)]
pub struct CompletionEvent<T, E> {
    pub slot: usize,
    pub result: Result<T, E>,
}

/// What the coordinator did with one event
#[derive(Debug)]
pub(crate) enum Observed<T, E> {
    /// First success for this slot; the batch may still be pending
    Accepted { slot: usize, value: T, finished: bool },
    /// First failure of the batch
    Failed(E),
    /// The slot already completed once
    Duplicate { slot: usize },
    /// The batch already reached a terminal state
    Discarded,
}
