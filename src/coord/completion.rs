//! The callback handed to every unit of work

use tokio::sync::mpsc;

use crate::coord::types::CompletionEvent;

/// Completion handle for one unit of work.
///
/// Cheap to clone and safe to call more than once: the coordinator keeps the
/// first completion of each unit and ignores the rest. Once the batch has
/// finished, completions are dropped on the floor.
pub struct Completion<T, E> {
    slot: usize,
    evt_tx: mpsc::UnboundedSender<CompletionEvent<T, E>>,
}

impl<T, E> Completion<T, E> {
    pub(crate) fn new(slot: usize, evt_tx: mpsc::UnboundedSender<CompletionEvent<T, E>>) -> Self {
        Self { slot, evt_tx }
    }

    /// Position of the owning item in its collection
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Report the unit's outcome
    pub fn complete(&self, result: Result<T, E>) {
        let event = CompletionEvent {
            slot: self.slot,
            result,
        };
        if self.evt_tx.send(event).is_err() {
            tracing::trace!(slot = self.slot, "batch already finished, completion discarded");
        }
    }

    pub fn ok(&self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(&self, error: E) {
        self.complete(Err(error));
    }

    /// True once the batch stopped listening
    pub fn is_closed(&self) -> bool {
        self.evt_tx.is_closed()
    }
}

impl<V, E> Completion<Vec<V>, E> {
    /// Complete with exactly one value
    pub fn single(&self, value: V) {
        self.ok(vec![value]);
    }
}

impl<T, E> Clone for Completion<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot,
            evt_tx: self.evt_tx.clone(),
        }
    }
}

impl<T, E> std::fmt::Debug for Completion<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("slot", &self.slot)
            .field("closed", &self.is_closed())
            .finish()
    }
}
