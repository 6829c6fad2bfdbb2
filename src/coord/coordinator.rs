//! Coordinator - completion tracking for one batch of units of work
//!
//! Every unit of work reports through a [`Completion`] handle that feeds an
//! event channel. A single driver loop drains that channel, so the batch
//! state is only ever read and written from one place and needs no locks.

use tokio::sync::mpsc;

use crate::coord::completion::Completion;
use crate::coord::types::{BatchState, CompletionEvent, Observed};

/// Distinct-completion bookkeeping for a batch of `size` units.
#[derive(Debug)]
pub(crate) struct BatchTracker {
    completed: Vec<bool>,
    remaining: usize,
    state: BatchState,
}

impl BatchTracker {
    pub(crate) fn new(size: usize) -> Self {
        let mut state = BatchState::Pending;
        if size == 0 {
            state.commit(BatchState::Succeeded);
        }
        Self {
            completed: vec![false; size],
            remaining: size,
            state,
        }
    }

    pub(crate) fn state(&self) -> BatchState {
        self.state
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Apply one completion event.
    ///
    /// The terminal check and the transition happen in the same call, so no
    /// other completion can observe a half-applied state.
    pub(crate) fn observe<T, E>(&mut self, event: CompletionEvent<T, E>) -> Observed<T, E> {
        if self.state.is_terminal() {
            return Observed::Discarded;
        }
        let slot = event.slot;
        match self.completed.get_mut(slot) {
            Some(done) if *done => return Observed::Duplicate { slot },
            Some(done) => *done = true,
            None => return Observed::Discarded,
        }

        match event.result {
            Err(error) => {
                self.state.commit(BatchState::Failed);
                Observed::Failed(error)
            }
            Ok(value) => {
                self.remaining -= 1;
                let finished = self.remaining == 0 && self.state.commit(BatchState::Succeeded);
                Observed::Accepted {
                    slot,
                    value,
                    finished,
                }
            }
        }
    }
}

/// Coordinator for one batch
pub struct Coordinator<T, E> {
    evt_tx: mpsc::UnboundedSender<CompletionEvent<T, E>>,
    evt_rx: mpsc::UnboundedReceiver<CompletionEvent<T, E>>,
    tracker: BatchTracker,
    warn_on_duplicate: bool,
}

impl<T, E> Coordinator<T, E> {
    /// Create a coordinator expecting `size` distinct completions
    pub fn new(size: usize) -> Self {
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        Self {
            evt_tx,
            evt_rx,
            tracker: BatchTracker::new(size),
            warn_on_duplicate: true,
        }
    }

    pub fn with_duplicate_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_duplicate = enabled;
        self
    }

    pub fn state(&self) -> BatchState {
        self.tracker.state()
    }

    /// Handle for the unit of work at `slot`
    pub fn completion(&self, slot: usize) -> Completion<T, E> {
        debug_assert!(slot < self.tracker.completed.len(), "slot {slot} out of range");
        Completion::new(slot, self.evt_tx.clone())
    }

    /// Drive the batch to its terminal state.
    ///
    /// `on_success` sees every accepted value exactly once, in completion
    /// order. Returns the first error reported by any unit. A batch whose
    /// units never complete never returns.
    pub async fn run<F>(self, mut on_success: F) -> Result<(), E>
    where
        F: FnMut(usize, T),
    {
        let mut driver = Driver::from(self);
        if driver.tracker.state() == BatchState::Succeeded {
            tracing::debug!("empty batch, nothing to run");
            return Ok(());
        }

        loop {
            let (slot, value, finished) = driver.next_accepted().await?;
            on_success(slot, value);
            if finished {
                tracing::debug!("batch succeeded");
                return Ok(());
            }
        }
    }

    /// Drive the batch until its first accepted value and return it.
    ///
    /// Meant for batches of one unit. An empty batch has no value to hand
    /// back and never returns.
    pub async fn run_single(self) -> Result<T, E> {
        let mut driver = Driver::from(self);
        let (_, value, _) = driver.next_accepted().await?;
        Ok(value)
    }
}

/// Receiving half of a coordinator once its own sender is gone
struct Driver<T, E> {
    evt_rx: mpsc::UnboundedReceiver<CompletionEvent<T, E>>,
    tracker: BatchTracker,
    warn_on_duplicate: bool,
}

impl<T, E> From<Coordinator<T, E>> for Driver<T, E> {
    fn from(coordinator: Coordinator<T, E>) -> Self {
        let Coordinator {
            evt_tx,
            evt_rx,
            tracker,
            warn_on_duplicate,
        } = coordinator;
        // Only handed-out completions may keep the channel open.
        drop(evt_tx);
        Self {
            evt_rx,
            tracker,
            warn_on_duplicate,
        }
    }
}

impl<T, E> Driver<T, E> {
    /// Wait for the next accepted value or the first failure.
    ///
    /// Parks forever once every handle is dropped with slots outstanding.
    async fn next_accepted(&mut self) -> Result<(usize, T, bool), E> {
        while let Some(event) = self.evt_rx.recv().await {
            match self.tracker.observe(event) {
                Observed::Accepted {
                    slot,
                    value,
                    finished,
                } => {
                    tracing::debug!(
                        slot,
                        remaining = self.tracker.remaining(),
                        "unit of work completed"
                    );
                    return Ok((slot, value, finished));
                }
                Observed::Failed(error) => {
                    tracing::debug!(
                        remaining = self.tracker.remaining(),
                        "unit of work failed, short-circuiting batch"
                    );
                    return Err(error);
                }
                Observed::Duplicate { slot } => {
                    if self.warn_on_duplicate {
                        tracing::warn!(slot, "unit of work completed more than once, ignoring");
                    } else {
                        tracing::debug!(slot, "unit of work completed more than once, ignoring");
                    }
                }
                Observed::Discarded => {
                    tracing::trace!("completion for finished batch discarded");
                }
            }
        }

        tracing::warn!(
            remaining = self.tracker.remaining(),
            "every completion handle was dropped before the batch finished; it will never complete"
        );
        std::future::pending().await
    }
}
