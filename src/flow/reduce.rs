//! Sequential reduction

use std::future::Future;

use tracing::Instrument;

use crate::collection::Collection;
use crate::coord::Completion;
use crate::flow::executor::Flow;

impl Flow {
    /// Fold `initial` through the collection one item at a time.
    ///
    /// The iteratee for an item is only invoked after the previous item's
    /// completion delivered the next accumulator, so at most one iteratee is
    /// in flight. Keyed collections are visited in key enumeration order.
    /// The first failure stops the reduction and the remaining items are
    /// never visited.
    pub async fn reduce<T, A, E, C, I>(
        &self,
        collection: C,
        initial: A,
        mut iteratee: I,
    ) -> Result<A, E>
    where
        C: Into<Collection<T>>,
        I: FnMut(A, T, Completion<A, E>),
    {
        let (shape, items) = collection.into().into_parts();
        let span = self.batch_span("reduce", &shape);

        async move {
            tracing::debug!("starting batch");
            let mut accumulator = initial;
            // The iterator is the cursor; items are never inspected for emptiness.
            for (step, item) in items.into_iter().enumerate() {
                let coordinator = self.coordinator(1);
                iteratee(accumulator, item, coordinator.completion(0));

                accumulator = coordinator.run_single().await.map_err(|error| {
                    tracing::debug!(step, "reduction stopped by failure");
                    error
                })?;
                tracing::trace!(step, "reduced item");
            }
            tracing::debug!("reduce finished");
            Ok(accumulator)
        }
        .instrument(span)
        .await
    }

    /// [`Flow::reduce`] for iteratees written as futures.
    ///
    /// Each step is awaited in place before the next item is touched.
    pub async fn reduce_async<T, A, E, C, F, Fut>(
        &self,
        collection: C,
        initial: A,
        mut iteratee: F,
    ) -> Result<A, E>
    where
        C: Into<Collection<T>>,
        F: FnMut(A, T) -> Fut,
        Fut: Future<Output = Result<A, E>>,
    {
        let (shape, items) = collection.into().into_parts();
        let span = self.batch_span("reduce", &shape);

        async move {
            tracing::debug!("starting batch");
            let mut accumulator = initial;
            for (step, item) in items.into_iter().enumerate() {
                accumulator = iteratee(accumulator, item).await.map_err(|error| {
                    tracing::debug!(step, "reduction stopped by failure");
                    error
                })?;
                tracing::trace!(step, "reduced item");
            }
            tracing::debug!("reduce finished");
            Ok(accumulator)
        }
        .instrument(span)
        .await
    }
}

/// [`Flow::reduce`] with the default configuration
pub async fn reduce<T, A, E, C, I>(collection: C, initial: A, iteratee: I) -> Result<A, E>
where
    C: Into<Collection<T>>,
    I: FnMut(A, T, Completion<A, E>),
{
    Flow::default().reduce(collection, initial, iteratee).await
}

/// [`Flow::reduce_async`] with the default configuration
pub async fn reduce_async<T, A, E, C, F, Fut>(
    collection: C,
    initial: A,
    iteratee: F,
) -> Result<A, E>
where
    C: Into<Collection<T>>,
    F: FnMut(A, T) -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    Flow::default().reduce_async(collection, initial, iteratee).await
}
