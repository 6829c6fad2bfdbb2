//! Concurrent filter that keeps input order

use std::future::Future;

use tracing::Instrument;

use crate::collection::{Collection, ResultSink};
use crate::coord::Completion;
use crate::flow::executor::Flow;

impl Flow {
    /// Keep the items whose predicate completes with `true`.
    ///
    /// The predicate is started for every item before any completion is
    /// awaited. Retained items come back in their original order whatever
    /// order the predicates finish in; for keyed input that is the key
    /// enumeration order. The first predicate failure is returned as is and
    /// every later completion is ignored.
    pub async fn filter<T, E, C, P>(
        &self,
        collection: C,
        mut predicate: P,
    ) -> Result<Vec<T>, E>
    where
        C: Into<Collection<T>>,
        T: Clone,
        P: FnMut(T, Completion<bool, E>),
    {
        let (shape, items) = collection.into().into_parts();
        let span = self.batch_span("filter", &shape);

        async move {
            tracing::debug!("starting batch");
            let coordinator = self.coordinator(items.len());
            for (slot, item) in items.iter().enumerate() {
                predicate(item.clone(), coordinator.completion(slot));
            }

            let mut pending: Vec<Option<T>> = items.into_iter().map(Some).collect();
            let mut sink = ResultSink::new(shape);
            coordinator
                .run(|slot, keep| {
                    if !keep {
                        return;
                    }
                    if let Some(item) = pending.get_mut(slot).and_then(Option::take) {
                        sink.insert(slot, item);
                    }
                })
                .await?;

            tracing::debug!(retained = sink.filled(), "filter finished");
            Ok(sink.into_ordered())
        }
        .instrument(span)
        .await
    }

    /// [`Flow::filter`] for predicates written as futures.
    ///
    /// Each predicate future is spawned onto the current tokio runtime.
    pub async fn filter_async<T, E, C, F, Fut>(
        &self,
        collection: C,
        mut predicate: F,
    ) -> Result<Vec<T>, E>
    where
        C: Into<Collection<T>>,
        T: Clone,
        E: Send + 'static,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
    {
        self.filter(collection, move |item, done| {
            let work = predicate(item);
            tokio::spawn(async move { done.complete(work.await) }.in_current_span());
        })
        .await
    }
}

/// [`Flow::filter`] with the default configuration
pub async fn filter<T, E, C, P>(collection: C, predicate: P) -> Result<Vec<T>, E>
where
    C: Into<Collection<T>>,
    T: Clone,
    P: FnMut(T, Completion<bool, E>),
{
    Flow::default().filter(collection, predicate).await
}

/// [`Flow::filter_async`] with the default configuration
pub async fn filter_async<T, E, C, F, Fut>(collection: C, predicate: F) -> Result<Vec<T>, E>
where
    C: Into<Collection<T>>,
    T: Clone,
    E: Send + 'static,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<bool, E>> + Send + 'static,
{
    Flow::default().filter_async(collection, predicate).await
}
