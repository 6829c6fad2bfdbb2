//! Run every task at once and collect all of their values

use std::future::Future;

use tracing::Instrument;

use crate::collection::{Aggregate, Collection, ResultSink};
use crate::coord::Completion;
use crate::flow::executor::Flow;

/// Boxed unit of work for [`Flow::parallel`], for collections mixing closures
pub type Task<V, E> = Box<dyn FnOnce(Completion<Vec<V>, E>) + Send>;

impl Flow {
    /// Start every task, then gather their values into a container shaped
    /// like the input.
    ///
    /// A task completing with one value stores that value, one completing
    /// with several stores the list, one completing with none stores
    /// [`Aggregate::Empty`]. The first failure wins.
    pub async fn parallel<U, V, E, C>(&self, tasks: C) -> Result<Collection<Aggregate<V>>, E>
    where
        C: Into<Collection<U>>,
        U: FnOnce(Completion<Vec<V>, E>),
    {
        let (shape, units) = tasks.into().into_parts();
        let span = self.batch_span("parallel", &shape);

        async move {
            tracing::debug!("starting batch");
            let coordinator = self.coordinator(units.len());
            for (slot, unit) in units.into_iter().enumerate() {
                unit(coordinator.completion(slot));
            }

            let mut sink = ResultSink::new(shape);
            coordinator
                .run(|slot, values| sink.insert(slot, Aggregate::from_values(values)))
                .await?;

            tracing::debug!("parallel finished");
            Ok(sink.into_collection(|| Aggregate::Empty))
        }
        .instrument(span)
        .await
    }

    /// [`Flow::parallel`] over futures, each spawned onto the current tokio
    /// runtime.
    pub async fn parallel_async<Fut, V, E, C>(
        &self,
        tasks: C,
    ) -> Result<Collection<Aggregate<V>>, E>
    where
        C: Into<Collection<Fut>>,
        Fut: Future<Output = Result<Vec<V>, E>> + Send + 'static,
        V: Send + 'static,
        E: Send + 'static,
    {
        let units = tasks.into().map(|work| {
            move |done: Completion<Vec<V>, E>| {
                tokio::spawn(async move { done.complete(work.await) }.in_current_span());
            }
        });
        self.parallel(units).await
    }
}

/// [`Flow::parallel`] with the default configuration
pub async fn parallel<U, V, E, C>(tasks: C) -> Result<Collection<Aggregate<V>>, E>
where
    C: Into<Collection<U>>,
    U: FnOnce(Completion<Vec<V>, E>),
{
    Flow::default().parallel(tasks).await
}

/// [`Flow::parallel_async`] with the default configuration
pub async fn parallel_async<Fut, V, E, C>(tasks: C) -> Result<Collection<Aggregate<V>>, E>
where
    C: Into<Collection<Fut>>,
    Fut: Future<Output = Result<Vec<V>, E>> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    Flow::default().parallel_async(tasks).await
}
