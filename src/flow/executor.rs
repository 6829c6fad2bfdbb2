use crate::collection::Shape;
use crate::coord::Coordinator;
use crate::core::config::FlowConfig;
use crate::core::errors::Result;

/// Entry point for flow operations sharing one configuration
///
/// `filter`, `reduce` and `parallel` (and their `_async` adapters) are
/// defined next to their implementations in the sibling modules.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    config: FlowConfig,
}

impl Flow {
    /// Create a flow, validating the configuration first
    pub fn new(config: FlowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Span wrapping one batch, tagged with a fresh batch id
    pub(crate) fn batch_span(&self, operation: &'static str, shape: &Shape) -> tracing::Span {
        tracing::debug_span!(
            "batch",
            flow = %self.config.name,
            operation,
            batch_id = %cuid2::create_id(),
            shape = shape.kind(),
            size = shape.len()
        )
    }

    pub(crate) fn coordinator<T, E>(&self, size: usize) -> Coordinator<T, E> {
        Coordinator::new(size).with_duplicate_warnings(self.config.warn_on_duplicate_completion)
    }
}
