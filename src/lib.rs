// Core infrastructure: configuration and crate errors
pub mod core;

pub mod collection; // Input/output containers and the result sink
pub mod coord;      // Completion tracking shared by every operation
pub mod flow;       // filter, reduce, parallel

// Re-exports for convenience
pub use crate::core::{FlowConfig, FlowError, Result};
pub use collection::{Aggregate, Collection, Keyed};
pub use coord::{BatchState, Completion, Coordinator};
pub use flow::*;
