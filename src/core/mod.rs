// Infrastructure shared by every flow operation

pub mod config;
pub mod errors;

// Re-export commonly used types
pub use config::FlowConfig;
pub use errors::{FlowError, Result};
