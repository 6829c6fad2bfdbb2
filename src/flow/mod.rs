//! The three collection operations
//!
//! Each operation is available as a method on [`Flow`] and as a free
//! function using the default configuration.

pub mod executor;
pub mod filter;
pub mod parallel;
pub mod reduce;

pub use executor::Flow;
pub use filter::{filter, filter_async};
pub use parallel::{parallel, parallel_async, Task};
pub use reduce::{reduce, reduce_async};
