//! Application-level configuration.
//!
//! - [`ExecutionParams`]: session loop control (tool turn limit)

pub mod execution_params;

pub use execution_params::ExecutionParams;
