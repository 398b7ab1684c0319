//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ConfigurationError`]: fatal configuration errors

pub mod error;
