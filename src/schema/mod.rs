//! Schema module - Configuration and report types for Picobot evolution.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
