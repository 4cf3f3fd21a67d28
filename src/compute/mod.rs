//! Compute module - Rule tables, room simulation and evolution.

mod program;
mod world;

pub mod evolution;

pub use program::*;
pub use world::*;
