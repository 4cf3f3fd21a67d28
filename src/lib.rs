//! Picobot - Genetic evolution of grid-roaming rule tables.
//!
//! A Picobot wanders a walled rectangular room. At each step it senses which
//! walls are adjacent, looks up a rule keyed by its internal state and the
//! sensed pattern, moves one cell and switches state. This crate evolves the
//! rule tables with a genetic algorithm, scoring each by how much of the room
//! it covers from random starting cells.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, statistics and history types
//! - `compute`: Rule tables, room simulation and the evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use picobot::{
//!     compute::{Program, World},
//!     schema::WorldConfig,
//! };
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let config = WorldConfig::default();
//! let mut rng = StdRng::seed_from_u64(42);
//! let program = Program::random(config.num_states, &mut rng);
//!
//! let mut world = World::new(&config, 12, 12).expect("start inside the room");
//! world.run(&program, 1000);
//!
//! println!("{world}");
//! println!("Coverage after 1000 steps: {:.3}", world.coverage());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, FitnessEvaluator};
pub use compute::{Direction, Program, Rule, SensorPattern, World};
pub use schema::{EvolutionConfig, WorldConfig};
