//! Evolutionary search over Picobot programs.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Genome Operations** (`genome`): Random generation, crossover, and mutation
//! - **Fitness Evaluation** (`fitness`): Mean room coverage over random starts
//! - **Search** (`search`): Generational GA with elitism
//! - **Program Archive** (`archive`): Saving programs in text format
//!
//! # Example
//!
//! ```rust,no_run
//! use picobot::compute::evolution::{EvolutionEngine, save_program};
//! use picobot::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig::default();
//! let mut engine = EvolutionEngine::new(config).expect("valid config");
//! let result = engine
//!     .run_with_callback(|report| {
//!         println!(
//!             "Generation {}: best fitness = {:.3}",
//!             report.stats.generation, report.stats.max_fitness
//!         );
//!     })
//!     .expect("evolution failed");
//!
//! save_program("best.txt", &result.best.program).expect("write failed");
//! ```
//!
//! # Selection
//!
//! Each generation every program is evaluated in parallel, the population is
//! ranked by fitness (exact ties broken at random), the top `elite_count`
//! programs are carried over unchanged and `offspring_count` children are bred
//! from uniformly drawn elite parents by single-cut crossover, each mutated
//! with probability `mutation_percent / 100`.

mod archive;
mod fitness;
mod genome;
mod search;

pub use archive::{ProgramArchive, save_program};
pub use fitness::FitnessEvaluator;
pub use genome::{ProgramRng, program_distance};
pub use search::{Candidate, EvolutionEngine, EvolutionError, EvolutionResult, GenerationReport};
