//! Evolution configuration types for the Picobot genetic algorithm.
//!
//! Reference values: population 200 (20 elite + 180 offspring), 50 trials of
//! 1000 steps per evaluation, 33% mutation chance per offspring.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ConfigError, WorldConfig};

/// Top-level configuration for a genetic algorithm run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Room geometry and program state count.
    #[serde(default)]
    pub world: WorldConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Fitness evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Selection and reproduction settings.
    #[serde(default)]
    pub reproduction: ReproductionConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Directory receiving the best program of each generation as `gen<N>.txt`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of programs per generation.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations to run.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    200
}
fn default_max_generations() -> usize {
    20
}

/// Fitness evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Random starting cells tried per program.
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Moves simulated per trial.
    #[serde(default = "default_steps")]
    pub steps: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            steps: default_steps(),
        }
    }
}

fn default_trials() -> usize {
    50
}
fn default_steps() -> u64 {
    1000
}

impl EvaluationConfig {
    /// Check that trials and steps are positive.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        if self.trials == 0 {
            return Err(EvolutionConfigError::InvalidTrials);
        }
        if self.steps == 0 {
            return Err(EvolutionConfigError::InvalidSteps);
        }
        Ok(())
    }
}

/// Selection and reproduction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Best programs carried unchanged into the next generation.
    #[serde(default = "default_elite_count")]
    pub elite_count: usize,
    /// Offspring bred from the elite each generation.
    #[serde(default = "default_offspring_count")]
    pub offspring_count: usize,
    /// Chance (0-100) that an offspring receives one mutation.
    #[serde(default = "default_mutation_percent")]
    pub mutation_percent: u32,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            elite_count: default_elite_count(),
            offspring_count: default_offspring_count(),
            mutation_percent: default_mutation_percent(),
        }
    }
}

fn default_elite_count() -> usize {
    20
}
fn default_offspring_count() -> usize {
    180
}
fn default_mutation_percent() -> u32 {
    33
}

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index, starting at 0.
    pub generation: usize,
    /// Mean fitness of the population.
    pub avg_fitness: f32,
    /// Best fitness in the population.
    pub max_fitness: f32,
    /// Worst fitness in the population.
    pub min_fitness: f32,
    /// Mean fraction of differing rules between pairs of programs.
    pub diversity: f32,
}

/// Evolution history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Average fitness per generation.
    pub avg_fitness: Vec<f32>,
    /// Best fitness per generation.
    pub max_fitness: Vec<f32>,
    /// Worst fitness per generation.
    pub min_fitness: Vec<f32>,
    /// Diversity metric per generation.
    pub diversity: Vec<f32>,
}

impl EvolutionHistory {
    /// Append one generation's summary.
    pub fn record(&mut self, stats: &GenerationStats) {
        self.avg_fitness.push(stats.avg_fitness);
        self.max_fitness.push(stats.max_fitness);
        self.min_fitness.push(stats.min_fitness);
        self.diversity.push(stats.diversity);
    }

    /// Number of generations recorded.
    pub fn len(&self) -> usize {
        self.avg_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avg_fitness.is_empty()
    }
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Total program evaluations performed.
    pub total_evaluations: u64,
    /// Fitness of the returned program.
    pub best_fitness: f32,
    /// Average fitness of the final evaluated generation.
    pub final_avg_fitness: f32,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be positive")]
    EmptyPopulation,
    #[error("Generation count must be positive")]
    NoGenerations,
    #[error("Trials per evaluation must be positive")]
    InvalidTrials,
    #[error("Steps per trial must be positive")]
    InvalidSteps,
    #[error("Offspring need at least one elite parent")]
    NoElite,
    #[error("Elite ({elite}) + offspring ({offspring}) must equal population size ({size})")]
    SizeMismatch {
        elite: usize,
        offspring: usize,
        size: usize,
    },
    #[error("Mutation percent must be at most 100, got {0}")]
    InvalidMutationPercent(u32),
    #[error("World config validation failed: {0}")]
    World(#[from] ConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.world.validate()?;
        self.evaluation.validate()?;

        if self.population.size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if self.population.max_generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }

        let reproduction = &self.reproduction;
        if reproduction.elite_count == 0 && reproduction.offspring_count > 0 {
            return Err(EvolutionConfigError::NoElite);
        }
        if reproduction.elite_count + reproduction.offspring_count != self.population.size {
            return Err(EvolutionConfigError::SizeMismatch {
                elite: reproduction.elite_count,
                offspring: reproduction.offspring_count,
                size: self.population.size,
            });
        }
        if reproduction.mutation_percent > 100 {
            return Err(EvolutionConfigError::InvalidMutationPercent(
                reproduction.mutation_percent,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.size, 200);
        assert_eq!(config.reproduction.elite_count, 20);
        assert_eq!(config.reproduction.offspring_count, 180);
    }

    #[test]
    fn test_size_mismatch() {
        let config = EvolutionConfig {
            reproduction: ReproductionConfig {
                elite_count: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::SizeMismatch {
                elite: 10,
                offspring: 180,
                size: 200
            })
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut config = EvolutionConfig::default();
        config.evaluation.trials = 0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::InvalidTrials));

        let mut config = EvolutionConfig::default();
        config.evaluation.steps = 0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::InvalidSteps));

        let mut config = EvolutionConfig::default();
        config.population.max_generations = 0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::NoGenerations));

        let mut config = EvolutionConfig::default();
        config.reproduction.mutation_percent = 101;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::InvalidMutationPercent(101))
        );

        let mut config = EvolutionConfig::default();
        config.reproduction.elite_count = 0;
        config.population.size = 180;
        assert_eq!(config.validate(), Err(EvolutionConfigError::NoElite));

        let mut config = EvolutionConfig::default();
        config.world.num_states = 1;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::World(ConfigError::TooFewStates(1)))
        );
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population.size, config.population.size);
        assert_eq!(parsed.evaluation.steps, config.evaluation.steps);

        let sparse: EvolutionConfig =
            serde_json::from_str(r#"{"population": {"max_generations": 3}}"#).unwrap();
        assert_eq!(sparse.population.size, 200);
        assert_eq!(sparse.population.max_generations, 3);
        assert!(sparse.validate().is_ok());
    }
}
