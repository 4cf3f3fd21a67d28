//! Generational genetic algorithm over Picobot programs.

use std::io;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::compute::{Program, ProgramError, SensorPattern};
use crate::schema::{
    EvolutionConfig, EvolutionConfigError, EvolutionHistory, EvolutionStats, GenerationStats,
};

use super::archive::ProgramArchive;
use super::fitness::FitnessEvaluator;
use super::genome::{ProgramRng, program_distance};

/// A candidate individual in the population.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// The program.
    pub program: Program,
    /// Fitness from the most recent evaluation.
    pub fitness: f32,
    /// Generation created.
    pub generation: usize,
    /// Parent IDs.
    pub parents: Vec<u64>,
}

/// Progress delivered after each generation is evaluated and ranked.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    /// Fitness summary of the generation.
    pub stats: GenerationStats,
    /// Best-ranked candidate of the generation.
    pub best: &'a Candidate,
}

/// Final result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best-ranked candidate of the final generation.
    pub best: Candidate,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Errors that abort an evolution run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Reproduction failed: {0}")]
    Program(#[from] ProgramError),
    #[error("Failed to save program: {0}")]
    Io(#[from] io::Error),
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: ProgramRng,
    evaluator: FitnessEvaluator,
    population: Vec<Candidate>,
    history: EvolutionHistory,
    generation: usize,
    champion: Option<Candidate>,
    next_id: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine. The configuration is validated once here.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        log::debug!("Evolution engine seeded with {seed}");
        let rng = ProgramRng::new(seed);
        let evaluator = FitnessEvaluator::new(config.world, config.evaluation.clone())?;

        Ok(Self {
            config,
            rng,
            evaluator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            champion: None,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population, ranked by ascending fitness once evaluated.
    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    /// Current generation index.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best-ranked candidate of the most recently evaluated generation.
    pub fn best(&self) -> Option<&Candidate> {
        self.champion.as_ref()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Initialize the population with random programs.
    pub fn initialize(&mut self) {
        self.population.clear();
        self.history = EvolutionHistory::default();
        self.champion = None;
        self.generation = 0;

        for _ in 0..self.config.population.size {
            let program = self.rng.random_program(self.config.world.num_states);
            let id = self.next_id();
            self.population.push(Candidate {
                id,
                program,
                fitness: 0.0,
                generation: 0,
                parents: Vec::new(),
            });
        }
    }

    /// Evaluate all candidates in parallel.
    ///
    /// Every candidate gets its own RNG seeded from the engine, so a seeded run
    /// produces the same fitness values regardless of thread scheduling.
    fn evaluate_population(&mut self) {
        let seeds: Vec<u64> = (0..self.population.len())
            .map(|_| self.rng.next_seed())
            .collect();

        let evaluator = &self.evaluator;
        let fitness: Vec<f32> = self
            .population
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(candidate, &seed)| {
                let mut rng = StdRng::seed_from_u64(seed);
                evaluator.evaluate(&candidate.program, &mut rng)
            })
            .collect();

        for (candidate, fitness) in self.population.iter_mut().zip(fitness) {
            candidate.fitness = fitness;
        }
    }

    /// Sort by ascending fitness, breaking exact ties with random keys.
    fn rank_population(&mut self) {
        let mut keyed: Vec<(u64, Candidate)> = self
            .population
            .drain(..)
            .map(|candidate| (self.rng.next_seed(), candidate))
            .collect();

        keyed.sort_by(|(key_a, a), (key_b, b)| {
            a.fitness
                .total_cmp(&b.fitness)
                .then_with(|| key_a.cmp(key_b))
        });

        self.population = keyed.into_iter().map(|(_, candidate)| candidate).collect();
        self.champion = self.population.last().cloned();
    }

    /// Fitness summary of the current population.
    fn generation_stats(&self) -> GenerationStats {
        let len = self.population.len().max(1) as f32;
        let avg_fitness = self.population.iter().map(|c| c.fitness).sum::<f32>() / len;
        let max_fitness = self
            .population
            .iter()
            .map(|c| c.fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let min_fitness = self
            .population
            .iter()
            .map(|c| c.fitness)
            .fold(f32::INFINITY, f32::min);

        GenerationStats {
            generation: self.generation,
            avg_fitness,
            max_fitness,
            min_fitness,
            diversity: self.compute_diversity(),
        }
    }

    /// Mean pairwise fraction of differing rules.
    fn compute_diversity(&self) -> f32 {
        let rules = self.config.world.num_states * SensorPattern::COUNT;
        let mut total_distance = 0usize;
        let mut count = 0usize;

        for i in 0..self.population.len() {
            for j in (i + 1)..self.population.len() {
                total_distance +=
                    program_distance(&self.population[i].program, &self.population[j].program);
                count += 1;
            }
        }

        if count > 0 {
            total_distance as f32 / (count * rules) as f32
        } else {
            0.0
        }
    }

    /// Evaluate and rank the current generation.
    fn evaluate_generation(&mut self) -> GenerationStats {
        self.evaluate_population();
        self.rank_population();

        let stats = self.generation_stats();
        self.history.record(&stats);
        log::info!(
            "Generation {}: average fitness {:.4}, best fitness {:.4}",
            stats.generation,
            stats.avg_fitness,
            stats.max_fitness
        );
        stats
    }

    /// Replace the ranked population with elite carryover plus offspring.
    fn breed_next_generation(&mut self) -> Result<(), EvolutionError> {
        let reproduction = self.config.reproduction.clone();
        let elite_start = self.population.len() - reproduction.elite_count;
        let elite: Vec<Candidate> = self.population.split_off(elite_start);

        let mut next_gen = Vec::with_capacity(self.config.population.size);
        for _ in 0..reproduction.offspring_count {
            let parent1 = &elite[self.rng.pick(elite.len())];
            let parent2 = &elite[self.rng.pick(elite.len())];

            let mut program = self.rng.crossover(&parent1.program, &parent2.program)?;
            self.rng.maybe_mutate(&mut program, reproduction.mutation_percent);

            let parents = vec![parent1.id, parent2.id];
            let id = self.next_id();
            next_gen.push(Candidate {
                id,
                program,
                fitness: 0.0,
                generation: self.generation + 1,
                parents,
            });
        }

        let mut population = elite;
        population.append(&mut next_gen);
        self.population = population;
        self.generation += 1;
        Ok(())
    }

    /// Run evolution, reporting each evaluated generation to `callback`.
    ///
    /// Returns the best-ranked program of the final generation. Programs from
    /// earlier generations are not tracked, so a better one seen earlier but
    /// lost since is not returned.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&GenerationReport<'_>),
    {
        let start_time = Instant::now();
        let archive = match &self.config.output_dir {
            Some(dir) => Some(ProgramArchive::new(dir)?),
            None => None,
        };

        self.initialize();
        let max_generations = self.config.population.max_generations;

        let mut last_stats = None;
        for generation in 0..max_generations {
            let stats = self.evaluate_generation();
            let Some(best) = self.champion.as_ref() else {
                unreachable!("validated population is never empty");
            };

            if let Some(archive) = &archive {
                let path = archive.save_generation(generation, &best.program)?;
                log::debug!("Saved generation {} best to {}", generation, path.display());
            }
            callback(&GenerationReport { stats, best });
            last_stats = Some(stats);

            if generation + 1 < max_generations {
                self.breed_next_generation()?;
            }
        }

        let (Some(best), Some(last_stats)) = (self.champion.clone(), last_stats) else {
            unreachable!("at least one generation is always run");
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        let total_evaluations = max_generations as u64 * self.config.population.size as u64;

        Ok(EvolutionResult {
            stats: EvolutionStats {
                generations: max_generations,
                total_evaluations,
                best_fitness: best.fitness,
                final_avg_fitness: last_stats.avg_fitness,
                elapsed_seconds: elapsed,
                evaluations_per_second: total_evaluations as f64 / elapsed.max(f64::EPSILON),
            },
            best,
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}
