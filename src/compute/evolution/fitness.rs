//! Fitness evaluation for Picobot programs.
//!
//! Fitness is the mean room coverage over several trials, each starting from a
//! uniformly random interior cell in a fresh room.

use rand::Rng;

use crate::compute::{Program, World};
use crate::schema::{EvaluationConfig, EvolutionConfigError, WorldConfig};

/// Evaluates programs and returns their fitness.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    world: WorldConfig,
    eval_config: EvaluationConfig,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(
        world: WorldConfig,
        eval_config: EvaluationConfig,
    ) -> Result<Self, EvolutionConfigError> {
        world.validate()?;
        eval_config.validate()?;
        Ok(Self { world, eval_config })
    }

    /// Mean coverage of `program` over the configured trials.
    pub fn evaluate<R: Rng + ?Sized>(&self, program: &Program, rng: &mut R) -> f32 {
        let trials = self.eval_config.trials;
        let total: f32 = (0..trials)
            .map(|_| self.run_trial(program, rng))
            .sum();
        total / trials as f32
    }

    /// Coverage of a single walk from a random interior cell.
    pub fn run_trial<R: Rng + ?Sized>(&self, program: &Program, rng: &mut R) -> f32 {
        let row = rng.gen_range(1..=self.world.height - 2);
        let col = rng.gen_range(1..=self.world.width - 2);

        // Geometry was validated at construction and the start is interior.
        let mut world = match World::new(&self.world, row, col) {
            Ok(world) => world,
            Err(err) => unreachable!("validated world rejected start: {err}"),
        };
        world.run(program, self.eval_config.steps);
        world.coverage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Rule, SensorPattern};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_world() -> WorldConfig {
        WorldConfig {
            width: 8,
            height: 8,
            num_states: 3,
        }
    }

    #[test]
    fn test_rejects_non_positive_settings() {
        let zero_trials = EvaluationConfig {
            trials: 0,
            steps: 10,
        };
        assert_eq!(
            FitnessEvaluator::new(small_world(), zero_trials).unwrap_err(),
            EvolutionConfigError::InvalidTrials
        );

        let zero_steps = EvaluationConfig {
            trials: 3,
            steps: 0,
        };
        assert_eq!(
            FitnessEvaluator::new(small_world(), zero_steps).unwrap_err(),
            EvolutionConfigError::InvalidSteps
        );
    }

    #[test]
    fn test_fitness_in_unit_range() {
        let evaluator = FitnessEvaluator::new(
            small_world(),
            EvaluationConfig {
                trials: 5,
                steps: 100,
            },
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let program = Program::random(3, &mut rng);
            let fitness = evaluator.evaluate(&program, &mut rng);
            assert!(fitness > 0.0);
            assert!(fitness <= 1.0);
        }
    }

    #[test]
    fn test_seeded_evaluation_is_reproducible() {
        let evaluator = FitnessEvaluator::new(
            WorldConfig::default(),
            EvaluationConfig {
                trials: 4,
                steps: 200,
            },
        )
        .unwrap();
        let program = Program::random(5, &mut StdRng::seed_from_u64(5));

        let a = evaluator.evaluate(&program, &mut StdRng::seed_from_u64(77));
        let b = evaluator.evaluate(&program, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_north_walker_covers_one_column() {
        // Walks straight north then bounces off the wall: a trial from row r
        // covers rows 1..=r of its column.
        let world = small_world();
        let mut program = Program::new(3);
        for state in 0..3 {
            for pattern in SensorPattern::ALL {
                let direction = pattern.legal_directions().next().unwrap();
                program.set(state, pattern, Rule::new(direction, 0)).unwrap();
            }
        }
        let evaluator = FitnessEvaluator::new(
            world,
            EvaluationConfig {
                trials: 6,
                steps: 40,
            },
        )
        .unwrap();

        let fitness = evaluator.evaluate(&program, &mut StdRng::seed_from_u64(3));
        assert!(fitness >= 2.0 / 36.0 - 1e-6);
        assert!(fitness <= 6.0 / 36.0 + 1e-6);
    }
}
