//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation of Picobot programs.

use rand::prelude::*;

use crate::compute::{Program, ProgramError};

/// Random number generator wrapper for genome operations.
pub struct ProgramRng {
    rng: StdRng,
}

impl ProgramRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a fully randomized program.
    pub fn random_program(&mut self, num_states: usize) -> Program {
        Program::random(num_states, &mut self.rng)
    }

    /// Single-cut crossover of two parents.
    pub fn crossover(
        &mut self,
        parent1: &Program,
        parent2: &Program,
    ) -> Result<Program, ProgramError> {
        parent1.crossover(parent2, &mut self.rng)
    }

    /// Apply one point mutation with probability `percent / 100`.
    ///
    /// Returns whether the program was mutated.
    pub fn maybe_mutate(&mut self, program: &mut Program, percent: u32) -> bool {
        if self.rng.gen_range(1..=100) <= percent {
            program.mutate(&mut self.rng);
            true
        } else {
            false
        }
    }

    /// Uniform index in `0..len`.
    pub fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Number of `(state, pattern)` keys whose rules differ.
pub fn program_distance(p1: &Program, p2: &Program) -> usize {
    p1.rules()
        .zip(p2.rules())
        .filter(|((_, _, a), (_, _, b))| a != b)
        .count()
        + p1.len().abs_diff(p2.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::SensorPattern;

    #[test]
    fn test_random_program() {
        let mut rng = ProgramRng::new(42);
        let program = rng.random_program(5);
        assert!(program.is_complete());
        assert_eq!(program.len(), 5 * SensorPattern::COUNT);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = ProgramRng::new(9).random_program(5);
        let b = ProgramRng::new(9).random_program(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover() {
        let mut rng = ProgramRng::new(42);
        let p1 = rng.random_program(5);
        let p2 = rng.random_program(5);

        let child = rng.crossover(&p1, &p2).unwrap();
        assert!(child.is_complete());
        // State 0 always comes from the first parent, the last state from the second.
        for pattern in SensorPattern::ALL {
            assert_eq!(child.lookup(0, pattern), p1.lookup(0, pattern));
            assert_eq!(child.lookup(4, pattern), p2.lookup(4, pattern));
        }
    }

    #[test]
    fn test_mutation_probability_bounds() {
        let mut rng = ProgramRng::new(42);
        let mut program = rng.random_program(5);
        let original = program.clone();

        for _ in 0..100 {
            assert!(!rng.maybe_mutate(&mut program, 0));
        }
        assert_eq!(program, original);

        for _ in 0..100 {
            assert!(rng.maybe_mutate(&mut program, 100));
        }
        assert!(program.is_complete());
    }

    #[test]
    fn test_program_distance() {
        let mut rng = ProgramRng::new(42);
        let p1 = rng.random_program(5);
        let p2 = p1.clone();
        let p3 = rng.random_program(5);

        assert_eq!(program_distance(&p1, &p2), 0);
        assert!(program_distance(&p1, &p3) > 0);
        assert!(program_distance(&p1, &p3) <= p1.len());
    }
}
