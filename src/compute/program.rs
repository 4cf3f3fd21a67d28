//! Picobot programs - rule tables mapping (state, surroundings) to (move, next state).
//!
//! A [`Program`] holds one [`Rule`] per `(state, SensorPattern)` key. Keys are laid
//! out state-major in the canonical pattern order, which is also the order used by
//! the text format:
//!
//! ```text
//! 0 xxxx -> N 3
//! 0 Nxxx -> E 1
//! ...
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A unit move on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All directions, in the order used when picking the first legal move.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Row and column offset of a single step.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    /// Single-letter symbol used in the program text format.
    pub fn symbol(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::West => 'W',
            Direction::East => 'E',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Walls adjacent to the agent's cell.
///
/// Only nine combinations can occur in a rectangular room with a single ring of
/// walls: nothing, one side, or two sides meeting at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorPattern {
    Open,
    North,
    NorthEast,
    NorthWest,
    South,
    SouthEast,
    SouthWest,
    East,
    West,
}

impl SensorPattern {
    /// Number of legal patterns.
    pub const COUNT: usize = 9;

    /// Canonical enumeration order. `ALL[p.index()] == p`.
    pub const ALL: [SensorPattern; Self::COUNT] = [
        SensorPattern::Open,
        SensorPattern::North,
        SensorPattern::NorthEast,
        SensorPattern::NorthWest,
        SensorPattern::South,
        SensorPattern::SouthEast,
        SensorPattern::SouthWest,
        SensorPattern::East,
        SensorPattern::West,
    ];

    /// Build a pattern from the four wall sensors.
    ///
    /// Returns `None` for combinations that cannot occur in the room topology
    /// (opposite walls, or three or more walls).
    pub fn from_walls(north: bool, east: bool, west: bool, south: bool) -> Option<Self> {
        match (north, east, west, south) {
            (false, false, false, false) => Some(SensorPattern::Open),
            (true, false, false, false) => Some(SensorPattern::North),
            (true, true, false, false) => Some(SensorPattern::NorthEast),
            (true, false, true, false) => Some(SensorPattern::NorthWest),
            (false, false, false, true) => Some(SensorPattern::South),
            (false, true, false, true) => Some(SensorPattern::SouthEast),
            (false, false, true, true) => Some(SensorPattern::SouthWest),
            (false, true, false, false) => Some(SensorPattern::East),
            (false, false, true, false) => Some(SensorPattern::West),
            _ => None,
        }
    }

    /// Position in the canonical order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Four-character mask in `NEWS` order, `x` for an unset sensor.
    pub fn mask(self) -> &'static str {
        match self {
            SensorPattern::Open => "xxxx",
            SensorPattern::North => "Nxxx",
            SensorPattern::NorthEast => "NExx",
            SensorPattern::NorthWest => "NxWx",
            SensorPattern::South => "xxxS",
            SensorPattern::SouthEast => "xExS",
            SensorPattern::SouthWest => "xxWS",
            SensorPattern::East => "xExx",
            SensorPattern::West => "xxWx",
        }
    }

    /// Whether a wall is sensed in the given direction.
    pub fn senses(self, direction: Direction) -> bool {
        self.mask().contains(direction.symbol())
    }

    /// Directions that do not run into a sensed wall. Never empty.
    pub fn legal_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| !self.senses(direction))
    }
}

impl fmt::Display for SensorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mask())
    }
}

/// The action taken for one `(state, pattern)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Move to make.
    pub direction: Direction,
    /// State to enter after moving.
    pub next_state: usize,
}

impl Rule {
    pub fn new(direction: Direction, next_state: usize) -> Self {
        Self {
            direction,
            next_state,
        }
    }
}

/// Errors raised when building or querying a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("No rule assigned for state {state}, pattern {pattern}")]
    Unassigned { state: usize, pattern: SensorPattern },
    #[error("Direction {direction} runs into a wall sensed by pattern {pattern}")]
    IntoWall {
        pattern: SensorPattern,
        direction: Direction,
    },
    #[error("State {state} is out of range for a program with {num_states} states")]
    StateOutOfRange { state: usize, num_states: usize },
    #[error("Cannot cross programs with {left} and {right} states")]
    StateCountMismatch { left: usize, right: usize },
    #[error("Crossover needs at least 2 states, program has {0}")]
    TooFewStates(usize),
    #[error("Cut point {cut} must be below {limit}")]
    InvalidCutPoint { cut: usize, limit: usize },
}

/// A Picobot program: one rule per `(state, pattern)` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    num_states: usize,
    /// Indexed by `state * SensorPattern::COUNT + pattern.index()`.
    rules: Vec<Option<Rule>>,
}

impl Program {
    /// Create a program with no rules assigned.
    pub fn new(num_states: usize) -> Self {
        Self {
            num_states,
            rules: vec![None; num_states * SensorPattern::COUNT],
        }
    }

    /// Create a fully randomized program.
    pub fn random<R: Rng + ?Sized>(num_states: usize, rng: &mut R) -> Self {
        let mut program = Self::new(num_states);
        program.randomize(rng);
        program
    }

    /// Number of internal states.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Number of `(state, pattern)` keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether every key has a rule.
    pub fn is_complete(&self) -> bool {
        self.rules.iter().all(Option::is_some)
    }

    #[inline]
    fn slot(state: usize, pattern: SensorPattern) -> usize {
        state * SensorPattern::COUNT + pattern.index()
    }

    fn check_state(&self, state: usize) -> Result<(), ProgramError> {
        if state >= self.num_states {
            return Err(ProgramError::StateOutOfRange {
                state,
                num_states: self.num_states,
            });
        }
        Ok(())
    }

    /// Assign a rule, rejecting moves into sensed walls and unknown states.
    pub fn set(
        &mut self,
        state: usize,
        pattern: SensorPattern,
        rule: Rule,
    ) -> Result<(), ProgramError> {
        self.check_state(state)?;
        self.check_state(rule.next_state)?;
        if pattern.senses(rule.direction) {
            return Err(ProgramError::IntoWall {
                pattern,
                direction: rule.direction,
            });
        }
        self.rules[Self::slot(state, pattern)] = Some(rule);
        Ok(())
    }

    /// Rule for a key.
    pub fn lookup(&self, state: usize, pattern: SensorPattern) -> Result<Rule, ProgramError> {
        self.check_state(state)?;
        self.rules[Self::slot(state, pattern)].ok_or(ProgramError::Unassigned { state, pattern })
    }

    /// Iterate over every key in canonical order with its rule, if assigned.
    pub fn rules(&self) -> impl Iterator<Item = (usize, SensorPattern, Option<Rule>)> + '_ {
        self.rules.iter().enumerate().map(|(slot, rule)| {
            (
                slot / SensorPattern::COUNT,
                SensorPattern::ALL[slot % SensorPattern::COUNT],
                *rule,
            )
        })
    }

    /// Draw a legal rule for `pattern` uniformly at random.
    fn random_rule<R: Rng + ?Sized>(&self, pattern: SensorPattern, rng: &mut R) -> Rule {
        let legal: Vec<Direction> = pattern.legal_directions().collect();
        Rule {
            direction: legal[rng.gen_range(0..legal.len())],
            next_state: rng.gen_range(0..self.num_states),
        }
    }

    /// Assign a fresh random rule to every key.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for state in 0..self.num_states {
            for pattern in SensorPattern::ALL {
                let rule = self.random_rule(pattern, rng);
                self.rules[Self::slot(state, pattern)] = Some(rule);
            }
        }
    }

    /// Re-draw the rule of one uniformly chosen key. Returns the key touched.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (usize, SensorPattern) {
        let state = rng.gen_range(0..self.num_states);
        let pattern = SensorPattern::ALL[rng.gen_range(0..SensorPattern::COUNT)];
        let rule = self.random_rule(pattern, rng);
        self.rules[Self::slot(state, pattern)] = Some(rule);
        (state, pattern)
    }

    /// Single-cut crossover at a random state boundary.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Program,
        rng: &mut R,
    ) -> Result<Program, ProgramError> {
        self.check_compatible(other)?;
        let cut = rng.gen_range(0..=self.num_states - 2);
        self.crossover_at(other, cut)
    }

    /// Offspring taking states `0..=cut` from `self` and the rest from `other`.
    pub fn crossover_at(&self, other: &Program, cut: usize) -> Result<Program, ProgramError> {
        self.check_compatible(other)?;
        let limit = self.num_states - 1;
        if cut >= limit {
            return Err(ProgramError::InvalidCutPoint { cut, limit });
        }

        let split = (cut + 1) * SensorPattern::COUNT;
        let mut rules = Vec::with_capacity(self.rules.len());
        rules.extend_from_slice(&self.rules[..split]);
        rules.extend_from_slice(&other.rules[split..]);

        Ok(Program {
            num_states: self.num_states,
            rules,
        })
    }

    fn check_compatible(&self, other: &Program) -> Result<(), ProgramError> {
        if self.num_states != other.num_states {
            return Err(ProgramError::StateCountMismatch {
                left: self.num_states,
                right: other.num_states,
            });
        }
        if self.num_states < 2 {
            return Err(ProgramError::TooFewStates(self.num_states));
        }
        Ok(())
    }

    /// Program text format, one line per assigned rule.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, pattern, rule) in self.rules() {
            if let Some(rule) = rule {
                writeln!(
                    f,
                    "{} {} -> {} {}",
                    state, pattern, rule.direction, rule.next_state
                )?;
            }
        }
        Ok(())
    }
}
