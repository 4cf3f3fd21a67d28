//! Room simulation - drives a Picobot through a walled room.
//!
//! A [`World`] owns one room and one agent for the duration of a single trial.
//! Each step the agent senses the adjacent walls, looks up its rule, leaves a
//! visited mark behind, and moves one cell.

use std::fmt;

use crate::schema::{ConfigError, WorldConfig};

use super::{Program, SensorPattern};

/// Visitation status of a room cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Unvisited,
    Visited,
    Occupied,
}

/// Errors raised when setting up a simulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Start cell ({row}, {col}) is not inside the room")]
    StartNotInterior { row: usize, col: usize },
    #[error("Invalid world: {0}")]
    Config(#[from] ConfigError),
}

/// A room plus the agent walking it.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    /// Row-major cells [row * width + col].
    cells: Vec<Cell>,
    row: usize,
    col: usize,
    state: usize,
    /// Cells that are visited or occupied.
    visited: usize,
    step: u64,
}

impl World {
    /// Create a fresh room with the agent at `(row, col)` in state 0.
    pub fn new(config: &WorldConfig, row: usize, col: usize) -> Result<Self, SimulationError> {
        config.validate()?;
        if !config.is_interior(row, col) {
            return Err(SimulationError::StartNotInterior { row, col });
        }

        let cells = (0..config.height)
            .flat_map(|r| {
                (0..config.width).map(move |c| {
                    if config.is_interior(r, c) {
                        Cell::Unvisited
                    } else {
                        Cell::Wall
                    }
                })
            })
            .collect();

        let mut world = Self {
            config: *config,
            cells,
            row,
            col,
            state: 0,
            visited: 1,
            step: 0,
        };
        let start = world.idx(row, col);
        world.cells[start] = Cell::Occupied;
        Ok(world)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.config.width + col
    }

    /// Current agent position as `(row, col)`.
    #[inline]
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Current internal state of the agent.
    #[inline]
    pub fn state(&self) -> usize {
        self.state
    }

    /// Steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Status of a cell.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[self.idx(row, col)]
    }

    /// Walls adjacent to `(row, col)`.
    pub fn sense(&self, row: usize, col: usize) -> SensorPattern {
        let north = row == 1;
        let south = row == self.config.height - 2;
        let west = col == 1;
        let east = col == self.config.width - 2;

        // Validated geometry keeps every interior cell clear of opposite walls.
        SensorPattern::from_walls(north, east, west, south).unwrap_or_else(|| {
            panic!("Cell ({row}, {col}) senses an impossible wall combination")
        })
    }

    /// Walls adjacent to the agent.
    pub fn surroundings(&self) -> SensorPattern {
        self.sense(self.row, self.col)
    }

    /// Advance the agent by one move.
    ///
    /// # Panics
    ///
    /// Panics if the program has no rule for the current key or its rule
    /// walks the agent out of the room interior. Both mean the program was
    /// built without going through [`Program::set`] or randomization.
    pub fn step(&mut self, program: &Program) {
        let pattern = self.surroundings();
        let rule = match program.lookup(self.state, pattern) {
            Ok(rule) => rule,
            Err(err) => panic!("Program invariant violated: {err}"),
        };

        let (dr, dc) = rule.direction.delta();
        let target = self
            .row
            .checked_add_signed(dr)
            .zip(self.col.checked_add_signed(dc))
            .filter(|&(row, col)| self.config.is_interior(row, col));
        let Some((row, col)) = target else {
            panic!(
                "Move {} from ({}, {}) leaves the room",
                rule.direction, self.row, self.col
            );
        };

        let here = self.idx(self.row, self.col);
        self.cells[here] = Cell::Visited;

        let there = self.idx(row, col);
        if self.cells[there] == Cell::Unvisited {
            self.visited += 1;
        }
        self.cells[there] = Cell::Occupied;

        self.row = row;
        self.col = col;
        self.state = rule.next_state;
        self.step += 1;
    }

    /// Apply `steps` moves unconditionally.
    pub fn run(&mut self, program: &Program, steps: u64) {
        for _ in 0..steps {
            self.step(program);
        }
    }

    /// Number of visited or occupied cells.
    #[inline]
    pub fn visited_cells(&self) -> usize {
        self.visited
    }

    /// Fraction of interior cells visited so far, in `[0, 1]`.
    pub fn coverage(&self) -> f32 {
        self.visited as f32 / self.config.interior_cells() as f32
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_row = self.config.height - 1;
        let last_col = self.config.width - 1;

        for row in 0..self.config.height {
            for col in 0..self.config.width {
                let edge_row = row == 0 || row == last_row;
                let edge_col = col == 0 || col == last_col;
                let c = match self.cell(row, col) {
                    Cell::Wall if edge_row && edge_col => '+',
                    Cell::Wall if edge_row => '-',
                    Cell::Wall => '|',
                    Cell::Unvisited => ' ',
                    Cell::Visited => 'o',
                    Cell::Occupied => 'P',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
