//! World configuration types.

use serde::{Deserialize, Serialize};

/// Geometry of the room and the state count of the programs that roam it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Room width in cells, including the wall border.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Room height in cells, including the wall border.
    #[serde(default = "default_height")]
    pub height: usize,
    /// Number of internal program states.
    #[serde(default = "default_num_states")]
    pub num_states: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            num_states: default_num_states(),
        }
    }
}

fn default_width() -> usize {
    25
}
fn default_height() -> usize {
    25
}
fn default_num_states() -> usize {
    5
}

impl WorldConfig {
    /// Smallest room side (wall + 2 interior cells + wall).
    ///
    /// With a 2-cell interior no cell is adjacent to two opposite walls.
    pub const MIN_SIDE: usize = 4;

    /// Total cell count, walls included.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Number of playable cells inside the wall border.
    #[inline]
    pub fn interior_cells(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    /// Whether `(row, col)` lies inside the wall border.
    #[inline]
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        (1..self.height.saturating_sub(1)).contains(&row)
            && (1..self.width.saturating_sub(1)).contains(&col)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < Self::MIN_SIDE || self.height < Self::MIN_SIDE {
            return Err(ConfigError::RoomTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.num_states < 2 {
            return Err(ConfigError::TooFewStates(self.num_states));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Room must be at least 4x4 including walls, got {width}x{height}")]
    RoomTooSmall { width: usize, height: usize },
    #[error("Programs need at least 2 states, got {0}")]
    TooFewStates(usize),
}
