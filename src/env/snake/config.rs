//! Batch configuration
//!
//! This module defines the construction parameters of a Snake batch and the
//! reward scheme, with validation and builder-style setters. Both can be
//! loaded from JSON.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::types::GridDims;

/// Reward scheme applied to step outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for eating food
    pub food: f32,

    /// Reward for hitting a wall or the snake's own body
    pub death: f32,

    /// Reward for any other move (usually a small time penalty)
    pub step: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { food: 1.0, death: -1.0, step: -0.01 }
    }
}

/// Snake batch configuration
///
/// `width` and `height` include the wall border, so a 5×4 batch has a
/// 3×2 playable area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Grid width, border included
    pub width: usize,

    /// Grid height, border included
    pub height: usize,

    /// Number of games simulated after a reset
    pub num_games: usize,

    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Reward scheme
    pub rewards: RewardConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { width: 12, height: 12, num_games: 64, seed: None, rewards: RewardConfig::default() }
    }
}

impl BatchConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.width < 3 || self.height < 3 {
            return Err(anyhow!(
                "grid must be at least 3x3 including walls, got {}x{}",
                self.width,
                self.height
            ));
        }
        if self.dims().interior_cells() < 2 {
            return Err(anyhow!("grid needs at least two interior cells for head and food"));
        }
        if self.num_games == 0 {
            return Err(anyhow!("num_games must be positive"));
        }
        for (name, value) in
            [("food", self.rewards.food), ("death", self.rewards.death), ("step", self.rewards.step)]
        {
            if !value.is_finite() {
                return Err(anyhow!("{name} reward must be finite"));
            }
        }
        Ok(())
    }

    /// Grid dimensions
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.height, self.width)
    }

    /// Set grid width
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set grid height
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Set number of games
    pub fn num_games(mut self, num_games: usize) -> Self {
        self.num_games = num_games;
        self
    }

    /// Set RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set reward scheme
    pub fn rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }
}
