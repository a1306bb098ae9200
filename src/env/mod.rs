//! Environment traits and implementations
//!
//! This module defines the batched environment interface and provides the
//! lock-step Snake batch.

use anyhow::Result;

/// Core trait for batched RL environments
///
/// A batched environment advances all of its live instances with one call.
/// The number of live instances may shrink between steps as instances
/// terminate.
pub trait BatchEnvironment {
    /// Observation type for the whole batch
    type Observation;

    /// Action type for a single instance
    type Action;

    /// Reset every instance and return the initial observation
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Step every live instance with one action each
    fn step(&mut self, actions: &[Self::Action]) -> Result<BatchStepResult<Self::Observation>>;

    /// Number of live instances
    fn num_envs(&self) -> usize;

    /// Get the per-instance observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the per-instance action space dimensions
    fn action_space(&self) -> SpaceInfo;
}

/// Result of a batched environment step
///
/// `rewards`, `terminated` and `info` are indexed by the instances the step
/// was called with; `observation` covers the instances still live afterwards.
#[derive(Debug, Clone)]
pub struct BatchStepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward per instance
    pub rewards: Vec<f32>,

    /// Whether each instance terminated
    pub terminated: Vec<bool>,

    /// Whether every instance has terminated
    pub all_done: bool,

    /// Additional info
    pub info: StepInfo,
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,

    /// Multi-discrete space
    MultiDiscrete,
}

/// Additional step information
#[derive(Debug, Clone, Default)]
pub struct StepInfo {
    /// Whether each instance ate food this step
    pub food_eaten: Vec<bool>,
}

pub mod snake;
