//! Snake batch orchestrator
//!
//! [`SnakeBatch`] owns the index-aligned stores of every live game (grid,
//! body store with end indices, food locations) and composes the engine,
//! the food allocator and the compactor into `reset()` and `step()`.
//!
//! # Step order
//!
//! 1. Validate the moves and plan the transition without mutating anything.
//! 2. Advance every body.
//! 3. Sync the grid for live games: erase vacated tails, mark new heads.
//! 4. Place new food for live games that ate.
//! 5. Compact away ended games, unless none or all of them ended.
//!
//! When every game ends in the same step the stores are left untouched so
//! the final state can still be inspected, and the batch refuses further
//! steps until it is reset. Ended games are never drawn into the grid, so
//! their grid rows show the last position before the fatal move.
//!
//! The body store of a finished batch has still been advanced: `heads()`,
//! `body()` and `snapshot()` report the post-move state, including a head
//! on the wall or on the snake's own body. Such a snapshot is not a valid
//! [`GameLayout`] and is rejected by [`SnakeBatch::from_layouts`].

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use super::{
    body::BodyStore,
    compact::{self, Compaction},
    config::{BatchConfig, RewardConfig},
    engine::{self, Transition},
    error::SnakeError,
    food::FoodAllocator,
    grid::Grid,
    observation::GridView,
    random::RandomSource,
    types::{Cell, Direction, GridDims, Position},
};
use crate::env::{BatchEnvironment, BatchStepResult, SpaceInfo, SpaceType, StepInfo};

/// Explicit position of one game: body segments head first, plus food
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    /// Occupied cells, head first then neck to tail
    pub body: Vec<Position>,
    /// Food cell
    pub food: Position,
}

impl GameLayout {
    /// Create a layout
    pub fn new(body: Vec<Position>, food: Position) -> Self {
        Self { body, food }
    }

    /// Body length minus one
    pub fn end_index(&self) -> usize {
        self.body.len().saturating_sub(1)
    }

    fn validate(&self, game: usize, dims: GridDims) -> Result<()> {
        let invalid = |reason: String| SnakeError::InvalidLayout { game, reason };

        if self.body.is_empty() {
            return Err(invalid("body is empty".to_string()).into());
        }
        for (k, &segment) in self.body.iter().enumerate() {
            if !dims.is_interior(segment) {
                return Err(invalid(format!("segment {k} at {segment:?} is not an interior cell")).into());
            }
            if self.body[..k].contains(&segment) {
                return Err(invalid(format!("segment {k} at {segment:?} overlaps the body")).into());
            }
            if k > 0 && !self.body[k - 1].is_adjacent(&segment) {
                return Err(invalid(format!("segment {k} at {segment:?} is not adjacent to segment {}", k - 1)).into());
            }
        }
        if !dims.is_interior(self.food) {
            return Err(invalid(format!("food at {:?} is not an interior cell", self.food)).into());
        }
        if self.body.contains(&self.food) {
            return Err(invalid(format!("food at {:?} is on the body", self.food)).into());
        }
        Ok(())
    }
}

/// Result of one batch step
///
/// Masks are indexed by the rows the step was called with, before
/// compaction renumbered the survivors.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Game hit a wall or itself
    pub game_end: Vec<bool>,
    /// Head landed on the food
    pub food_hit: Vec<bool>,
    /// Head landed on the border
    pub wall_hit: Vec<bool>,
    /// Head landed on the neck-to-tail segment
    pub self_hit: Vec<bool>,
    /// Every game ended this step
    pub all_ended: bool,
    /// What compaction did to the stores
    pub compaction: Compaction,
}

impl StepOutcome {
    /// Per-game rewards under `rewards`
    ///
    /// Death outranks food: an ended game scores the death reward even if
    /// its head also landed on the food.
    pub fn rewards(&self, rewards: &RewardConfig) -> Vec<f32> {
        self.game_end
            .iter()
            .zip(&self.food_hit)
            .map(|(&ended, &ate)| {
                if ended {
                    rewards.death
                } else if ate {
                    rewards.food
                } else {
                    rewards.step
                }
            })
            .collect()
    }

    /// Number of games that ended this step
    pub fn num_ended(&self) -> usize {
        self.game_end.iter().filter(|&&ended| ended).count()
    }

    /// Number of surviving games that ate this step
    pub fn num_eaten(&self) -> usize {
        self.game_end.iter().zip(&self.food_hit).filter(|(&ended, &ate)| ate && !ended).count()
    }
}

/// Lock-step batch of independent Snake games
#[derive(Debug, Clone)]
pub struct SnakeBatch<R: RandomSource = StdRng> {
    config: BatchConfig,
    dims: GridDims,
    grid: Grid,
    body: BodyStore,
    food: Vec<Position>,
    allocator: FoodAllocator,
    source: R,
    /// Every game ended; stepping requires a reset
    finished: bool,
    /// Episode counter
    episode: usize,
    /// Steps since the last reset
    steps: usize,
}

impl SnakeBatch<StdRng> {
    /// Create a batch seeded from `config.seed`, or from entropy
    pub fn new(config: BatchConfig) -> Result<Self> {
        let source = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_source(config, source)
    }
}

impl<R: RandomSource> SnakeBatch<R> {
    /// Create a batch drawing placements from `source`, already reset
    pub fn with_source(config: BatchConfig, source: R) -> Result<Self> {
        let mut batch = Self::allocate(config, source)?;
        batch.reset();
        Ok(batch)
    }

    /// Create a batch with one game per layout
    ///
    /// `config.num_games` is replaced by the number of layouts; later resets
    /// restore that many games at random positions.
    pub fn from_layouts(mut config: BatchConfig, layouts: &[GameLayout], source: R) -> Result<Self> {
        config.num_games = layouts.len();
        let mut batch = Self::allocate(config, source)?;
        for (game, layout) in layouts.iter().enumerate() {
            layout.validate(game, batch.dims)?;
        }

        batch.grid.initialize();
        for (row, layout) in layouts.iter().enumerate() {
            batch.body.place(row, &layout.body);
            batch.food[row] = layout.food;
            for &segment in &layout.body {
                batch.grid.mark(row, segment, Cell::Body);
            }
            batch.grid.mark(row, layout.food, Cell::Food);
        }
        batch.episode = 1;
        debug!(games = layouts.len(), "batch loaded from explicit layouts");
        Ok(batch)
    }

    fn allocate(config: BatchConfig, source: R) -> Result<Self> {
        config.validate()?;
        let dims = config.dims();
        let rows = config.num_games;
        Ok(Self {
            grid: Grid::new(dims, rows),
            body: BodyStore::new(dims.cells(), rows),
            food: vec![Position::default(); rows],
            allocator: FoodAllocator::new(dims),
            source,
            finished: false,
            episode: 0,
            steps: 0,
            config,
            dims,
        })
    }

    /// Start a new episode: every game gets a fresh random head and food
    pub fn reset(&mut self) {
        let rows = self.config.num_games;
        self.grid.resize_rows(rows);
        self.grid.initialize();
        self.body.resize_rows(rows);
        self.food.resize(rows, Position::default());

        for row in 0..rows {
            let (head, food) = self.allocator.spawn(&mut self.source);
            self.body.reset_row(row, head);
            self.food[row] = food;
        }

        let all_rows: Vec<usize> = (0..rows).collect();
        let heads = self.heads();
        self.grid.mark_cells(&all_rows, &heads, Cell::Body);
        self.grid.mark_cells(&all_rows, &self.food, Cell::Food);

        self.finished = false;
        self.episode += 1;
        self.steps = 0;
        info!(
            episode = self.episode,
            games = rows,
            "reset {}x{} snake batch",
            self.dims.width,
            self.dims.height
        );
    }

    /// Advance every live game by one move
    ///
    /// `moves` holds one code per live game (0 up, 1 right, 2 down, 3 left).
    /// A rejected call leaves the batch unchanged.
    pub fn step(&mut self, moves: &[i64]) -> Result<StepOutcome> {
        if self.finished {
            return Err(SnakeError::BatchFinished.into());
        }
        let directions = self.parse_moves(moves)?;
        let transition = engine::plan(&self.body, &self.food, self.dims, &directions);
        self.check_room_for_food(&transition)?;

        let vacated = engine::apply(&mut self.body, &transition);
        self.sync_grid(&transition, &vacated);

        let eaten: Vec<bool> = transition
            .food_hit
            .iter()
            .zip(&transition.game_end)
            .map(|(&ate, &ended)| ate && !ended)
            .collect();
        let placed =
            self.allocator.relocate_eaten(&self.body, &mut self.food, &eaten, &mut self.source)?;
        let new_food: Vec<Position> = placed.iter().map(|&row| self.food[row]).collect();
        self.grid.mark_cells(&placed, &new_food, Cell::Food);

        self.steps += 1;
        let compaction =
            compact::compact(&transition.game_end, &mut self.grid, &mut self.body, &mut self.food);
        match compaction {
            Compaction::AllEnded => {
                self.finished = true;
                info!(episode = self.episode, steps = self.steps, "all games ended");
            }
            Compaction::Removed { removed, remaining } => {
                debug!(step = self.steps, removed, remaining, "compacted batch");
            }
            Compaction::Unchanged => {}
        }
        debug!(step = self.steps, live = self.num_games(), eaten = placed.len(), "stepped batch");

        let Transition { wall_hit, self_hit, food_hit, game_end, .. } = transition;
        Ok(StepOutcome {
            game_end,
            food_hit,
            wall_hit,
            self_hit,
            all_ended: compaction == Compaction::AllEnded,
            compaction,
        })
    }

    fn parse_moves(&self, moves: &[i64]) -> Result<Vec<Direction>> {
        let expected = self.num_games();
        if moves.len() != expected {
            return Err(SnakeError::MoveCountMismatch { expected, actual: moves.len() }.into());
        }
        moves
            .iter()
            .enumerate()
            .map(|(game, &code)| {
                Direction::from_action(code).ok_or_else(|| SnakeError::InvalidMove { game, code }.into())
            })
            .collect()
    }

    /// A live game that eats needs a free cell left for the next food
    fn check_room_for_food(&self, transition: &Transition) -> Result<()> {
        let interior = self.dims.interior_cells();
        for row in transition.live_rows() {
            if transition.food_hit[row] && self.body.end_index(row) + 2 >= interior {
                return Err(SnakeError::NoFreeCell { game: row }.into());
            }
        }
        Ok(())
    }

    fn sync_grid(&mut self, transition: &Transition, vacated: &[Option<Position>]) {
        let live: Vec<usize> = transition.live_rows().collect();

        let (erase_rows, erase_cells): (Vec<usize>, Vec<Position>) =
            live.iter().filter_map(|&row| vacated[row].map(|tail| (row, tail))).unzip();
        self.grid.mark_cells(&erase_rows, &erase_cells, Cell::Empty);

        let heads: Vec<Position> = live.iter().map(|&row| transition.next_heads[row]).collect();
        self.grid.mark_cells(&live, &heads, Cell::Body);
    }

    /// Number of live games
    pub fn num_games(&self) -> usize {
        self.body.num_rows()
    }

    /// Grid dimensions
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Construction parameters
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Every game has ended and the batch awaits a reset
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Episodes started so far
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Steps since the last reset
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Head of every game
    pub fn heads(&self) -> Vec<Position> {
        (0..self.num_games()).map(|row| self.body.head(row)).collect()
    }

    /// Food location of every game
    pub fn food(&self) -> &[Position] {
        &self.food
    }

    /// End index of every game
    pub fn end_indices(&self) -> &[usize] {
        self.body.end_indices()
    }

    /// Body length of every game
    pub fn lengths(&self) -> Vec<usize> {
        self.end_indices().iter().map(|&end| end + 1).collect()
    }

    /// Valid body of one game, head first
    pub fn body(&self, game: usize) -> Vec<Position> {
        self.body.segments(game).collect()
    }

    /// Current state of every game
    pub fn snapshot(&self) -> Vec<GameLayout> {
        (0..self.num_games()).map(|row| GameLayout::new(self.body(row), self.food[row])).collect()
    }

    /// Read-only view of every game's grid
    pub fn observe(&self) -> GridView<'_> {
        GridView::new(self.grid.as_slice(), self.dims, self.num_games())
    }

    /// One-hot grid planes, `games × 4 × height × width`
    pub fn observe_planes(&self) -> Vec<f32> {
        self.observe().to_planes()
    }
}

impl<R: RandomSource> BatchEnvironment for SnakeBatch<R> {
    type Observation = Vec<f32>;
    type Action = i64;

    fn reset(&mut self) -> Result<Self::Observation> {
        SnakeBatch::reset(self);
        Ok(self.observe_planes())
    }

    fn step(&mut self, actions: &[Self::Action]) -> Result<BatchStepResult<Self::Observation>> {
        let outcome = SnakeBatch::step(self, actions)?;
        let rewards = outcome.rewards(&self.config.rewards);

        Ok(BatchStepResult {
            observation: self.observe_planes(),
            rewards,
            terminated: outcome.game_end,
            all_done: outcome.all_ended,
            info: StepInfo { food_eaten: outcome.food_hit },
        })
    }

    fn num_envs(&self) -> usize {
        self.num_games()
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![Cell::COUNT, self.dims.height, self.dims.width],
            dtype: SpaceType::Continuous,
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(Direction::ALL.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::snake::random::ScriptedSource;

    fn config() -> BatchConfig {
        BatchConfig::new().width(5).height(4).num_games(1)
    }

    fn single(body: Vec<Position>, food: Position) -> SnakeBatch<ScriptedSource> {
        SnakeBatch::from_layouts(config(), &[GameLayout::new(body, food)], ScriptedSource::default())
            .unwrap()
    }

    fn assert_consistent<R: RandomSource>(batch: &SnakeBatch<R>) {
        let view = batch.observe();
        for game in 0..batch.num_games() {
            assert_eq!(view.count(game, Cell::Body), batch.end_indices()[game] + 1);
            assert_eq!(view.count(game, Cell::Food), 1);
            assert_eq!(view.cell(game, batch.heads()[game]), Cell::Body);
            assert_eq!(view.cell(game, batch.food()[game]), Cell::Food);
            assert!(!batch.body(game).contains(&batch.food()[game]));
        }
    }

    #[test]
    fn test_reset_layout() {
        let batch = SnakeBatch::new(BatchConfig::new().width(5).height(4).num_games(2).seed(1)).unwrap();
        let view = batch.observe();

        assert_eq!(view.shape(), [2, 4, 5]);
        for game in 0..2 {
            assert_eq!(view.count(game, Cell::Wall), 14);
            assert_eq!(view.count(game, Cell::Body), 1);
            assert_eq!(view.count(game, Cell::Food), 1);
            assert_ne!(batch.heads()[game], batch.food()[game]);
        }
        assert_eq!(batch.end_indices(), &[0, 0]);
        assert_eq!(batch.episode(), 1);
        assert_consistent(&batch);
    }

    #[test]
    fn test_eat_and_grow() {
        let mut batch = single(vec![Position::new(2, 1)], Position::new(2, 3));

        let outcome = batch.step(&[1]).unwrap();
        assert_eq!(outcome.food_hit, vec![false]);
        assert_eq!(outcome.game_end, vec![false]);
        assert_eq!(batch.heads(), vec![Position::new(2, 2)]);
        assert_eq!(batch.observe().cell(0, Position::new(2, 1)), Cell::Empty);

        let outcome = batch.step(&[1]).unwrap();
        assert_eq!(outcome.food_hit, vec![true]);
        assert_eq!(outcome.game_end, vec![false]);
        assert_eq!(batch.end_indices(), &[1]);
        assert_eq!(batch.body(0), vec![Position::new(2, 3), Position::new(2, 2)]);
        assert_consistent(&batch);
    }

    #[test]
    fn test_rejected_step_leaves_state() {
        let mut batch = single(vec![Position::new(2, 1)], Position::new(2, 3));
        let before = batch.snapshot();
        let grid_before = batch.observe().as_slice().to_vec();

        let err = batch.step(&[1, 1]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SnakeError>(),
            Some(&SnakeError::MoveCountMismatch { expected: 1, actual: 2 })
        );
        let err = batch.step(&[4]).unwrap_err();
        assert_eq!(err.downcast_ref::<SnakeError>(), Some(&SnakeError::InvalidMove { game: 0, code: 4 }));

        assert_eq!(batch.snapshot(), before);
        assert_eq!(batch.observe().as_slice(), grid_before.as_slice());
        assert_eq!(batch.steps(), 0);
    }

    #[test]
    fn test_full_board_is_rejected() {
        // 5x4 grid has 6 interior cells; a 4-long snake eating leaves 1 cell,
        // a 5-long snake eating leaves none.
        let body = vec![
            Position::new(2, 2),
            Position::new(2, 1),
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(1, 3),
        ];
        let mut batch = single(body, Position::new(2, 3));
        let before = batch.snapshot();
        let grid_before = batch.observe().as_slice().to_vec();

        let err = batch.step(&[1]).unwrap_err();
        assert_eq!(err.downcast_ref::<SnakeError>(), Some(&SnakeError::NoFreeCell { game: 0 }));
        assert_eq!(batch.snapshot(), before);
        assert_eq!(batch.observe().as_slice(), grid_before.as_slice());
        assert_eq!(batch.steps(), 0);
        assert!(!batch.is_finished());
    }

    #[test]
    fn test_late_invalid_move_rejects_whole_batch() {
        let layouts = [
            GameLayout::new(vec![Position::new(2, 1)], Position::new(2, 2)),
            GameLayout::new(vec![Position::new(1, 1)], Position::new(2, 3)),
        ];
        let mut batch = SnakeBatch::from_layouts(config(), &layouts, ScriptedSource::new([0])).unwrap();
        let before = batch.snapshot();
        let grid_before = batch.observe().as_slice().to_vec();

        // Game 0 would eat with a valid move; game 1's code is rejected first
        let err = batch.step(&[1, 9]).unwrap_err();
        assert_eq!(err.downcast_ref::<SnakeError>(), Some(&SnakeError::InvalidMove { game: 1, code: 9 }));
        assert_eq!(batch.snapshot(), before);
        assert_eq!(batch.observe().as_slice(), grid_before.as_slice());
        assert_eq!(batch.end_indices(), &[0, 0]);
        assert_eq!(batch.steps(), 0);

        let outcome = batch.step(&[1, 1]).unwrap();
        assert_eq!(outcome.food_hit, vec![true, false]);
        assert_consistent(&batch);
    }

    #[test]
    fn test_all_ended_keeps_final_state() {
        let mut batch = single(vec![Position::new(1, 2)], Position::new(2, 3));
        let grid_before = batch.observe().as_slice().to_vec();

        let outcome = batch.step(&[0]).unwrap();
        assert!(outcome.all_ended);
        assert_eq!(outcome.compaction, Compaction::AllEnded);
        assert!(batch.is_finished());
        assert_eq!(batch.num_games(), 1);
        assert_eq!(batch.observe().as_slice(), grid_before.as_slice());

        // Body store holds the fatal move, the grid does not
        assert_eq!(batch.heads(), vec![Position::new(0, 2)]);
        assert_eq!(batch.snapshot(), vec![GameLayout::new(vec![Position::new(0, 2)], Position::new(2, 3))]);
        assert_eq!(batch.observe().cell(0, Position::new(0, 2)), Cell::Wall);
        assert_eq!(batch.observe().cell(0, Position::new(1, 2)), Cell::Body);
        let err = SnakeBatch::from_layouts(config(), &batch.snapshot(), ScriptedSource::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<SnakeError>(), Some(SnakeError::InvalidLayout { .. })));

        let err = batch.step(&[2]).unwrap_err();
        assert_eq!(err.downcast_ref::<SnakeError>(), Some(&SnakeError::BatchFinished));

        batch.reset();
        assert!(!batch.is_finished());
        assert_eq!(batch.episode(), 2);
        assert!(batch.step(&[0]).is_ok());
    }

    #[test]
    fn test_rewards() {
        let outcome = StepOutcome {
            game_end: vec![false, true, false, true],
            food_hit: vec![true, false, false, true],
            wall_hit: vec![false, true, false, false],
            self_hit: vec![false, false, false, true],
            all_ended: false,
            compaction: Compaction::Removed { removed: 2, remaining: 2 },
        };
        assert_eq!(outcome.rewards(&RewardConfig::default()), vec![1.0, -1.0, -0.01, -1.0]);
        assert_eq!(outcome.num_ended(), 2);
        assert_eq!(outcome.num_eaten(), 1);
    }

    #[test]
    fn test_invalid_layouts() {
        let cases = [
            GameLayout::new(vec![], Position::new(1, 1)),
            GameLayout::new(vec![Position::new(0, 1)], Position::new(1, 1)),
            GameLayout::new(vec![Position::new(1, 1), Position::new(2, 2)], Position::new(1, 3)),
            GameLayout::new(vec![Position::new(1, 1), Position::new(1, 2), Position::new(1, 1)], Position::new(1, 3)),
            GameLayout::new(vec![Position::new(1, 1)], Position::new(1, 1)),
            GameLayout::new(vec![Position::new(1, 1)], Position::new(3, 3)),
        ];
        for layout in cases {
            let err = SnakeBatch::from_layouts(config(), &[layout], ScriptedSource::default()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SnakeError>(),
                Some(SnakeError::InvalidLayout { game: 0, .. })
            ));
        }
    }

    #[test]
    fn test_environment_trait() {
        let mut batch = SnakeBatch::new(BatchConfig::new().width(6).height(6).num_games(3).seed(4)).unwrap();
        let obs = BatchEnvironment::reset(&mut batch).unwrap();
        assert_eq!(obs.len(), 3 * 4 * 36);
        assert_eq!(batch.observation_space().shape, vec![4, 6, 6]);
        assert!(matches!(batch.action_space().dtype, SpaceType::Discrete(4)));
        assert_eq!(batch.num_envs(), 3);

        let result = BatchEnvironment::step(&mut batch, &[0, 1, 2]).unwrap();
        assert_eq!(result.rewards.len(), 3);
        assert_eq!(result.terminated.len(), 3);
        assert_eq!(result.info.food_eaten.len(), 3);
        assert_eq!(result.observation.len(), batch.num_games() * 4 * 36);
    }
}
