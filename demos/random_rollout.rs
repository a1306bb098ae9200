//! Random rollout over a Snake batch
//!
//! Steps a seeded batch with uniformly random moves until every game has
//! ended, then reports episode lengths and food eaten.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example random_rollout --release -- [num_games] [width] [height] [seed]
//! ```

use std::env;

use anyhow::{Context, Result};
use batch_snake::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn arg_or<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args.get(index) {
        Some(raw) => raw.parse().with_context(|| format!("invalid argument {index}: {raw}")),
        None => Ok(default),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    let num_games = arg_or(&args, 1, 256usize)?;
    let width = arg_or(&args, 2, 12usize)?;
    let height = arg_or(&args, 3, 12usize)?;
    let seed = arg_or(&args, 4, 42u64)?;

    let config = BatchConfig::new().width(width).height(height).num_games(num_games).seed(seed);
    tracing::info!("config: {}", config.to_json()?);

    let mut batch = SnakeBatch::new(config)?;
    let mut policy = StdRng::seed_from_u64(seed.wrapping_add(1));

    let mut total_reward = 0.0f32;
    let mut total_food = 0usize;
    let mut episode_lengths = Vec::with_capacity(num_games);

    while !batch.is_finished() {
        let moves: Vec<i64> = (0..batch.num_games()).map(|_| policy.gen_range(0..4)).collect();
        let outcome = batch.step(&moves)?;

        total_reward += outcome.rewards(&batch.config().rewards).iter().sum::<f32>();
        total_food += outcome.num_eaten();
        episode_lengths.extend(std::iter::repeat(batch.steps()).take(outcome.num_ended()));

        if batch.steps() % 10 == 0 {
            tracing::info!(step = batch.steps(), live = batch.num_games(), "rollout progress");
        }
    }

    let mean_length = episode_lengths.iter().sum::<usize>() as f64 / episode_lengths.len() as f64;
    let longest = episode_lengths.iter().copied().max().unwrap_or(0);
    tracing::info!(
        games = num_games,
        steps = batch.steps(),
        mean_length,
        longest,
        food = total_food,
        reward = total_reward,
        "all games ended"
    );

    Ok(())
}
