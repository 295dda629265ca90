use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tilt_2048::{Direction, Game, GameConfig, GameOutcome, Score, Tile};

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Play random-policy 2048 games in parallel and summarize the outcomes")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1000)]
    games: u64,

    /// Base seed; game `i` uses `seed + i` (defaults to the config seed, then 0)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a game after this many accepted moves
    #[arg(long, default_value_t = 100_000)]
    max_moves: u64,

    /// TOML file with game settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

struct GameResult {
    outcome: GameOutcome,
    score: Score,
    highest_tile: Tile,
    moves: u64,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    games: u64,
    won: u64,
    lost: u64,
    unfinished: u64,
    mean_score: f64,
    max_score: Score,
    mean_moves: f64,
    /// Number of games that ended with each highest tile.
    highest_tiles: BTreeMap<Tile, u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    let base_seed = args.seed.or(config.seed).unwrap_or(0);

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games")?
                .progress_chars("=> ")
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let results: Vec<GameResult> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let result = play_random_game(&config, base_seed.wrapping_add(i), args.max_moves);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            result
        })
        .collect();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    info!("played {} games in {:.2}s", results.len(), start.elapsed().as_secs_f64());

    let summary = summarize(&results);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Play until the game ends, picking uniformly among moves that change the grid.
fn play_random_game(config: &GameConfig, seed: u64, max_moves: u64) -> GameResult {
    let mut game = Game::new(config.clone(), StdRng::seed_from_u64(seed));
    let mut policy_rng = StdRng::seed_from_u64(seed.rotate_left(32));
    let mut moves = 0u64;
    while game.outcome() == GameOutcome::InProgress && moves < max_moves {
        let grid = game.state().grid;
        let legal: Vec<Direction> = Direction::ALL.into_iter().filter(|&d| grid.shift(d).0 != grid).collect();
        let Some(&direction) = legal.choose(&mut policy_rng) else {
            break;
        };
        if game.apply(direction).is_err() {
            break;
        }
        moves += 1;
    }
    let state = game.state();
    GameResult { outcome: game.outcome(), score: state.score, highest_tile: state.grid.highest_tile(), moves }
}

fn summarize(results: &[GameResult]) -> Summary {
    let mut summary = Summary { games: results.len() as u64, ..Summary::default() };
    let mut total_score = 0u64;
    let mut total_moves = 0u64;
    for r in results {
        match r.outcome {
            GameOutcome::Won => summary.won += 1,
            GameOutcome::Lost => summary.lost += 1,
            GameOutcome::InProgress => summary.unfinished += 1,
        }
        total_score = total_score.saturating_add(r.score);
        total_moves = total_moves.saturating_add(r.moves);
        summary.max_score = summary.max_score.max(r.score);
        *summary.highest_tiles.entry(r.highest_tile).or_insert(0) += 1;
    }
    if !results.is_empty() {
        summary.mean_score = total_score as f64 / results.len() as f64;
        summary.mean_moves = total_moves as f64 / results.len() as f64;
    }
    summary
}

fn print_summary(summary: &Summary) {
    println!(
        "Games: {} | won: {} | lost: {} | unfinished: {}",
        summary.games, summary.won, summary.lost, summary.unfinished
    );
    println!(
        "Score: mean {:.1} | max {} | moves/game: {:.1}",
        summary.mean_score, summary.max_score, summary.mean_moves
    );
    for (tile, count) in &summary.highest_tiles {
        println!("  highest tile {:>5}: {}", tile, count);
    }
}
