use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use tilt_2048::{Game, GameConfig, GameOutcome, Placement, SpawnPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "tilt-2048",
    version,
    about = "Play 2048 in the terminal",
    after_help = "Moves: left/right/up/down, h/j/k/l or a/s/w/d. `new` starts over, `quit` exits."
)]
struct Args {
    /// TOML file with game settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for tile placement (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Spawn after every input (`always`) or only after a tilt that moved something (`on-change`)
    #[arg(long)]
    spawn_policy: Option<SpawnPolicy>,

    /// How the cell for a new tile is picked: `rejection` or `empty-cells`
    #[arg(long)]
    placement: Option<Placement>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(&args)?;
    log::debug!("starting with {config:?}");

    let mut game = Game::from_config(config);
    print_game(&game);

    for line in io::stdin().lock().lines() {
        let line = line.context("reading input")?;
        match line.trim() {
            "q" | "quit" | "exit" => break,
            "n" | "new" => {
                game.restart();
                print_game(&game);
            }
            input => match game.handle_input(input) {
                Ok(Some(_)) => print_game(&game),
                Ok(None) => {}
                Err(e) => println!("{e}"),
            },
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(policy) = args.spawn_policy {
        config.spawn_policy = policy;
    }
    if let Some(placement) = args.placement {
        config.placement = placement;
    }
    Ok(config)
}

fn print_game(game: &Game) {
    let snapshot = game.snapshot();
    println!("\n{}", snapshot.grid);
    println!("Score: {}", snapshot.score);
    match snapshot.outcome {
        GameOutcome::Won => println!("You reached 2048! Type `new` for another game."),
        GameOutcome::Lost => println!("No moves left. Type `new` to try again."),
        GameOutcome::InProgress => {}
    }
}
