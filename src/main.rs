use anyhow::{Context, Result};
use clap::Parser;
use std::io::stderr;
use std::path::PathBuf;
use tui_snake::audio::open_sink;
use tui_snake::game::{GameConfig, GameEngine};
use tui_snake::logging::init_logging;
use tui_snake::modes::HumanMode;
use tui_snake::storage::{HighScoreStore, JsonFileStore, MemoryStore};

#[derive(Parser)]
#[command(name = "tui_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width and height in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// No sound cues
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn store(&self) -> Box<dyn HighScoreStore> {
        if self.no_persist {
            Box::new(MemoryStore::default())
        } else {
            Box::new(JsonFileStore::new(&self.high_score_file))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, "starting");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    let audio = open_sink(cli.mute, stderr());
    let mut human_mode = HumanMode::new(engine, cli.store(), audio);
    human_mode.run().await?;

    Ok(())
}
