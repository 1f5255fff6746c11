use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use metal_snake::game::{GameConfig, GameEngine, QuitPolicy, StateMachine};
use metal_snake::modes::HumanMode;
use metal_snake::scores::{JsonScoreStore, data_dir, default_scores_path};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "metal_snake")]
#[command(version, about = "Terminal snake with power-ups and obstacles")]
struct Cli {
    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Start with obstacle mode enabled
    #[arg(long)]
    obstacles: bool,

    /// Wrap around the grid edges instead of dying
    #[arg(long)]
    wrap: bool,

    /// Milliseconds between moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food, power-up and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where high scores are kept
    #[arg(long)]
    scores_file: Option<PathBuf>,

    /// Where the log is written
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Count a quit run towards the high scores
    #[arg(long)]
    record_on_quit: bool,

    /// Don't ring the terminal bell
    #[arg(long)]
    no_bell: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.base_tick_ms = tick_ms;
        }
        if self.wrap {
            config.wrap_walls = true;
        }
        if self.record_on_quit {
            config.quit_policy = QuitPolicy::Record;
        }

        config.validate()?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs go to a file
fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create log {:?}", path))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), file)
        .context("Failed to install logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir().join("metal_snake.log"));
    if let Err(err) = init_logging(&log_path) {
        eprintln!("warning: logging disabled: {:#}", err);
    }

    let config = cli.game_config()?;
    info!(
        "Starting on a {}x{} grid, tick {}ms",
        config.grid_width, config.grid_height, config.base_tick_ms
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = JsonScoreStore::open(cli.scores_file.clone().unwrap_or_else(default_scores_path));
    info!("High scores kept in {:?}", store.path());
    let machine = StateMachine::new(engine, store).with_obstacle_mode(cli.obstacles);

    let mut human_mode = HumanMode::new(machine, !cli.no_bell);
    human_mode.run().await?;

    Ok(())
}
