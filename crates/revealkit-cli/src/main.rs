use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revealkit_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "revealkit")]
#[command(author, version, about = "Simulate scroll-driven landing page animations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ~/.config/revealkit/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll through a page layout and report what animates
    Simulate {
        /// Page layout (TOML)
        layout: PathBuf,
        /// Scroll position to end at (defaults to the bottom of the page)
        #[arg(long)]
        to: Option<f64>,
        /// Time spent scrolling
        #[arg(long, default_value_t = 3.0)]
        seconds: f64,
        /// Time to keep running after scrolling stops
        #[arg(long, default_value_t = 2.0)]
        settle: f64,
        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Scroll with wheel input through smooth scrolling instead of jumps
        #[arg(long)]
        wheel: bool,
        /// Pace frames on the wall clock
        #[arg(long)]
        realtime: bool,
        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },
    /// Print the scroll ranges each section reacts to
    Ranges {
        /// Page layout (TOML)
        layout: PathBuf,
    },
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Simulate {
            layout,
            to,
            seconds,
            settle,
            fps,
            wheel,
            realtime,
            json,
        } => {
            let options = commands::simulate::Options {
                to,
                seconds,
                settle,
                fps,
                wheel,
                realtime,
                json,
            };
            commands::simulate::run(&config, &layout, &options).await
        }
        Commands::Ranges { layout } => commands::ranges::run(&config, &layout),
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}
