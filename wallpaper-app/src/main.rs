mod config;
mod console;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::WallpaperConfig;
use console::{print_theme, ConsoleDisplay, ConsolePrompt};
use std::path::PathBuf;
use std::sync::Arc;
use wallpaper_controller::{Command, Controller, Outcome, RefreshTimer};
use wallpaper_core::ImageStore;
use wallpaper_source::UnsplashSource;
use wallpaper_theme::extract_palette;

type AppController = Controller<UnsplashSource, ConsoleDisplay, ConsolePrompt>;

#[derive(Parser)]
#[command(name = "wallpaper", version, about = "Manage the new-tab background wallpaper")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load the stored background and refresh it if stale
    Check,
    /// Use an image file as the background
    Upload { file: PathBuf },
    /// Fetch a random background
    Random {
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove the stored background
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// Print stored background metadata as JSON
    Status,
    /// Print the dominant color of an image file
    Color { file: PathBuf },
    /// Check now and then on every refresh interval until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = WallpaperConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    match cli.command {
        Cmd::Check => {
            let controller = open_controller(&config, false)?;
            let state = controller.check_and_update().await;
            println!("State: {:?}", state);
        }
        Cmd::Upload { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let controller = open_controller(&config, false)?;
            report(controller.dispatch(Command::Upload(bytes)).await);
        }
        Cmd::Random { yes } => {
            let controller = open_controller(&config, yes)?;
            report(controller.dispatch(Command::FetchRandom).await);
        }
        Cmd::Clear { yes } => {
            let controller = open_controller(&config, yes)?;
            report(controller.dispatch(Command::Clear).await);
        }
        Cmd::Status => {
            let store = open_store(&config)?;
            let summary = store.load()?.summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Cmd::Color { file } => match extract_palette(&file, config.sample_options())? {
            Some(theme) => print_theme(&theme),
            None => println!("No opaque pixels in {}", file.display()),
        },
        Cmd::Watch => {
            let controller = open_controller(&config, false)?;
            let state = controller.check_and_update().await;
            println!("State: {:?}", state);

            let period = controller.settings().refresh_interval;
            let mut timer = RefreshTimer::start(controller.clone(), period);
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            timer.stop();
        }
    }

    Ok(())
}

fn open_store(config: &WallpaperConfig) -> Result<ImageStore> {
    let path = config.database_path();
    let store = ImageStore::open(&path)
        .with_context(|| format!("Failed to open wallpaper store at {}", path.display()))?;
    log::info!("Wallpaper store: {}", path.display());
    Ok(store)
}

fn open_controller(config: &WallpaperConfig, assume_yes: bool) -> Result<Arc<AppController>> {
    let store = open_store(config)?;
    let source = UnsplashSource::new(config.unsplash())?;
    Ok(Arc::new(Controller::new(
        store,
        source,
        ConsoleDisplay,
        ConsolePrompt::new(assume_yes),
        config.refresh_settings(),
    )))
}

/// Failed commands are logged; the displayed state stays valid.
fn report(result: wallpaper_controller::Result<Outcome>) {
    match result {
        Ok(Outcome::Displayed(state)) => println!("State: {:?}", state),
        Ok(Outcome::Cancelled) => println!("Cancelled"),
        Ok(Outcome::NothingToClear) => {}
        Err(e) => log::error!("{}", e),
    }
}
