//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use madlibs_core::config::{self, Config};

mod commands;

#[derive(Parser)]
#[command(name = "madlibs")]
#[command(version)]
#[command(about = "Terminal MadLibs word game")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides MADLIBS_BASE_URL and config)
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play a round (default when no command is given)
    Play,
    /// Check the backend's health endpoint
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        // Config commands need neither a backend nor logging.
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        None | Some(Commands::Play) => {
            let _guard = init_logging()?;
            let base_url = resolve_base_url(cli.base_url.as_deref())?;
            commands::play::run(base_url).await
        }
        Some(Commands::Health) => {
            let _guard = init_logging()?;
            let base_url = resolve_base_url(cli.base_url.as_deref())?;
            commands::health::run(base_url).await
        }
    }
}

/// Sets up file logging. The TUI owns the terminal, so diagnostics go to a
/// log file; the returned guard must stay alive or buffered lines are lost.
fn init_logging() -> Result<madlibs_core::logging::WorkerGuard> {
    madlibs_core::logging::init().context("init logging")
}

fn resolve_base_url(flag: Option<&str>) -> Result<String> {
    let config = Config::load().context("load config")?;
    let base_url = config::resolve_base_url(flag, &config)?;
    tracing::info!(%base_url, "resolved backend");
    Ok(base_url)
}
