//! novelbot CLI
//!
//! Runs the Reddit bot, or performs one-off catalog lookups.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use novelbot::{error::Result, models::Config, pipeline};
use tokio_util::sync::CancellationToken;

/// novelbot - Novel Updates lookups for Reddit
#[derive(Parser, Debug)]
#[command(
    name = "novelbot",
    version,
    about = "Answers [[Title]] mentions with Novel Updates summaries"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "bot.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the subreddit and reply until Ctrl-C
    Run,

    /// Print the reply the bot would post for some text
    Lookup {
        /// Comment text; plain text without [[...]] is one keyword
        text: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env_overrides();

    match cli.command {
        Command::Run => {
            log::info!("novelbot starting...");

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Interrupt received, shutting down");
                    on_signal.cancel();
                }
            });

            pipeline::run_bot(&config, cancel).await?;
        }

        Command::Lookup { text } => {
            let reply = pipeline::run_lookup(&config, &text).await?;
            if reply.is_empty() {
                log::info!("No catalog matches for {:?}", text);
            } else {
                println!("{reply}");
            }
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("  subreddit: r/{}", config.forum.subreddit);
            log::info!("  catalog: {}", config.catalog.base_url);
            log::info!(
                "  poll every {}s, stale after {}s",
                config.poller.interval_secs,
                config.poller.stale_after_secs
            );

            match config.validate_credentials() {
                Ok(()) => log::info!("✓ Credentials present"),
                Err(e) => log::warn!("Credentials incomplete: {}", e),
            }
        }
    }

    Ok(())
}
