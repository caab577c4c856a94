// src/bin/cli.rs

//! headline CLI
//!
//! Fetches pages and prints their extracted h1/h2/h3/p/a text as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use headline::{
    error::Result,
    models::Config,
    pipeline,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// headline - Page Text Extractor
#[derive(Parser, Debug)]
#[command(
    name = "headline",
    version,
    about = "Extract heading, paragraph and link text from a web page"
)]

struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "headline.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch each URL and extract its text
    Scrape {
        /// Absolute http(s) URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Extract text from a local HTML file
    Extract {
        /// HTML file to read
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling in-flight work...");
            token.cancel();
        }
    });
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<bool> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match cli.command {
        Command::Scrape { urls, pretty } => {
            config.validate()?;
            let reports = pipeline::run_scrape(&config, &urls, &cancel).await?;
            print_json(&reports, pretty)?;
            Ok(reports.iter().all(|r| r.is_success()))
        }

        Command::Extract { file, pretty } => {
            config.validate()?;
            let result = pipeline::run_extract_file(&config, &file, &cancel).await?;
            print_json(&result, pretty)?;
            Ok(true)
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            Ok(true)
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_if_present(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, &config.logging.level);

    log::debug!("Configuration: {:?}", config);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) if e.is_cancelled() => {
            log::warn!("Cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
