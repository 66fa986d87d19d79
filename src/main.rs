//! zig-cache-step - CI cache helper for Zig build artifacts
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zig_cache_step::cli::commands::Job;
use zig_cache_step::cli::{Cli, Commands};
use zig_cache_step::config::{InputOverrides, InputsLoader};
use zig_cache_step::error::{CacheError, CacheResult};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    // CI logs are the user interface: info by default, -v debug, -vv trace
    let filter = match cli.verbose {
        0 => EnvFilter::new("zig_cache_step=info"),
        1 => EnvFilter::new("zig_cache_step=debug"),
        _ => EnvFilter::new("zig_cache_step=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Relative cache paths are handed to the backend as-is, so run from the project
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .map_err(|e| CacheError::io(format!("changing to {}", dir.display()), e))?;
    }
    let cwd = std::env::current_dir()
        .map_err(|e| CacheError::io("getting current directory", e))?;

    // Load inputs: explicit file, else local file unless --no-local
    let config_path = match cli.config {
        Some(path) => Some(path),
        None if cli.no_local => {
            debug!("Local input file discovery disabled (--no-local)");
            None
        }
        None => InputsLoader::find_local_config(&cwd),
    };
    if let Some(ref path) = config_path {
        debug!("Using input file: {}", path.display());
    }

    let loader = match config_path {
        Some(path) => InputsLoader::with_path(path),
        None => InputsLoader::new(),
    };
    let inputs = InputOverrides::from(cli.inputs).apply(loader.load().await?);

    let job = Job::new(cwd, inputs, cli.backend.as_deref());

    match cli.command {
        Commands::Restore => zig_cache_step::cli::commands::restore(&job).await,
        Commands::Save(args) => zig_cache_step::cli::commands::save(args, &job).await,
        Commands::Info => zig_cache_step::cli::commands::info(&job).await,
    }
}
