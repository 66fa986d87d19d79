//! Info command - show the derived cache configuration

use crate::cache::CacheConfig;
use crate::cli::commands::Job;
use crate::error::CacheResult;
use crate::toolchain::probe;
use console::style;

/// Execute the info command
///
/// Unlike the phases, errors here are reported and fail the command.
pub async fn execute(job: &Job) -> CacheResult<()> {
    let phase = job.phase();
    let toolchain = probe(phase.toolchain).await?;
    let config = CacheConfig::build(phase.cwd, phase.inputs, phase.env, &toolchain).await?;

    println!("{}", style("Cache Configuration").bold().cyan());
    println!();

    println!("{}", style("Cache Paths:").bold());
    for path in config.cache_paths() {
        println!("    {}", path.display());
    }
    println!("{}", style("Restore Key:").bold());
    println!("    {}", config.restore_key());
    println!("{}", style("Cache Key:").bold());
    println!("    {}", config.cache_key());
    println!();

    println!("{}", style(".. Prefix:").dim());
    println!("  - {}", config.key_prefix());
    println!("{}", style(".. Environment considered:").dim());
    println!("  - Zig Version: {}", toolchain.key_material());
    for name in config.tracked_env_names() {
        println!("  - {}", name);
    }
    println!(
        "{} {}",
        style(".. Package manager:").dim(),
        config.package_manager()
    );
    println!("{}", style(".. Lockfiles considered:").dim());
    for file in config.tracked_files() {
        println!("  - {}", file.display());
    }

    Ok(())
}
