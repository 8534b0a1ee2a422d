//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up oneenough CLI defaults.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

/// Handle the configure command
pub fn handle(
    mods_dir: Option<PathBuf>,
    threads: Option<usize>,
    namespace: Option<String>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config)?;
        return Ok(());
    }

    if mods_dir.is_none() && threads.is_none() && namespace.is_none() {
        show_usage();
        return Ok(());
    }

    if let Some(dir) = mods_dir {
        println!("Default mods directory: {}", dir.display());
        config.mods_dir = Some(dir);
    }
    if let Some(count) = threads {
        println!("Default thread count: {count}");
        config.threads = Some(count);
    }
    if let Some(ns) = namespace {
        println!("Default result namespace: {ns}");
        config.result_namespace = Some(ns);
    }

    config.save()?;
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    match &config.mods_dir {
        Some(dir) => println!("Mods directory: {}", dir.display()),
        None => println!("No mods directory configured (default: ./mods)"),
    }
    match config.threads {
        Some(count) => println!("Threads: {count}"),
        None => println!("No thread count configured (default: one per CPU)"),
    }
    match &config.result_namespace {
        Some(ns) => println!("Result namespace: {ns}"),
        None => println!("No result namespace configured"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: oneenough configure --mods-dir PATH");
    println!("   or: oneenough configure --threads N");
    println!("   or: oneenough configure --namespace NS");
    println!("   or: oneenough configure --show");
}
