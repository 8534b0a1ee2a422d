mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::matcher::MatchRequest;
use commands::scan::ScanRequest;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            category,
            mods,
            output,
            threads,
            namespace,
            include_base,
            skip_raw,
        } => {
            commands::scan::handle(ScanRequest {
                category,
                mods,
                output,
                threads,
                namespace,
                include_base,
                skip_raw,
            })?;
        }

        Commands::Match {
            category,
            input,
            output,
            namespace,
            no_interactive,
            pack_format,
            filename,
            description,
        } => {
            commands::matcher::handle(MatchRequest {
                category,
                input,
                output,
                namespace,
                no_interactive,
                pack_format,
                filename,
                description,
            })?;
        }

        Commands::Configure {
            mods_dir,
            threads,
            namespace,
            show,
        } => {
            commands::configure::handle(mods_dir, threads, namespace, show)?;
        }
    }

    Ok(())
}
