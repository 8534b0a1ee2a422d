//! Core CLI definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oneenough")]
#[command(about = "Mod archive scanner and replacement datapack builder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// What a scan run looks for in each archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanCategory {
    Block,
    Items,
    Fluid,
    Recipe,
}

/// Which replacement category a match run emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchCategory {
    Block,
    Items,
    Fluid,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan mod archives for namespaced identifiers
    #[command(visible_alias = "s")]
    Scan {
        /// Identifier category to extract
        #[arg(value_enum)]
        category: ScanCategory,

        /// Directory containing .jar/.zip mod archives (uses configured default if not provided)
        #[arg(short, long)]
        mods: Option<PathBuf>,

        /// Output root; partitions land in {output}/{category}/
        #[arg(short, long, default_value = "scan_output")]
        output: PathBuf,

        /// Worker thread count (default: one per CPU)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Only scan this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Keep recipe results in the base game namespace
        #[arg(long)]
        include_base: bool,

        /// Delete raw partition files after cleaning
        #[arg(long)]
        skip_raw: bool,
    },

    /// Find duplicate identifiers across namespaces and build a datapack
    #[command(visible_alias = "m", name = "match")]
    Match {
        /// Replacement category to emit
        #[arg(value_enum)]
        category: MatchCategory,

        /// Directory of cleaned namespace files ({ns}.txt)
        #[arg(short, long)]
        input: PathBuf,

        /// Datapack output directory
        #[arg(short, long, default_value = "build_output/datapacks")]
        output: PathBuf,

        /// Result namespace the duplicates resolve to (prompted for when omitted)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Fail instead of prompting when no namespace is supplied
        #[arg(long)]
        no_interactive: bool,

        /// Datapack pack_format version
        #[arg(long, default_value_t = 10)]
        pack_format: u32,

        /// Replacements file name inside the datapack
        #[arg(long, default_value = "replacements.json")]
        filename: String,

        /// Pack description written to pack.mcmeta
        #[arg(long)]
        description: Option<String>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default mods directory
        #[arg(long)]
        mods_dir: Option<PathBuf>,

        /// Set the default worker thread count
        #[arg(long)]
        threads: Option<usize>,

        /// Set the default result namespace for match runs
        #[arg(long)]
        namespace: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
