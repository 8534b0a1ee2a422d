//! # oneenough
//!
//! Mod archive scanner library - identifier extraction, normalization, and
//! duplicate matching.
//!
//! This library provides functionality to:
//! - Scan ZIP-format mod archives for namespaced block/item/fluid/recipe identifiers
//! - Normalize raw identifiers by stripping texture/model affixes until convergence
//! - Cross-reference cleaned identifiers to find duplicates across namespaces
//! - Emit replacement-rule datapacks for the game client
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use oneenough::{
//!     Category, DatapackEmitter, DuplicateMatcher, EntryFilter, IdentifierCleaner,
//!     NamespaceSink, OutputLayout, ScanCoordinator, ScanOptions,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archives = vec![PathBuf::from("mods/example.jar")];
//! let filter = EntryFilter::Block;
//! let sink = NamespaceSink::new();
//!
//! // Scan archives in parallel, then flush raw and cleaned partitions
//! let coordinator = ScanCoordinator::new(&filter, ScanOptions::default());
//! let report = coordinator.scan(&archives, &sink, |_| {})?;
//! println!("Processed {} archives", report.processed);
//!
//! let mut sink = sink;
//! let layout = OutputLayout::single("scan_output/blocks");
//! sink.flush(&layout, Some(&IdentifierCleaner::new()))?;
//!
//! // Match duplicates and emit a datapack
//! let matcher = DuplicateMatcher::from_dir("scan_output/blocks".as_ref())?;
//! let rules = matcher.build_rules(Some("minecraft"))?;
//! DatapackEmitter::new("Unified blocks").emit("build_output".as_ref(), Category::Block, &rules)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod cleaner;
pub mod datapack;
pub mod filter;
pub mod ident;
pub mod matcher;
pub mod scan;

// Re-export commonly used items
#[doc(inline)]
pub use archive::{ArchiveError, ArchiveReader};
#[doc(inline)]
pub use cleaner::{IdentifierCleaner, DEFAULT_EXTENSIONS, FLUID_EXTENSIONS};
#[doc(inline)]
pub use datapack::{Category, DatapackEmitter, DatapackError, PackManifest};
#[doc(inline)]
pub use filter::{EntryError, EntryFilter, RecipeFilter, BASE_NAMESPACE};
#[doc(inline)]
pub use ident::{IdentError, NamespacedId};
#[doc(inline)]
pub use matcher::{DuplicateMatcher, MatchError, MatchRule, NamespaceSummary, ReverseIndex};
#[doc(inline)]
pub use scan::{
    FlushReport, NamespaceSink, OutputLayout, ScanCoordinator, ScanError, ScanEvent, ScanOptions,
    ScanReport,
};
