//! Scan command handler: archive discovery, the parallel scan run, and the
//! summary printed afterwards.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use oneenough::{
    EntryFilter, FlushReport, IdentifierCleaner, NamespaceSink, OutputLayout, RecipeFilter,
    ScanCoordinator, ScanEvent, ScanOptions,
};

use crate::cli::ScanCategory;
use crate::config::Config;

pub struct ScanRequest {
    pub category: ScanCategory,
    pub mods: Option<PathBuf>,
    pub output: PathBuf,
    pub threads: Option<usize>,
    pub namespace: Option<String>,
    pub include_base: bool,
    pub skip_raw: bool,
}

pub fn handle(request: ScanRequest) -> Result<()> {
    let config = Config::load()?;

    let mods_dir = request
        .mods
        .or(config.mods_dir)
        .unwrap_or_else(|| PathBuf::from("mods"));
    if !mods_dir.is_dir() {
        bail!("Mods directory {} does not exist", mods_dir.display());
    }

    let archives = discover_archives(&mods_dir);
    if archives.is_empty() {
        bail!("No .jar or .zip archives found in {}", mods_dir.display());
    }

    let threads = request.threads.or(config.threads).unwrap_or(0);
    let filter = build_filter(request.category, request.include_base);
    let options = ScanOptions {
        threads,
        namespace_filter: request.namespace,
    };

    eprintln!(
        "Found {} archive(s) in {}",
        archives.len(),
        mods_dir.display()
    );

    let pb = ProgressBar::new(archives.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let sink = NamespaceSink::new();
    let coordinator = ScanCoordinator::new(&filter, options);
    let report = coordinator.scan(&archives, &sink, |event| {
        if let ScanEvent::Skipped { archive, error } = event {
            pb.suspend(|| eprintln!("Warning: skipping {}: {}", archive.display(), error));
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done");

    let mut sink = sink;
    let category_dir = request.output.join(category_dir_name(request.category));
    let layout = OutputLayout::single(&category_dir);
    let flush = sink.flush(&layout, cleaner_for(request.category).as_ref())?;

    if let Some(fallback) = &flush.fallback_dir {
        eprintln!(
            "Warning: {} was not writable, output redirected to {}",
            category_dir.display(),
            fallback.display()
        );
    }

    if request.skip_raw {
        let raw_layout = raw_cleanup_layout(&layout, &flush);
        for namespace in sink.namespaces() {
            let raw = raw_layout.raw_path(&namespace);
            fs::remove_file(&raw)
                .with_context(|| format!("Failed to remove raw file {}", raw.display()))?;
        }
    }

    eprintln!(
        "Scanned: {} archive(s), skipped: {}, identifiers extracted: {}",
        report.processed, report.skipped, report.extracted
    );
    if report.entries_skipped > 0 {
        eprintln!(
            "Warning: {} entries had malformed payloads and were skipped",
            report.entries_skipped
        );
    }
    eprintln!(
        "Namespaces: {}, cleaned identifiers written: {}",
        flush.namespaces, flush.cleaned_lines
    );
    for (namespace, count) in &flush.per_namespace {
        eprintln!("  {namespace}: {count} identifier(s)");
    }
    eprintln!("Output in {}", category_dir.display());

    Ok(())
}

/// Raw partitions live under the fallback directory when the flush was
/// redirected there, so cleanup has to follow.
fn raw_cleanup_layout(layout: &OutputLayout, flush: &FlushReport) -> OutputLayout {
    match &flush.fallback_dir {
        Some(dir) => OutputLayout::single(dir),
        None => layout.clone(),
    }
}

/// All .jar/.zip files under the mods directory, sorted for stable ordering.
fn discover_archives(mods_dir: &std::path::Path) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = WalkDir::new(mods_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("jar") | Some("zip")
            )
        })
        .collect();
    archives.sort();
    archives
}

fn build_filter(category: ScanCategory, include_base: bool) -> EntryFilter {
    match category {
        ScanCategory::Block => EntryFilter::Block,
        ScanCategory::Items => EntryFilter::Item,
        ScanCategory::Fluid => EntryFilter::Fluid,
        ScanCategory::Recipe => EntryFilter::Recipe(RecipeFilter {
            include_base_namespace: include_base,
            ..RecipeFilter::default()
        }),
    }
}

/// Recipe results are already canonical ids; only asset scans get affix cleaning.
fn cleaner_for(category: ScanCategory) -> Option<IdentifierCleaner> {
    match category {
        ScanCategory::Block | ScanCategory::Items => Some(IdentifierCleaner::new()),
        ScanCategory::Fluid => Some(IdentifierCleaner::fluid()),
        ScanCategory::Recipe => None,
    }
}

fn category_dir_name(category: ScanCategory) -> &'static str {
    match category {
        ScanCategory::Block => "blocks",
        ScanCategory::Items => "items",
        ScanCategory::Fluid => "fluids",
        ScanCategory::Recipe => "recipes",
    }
}
