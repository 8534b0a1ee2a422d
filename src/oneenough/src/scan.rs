//! Concurrent archive scanning: the worker-pool coordinator and the shared,
//! namespace-partitioned sink it feeds.
//!
//! Archives are independent units of work; a corrupt or unreadable archive is
//! skipped and counted, never fatal. The sink serializes appends per
//! namespace while letting unrelated namespaces proceed in parallel: a master
//! lock guards only bucket creation and is never held during bucket mutation.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexSet;
use rayon::prelude::*;
use thiserror::Error;

use crate::archive::{ArchiveError, ArchiveReader};
use crate::cleaner::IdentifierCleaner;
use crate::filter::EntryFilter;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Scan-run tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Worker thread count; 0 means one per available CPU.
    pub threads: usize,
    /// Restrict the scan to a single namespace.
    pub namespace_filter: Option<String>,
}

/// Outcome counts for one scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Archives fully traversed.
    pub processed: usize,
    /// Archives skipped as corrupt or unreadable.
    pub skipped: usize,
    /// Identifiers appended to the sink.
    pub extracted: usize,
    /// Matching entries skipped because their payload could not be parsed.
    pub entries_skipped: usize,
}

/// Per-archive progress notification, delivered from worker threads.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    Scanned { archive: &'a Path, extracted: usize },
    Skipped { archive: &'a Path, error: &'a ArchiveError },
}

/// Lock recovery: bucket contents are plain data, safe to reuse after a
/// writer panicked mid-append.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

type Bucket = Arc<Mutex<IndexSet<String>>>;

/// Shared accumulator mapping namespace to its insertion-ordered set of raw
/// identifiers. Appends from any number of threads are safe; flushing
/// requires exclusive access (`&mut self`), so the type system rules out
/// flushing mid-scan.
#[derive(Default)]
pub struct NamespaceSink {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl NamespaceSink {
    pub fn new() -> Self {
        NamespaceSink::default()
    }

    /// Record one raw identifier under its namespace. Duplicate ids within a
    /// namespace collapse; insertion order of first appearance is kept.
    pub fn append(&self, namespace: &str, raw_id: &str) {
        let bucket = self.bucket(namespace);
        lock_unpoisoned(&bucket).insert(raw_id.to_string());
    }

    /// Get or lazily create the bucket for a namespace. The master lock is
    /// released before the bucket itself is touched.
    fn bucket(&self, namespace: &str) -> Bucket {
        let mut buckets = lock_unpoisoned(&self.buckets);
        buckets
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(IndexSet::new())))
            .clone()
    }

    /// Namespaces seen so far, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let buckets = lock_unpoisoned(&self.buckets);
        let mut names: Vec<String> = buckets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Write raw and cleaned partitions for every namespace.
    ///
    /// Raw files keep insertion order; cleaned files are normalized through
    /// the cleaner (`None` skips affix cleaning, as for recipe scans whose
    /// ids are already canonical), deduplicated, and sorted, so they are
    /// byte-identical across runs regardless of archive processing order. If
    /// the configured output cannot be created or written, the whole flush is
    /// retried once under the system temp directory before the error is
    /// surfaced.
    pub fn flush(
        &mut self,
        layout: &OutputLayout,
        cleaner: Option<&IdentifierCleaner>,
    ) -> Result<FlushReport, ScanError> {
        match self.write_partitions(layout, cleaner) {
            Ok(report) => Ok(report),
            Err(_) => self.write_partitions(&layout.fallback(), cleaner),
        }
    }

    fn write_partitions(
        &self,
        layout: &OutputLayout,
        cleaner: Option<&IdentifierCleaner>,
    ) -> Result<FlushReport, ScanError> {
        layout.ensure_dirs()?;

        let buckets = lock_unpoisoned(&self.buckets);
        let mut namespaces: Vec<&String> = buckets.keys().collect();
        namespaces.sort();

        let mut report = FlushReport {
            fallback_dir: layout.fallback_root.clone(),
            ..FlushReport::default()
        };

        for namespace in namespaces {
            let bucket = lock_unpoisoned(&buckets[namespace]);

            let mut raw_file = fs::File::create(layout.raw_path(namespace))?;
            for id in bucket.iter() {
                writeln!(raw_file, "{namespace}:{id}")?;
                report.raw_lines += 1;
            }

            let cleaned: std::collections::BTreeSet<String> = bucket
                .iter()
                .map(|id| match cleaner {
                    Some(cleaner) => format!("{namespace}:{}", cleaner.clean(id)),
                    None => format!("{namespace}:{id}"),
                })
                .collect();
            let mut cleaned_file = fs::File::create(layout.cleaned_path(namespace))?;
            for line in &cleaned {
                writeln!(cleaned_file, "{line}")?;
                report.cleaned_lines += 1;
            }

            report.per_namespace.push((namespace.clone(), cleaned.len()));
            report.namespaces += 1;
        }

        Ok(report)
    }
}

/// Where a flush writes its partitions.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub raw_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    fallback_root: Option<PathBuf>,
}

impl OutputLayout {
    pub fn new(raw_dir: impl Into<PathBuf>, cleaned_dir: impl Into<PathBuf>) -> Self {
        OutputLayout {
            raw_dir: raw_dir.into(),
            cleaned_dir: cleaned_dir.into(),
            fallback_root: None,
        }
    }

    /// Raw and cleaned partitions side by side in one category directory.
    pub fn single(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        OutputLayout::new(dir.clone(), dir)
    }

    pub fn raw_path(&self, namespace: &str) -> PathBuf {
        self.raw_dir.join(format!("{namespace}_raw.txt"))
    }

    pub fn cleaned_path(&self, namespace: &str) -> PathBuf {
        self.cleaned_dir.join(format!("{namespace}.txt"))
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.raw_dir)?;
        fs::create_dir_all(&self.cleaned_dir)
    }

    fn fallback(&self) -> OutputLayout {
        let root = std::env::temp_dir().join("oneenough_output");
        OutputLayout {
            raw_dir: root.clone(),
            cleaned_dir: root.clone(),
            fallback_root: Some(root),
        }
    }
}

/// Outcome of a flush.
#[derive(Debug, Clone, Default)]
pub struct FlushReport {
    pub namespaces: usize,
    pub raw_lines: usize,
    pub cleaned_lines: usize,
    /// Cleaned identifier count per namespace, sorted by namespace.
    pub per_namespace: Vec<(String, usize)>,
    /// Set when output fell back to the system temp directory.
    pub fallback_dir: Option<PathBuf>,
}

/// Fans archives out to a fixed-size worker pool and funnels extracted
/// identifiers into a [`NamespaceSink`].
pub struct ScanCoordinator<'a> {
    filter: &'a EntryFilter,
    options: ScanOptions,
}

impl<'a> ScanCoordinator<'a> {
    pub fn new(filter: &'a EntryFilter, options: ScanOptions) -> Self {
        ScanCoordinator { filter, options }
    }

    /// Process every archive, appending extracted identifiers to the sink.
    ///
    /// `notify` is invoked from worker threads once per archive and must be
    /// thread-safe. Per-archive failures are reported through it and counted
    /// as skipped.
    pub fn scan<F>(
        &self,
        archives: &[PathBuf],
        sink: &NamespaceSink,
        notify: F,
    ) -> Result<ScanReport, ScanError>
    where
        F: Fn(ScanEvent<'_>) + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()?;

        let namespace_filter = self
            .options
            .namespace_filter
            .as_ref()
            .map(|ns| ns.to_lowercase());

        let report = pool.install(|| {
            archives
                .par_iter()
                .map(|path| self.scan_archive(path, sink, namespace_filter.as_deref(), &notify))
                .reduce(ScanReport::default, |a, b| ScanReport {
                    processed: a.processed + b.processed,
                    skipped: a.skipped + b.skipped,
                    extracted: a.extracted + b.extracted,
                    entries_skipped: a.entries_skipped + b.entries_skipped,
                })
        });

        Ok(report)
    }

    fn scan_archive<F>(
        &self,
        path: &Path,
        sink: &NamespaceSink,
        namespace_filter: Option<&str>,
        notify: &F,
    ) -> ScanReport
    where
        F: Fn(ScanEvent<'_>) + Sync,
    {
        let reader = ArchiveReader::new(path);
        let mut extracted = 0usize;
        let mut entries_skipped = 0usize;

        let result = reader.for_each_entry(
            |entry| self.filter.wants_content(entry),
            |entry, content| {
                let idents = match self.filter.extract(entry, content) {
                    Ok(idents) => idents,
                    Err(_) => {
                        entries_skipped += 1;
                        return;
                    }
                };
                for ident in idents {
                    if let Some(only) = namespace_filter {
                        if ident.namespace != only {
                            continue;
                        }
                    }
                    sink.append(&ident.namespace, &ident.id);
                    extracted += 1;
                }
            },
        );

        match result {
            Ok(()) => {
                notify(ScanEvent::Scanned {
                    archive: path,
                    extracted,
                });
                ScanReport {
                    processed: 1,
                    extracted,
                    entries_skipped,
                    ..ScanReport::default()
                }
            }
            Err(error) => {
                notify(ScanEvent::Skipped {
                    archive: path,
                    error: &error,
                });
                ScanReport {
                    skipped: 1,
                    ..ScanReport::default()
                }
            }
        }
    }
}
