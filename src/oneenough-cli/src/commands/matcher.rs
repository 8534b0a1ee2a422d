//! Match command handler: duplicate matching, result-namespace resolution
//! (flag, config, or interactive prompt), and datapack emission.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use oneenough::{Category, DatapackEmitter, DuplicateMatcher, NamespaceSummary};

use crate::cli::MatchCategory;
use crate::config::Config;

pub struct MatchRequest {
    pub category: MatchCategory,
    pub input: PathBuf,
    pub output: PathBuf,
    pub namespace: Option<String>,
    pub no_interactive: bool,
    pub pack_format: u32,
    pub filename: String,
    pub description: Option<String>,
}

pub fn handle(request: MatchRequest) -> Result<()> {
    let config = Config::load()?;

    let matcher = DuplicateMatcher::from_dir(&request.input)
        .with_context(|| format!("Failed to load namespace files from {}", request.input.display()))?;
    if matcher.index().is_empty() {
        bail!("No namespace files found in {}", request.input.display());
    }

    let duplicates = matcher.index().duplicates().count();
    eprintln!("Duplicate identifiers across namespaces: {duplicates}");

    let namespace = match request.namespace.or(config.result_namespace) {
        Some(ns) => ns,
        None if request.no_interactive => {
            bail!("No result namespace supplied; pass --namespace or drop --no-interactive")
        }
        None => prompt_namespace(&matcher)?,
    };

    let rules = matcher.build_rules(Some(&namespace))?;

    let category = datapack_category(request.category);
    let description = request.description.unwrap_or_else(|| {
        format!("Replaces duplicate {} with {namespace} equivalents", category.dir_name())
    });
    let emitter = DatapackEmitter {
        pack_format: request.pack_format,
        description,
        filename: request.filename,
    };
    let replacements_path = emitter.emit(&request.output, category, &rules)?;

    eprintln!(
        "Rules generated: {} (result namespace: {namespace})",
        rules.len()
    );
    eprintln!("Datapack written to {}", replacements_path.display());

    Ok(())
}

fn datapack_category(category: MatchCategory) -> Category {
    match category {
        MatchCategory::Block => Category::Block,
        MatchCategory::Items => Category::Items,
        MatchCategory::Fluid => Category::Fluid,
    }
}

/// Ask the user which namespace duplicates should resolve to, listing
/// candidates ranked by how many duplicates they participate in.
fn prompt_namespace(matcher: &DuplicateMatcher) -> Result<String> {
    let summaries = matcher.index().summaries();
    let mut ranked: Vec<(&String, &NamespaceSummary)> = summaries.iter().collect();
    ranked.sort_by(|a, b| b.1.duplicates.cmp(&a.1.duplicates).then(a.0.cmp(b.0)));

    eprintln!("Available namespaces:");
    for (index, (namespace, summary)) in ranked.iter().enumerate() {
        eprintln!(
            "  {}. {} ({} ids, {} duplicated)",
            index + 1,
            namespace,
            summary.ids,
            summary.duplicates
        );
    }

    let stdin = io::stdin();
    loop {
        eprint!("Result namespace [1-{} or name]: ", ranked.len());
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("No result namespace selected");
        }
        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }

        if let Ok(choice) = answer.parse::<usize>() {
            if (1..=ranked.len()).contains(&choice) {
                return Ok(ranked[choice - 1].0.clone());
            }
            eprintln!("Choice out of range");
            continue;
        }

        let name = answer.to_lowercase();
        if summaries.contains_key(&name) {
            return Ok(name);
        }
        eprintln!("Unknown namespace '{answer}'");
    }
}
