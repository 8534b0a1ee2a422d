//! Cross-namespace duplicate matching and replacement-rule generation.
//!
//! The matcher loads cleaned per-namespace identifier files, inverts them
//! into an id-to-namespaces index, and turns every id claimed by two or more
//! namespaces into a replacement rule pointing at a chosen result namespace.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::ident::NamespacedId;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no result namespace supplied and none could be derived")]
    AmbiguousNamespace,

    #[error("rule for '{result}' would replace the identifier with itself")]
    SelfReplacement { result: String },
}

/// One replacement rule: every identifier in `matches` is replaced by
/// `result` when the datapack is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    pub matches: Vec<NamespacedId>,
    pub result: NamespacedId,
}

/// Per-namespace statistics, used by callers to present a namespace choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSummary {
    /// Identifiers the namespace contains.
    pub ids: usize,
    /// How many of them also exist in at least one other namespace.
    pub duplicates: usize,
}

/// Reverse index: identifier to the set of namespaces that contain it.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    by_id: BTreeMap<String, BTreeSet<String>>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        ReverseIndex::default()
    }

    pub fn insert(&mut self, namespace: &str, id: &str) {
        self.by_id
            .entry(id.to_string())
            .or_default()
            .insert(namespace.to_string());
    }

    /// Load every cleaned `*.txt` file in a directory. Lines are `ns:id` or
    /// bare `id` (the file stem supplies the namespace); raw partition files
    /// (`*_raw.txt`) and malformed lines are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, MatchError> {
        let mut index = ReverseIndex::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if path.extension().and_then(|e| e.to_str()) != Some("txt")
                || stem.ends_with("_raw")
            {
                continue;
            }

            let contents = fs::read_to_string(&path)?;
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (namespace, id) = match line.split_once(':') {
                    Some(pair) => pair,
                    None => (stem, line),
                };
                if let Ok(ident) =
                    NamespacedId::new(&namespace.to_lowercase(), &id.to_lowercase())
                {
                    index.insert(&ident.namespace, &ident.id);
                }
            }
        }

        Ok(index)
    }

    /// Identifiers present in two or more namespaces.
    pub fn duplicates(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.by_id.iter().filter(|(_, spaces)| spaces.len() >= 2)
    }

    /// Namespace statistics across the whole index.
    pub fn summaries(&self) -> BTreeMap<String, NamespaceSummary> {
        let mut summaries: BTreeMap<String, NamespaceSummary> = BTreeMap::new();
        for spaces in self.by_id.values() {
            let duplicated = spaces.len() >= 2;
            for namespace in spaces {
                let summary = summaries.entry(namespace.clone()).or_default();
                summary.ids += 1;
                if duplicated {
                    summary.duplicates += 1;
                }
            }
        }
        summaries
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Builds replacement rules from a [`ReverseIndex`].
pub struct DuplicateMatcher {
    index: ReverseIndex,
}

impl DuplicateMatcher {
    pub fn new(index: ReverseIndex) -> Self {
        DuplicateMatcher { index }
    }

    /// Load cleaned namespace files from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, MatchError> {
        Ok(DuplicateMatcher::new(ReverseIndex::load_dir(dir)?))
    }

    pub fn index(&self) -> &ReverseIndex {
        &self.index
    }

    /// Build one rule per duplicate identifier present in the result
    /// namespace; duplicates absent from it cannot be resolved there and are
    /// skipped. A result namespace absent from every file yields zero rules,
    /// which is a successful outcome. Rules come back sorted by result
    /// identifier, each match list sorted as well.
    pub fn build_rules(
        &self,
        result_namespace: Option<&str>,
    ) -> Result<Vec<MatchRule>, MatchError> {
        let result_namespace = result_namespace
            .ok_or(MatchError::AmbiguousNamespace)?
            .to_lowercase();

        let mut rules = Vec::new();
        for (id, spaces) in self.index.duplicates() {
            if !spaces.contains(&result_namespace) {
                continue;
            }

            let result = match NamespacedId::new(&result_namespace, id) {
                Ok(ident) => ident,
                Err(_) => continue,
            };
            let matches: Vec<NamespacedId> = spaces
                .iter()
                .filter(|ns| **ns != result_namespace)
                .filter_map(|ns| NamespacedId::new(ns, id).ok())
                .collect();

            if matches.contains(&result) {
                return Err(MatchError::SelfReplacement {
                    result: result.canonical(),
                });
            }

            rules.push(MatchRule { matches, result });
        }

        rules.sort_by(|a, b| a.result.cmp(&b.result));
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_namespace_file(dir: &Path, name: &str, lines: &[&str]) {
        let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_duplicate_rule_generation() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "minecraft.txt", &["minecraft:dirt", "minecraft:stone"]);
        write_namespace_file(dir.path(), "modx.txt", &["modx:dirt", "modx:copper_ore"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        let rules = matcher.build_rules(Some("minecraft")).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].result.to_string(), "minecraft:dirt");
        let matches: Vec<String> = rules[0].matches.iter().map(ToString::to_string).collect();
        assert_eq!(matches, vec!["modx:dirt"]);
    }

    #[test]
    fn test_bare_lines_use_file_stem_namespace() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "minecraft.txt", &["dirt"]);
        write_namespace_file(dir.path(), "modx.txt", &["dirt"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        let rules = matcher.build_rules(Some("minecraft")).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].matches[0].to_string(), "modx:dirt");
    }

    #[test]
    fn test_raw_partition_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "modx.txt", &["modx:dirt"]);
        write_namespace_file(dir.path(), "modx_raw.txt", &["modx:dirt_top_side"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        let summaries = matcher.index().summaries();
        assert_eq!(summaries["modx"].ids, 1);
    }

    #[test]
    fn test_missing_result_namespace_is_ambiguous() {
        let matcher = DuplicateMatcher::new(ReverseIndex::new());
        assert!(matches!(
            matcher.build_rules(None),
            Err(MatchError::AmbiguousNamespace)
        ));
    }

    #[test]
    fn test_absent_result_namespace_yields_zero_rules() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "minecraft.txt", &["minecraft:dirt"]);
        write_namespace_file(dir.path(), "mody.txt", &["mody:dirt"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        let rules = matcher.build_rules(Some("modx")).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_duplicates_not_in_result_namespace_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "minecraft.txt", &["minecraft:stone"]);
        write_namespace_file(dir.path(), "modx.txt", &["modx:dirt"]);
        write_namespace_file(dir.path(), "mody.txt", &["mody:dirt"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        // dirt is duplicated across modx/mody but absent from minecraft
        let rules = matcher.build_rules(Some("minecraft")).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_rules_never_self_replace() {
        let dir = tempfile::tempdir().unwrap();
        write_namespace_file(dir.path(), "minecraft.txt", &["minecraft:dirt"]);
        write_namespace_file(dir.path(), "modx.txt", &["modx:dirt"]);

        let matcher = DuplicateMatcher::from_dir(dir.path()).unwrap();
        for rule in matcher.build_rules(Some("minecraft")).unwrap() {
            assert!(!rule.matches.contains(&rule.result));
        }
    }

    #[test]
    fn test_summaries_count_duplicates() {
        let mut index = ReverseIndex::new();
        index.insert("minecraft", "dirt");
        index.insert("modx", "dirt");
        index.insert("modx", "copper_ore");

        let summaries = index.summaries();
        assert_eq!(summaries["modx"].ids, 2);
        assert_eq!(summaries["modx"].duplicates, 1);
        assert_eq!(summaries["minecraft"].duplicates, 1);
    }

    #[test]
    fn test_rules_sorted_by_result() {
        let mut index = ReverseIndex::new();
        for id in ["zinc", "dirt", "copper"] {
            index.insert("minecraft", id);
            index.insert("modx", id);
        }

        let rules = DuplicateMatcher::new(index)
            .build_rules(Some("minecraft"))
            .unwrap();
        let results: Vec<String> = rules.iter().map(|r| r.result.to_string()).collect();
        assert_eq!(
            results,
            vec!["minecraft:copper", "minecraft:dirt", "minecraft:zinc"]
        );
    }
}
