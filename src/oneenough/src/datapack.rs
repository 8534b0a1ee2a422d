//! Replacement-rule datapack serialization.
//!
//! Pure formatting: rules become the fixed JSON array schema the game client
//! consumes, plus a `pack.mcmeta` manifest. Field names and the datapack path
//! segment vary by category.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::matcher::MatchRule;

#[derive(Error, Debug)]
pub enum DatapackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Replacement categories understood by the game client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Block,
    Items,
    Fluid,
}

impl Category {
    /// JSON field listing the identifiers to replace.
    pub fn match_field(self) -> &'static str {
        match self {
            Category::Block => "matchBlock",
            Category::Items => "matchItems",
            Category::Fluid => "matchFluid",
        }
    }

    /// JSON field naming the canonical replacement.
    pub fn result_field(self) -> &'static str {
        match self {
            Category::Block => "resultBlock",
            Category::Items => "resultItems",
            Category::Fluid => "resultFluid",
        }
    }

    /// Path segment under `data/` in the emitted datapack.
    pub fn pack_path(self) -> &'static str {
        match self {
            Category::Block => "oeb",
            Category::Items => "oei",
            Category::Fluid => "oef",
        }
    }

    /// Directory name for scan output partitions.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Block => "blocks",
            Category::Items => "items",
            Category::Fluid => "fluids",
        }
    }
}

/// `pack.mcmeta` contents. Write-once; the client only reads it.
#[derive(Debug, Clone, Serialize)]
pub struct PackManifest {
    pub pack_format: u32,
    pub description: String,
}

/// Serializes match rules into the datapack layout:
/// `{out}/data/{oeb|oei|oef}/replacements/{filename}` plus `{out}/pack.mcmeta`.
#[derive(Debug, Clone)]
pub struct DatapackEmitter {
    pub pack_format: u32,
    pub description: String,
    pub filename: String,
}

impl DatapackEmitter {
    pub fn new(description: impl Into<String>) -> Self {
        DatapackEmitter {
            pack_format: 10,
            description: description.into(),
            filename: "replacements.json".to_string(),
        }
    }

    /// Write the replacements file and manifest, returning the path of the
    /// replacements file.
    pub fn emit(
        &self,
        out_dir: &Path,
        category: Category,
        rules: &[MatchRule],
    ) -> Result<PathBuf, DatapackError> {
        let replacements_dir = out_dir
            .join("data")
            .join(category.pack_path())
            .join("replacements");
        fs::create_dir_all(&replacements_dir)?;

        let replacements: Vec<Value> = rules
            .iter()
            .map(|rule| rule_to_json(rule, category))
            .collect();
        let replacements_path = replacements_dir.join(&self.filename);
        fs::write(
            &replacements_path,
            serde_json::to_string_pretty(&replacements)?,
        )?;

        let manifest = json!({
            "pack": PackManifest {
                pack_format: self.pack_format,
                description: self.description.clone(),
            }
        });
        fs::write(
            out_dir.join("pack.mcmeta"),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        Ok(replacements_path)
    }
}

fn rule_to_json(rule: &MatchRule, category: Category) -> Value {
    let mut obj = Map::new();
    obj.insert(
        category.match_field().to_string(),
        Value::Array(
            rule.matches
                .iter()
                .map(|ident| Value::String(ident.to_string()))
                .collect(),
        ),
    );
    obj.insert(
        category.result_field().to_string(),
        Value::String(rule.result.to_string()),
    );
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::NamespacedId;

    fn sample_rule() -> MatchRule {
        MatchRule {
            matches: vec!["modx:dirt".parse::<NamespacedId>().unwrap()],
            result: "minecraft:dirt".parse().unwrap(),
        }
    }

    #[test]
    fn test_emit_layout_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = DatapackEmitter::new("Unified blocks");
        let path = emitter
            .emit(dir.path(), Category::Block, &[sample_rule()])
            .unwrap();

        assert_eq!(
            path,
            dir.path().join("data/oeb/replacements/replacements.json")
        );

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["matchBlock"][0], "modx:dirt");
        assert_eq!(parsed[0]["resultBlock"], "minecraft:dirt");

        let manifest: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("pack.mcmeta")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["pack"]["pack_format"], 10);
        assert_eq!(manifest["pack"]["description"], "Unified blocks");
    }

    #[test]
    fn test_category_fields() {
        assert_eq!(Category::Items.match_field(), "matchItems");
        assert_eq!(Category::Items.result_field(), "resultItems");
        assert_eq!(Category::Items.pack_path(), "oei");
        assert_eq!(Category::Fluid.match_field(), "matchFluid");
        assert_eq!(Category::Fluid.pack_path(), "oef");
        assert_eq!(Category::Block.dir_name(), "blocks");
    }

    #[test]
    fn test_emit_empty_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = DatapackEmitter::new("empty")
            .emit(dir.path(), Category::Fluid, &[])
            .unwrap();

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!([]));
    }
}
