//! Entry filters: deciding which archive entries matter and pulling raw
//! `namespace:id` pairs out of them.
//!
//! The variants form a small closed set chosen once per scan run. Asset
//! filters (block/item/fluid) work from the entry path alone; the recipe
//! filter additionally parses the entry's JSON payload, because recipe
//! outputs can reference objects from other mods.

use thiserror::Error;

use crate::ident::NamespacedId;

/// Extraction failure for an entry the filter matched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry payload is not valid JSON")]
    MalformedJson,
}

/// The base game's namespace. Recipe results in this namespace are discarded
/// by default since they are never mod-added duplicates.
pub const BASE_NAMESPACE: &str = "minecraft";

/// Filter for recipe JSON entries under `data/{ns}/recipe*/`.
#[derive(Debug, Clone)]
pub struct RecipeFilter {
    /// Keep results in the base namespace instead of discarding them.
    pub include_base_namespace: bool,
    /// The namespace treated as base game (normally `minecraft`).
    pub base_namespace: String,
}

impl Default for RecipeFilter {
    fn default() -> Self {
        RecipeFilter {
            include_base_namespace: false,
            base_namespace: BASE_NAMESPACE.to_string(),
        }
    }
}

/// Archive entry filter, one variant per scan category.
#[derive(Debug, Clone)]
pub enum EntryFilter {
    /// `assets/{ns}/{models|textures}/block/...`
    Block,
    /// `assets/{ns}/{models|textures}/item/...`
    Item,
    /// `assets/{ns}/{fluid|fluid_types}/...`
    Fluid,
    /// `data/{ns}/recipe*/{name}.json`, content-bearing
    Recipe(RecipeFilter),
}

impl EntryFilter {
    /// Whether an entry's bytes must be materialized for extraction.
    /// Only recipe JSON needs content; asset paths carry everything.
    pub fn wants_content(&self, path: &str) -> bool {
        match self {
            EntryFilter::Recipe(_) => self.matches(path),
            _ => false,
        }
    }

    /// Whether the entry path is relevant to this filter.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').collect();
        match self {
            EntryFilter::Block => matches_asset(&parts, "block"),
            EntryFilter::Item => matches_asset(&parts, "item"),
            EntryFilter::Fluid => {
                parts.len() >= 3
                    && parts[0] == "assets"
                    && (parts[2] == "fluid" || parts[2] == "fluid_types")
            }
            EntryFilter::Recipe(_) => {
                parts.len() >= 4
                    && parts[0] == "data"
                    && parts[2].starts_with("recipe")
                    && path.ends_with(".json")
            }
        }
    }

    /// Extract identifiers from a matching entry.
    ///
    /// Asset entries yield at most one identifier (namespace from the path,
    /// id from the basename with its extension stripped). Recipe entries can
    /// yield several, one per declared result; a payload that is not valid
    /// JSON is an [`EntryError::MalformedJson`] so callers can count the
    /// entry as skipped.
    pub fn extract(
        &self,
        path: &str,
        content: Option<&[u8]>,
    ) -> Result<Vec<NamespacedId>, EntryError> {
        if !self.matches(path) {
            return Ok(Vec::new());
        }
        let parts: Vec<&str> = path.split('/').collect();

        match self {
            EntryFilter::Block | EntryFilter::Item | EntryFilter::Fluid => {
                let Some(namespace) = parts.get(1) else {
                    return Ok(Vec::new());
                };
                let Some(stem) = parts.last().map(|name| entry_stem(name)) else {
                    return Ok(Vec::new());
                };
                Ok(NamespacedId::new(&namespace.to_lowercase(), &stem.to_lowercase())
                    .map(|ident| vec![ident])
                    .unwrap_or_default())
            }
            EntryFilter::Recipe(recipe) => {
                let Some(bytes) = content else {
                    return Ok(Vec::new());
                };
                recipe.extract_results(bytes)
            }
        }
    }
}

impl RecipeFilter {
    /// Pull result identifiers out of a recipe JSON payload.
    ///
    /// Supported shapes: `"result": "ns:id"`, `"result": {"id": "ns:id"}`,
    /// and `"results": [{"id": "ns:id"}, ...]`. A result without a namespace
    /// prefix belongs to the base game namespace.
    fn extract_results(&self, bytes: &[u8]) -> Result<Vec<NamespacedId>, EntryError> {
        let value = serde_json::from_slice::<serde_json::Value>(bytes)
            .map_err(|_| EntryError::MalformedJson)?;
        let Some(obj) = value.as_object() else {
            return Ok(Vec::new());
        };

        let mut raw_ids: Vec<&str> = Vec::new();
        match obj.get("result") {
            Some(serde_json::Value::String(s)) => raw_ids.push(s),
            Some(serde_json::Value::Object(result)) => {
                if let Some(id) = result.get("id").and_then(|v| v.as_str()) {
                    raw_ids.push(id);
                }
            }
            _ => {}
        }
        if let Some(results) = obj.get("results").and_then(|v| v.as_array()) {
            for entry in results {
                if let Some(id) = entry.get("id").and_then(|v| v.as_str()) {
                    raw_ids.push(id);
                }
            }
        }

        Ok(raw_ids
            .into_iter()
            .filter_map(|raw| self.parse_result(raw))
            .collect())
    }

    fn parse_result(&self, raw: &str) -> Option<NamespacedId> {
        let raw = raw.trim().to_lowercase();
        let (namespace, id) = raw
            .split_once(':')
            .unwrap_or((self.base_namespace.as_str(), raw.as_str()));

        if !self.include_base_namespace && namespace == self.base_namespace {
            return None;
        }
        NamespacedId::new(namespace, id).ok()
    }
}

fn matches_asset(parts: &[&str], kind: &str) -> bool {
    parts.len() >= 4
        && parts[0] == "assets"
        && (parts[2] == "models" || parts[2] == "textures")
        && parts[3] == kind
}

/// Basename with the final extension removed.
fn entry_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_filter_paths() {
        let filter = EntryFilter::Block;
        assert!(filter.matches("assets/modx/models/block/copper_ore.json"));
        assert!(filter.matches("assets/modx/textures/block/copper_ore_top.png"));
        assert!(!filter.matches("assets/modx/textures/item/copper_ingot.png"));
        assert!(!filter.matches("assets/modx/blockstates/copper_ore.json"));
        assert!(!filter.matches("data/modx/recipes/copper.json"));
    }

    #[test]
    fn test_block_filter_extracts_stem() {
        let filter = EntryFilter::Block;
        let idents = filter
            .extract("assets/modx/textures/block/copper_ore_top.png", None)
            .unwrap();
        assert_eq!(idents.len(), 1);
        assert_eq!(idents[0].to_string(), "modx:copper_ore_top");
    }

    #[test]
    fn test_item_filter_paths() {
        let filter = EntryFilter::Item;
        assert!(filter.matches("assets/modx/models/item/gear.json"));
        assert!(!filter.matches("assets/modx/models/block/gear.json"));
    }

    #[test]
    fn test_fluid_filter_paths() {
        let filter = EntryFilter::Fluid;
        assert!(filter.matches("assets/modx/fluid/oil_still.png"));
        assert!(filter.matches("assets/modx/fluid_types/oil.json"));
        assert!(!filter.matches("assets/modx/textures/block/oil.png"));

        let idents = filter.extract("assets/modx/fluid_types/oil.json", None).unwrap();
        assert_eq!(idents[0].to_string(), "modx:oil");
    }

    #[test]
    fn test_recipe_scalar_result() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let idents = filter
            .extract(
                "data/modx/recipes/gear.json",
                Some(br#"{"result": "modx:gear"}"#),
            )
            .unwrap();
        assert_eq!(idents.len(), 1);
        assert_eq!(idents[0].to_string(), "modx:gear");
    }

    #[test]
    fn test_recipe_object_result() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let idents = filter
            .extract(
                "data/modx/recipe/gear.json",
                Some(br#"{"result": {"id": "modx:gear", "count": 2}}"#),
            )
            .unwrap();
        assert_eq!(idents[0].to_string(), "modx:gear");
    }

    #[test]
    fn test_recipe_results_array() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let idents = filter
            .extract(
                "data/modx/recipes/press.json",
                Some(br#"{"results": [{"id": "modx:plate"}, {"id": "mody:scrap"}]}"#),
            )
            .unwrap();
        let strings: Vec<String> = idents.iter().map(ToString::to_string).collect();
        assert_eq!(strings, vec!["modx:plate", "mody:scrap"]);
    }

    #[test]
    fn test_recipe_base_namespace_excluded_by_default() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let idents = filter
            .extract(
                "data/modx/recipes/stick.json",
                Some(br#"{"result": "minecraft:stick"}"#),
            )
            .unwrap();
        assert!(idents.is_empty());

        let filter = EntryFilter::Recipe(RecipeFilter {
            include_base_namespace: true,
            ..RecipeFilter::default()
        });
        let idents = filter
            .extract(
                "data/modx/recipes/stick.json",
                Some(br#"{"result": "minecraft:stick"}"#),
            )
            .unwrap();
        assert_eq!(idents[0].to_string(), "minecraft:stick");
    }

    #[test]
    fn test_recipe_unprefixed_result_is_base_namespace() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let idents = filter
            .extract(
                "data/modx/recipes/stick.json",
                Some(br#"{"result": "stick"}"#),
            )
            .unwrap();
        assert!(idents.is_empty());
    }

    #[test]
    fn test_recipe_malformed_json_is_error() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        let err = filter
            .extract("data/modx/recipes/bad.json", Some(b"{not json"))
            .unwrap_err();
        assert_eq!(err, EntryError::MalformedJson);
    }

    #[test]
    fn test_recipe_wants_content_only_for_matching_paths() {
        let filter = EntryFilter::Recipe(RecipeFilter::default());
        assert!(filter.wants_content("data/modx/recipes/gear.json"));
        assert!(!filter.wants_content("assets/modx/textures/block/gear.png"));
        assert!(!EntryFilter::Block.wants_content("assets/modx/textures/block/gear.png"));
    }
}
