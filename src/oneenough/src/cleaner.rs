//! Convergent identifier normalization.
//!
//! Raw identifiers pulled out of archive paths carry structural affixes that
//! describe texture/model variants rather than distinct objects
//! (`dirt_top_side_stage0.png` is still `dirt`). Cleaning strips known file
//! extensions and affix tokens in repeated passes until a full pass changes
//! nothing. Each pass can only shorten the string, so the loop always reaches
//! a fixed point; the iteration cap is a backstop, not the termination
//! condition.

/// Affix tokens in match order, grouped by semantic category. Order matters:
/// a pass tries every token once, and later tokens see the string as earlier
/// tokens left it.
const AFFIXES: &[&str] = &[
    // orientation: faces
    "_bottom", "_top", "_front", "_back", "_left", "_right", "_side", "_reverse", "_base",
    // orientation: corners
    "_corner", "_inner", "_outer", "_noside", "_nosides", "_inside",
    // orientation: vertical
    "_up", "_down", "_upper", "_lower", "_middle", "_mid", "_center", "_centered", "_main",
    "_full",
    // orientation: horizontal
    "_horizontal", "_ew", "_ns", "_x", "_z",
    // orientation: ends
    "_end", "_post", "_even", "_odd", "_foot", "_head", "_far", "_gate_wall",
    // orientation: size
    "_single", "_double", "_tall", "_plus", "_adv",
    // binary states
    "_open", "_opened", "_close", "_closed", "_on", "_off", "_pressed", "_extended",
    "_connected", "_occupied", "_empty", "_filled", "_drained", "_activated", "_lit", "_weak",
    "_supported", "_support", "_moist", "_unused", "_alt", "_wet", "_decorated", "_tied",
    "_extrudes", "_garnish", "_leftover", "_active", "_inactive", "_monster", "_player",
    "_emissive", "_body", "_bone", "_stabilized", "_unlinked",
    // progression stages
    "_new", "_old", "_one", "_two", "_three", "_four", "_five",
    "_0", "_1", "_2", "_3", "_4", "_5", "_6", "_7", "_8", "_9", "_10",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
    "_age0", "_age1", "_age2", "_age3", "_age4", "_age5", "_age6", "_age7", "_age8", "_age9",
    "_age10", "_stage", "_stage0", "_stage1", "_stage2", "_stage3", "_stage4", "_stage5",
    "_stage6", "_stage7", "_stage8", "_stage9", "_stage10", "_slice0", "_slice1", "_slice2",
    "_slice3", "_slice4", "_slice5", "_slice6", "_slice7", "_slice8", "_slice9", "_slice10",
    "_level", "_level0", "_level1", "_level2", "_level3", "_level4", "_level5", "_level6",
    "_level7", "_level8", "_level9", "_level10",
    // contents
    "_honey", "_water",
    // inventory forms
    "_inventory", "_slot",
    // connected-texture metadata
    "-ctm",
    // leftovers
    "_with", "_t",
];

/// Extensions stripped for block/item scans.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".png", ".jpeg", ".jpg", ".gif"];

/// Extensions stripped for fluid scans; fluid definitions also live in JSON.
pub const FLUID_EXTENSIONS: &[&str] = &[".png", ".jpeg", ".jpg", ".gif", ".json"];

/// Iteration cap; convergence normally lands within a handful of passes.
const MAX_ITERATIONS: usize = 100;

/// Affix-stripping normalizer.
///
/// Cleaning is idempotent (re-cleaning a cleaned id is a no-op) and never
/// returns an empty string for non-empty input.
#[derive(Debug, Clone)]
pub struct IdentifierCleaner {
    extensions: &'static [&'static str],
}

impl IdentifierCleaner {
    /// Cleaner with the default (block/item) extension set.
    pub fn new() -> Self {
        IdentifierCleaner {
            extensions: DEFAULT_EXTENSIONS,
        }
    }

    /// Cleaner for fluid identifiers.
    pub fn fluid() -> Self {
        IdentifierCleaner {
            extensions: FLUID_EXTENSIONS,
        }
    }

    /// Normalize a raw identifier fragment.
    ///
    /// If stripping would reduce the identifier to nothing, the value after
    /// extension stripping is kept instead; if even that is empty, the input
    /// is returned unchanged.
    pub fn clean(&self, raw: &str) -> String {
        let base = self.strip_extensions(raw);

        let mut current = base;
        for _ in 0..MAX_ITERATIONS {
            let next = self.pass(current);
            if next == current {
                break;
            }
            current = next;
        }

        if !current.is_empty() {
            current.to_string()
        } else if !base.is_empty() {
            base.to_string()
        } else {
            raw.to_string()
        }
    }

    /// One cleaning pass: try every extension, then every affix, in order.
    fn pass<'a>(&self, mut stem: &'a str) -> &'a str {
        stem = self.strip_extensions(stem);
        for affix in AFFIXES {
            if let Some(shorter) = stem.strip_suffix(affix) {
                stem = shorter;
            }
        }
        stem
    }

    fn strip_extensions<'a>(&self, mut stem: &'a str) -> &'a str {
        for ext in self.extensions {
            if let Some(shorter) = stem.strip_suffix(ext) {
                stem = shorter;
            }
        }
        stem
    }
}

impl Default for IdentifierCleaner {
    fn default() -> Self {
        IdentifierCleaner::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_affixes_unwind() {
        let cleaner = IdentifierCleaner::new();
        assert_eq!(cleaner.clean("dirt_top_side_stage0.png"), "dirt");
    }

    #[test]
    fn test_plain_id_unchanged() {
        let cleaner = IdentifierCleaner::new();
        assert_eq!(cleaner.clean("copper_ore"), "copper_ore");
        assert_eq!(cleaner.clean("stone"), "stone");
    }

    #[test]
    fn test_extension_only() {
        let cleaner = IdentifierCleaner::new();
        assert_eq!(cleaner.clean("gravel.png"), "gravel");
        assert_eq!(cleaner.clean("gravel.jpeg"), "gravel");
    }

    #[test]
    fn test_fluid_extension_set() {
        let cleaner = IdentifierCleaner::fluid();
        assert_eq!(cleaner.clean("oil_flow.json"), "oil_flow");
        // .json stays for the default set
        assert_eq!(IdentifierCleaner::new().clean("oil.json"), "oil.json");
    }

    #[test]
    fn test_never_empty() {
        let cleaner = IdentifierCleaner::new();
        // pure affix collapses to itself after extension stripping
        assert_eq!(cleaner.clean("_top"), "_top");
        assert_eq!(cleaner.clean("0"), "0");
        // pure extension falls back to the raw input
        assert_eq!(cleaner.clean(".png"), ".png");
    }

    #[test]
    fn test_idempotent() {
        let cleaner = IdentifierCleaner::new();
        let samples = [
            "dirt_top_side_stage0.png",
            "oak_door_bottom_left_open",
            "campfire_fire_lit",
            "crop_stage3",
            "furnace_front_on",
            "copper_ore",
            "_top",
            "0",
            "cauldron_level2_inventory",
        ];
        for raw in samples {
            let once = cleaner.clean(raw);
            let twice = cleaner.clean(&once);
            assert_eq!(once, twice, "clean not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_monotone_shortening() {
        let cleaner = IdentifierCleaner::new();
        let samples = ["dirt_top_side_stage0.png", "anvil_base", "rail_corner_on"];
        for raw in samples {
            assert!(cleaner.clean(raw).len() <= raw.len());
        }
    }
}
