//! Static biome tables standing in for a live world

use crate::{ConfigError, Result};
use logic::{BiomeInfo, BiomeRegistry, ResourceId};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Climate tags derived from temperature for the built-in table
const HOT_TAG: &str = "minecraft:is_hot";
const COLD_TAG: &str = "minecraft:is_cold";
const HOT_THRESHOLD: f32 = 1.5;
const COLD_THRESHOLD: f32 = 0.2;

/// Vanilla biomes: id, base temperature, group tags
const VANILLA_BIOMES: &[(&str, f32, &[&str])] = &[
    ("plains", 0.8, &["is_overworld"]),
    ("sunflower_plains", 0.8, &["is_overworld"]),
    ("snowy_plains", 0.0, &["is_overworld"]),
    ("ice_spikes", 0.0, &["is_overworld"]),
    ("desert", 2.0, &["is_overworld"]),
    ("swamp", 0.8, &["is_overworld"]),
    ("mangrove_swamp", 0.8, &["is_overworld"]),
    ("forest", 0.7, &["is_overworld", "is_forest"]),
    ("flower_forest", 0.7, &["is_overworld", "is_forest"]),
    ("birch_forest", 0.6, &["is_overworld", "is_forest"]),
    ("dark_forest", 0.7, &["is_overworld", "is_forest"]),
    ("old_growth_birch_forest", 0.6, &["is_overworld", "is_forest"]),
    ("old_growth_pine_taiga", 0.3, &["is_overworld", "is_forest", "is_taiga"]),
    ("old_growth_spruce_taiga", 0.25, &["is_overworld", "is_forest", "is_taiga"]),
    ("taiga", 0.25, &["is_overworld", "is_forest", "is_taiga"]),
    ("snowy_taiga", -0.5, &["is_overworld", "is_forest", "is_taiga"]),
    ("savanna", 2.0, &["is_overworld", "is_savanna"]),
    ("savanna_plateau", 2.0, &["is_overworld", "is_savanna"]),
    ("windswept_savanna", 2.0, &["is_overworld", "is_savanna"]),
    ("windswept_hills", 0.2, &["is_overworld", "is_hill"]),
    ("windswept_gravelly_hills", 0.2, &["is_overworld", "is_hill"]),
    ("windswept_forest", 0.2, &["is_overworld", "is_hill", "is_forest"]),
    ("jungle", 0.95, &["is_overworld", "is_jungle"]),
    ("sparse_jungle", 0.95, &["is_overworld", "is_jungle"]),
    ("bamboo_jungle", 0.95, &["is_overworld", "is_jungle"]),
    ("badlands", 2.0, &["is_overworld", "is_badlands"]),
    ("eroded_badlands", 2.0, &["is_overworld", "is_badlands"]),
    ("wooded_badlands", 2.0, &["is_overworld", "is_badlands"]),
    ("meadow", 0.5, &["is_overworld", "is_mountain"]),
    ("cherry_grove", 0.5, &["is_overworld", "is_mountain"]),
    ("grove", -0.2, &["is_overworld", "is_mountain"]),
    ("snowy_slopes", -0.3, &["is_overworld", "is_mountain"]),
    ("frozen_peaks", -0.7, &["is_overworld", "is_mountain"]),
    ("jagged_peaks", -0.7, &["is_overworld", "is_mountain"]),
    ("stony_peaks", 1.0, &["is_overworld", "is_mountain"]),
    ("river", 0.5, &["is_overworld", "is_river"]),
    ("frozen_river", 0.0, &["is_overworld", "is_river"]),
    ("beach", 0.8, &["is_overworld", "is_beach"]),
    ("snowy_beach", 0.05, &["is_overworld", "is_beach"]),
    ("stony_shore", 0.2, &["is_overworld"]),
    ("warm_ocean", 0.5, &["is_overworld", "is_ocean"]),
    ("lukewarm_ocean", 0.5, &["is_overworld", "is_ocean"]),
    ("deep_lukewarm_ocean", 0.5, &["is_overworld", "is_ocean", "is_deep_ocean"]),
    ("ocean", 0.5, &["is_overworld", "is_ocean"]),
    ("deep_ocean", 0.5, &["is_overworld", "is_ocean", "is_deep_ocean"]),
    ("cold_ocean", 0.5, &["is_overworld", "is_ocean"]),
    ("deep_cold_ocean", 0.5, &["is_overworld", "is_ocean", "is_deep_ocean"]),
    ("frozen_ocean", 0.0, &["is_overworld", "is_ocean"]),
    ("deep_frozen_ocean", 0.5, &["is_overworld", "is_ocean", "is_deep_ocean"]),
    ("mushroom_fields", 0.9, &["is_overworld"]),
    ("dripstone_caves", 0.8, &["is_overworld"]),
    ("lush_caves", 0.5, &["is_overworld"]),
    ("deep_dark", 0.8, &["is_overworld"]),
    ("nether_wastes", 2.0, &["is_nether"]),
    ("warped_forest", 2.0, &["is_nether"]),
    ("crimson_forest", 2.0, &["is_nether"]),
    ("soul_sand_valley", 2.0, &["is_nether"]),
    ("basalt_deltas", 2.0, &["is_nether"]),
    ("the_end", 0.5, &["is_end"]),
    ("end_highlands", 0.5, &["is_end"]),
    ("end_midlands", 0.5, &["is_end"]),
    ("small_end_islands", 0.5, &["is_end"]),
    ("end_barrens", 0.5, &["is_end"]),
    ("the_void", 0.5, &[]),
];

fn vanilla_tag(path: &str) -> Result<ResourceId> {
    ResourceId::parse(path).map_err(|e| ConfigError::Biome {
        id: path.to_string(),
        reason: e.to_string(),
    })
}

/// Built-in table of vanilla biomes
///
/// Besides the group tags, biomes at or above temperature 1.5 carry
/// `minecraft:is_hot` and those at or below 0.2 carry `minecraft:is_cold`.
pub fn vanilla_biomes() -> BiomeRegistry {
    let mut registry = BiomeRegistry::new();

    for (path, temperature, groups) in VANILLA_BIOMES {
        let mut tags: Vec<ResourceId> = groups.iter().filter_map(|g| vanilla_tag(g).ok()).collect();
        if *temperature >= HOT_THRESHOLD {
            tags.extend(vanilla_tag(HOT_TAG).ok());
        }
        if *temperature <= COLD_THRESHOLD {
            tags.extend(vanilla_tag(COLD_TAG).ok());
        }

        registry.insert(
            format!("minecraft:{path}"),
            BiomeInfo {
                temperature: *temperature,
                tags,
            },
        );
    }

    registry
}

#[derive(Debug, Deserialize)]
struct BiomeEntry {
    id: String,
    temperature: f32,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BiomeFile {
    #[serde(default)]
    biomes: Vec<BiomeEntry>,
}

/// Parse a `[[biomes]]` table
///
/// Ids without a namespace are stored under `minecraft:`. Tags may be written
/// with or without a leading `#`.
pub fn parse_biomes(content: &str, path: &Path) -> Result<BiomeRegistry> {
    let file: BiomeFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut registry = BiomeRegistry::new();
    for entry in file.biomes {
        let invalid = |reason: String| ConfigError::Biome {
            id: entry.id.clone(),
            reason,
        };

        let id = ResourceId::parse(&entry.id).map_err(|e| invalid(e.to_string()))?;
        let tags = entry
            .tags
            .iter()
            .map(|tag| ResourceId::parse(tag.trim_start_matches('#')))
            .collect::<logic::Result<Vec<_>>>()
            .map_err(|e| invalid(e.to_string()))?;

        registry.insert(
            id.to_string(),
            BiomeInfo {
                temperature: entry.temperature,
                tags,
            },
        );
    }

    tracing::debug!("Loaded {} biomes from {}", registry.len(), path.display());
    Ok(registry)
}

/// Read a biome table from disk
pub fn load_biomes(path: impl AsRef<Path>) -> Result<BiomeRegistry> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse_biomes(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic::BiomeLookup;

    #[test]
    fn test_vanilla_climate_tags() {
        let biomes = vanilla_biomes();
        let hot = ResourceId::parse(HOT_TAG).unwrap();
        let cold = ResourceId::parse(COLD_TAG).unwrap();

        assert_eq!(biomes.temperature("minecraft:desert"), Some(2.0));
        assert!(biomes.has_tag("minecraft:desert", &hot));
        assert!(biomes.has_tag("minecraft:nether_wastes", &hot));
        assert!(!biomes.has_tag("minecraft:plains", &hot));
        assert!(biomes.has_tag("minecraft:snowy_plains", &cold));
        assert!(biomes.has_tag(
            "minecraft:taiga",
            &ResourceId::parse("minecraft:is_taiga").unwrap()
        ));
    }

    #[test]
    fn test_parse_biomes() {
        let biomes = parse_biomes(
            r##"
            [[biomes]]
            id = "terralith:volcanic_peaks"
            temperature = 1.8
            tags = ["#c:is_hot", "minecraft:is_mountain"]

            [[biomes]]
            id = "glacier"
            temperature = -0.8
            "##,
            Path::new("biomes.toml"),
        )
        .unwrap();

        assert_eq!(biomes.len(), 2);
        assert_eq!(biomes.temperature("minecraft:glacier"), Some(-0.8));
        assert!(biomes.has_tag(
            "terralith:volcanic_peaks",
            &ResourceId::parse("c:is_hot").unwrap()
        ));
    }

    #[test]
    fn test_parse_biomes_rejects_bad_tag() {
        let result = parse_biomes(
            r#"
            [[biomes]]
            id = "minecraft:plains"
            temperature = 0.8
            tags = ["Not A Tag"]
            "#,
            Path::new("biomes.toml"),
        );
        assert!(matches!(result, Err(ConfigError::Biome { .. })));
    }
}
