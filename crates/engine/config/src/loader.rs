//! Rule file loading

use crate::defaults::{DEFAULT_RULES_FILE, DEFAULT_RULES_PATH};
use crate::schema::RuleEntry;
use crate::settings;
use crate::{ConfigError, Result};
use logic::{Category, PolicySnapshot, RuleSet, Settings};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Rule counts after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub growth_rules: usize,
    pub breeding_rules: usize,
    /// Entries that failed to parse or validate
    pub rejected: usize,
}

impl LoadSummary {
    pub fn of(rules: &RuleSet) -> Self {
        LoadSummary {
            growth_rules: rules.rules(Category::Growth).len(),
            breeding_rules: rules.rules(Category::Breeding).len(),
            rejected: rules.rejected(),
        }
    }

    fn log(&self) {
        tracing::info!("Configuration summary:");
        tracing::info!("  Plant growth rules: {}", self.growth_rules);
        tracing::info!("  Animal breeding rules: {}", self.breeding_rules);
        if self.rejected > 0 {
            tracing::warn!("  Invalid rules skipped: {}", self.rejected);
        }
        if self.growth_rules == 0 && self.breeding_rules == 0 {
            tracing::info!("  No rules configured - all events allowed by default");
        }
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} plant growth rules, {} animal breeding rules, {} invalid",
            self.growth_rules, self.breeding_rules, self.rejected
        )
    }
}

/// Parse one category section (`[[plant_growth.rules]]` etc.) into `rules`
fn parse_section(table: &Table, category: Category, rules: &mut RuleSet) {
    let Some(section) = table.get(category.section()) else {
        return;
    };

    let entries = match section.get("rules") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!("Ignoring [{}]: `rules` must be an array of tables", category);
            return;
        }
        None => return,
    };

    for (i, entry) in entries.iter().enumerate() {
        match entry.clone().try_into::<RuleEntry>() {
            Ok(entry) => {
                rules.push(entry.into_rule(category));
            }
            Err(err) => {
                tracing::warn!("Error parsing {} rule #{}: {}", category, i + 1, err);
                rules.record_rejected();
            }
        }
    }
}

/// Parse rule file content into a snapshot, without environment overrides
pub fn parse_rules(content: &str, path: &Path) -> Result<PolicySnapshot> {
    let table: Table = content.parse().map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = match table.get("settings") {
        Some(value) => value
            .clone()
            .try_into::<Settings>()
            .map_err(ConfigError::Settings)?,
        None => Settings::default(),
    };

    let mut rules = RuleSet::new();
    for category in Category::ALL {
        parse_section(&table, category, &mut rules);
    }

    tracing::debug!(
        "Parsed {} plant growth rules, {} animal breeding rules",
        rules.rules(Category::Growth).len(),
        rules.rules(Category::Breeding).len()
    );

    Ok(PolicySnapshot::new(settings, rules))
}

/// Loads the rule file at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    env_overrides: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        ConfigLoader::new(DEFAULT_RULES_PATH)
    }
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigLoader {
            path: path.into(),
            env_overrides: true,
        }
    }

    /// Use `TERRITORIAL_CONFIG` if set, else the default location
    pub fn from_env() -> Self {
        std::env::var(settings::ENV_CONFIG)
            .map(ConfigLoader::new)
            .unwrap_or_default()
    }

    /// Whether `TERRITORIAL_*` variables override the file's settings
    pub fn with_env_overrides(mut self, enabled: bool) -> Self {
        self.env_overrides = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn finish_settings(&self, settings: Settings) -> Settings {
        if self.env_overrides {
            settings::from_env(settings)
        } else {
            settings
        }
    }

    /// Write the default template if no file exists; returns whether it did
    pub fn ensure_default(&self) -> Result<bool> {
        if self.path.exists() {
            tracing::info!("Found existing configuration file: {}", self.path.display());
            return Ok(false);
        }

        tracing::info!("Creating default configuration at: {}", self.path.display());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(&self.path, DEFAULT_RULES_FILE).map_err(|e| ConfigError::io(&self.path, e))?;
        Ok(true)
    }

    /// Read and parse the file, without creating it
    pub fn read(&self) -> Result<PolicySnapshot> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| ConfigError::io(&self.path, e))?;
        let snapshot = parse_rules(&content, &self.path)?;

        Ok(PolicySnapshot::new(
            self.finish_settings(snapshot.settings),
            snapshot.rules,
        ))
    }

    /// Create the file if missing, then read it
    pub fn load(&self) -> Result<PolicySnapshot> {
        tracing::info!("Loading Territorial configuration...");
        self.ensure_default()?;

        let snapshot = self.read()?;
        LoadSummary::of(&snapshot.rules).log();
        Ok(snapshot)
    }

    /// Like [`ConfigLoader::load`], but any failure yields an empty rule set
    pub fn load_or_permissive(&self) -> PolicySnapshot {
        match self.load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!("Failed to load Territorial configuration: {}", err);
                tracing::warn!("Using default settings (all events allowed)");
                PolicySnapshot::new(self.finish_settings(Settings::default()), RuleSet::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> PolicySnapshot {
        parse_rules(content, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_default_template_has_no_rules() {
        let snapshot = parse(DEFAULT_RULES_FILE);
        assert!(snapshot.rules.is_empty());
        assert_eq!(snapshot.rules.rejected(), 0);
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_sections_and_order() {
        let snapshot = parse(
            r#"
            [[plant_growth.rules]]
            crop_types = ["minecraft:wheat"]
            allow = false

            [[animal_breeding.rules]]
            animal_types = ["minecraft:cow"]

            [[plant_growth.rules]]
            biomes = ["minecraft:desert"]
            "#,
        );

        let growth = snapshot.rules.rules(Category::Growth);
        assert_eq!(growth.len(), 2);
        assert!(!growth[0].allows());
        assert_eq!(growth[1].criteria().biomes(), ["minecraft:desert"]);
        assert_eq!(snapshot.rules.rules(Category::Breeding).len(), 1);
    }

    #[test]
    fn test_bad_entries_counted_and_skipped() {
        let snapshot = parse(
            r#"
            [[plant_growth.rules]]
            x_min = 10
            x_max = 5

            [[plant_growth.rules]]
            biomes = "minecraft:desert"

            [[plant_growth.rules]]
            dimensions = ["minecraft:overworld"]
            dimensions_blacklist = ["minecraft:the_end"]

            [[plant_growth.rules]]
            crop_types = ["minecraft:carrots"]
            "#,
        );

        assert_eq!(snapshot.rules.len(), 1);
        assert_eq!(snapshot.rules.rejected(), 3);
        assert_eq!(
            LoadSummary::of(&snapshot.rules).to_string(),
            "1 plant growth rules, 0 animal breeding rules, 3 invalid"
        );
    }

    #[test]
    fn test_settings_table() {
        let snapshot = parse(
            r#"
            [settings]
            biome_control = false
            cache_capacity = 16
            "#,
        );
        assert!(!snapshot.settings.biome_control);
        assert!(snapshot.settings.coordinate_control);
        assert_eq!(snapshot.settings.cache_capacity, 16);
    }

    #[test]
    fn test_bad_settings_rejected() {
        let result = parse_rules("[settings]\ndebug_logging = \"yes\"", Path::new("x.toml"));
        assert!(matches!(result, Err(ConfigError::Settings(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = parse_rules("[[plant_growth.rules]\n", Path::new("x.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
