//! Environment overrides for the global toggles

use logic::Settings;
use std::env;

pub const ENV_PLANT_GROWTH_CONTROL: &str = "TERRITORIAL_PLANT_GROWTH_CONTROL";
pub const ENV_ANIMAL_BREEDING_CONTROL: &str = "TERRITORIAL_ANIMAL_BREEDING_CONTROL";
pub const ENV_BIOME_CONTROL: &str = "TERRITORIAL_BIOME_CONTROL";
pub const ENV_COORDINATE_CONTROL: &str = "TERRITORIAL_COORDINATE_CONTROL";
pub const ENV_DEBUG: &str = "TERRITORIAL_DEBUG";
pub const ENV_CACHE_SIZE: &str = "TERRITORIAL_CACHE_SIZE";
/// Rule file location used by the CLI
pub const ENV_CONFIG: &str = "TERRITORIAL_CONFIG";

/// Loose boolean parsing for environment values
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply overrides from an arbitrary variable source
///
/// Values that fail to parse are ignored with a warning.
pub fn apply_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    let flags: [(&str, &mut bool); 5] = [
        (ENV_PLANT_GROWTH_CONTROL, &mut settings.plant_growth_control),
        (ENV_ANIMAL_BREEDING_CONTROL, &mut settings.animal_breeding_control),
        (ENV_BIOME_CONTROL, &mut settings.biome_control),
        (ENV_COORDINATE_CONTROL, &mut settings.coordinate_control),
        (ENV_DEBUG, &mut settings.debug_logging),
    ];

    for (key, slot) in flags {
        if let Some(raw) = lookup(key) {
            match parse_flag(&raw) {
                Some(value) => *slot = value,
                None => tracing::warn!("Ignoring {}={:?}: expected a boolean", key, raw),
            }
        }
    }

    if let Some(raw) = lookup(ENV_CACHE_SIZE) {
        match raw.trim().parse() {
            Ok(capacity) => settings.cache_capacity = capacity,
            Err(_) => tracing::warn!("Ignoring {}={:?}: expected a size", ENV_CACHE_SIZE, raw),
        }
    }

    settings
}

/// Apply overrides from the process environment
pub fn from_env(settings: Settings) -> Settings {
    apply_overrides(settings, |key| env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let settings = apply_overrides(
            Settings::default(),
            lookup(&[
                (ENV_ANIMAL_BREEDING_CONTROL, "off"),
                (ENV_DEBUG, "1"),
                (ENV_CACHE_SIZE, "64"),
            ]),
        );

        assert!(settings.plant_growth_control);
        assert!(!settings.animal_breeding_control);
        assert!(settings.debug_logging);
        assert_eq!(settings.cache_capacity, 64);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let settings = apply_overrides(
            Settings::default(),
            lookup(&[(ENV_BIOME_CONTROL, "maybe"), (ENV_CACHE_SIZE, "-3")]),
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
