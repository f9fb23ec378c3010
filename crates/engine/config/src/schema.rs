//! On-disk shape of a single rule entry

use logic::{Category, Criteria, Rule};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Integer(i64),
    Float(f64),
}

/// Coordinate bound given as an integer or a float; floats truncate toward zero
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(Option::<Number>::deserialize(deserializer)?.map(|n| match n {
        Number::Integer(i) => i.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
        Number::Float(f) => f as i32,
    }))
}

/// One `[[plant_growth.rules]]` or `[[animal_breeding.rules]]` table
///
/// Every field is optional. `enabled` and `allow` default to `true`, lists to
/// empty. Coordinate bounds may be written as floats. The legacy single
/// `dimension` key is folded into the whitelist unless an explicit
/// `dimensions` list is present; an empty `dimension` means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuleEntry {
    pub enabled: Option<bool>,
    pub allow: Option<bool>,
    pub biomes: Vec<String>,
    pub temperature_min: Option<f32>,
    pub temperature_max: Option<f32>,
    #[serde(deserialize_with = "coordinate")]
    pub x_min: Option<i32>,
    #[serde(deserialize_with = "coordinate")]
    pub x_max: Option<i32>,
    #[serde(deserialize_with = "coordinate")]
    pub y_min: Option<i32>,
    #[serde(deserialize_with = "coordinate")]
    pub y_max: Option<i32>,
    #[serde(deserialize_with = "coordinate")]
    pub z_min: Option<i32>,
    #[serde(deserialize_with = "coordinate")]
    pub z_max: Option<i32>,
    pub dimension: Option<String>,
    pub dimensions: Option<Vec<String>>,
    pub dimensions_blacklist: Vec<String>,
    pub crop_types: Vec<String>,
    pub animal_types: Vec<String>,
}

impl RuleEntry {
    /// Effective dimension whitelist
    pub fn whitelist(&self) -> Vec<String> {
        match (&self.dimensions, &self.dimension) {
            (Some(list), _) => list.clone(),
            (None, Some(single)) if !single.is_empty() => vec![single.clone()],
            (None, _) => Vec::new(),
        }
    }

    /// Build an unvalidated rule of the given category
    ///
    /// The pattern field of the other category is ignored.
    pub fn into_rule(self, category: Category) -> Rule {
        let criteria = Criteria::new()
            .with_enabled(self.enabled.unwrap_or(true))
            .with_allow(self.allow.unwrap_or(true))
            .with_biomes(self.biomes.iter().cloned())
            .with_temperature(self.temperature_min, self.temperature_max)
            .with_x_range(self.x_min, self.x_max)
            .with_y_range(self.y_min, self.y_max)
            .with_z_range(self.z_min, self.z_max)
            .with_dimensions(self.whitelist())
            .with_dimensions_blacklist(self.dimensions_blacklist);

        match category {
            Category::Growth => Rule::growth(criteria, self.crop_types),
            Category::Breeding => Rule::breeding(criteria, self.animal_types),
        }
    }
}
