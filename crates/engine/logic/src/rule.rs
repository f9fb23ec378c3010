//! Rule definition, validation and specificity scoring

use crate::id::is_wildcard;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of event a rule governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Crop and plant growth ticks
    #[serde(rename = "plant_growth")]
    Growth,
    /// Animal breeding
    #[serde(rename = "animal_breeding")]
    Breeding,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Growth, Category::Breeding];

    /// Name of the rule-file section holding this category's rules
    pub fn section(self) -> &'static str {
        match self {
            Category::Growth => "plant_growth",
            Category::Breeding => "animal_breeding",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "growth" | "plant_growth" | "plant" => Ok(Category::Growth),
            "breeding" | "animal_breeding" | "animal" => Ok(Category::Breeding),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Inclusive bounds on one coordinate axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl AxisRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        AxisRange { min, max }
    }

    /// Whether either bound is present
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Match criteria shared by every rule category
///
/// All list fields treat "empty" as "no restriction". Numeric bounds are
/// inclusive and independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    enabled: bool,
    allow: bool,
    biomes: Vec<String>,
    temperature_min: Option<f32>,
    temperature_max: Option<f32>,
    x_min: Option<i32>,
    x_max: Option<i32>,
    y_min: Option<i32>,
    y_max: Option<i32>,
    z_min: Option<i32>,
    z_max: Option<i32>,
    dimensions: Vec<String>,
    dimensions_blacklist: Vec<String>,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            enabled: true,
            allow: true,
            biomes: Vec::new(),
            temperature_min: None,
            temperature_max: None,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            z_min: None,
            z_max: None,
            dimensions: Vec::new(),
            dimensions_blacklist: Vec::new(),
        }
    }
}

impl Criteria {
    /// Unrestricted, enabled, allowing criteria
    pub fn new() -> Self {
        Criteria::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Verdict emitted when a rule with these criteria wins
    pub fn allows(&self) -> bool {
        self.allow
    }

    pub fn biomes(&self) -> &[String] {
        &self.biomes
    }

    pub fn temperature_min(&self) -> Option<f32> {
        self.temperature_min
    }

    pub fn temperature_max(&self) -> Option<f32> {
        self.temperature_max
    }

    pub fn x_range(&self) -> AxisRange {
        AxisRange::new(self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> AxisRange {
        AxisRange::new(self.y_min, self.y_max)
    }

    pub fn z_range(&self) -> AxisRange {
        AxisRange::new(self.z_min, self.z_max)
    }

    /// Bounds for the x, y and z axes in that order
    pub fn axis_ranges(&self) -> [AxisRange; 3] {
        [self.x_range(), self.y_range(), self.z_range()]
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn dimensions_blacklist(&self) -> &[String] {
        &self.dimensions_blacklist
    }

    /// Set whether the rule is enabled (builder pattern)
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the verdict (builder pattern)
    pub fn with_allow(mut self, allow: bool) -> Self {
        self.allow = allow;
        self
    }

    pub fn with_biomes(mut self, biomes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.biomes = biomes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_temperature(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.temperature_min = min;
        self.temperature_max = max;
        self
    }

    pub fn with_x_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.x_min = min;
        self.x_max = max;
        self
    }

    pub fn with_y_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.y_min = min;
        self.y_max = max;
        self
    }

    pub fn with_z_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.z_min = min;
        self.z_max = max;
        self
    }

    /// Dimension whitelist (builder pattern)
    pub fn with_dimensions(
        mut self,
        dimensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Dimension blacklist (builder pattern)
    pub fn with_dimensions_blacklist(
        mut self,
        dimensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dimensions_blacklist = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Check range ordering and the whitelist/blacklist exclusivity
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.temperature_min, self.temperature_max) {
            if min > max {
                return Err(Error::TemperatureRange { min, max });
            }
        }

        for (axis, range) in ['x', 'y', 'z'].into_iter().zip(self.axis_ranges()) {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(Error::CoordinateRange { axis, min, max });
                }
            }
        }

        if !self.dimensions.is_empty() && !self.dimensions_blacklist.is_empty() {
            return Err(Error::ConflictingDimensions);
        }

        Ok(())
    }

    /// Specificity contributed by the shared criteria
    pub fn specificity(&self) -> u32 {
        let mut score = 0;

        score += self.axis_ranges().iter().filter(|r| r.is_set()).count() as u32 * 10;

        if self.temperature_min.is_some() || self.temperature_max.is_some() {
            score += 5;
        }

        if !self.biomes.is_empty() {
            score += 3;
        }

        if !self.dimensions.is_empty() {
            score += 2;
        } else if !self.dimensions_blacklist.is_empty() {
            score += 1;
        }

        score
    }
}

/// Score for a category pattern list: exact lists outrank wildcard lists
fn pattern_specificity(patterns: &[String]) -> u32 {
    if patterns.is_empty() {
        0
    } else if patterns.iter().any(|p| is_wildcard(p)) {
        1
    } else {
        2
    }
}

/// Rule governing crop growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRule {
    pub criteria: Criteria,
    #[serde(default)]
    pub crop_types: Vec<String>,
}

/// Rule governing animal breeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingRule {
    pub criteria: Criteria,
    #[serde(default)]
    pub animal_types: Vec<String>,
}

/// A single policy rule
///
/// Both variants embed the same [`Criteria`]; they differ only in the
/// subject patterns they carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Rule {
    #[serde(rename = "plant_growth")]
    Growth(GrowthRule),
    #[serde(rename = "animal_breeding")]
    Breeding(BreedingRule),
}

impl Rule {
    /// Create a growth rule
    pub fn growth(
        criteria: Criteria,
        crop_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Rule::Growth(GrowthRule {
            criteria,
            crop_types: crop_types.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a breeding rule
    pub fn breeding(
        criteria: Criteria,
        animal_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Rule::Breeding(BreedingRule {
            criteria,
            animal_types: animal_types.into_iter().map(Into::into).collect(),
        })
    }

    pub fn category(&self) -> Category {
        match self {
            Rule::Growth(_) => Category::Growth,
            Rule::Breeding(_) => Category::Breeding,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        match self {
            Rule::Growth(rule) => &rule.criteria,
            Rule::Breeding(rule) => &rule.criteria,
        }
    }

    /// Crop patterns for growth rules, animal patterns for breeding rules
    pub fn subject_patterns(&self) -> &[String] {
        match self {
            Rule::Growth(rule) => &rule.crop_types,
            Rule::Breeding(rule) => &rule.animal_types,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.criteria().is_enabled()
    }

    pub fn allows(&self) -> bool {
        self.criteria().allows()
    }

    /// Structural validation; invalid rules never reach the engine
    pub fn validate(&self) -> Result<()> {
        self.criteria().validate()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// How narrowly this rule constrains its match (higher wins)
    pub fn specificity(&self) -> u32 {
        self.criteria().specificity() + pattern_specificity(self.subject_patterns())
    }
}
