//! Active rule lists and the global toggles published alongside them

use crate::{Category, Rule};
use serde::{Deserialize, Serialize};

/// Default number of cached decisions
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Global toggles read on every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Apply growth rules at all
    pub plant_growth_control: bool,
    /// Apply breeding rules at all
    pub animal_breeding_control: bool,
    /// Check biome and temperature criteria
    pub biome_control: bool,
    /// Check coordinate criteria
    pub coordinate_control: bool,
    /// Log every decision at info level
    pub debug_logging: bool,
    /// Capacity of the decision cache
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            plant_growth_control: true,
            animal_breeding_control: true,
            biome_control: true,
            coordinate_control: true,
            debug_logging: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Settings {
    /// Whether rules of this category are evaluated
    pub fn controls(&self, category: Category) -> bool {
        match category {
            Category::Growth => self.plant_growth_control,
            Category::Breeding => self.animal_breeding_control,
        }
    }
}

/// Validated rules, one ordered list per category
///
/// Invalid rules are dropped at construction and only counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    growth: Vec<Rule>,
    breeding: Vec<Rule>,
    rejected: usize,
}

impl RuleSet {
    /// An empty set (every event allowed)
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Build a set from rules in declaration order, rejecting invalid ones
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = RuleSet::new();
        for rule in rules {
            set.push(rule);
        }
        set
    }

    /// Append a rule, returning whether it was accepted
    pub fn push(&mut self, rule: Rule) -> bool {
        if let Err(err) = rule.validate() {
            tracing::warn!("Rejecting invalid {} rule: {}", rule.category(), err);
            self.rejected += 1;
            return false;
        }

        match rule.category() {
            Category::Growth => self.growth.push(rule),
            Category::Breeding => self.breeding.push(rule),
        }
        true
    }

    /// Count a rule that was rejected before it could be constructed
    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Rules of one category in declaration order
    pub fn rules(&self, category: Category) -> &[Rule] {
        match category {
            Category::Growth => &self.growth,
            Category::Breeding => &self.breeding,
        }
    }

    /// Number of rules rejected while building this set
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.growth.len() + self.breeding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settings and rules published together
///
/// A snapshot is never mutated after publication; reloads build a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicySnapshot {
    pub settings: Settings,
    pub rules: RuleSet,
}

impl PolicySnapshot {
    pub fn new(settings: Settings, rules: RuleSet) -> Self {
        PolicySnapshot { settings, rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Criteria;

    #[test]
    fn test_from_rules_partitions_and_rejects() {
        let set = RuleSet::from_rules([
            Rule::growth(Criteria::new(), ["minecraft:wheat"]),
            Rule::breeding(Criteria::new(), ["minecraft:cow"]),
            Rule::growth(Criteria::new().with_x_range(Some(5), Some(1)), ["*"]),
            Rule::growth(Criteria::new().with_allow(false), ["minecraft:carrots"]),
        ]);

        assert_eq!(set.rules(Category::Growth).len(), 2);
        assert_eq!(set.rules(Category::Breeding).len(), 1);
        assert_eq!(set.rejected(), 1);
        assert_eq!(set.len(), 3);
        assert!(!set.rules(Category::Growth)[1].allows());
    }

    #[test]
    fn test_settings_controls() {
        let settings = Settings {
            animal_breeding_control: false,
            ..Settings::default()
        };
        assert!(settings.controls(Category::Growth));
        assert!(!settings.controls(Category::Breeding));
        assert_eq!(settings.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }
}
