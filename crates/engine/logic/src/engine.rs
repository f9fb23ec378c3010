//! Decision engine: match rules against a query and pick a single winner

use crate::matcher::{
    matches_biome, matches_coordinates, matches_dimension, matches_subject_type,
    matches_temperature,
};
use crate::{BiomeLookup, PolicySnapshot, QueryContext, Rule};
use std::fmt;

/// Why a verdict was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Control for the category is switched off
    ControlDisabled,
    /// The category has no rules
    NoRules,
    /// A fully matching rule won on specificity
    Selected {
        /// Index of the winning rule in its category list
        index: usize,
        specificity: u32,
        /// Number of fully matching rules considered
        matching: usize,
    },
    /// No rule fully matched but a subject-applicable rule has a dimension whitelist
    DimensionWhitelist { index: usize },
    /// No rule fully matched and the dimension is blacklisted by an applicable rule
    DimensionBlacklist { index: usize },
    /// Applicable rules exist but none matched and no dimension list objects
    NoMatch { applicable: usize },
    /// No enabled rule concerns this subject type
    NotApplicable,
}

/// Result of evaluating one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub outcome: Outcome,
}

impl Verdict {
    fn allow(outcome: Outcome) -> Self {
        Verdict {
            allowed: true,
            outcome,
        }
    }

    fn deny(outcome: Outcome) -> Self {
        Verdict {
            allowed: false,
            outcome,
        }
    }

    /// Whether a rule fully matched the query
    pub fn matched(&self) -> bool {
        matches!(self.outcome, Outcome::Selected { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.allowed { "ALLOW" } else { "DENY" };
        match self.outcome {
            Outcome::ControlDisabled => write!(f, "{label} (control disabled)"),
            Outcome::NoRules => write!(f, "{label} (no rules configured)"),
            Outcome::Selected {
                index,
                specificity,
                matching,
            } => write!(
                f,
                "{label} (rule {} of {matching} matching, specificity {specificity})",
                index + 1
            ),
            Outcome::DimensionWhitelist { index } => {
                write!(f, "{label} (outside dimension whitelist of rule {})", index + 1)
            }
            Outcome::DimensionBlacklist { index } => {
                write!(f, "{label} (dimension blacklisted by rule {})", index + 1)
            }
            Outcome::NoMatch { applicable } => {
                write!(f, "{label} ({applicable} applicable rules, none matched)")
            }
            Outcome::NotApplicable => write!(f, "{label} (no rule applies to this subject)"),
        }
    }
}

/// Evaluates queries against one snapshot
///
/// Stateless apart from the borrowed snapshot and biome lookup; every call to
/// [`DecisionEngine::evaluate`] is a pure function of its inputs.
pub struct DecisionEngine<'a, L: ?Sized> {
    snapshot: &'a PolicySnapshot,
    biomes: &'a L,
}

impl<'a, L: BiomeLookup + ?Sized> DecisionEngine<'a, L> {
    pub fn new(snapshot: &'a PolicySnapshot, biomes: &'a L) -> Self {
        DecisionEngine { snapshot, biomes }
    }

    /// Whether the rule concerns the query's subject type at all
    pub fn subject_applies(&self, rule: &Rule, ctx: &QueryContext) -> bool {
        rule.category() == ctx.category
            && matches_subject_type(&ctx.subject, rule.subject_patterns())
    }

    /// Whether every enabled criterion of the rule matches
    pub fn matches(&self, rule: &Rule, ctx: &QueryContext) -> bool {
        if !rule.is_enabled() || !self.subject_applies(rule, ctx) {
            return false;
        }
        self.location_matches(rule, ctx)
    }

    fn location_matches(&self, rule: &Rule, ctx: &QueryContext) -> bool {
        let settings = &self.snapshot.settings;
        let criteria = rule.criteria();

        if !matches_dimension(
            &ctx.dimension,
            criteria.dimensions(),
            criteria.dimensions_blacklist(),
        ) {
            return false;
        }

        if settings.biome_control {
            if !matches_biome(&ctx.biome, criteria.biomes(), self.biomes) {
                return false;
            }

            let has_bounds =
                criteria.temperature_min().is_some() || criteria.temperature_max().is_some();
            if has_bounds {
                let temperature = self.biomes.temperature(&ctx.biome);
                if !matches_temperature(
                    temperature,
                    criteria.temperature_min(),
                    criteria.temperature_max(),
                ) {
                    return false;
                }
            }
        }

        if settings.coordinate_control
            && !matches_coordinates(ctx.position, &criteria.axis_ranges())
        {
            return false;
        }

        true
    }

    /// All fully matching rules with their category index, in declaration order
    pub fn find_matches(&self, ctx: &QueryContext) -> Vec<(usize, &'a Rule)> {
        self.snapshot
            .rules
            .rules(ctx.category)
            .iter()
            .enumerate()
            .filter(|(_, rule)| self.matches(rule, ctx))
            .collect()
    }

    /// Decide a single query
    pub fn evaluate(&self, ctx: &QueryContext) -> Verdict {
        let verdict = self.decide(ctx);

        if self.snapshot.settings.debug_logging {
            tracing::info!("Event decision for {}: {}", ctx, verdict);
        } else {
            tracing::debug!("Event decision for {}: {}", ctx, verdict);
        }

        verdict
    }

    fn decide(&self, ctx: &QueryContext) -> Verdict {
        if !self.snapshot.settings.controls(ctx.category) {
            return Verdict::allow(Outcome::ControlDisabled);
        }

        let rules = self.snapshot.rules.rules(ctx.category);
        if rules.is_empty() {
            return Verdict::allow(Outcome::NoRules);
        }

        let mut applicable: Vec<(usize, &Rule)> = Vec::new();
        let mut best: Option<(usize, &Rule, u32)> = None;
        let mut matching = 0;

        for (index, rule) in rules.iter().enumerate() {
            if !rule.is_enabled() || !self.subject_applies(rule, ctx) {
                continue;
            }
            applicable.push((index, rule));

            if !self.location_matches(rule, ctx) {
                continue;
            }
            matching += 1;

            // Strictly greater: ties keep the rule declared first
            let score = rule.specificity();
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((index, rule, score));
            }
        }

        if let Some((index, rule, specificity)) = best {
            let outcome = Outcome::Selected {
                index,
                specificity,
                matching,
            };
            return if rule.allows() {
                Verdict::allow(outcome)
            } else {
                Verdict::deny(outcome)
            };
        }

        if applicable.is_empty() {
            return Verdict::allow(Outcome::NotApplicable);
        }

        if let Some((index, _)) = applicable
            .iter()
            .find(|(_, rule)| !rule.criteria().dimensions().is_empty())
        {
            return Verdict::deny(Outcome::DimensionWhitelist { index: *index });
        }

        if let Some((index, _)) = applicable.iter().find(|(_, rule)| {
            rule.criteria()
                .dimensions_blacklist()
                .iter()
                .any(|d| *d == ctx.dimension)
        }) {
            return Verdict::deny(Outcome::DimensionBlacklist { index: *index });
        }

        Verdict::allow(Outcome::NoMatch {
            applicable: applicable.len(),
        })
    }
}

/// Evaluate a query against a snapshot in one call
pub fn evaluate<L: BiomeLookup + ?Sized>(
    ctx: &QueryContext,
    snapshot: &PolicySnapshot,
    biomes: &L,
) -> Verdict {
    DecisionEngine::new(snapshot, biomes).evaluate(ctx)
}
