//! Plain-text descriptions of rules for listings

use crate::id::DEFAULT_NAMESPACE;
use crate::{AxisRange, Category, Criteria, Rule};
use std::fmt::Display;

/// Human-readable name for an identifier or pattern
///
/// Vanilla identifiers lose their namespace, underscores become spaces and
/// the first letter is capitalised. Tags keep a `(tag)` suffix and namespace
/// wildcards read as `All <namespace>`.
pub fn display_name(id: &str) -> String {
    if id == "*" {
        return "Anything".to_string();
    }

    if let Some(tag) = id.strip_prefix('#') {
        return format!("{} (tag)", display_name(tag));
    }

    let (namespace, path) = id.split_once(':').unwrap_or((DEFAULT_NAMESPACE, id));
    if path == "*" {
        return format!("All {namespace}");
    }

    let name = capitalize(&path.replace(['_', '/'], " "));
    if namespace == DEFAULT_NAMESPACE {
        name
    } else {
        format!("{name} ({namespace})")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_names(ids: &[String]) -> String {
    ids.iter()
        .map(|id| display_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bounds<T: Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min} to {max}"),
        (Some(min), None) => format!("at least {min}"),
        (None, Some(max)) => format!("at most {max}"),
        (None, None) => "any".to_string(),
    }
}

/// One line per constraint, or a single `Anywhere` line
pub fn conditions(criteria: &Criteria) -> Vec<String> {
    let mut lines = Vec::new();

    if !criteria.biomes().is_empty() {
        lines.push(format!("In biomes: {}", join_names(criteria.biomes())));
    }

    if criteria.temperature_min().is_some() || criteria.temperature_max().is_some() {
        lines.push(format!(
            "Temperature: {}",
            bounds(criteria.temperature_min(), criteria.temperature_max())
        ));
    }

    for (axis, AxisRange { min, max }) in ['X', 'Y', 'Z'].into_iter().zip(criteria.axis_ranges()) {
        if min.is_some() || max.is_some() {
            lines.push(format!("{axis}: {}", bounds(min, max)));
        }
    }

    if !criteria.dimensions().is_empty() {
        lines.push(format!("In dimensions: {}", join_names(criteria.dimensions())));
    } else if !criteria.dimensions_blacklist().is_empty() {
        lines.push(format!(
            "Not in dimensions: {}",
            join_names(criteria.dimensions_blacklist())
        ));
    }

    if lines.is_empty() {
        lines.push("Anywhere".to_string());
    }
    lines
}

/// Full description of a rule: subjects, verdict, then indented conditions
pub fn describe(rule: &Rule) -> Vec<String> {
    let patterns = rule.subject_patterns();
    let noun = match rule.category() {
        Category::Growth => ("Crops", "All crops"),
        Category::Breeding => ("Animals", "All animals"),
    };

    let mut lines = Vec::new();
    if !rule.is_enabled() {
        lines.push("(disabled)".to_string());
    }

    if patterns.is_empty() || patterns.iter().any(|p| p == "*") {
        lines.push(noun.1.to_string());
    } else {
        lines.push(format!("{}: {}", noun.0, join_names(patterns)));
    }

    lines.push(format!(
        "{} when:",
        if rule.allows() { "ALLOWED" } else { "BLOCKED" }
    ));
    lines.extend(conditions(rule.criteria()).into_iter().map(|c| format!("  - {c}")));
    lines
}
