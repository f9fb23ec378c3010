//! Predicates testing one rule criterion against a query
//!
//! Every predicate is vacuously true when its criterion is absent (empty list
//! or no bounds). Pattern lists accept three forms:
//!
//! - `"*"` matches any id
//! - `"namespace:*"` matches every id in that namespace
//! - anything else must equal the id exactly
//!
//! Biome lists additionally accept `"#namespace:tag"` tag references.

use crate::{AxisRange, BiomeLookup, ResourceId};
use glam::IVec3;

/// Match a single non-tag pattern against an id
fn matches_pattern(id: &str, pattern: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    match pattern.strip_suffix(":*") {
        Some(namespace) => id
            .strip_prefix(namespace)
            .map_or(false, |rest| rest.starts_with(':')),
        None => pattern == id,
    }
}

/// Whether a biome satisfies any of the patterns
///
/// Malformed tag references are skipped rather than failing the whole list.
pub fn matches_biome<L: BiomeLookup + ?Sized>(
    biome: &str,
    patterns: &[String],
    lookup: &L,
) -> bool {
    if patterns.is_empty() {
        return true;
    }

    patterns.iter().any(|pattern| {
        if pattern.is_empty() {
            return false;
        }

        match pattern.strip_prefix('#') {
            Some(tag) => match ResourceId::parse(tag) {
                Ok(tag) => lookup.has_tag(biome, &tag),
                Err(err) => {
                    tracing::debug!("Skipping biome tag {:?}: {}", pattern, err);
                    false
                }
            },
            None => matches_pattern(biome, pattern),
        }
    })
}

/// Inclusive temperature range check
///
/// An unknown temperature only passes when no bound is set.
pub fn matches_temperature(temperature: Option<f32>, min: Option<f32>, max: Option<f32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    let Some(temperature) = temperature else {
        return false;
    };

    min.map_or(true, |min| temperature >= min) && max.map_or(true, |max| temperature <= max)
}

/// Inclusive per-axis coordinate check (x, y, z order)
pub fn matches_coordinates(position: IVec3, ranges: &[AxisRange; 3]) -> bool {
    ranges[0].contains(position.x)
        && ranges[1].contains(position.y)
        && ranges[2].contains(position.z)
}

/// Whitelist membership, else blacklist exclusion, else anything
pub fn matches_dimension(dimension: &str, whitelist: &[String], blacklist: &[String]) -> bool {
    if !whitelist.is_empty() {
        return whitelist.iter().any(|d| d == dimension);
    }

    if !blacklist.is_empty() {
        return !blacklist.iter().any(|d| d == dimension);
    }

    true
}

/// Whether a crop/animal id satisfies any of the patterns (no tag support)
pub fn matches_subject_type(subject: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return true;
    }

    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| matches_pattern(subject, p))
}
