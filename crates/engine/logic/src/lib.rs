//! Logic crate - Rule-based allow/deny decisions for Territorial
//!
//! This crate decides whether a crop may grow or an animal may breed at a
//! given location, based on biome, temperature, coordinates, dimension and
//! subject type. Rules are matched, ranked by specificity, and the verdict is
//! cached per query.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Policy (facade)                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  LRU Cache                                               │
//! │  ├── Keyed by QueryContext                              │
//! │  └── Entries tagged with snapshot generation            │
//! ├─────────────────────────────────────────────────────────┤
//! │  Decision Engine                                         │
//! │  ├── Subject applicability                              │
//! │  ├── Matcher predicates (biome, temperature, ...)       │
//! │  ├── Highest specificity wins                           │
//! │  └── Dimension whitelist/blacklist fallback             │
//! ├─────────────────────────────────────────────────────────┤
//! │  PolicySnapshot                                          │
//! │  ├── Settings (global toggles)                          │
//! │  └── RuleSet (validated rules per category)             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use logic::{BiomeRegistry, Criteria, Policy, PolicySnapshot, Rule, RuleSet, Settings};
//! use glam::IVec3;
//!
//! // Deny wheat in hot biomes
//! let rules = RuleSet::from_rules([Rule::growth(
//!     Criteria::new().with_allow(false).with_temperature(Some(1.5), None),
//!     ["minecraft:wheat"],
//! )]);
//!
//! let biomes = BiomeRegistry::new().with_biome("minecraft:desert", 2.0, []);
//! let policy = Policy::new(PolicySnapshot::new(Settings::default(), rules), biomes);
//!
//! let overworld = "minecraft:overworld";
//! assert!(!policy.can_grow(overworld, IVec3::ZERO, "minecraft:desert", "minecraft:wheat"));
//! assert!(policy.can_grow(overworld, IVec3::ZERO, "minecraft:desert", "minecraft:carrots"));
//! ```

mod cache;
mod context;
mod engine;
mod error;
mod id;
pub mod matcher;
mod policy;
mod rule;
mod ruleset;
mod stats;
pub mod summary;

pub use cache::LruCache;
pub use context::{BiomeInfo, BiomeLookup, BiomeRegistry, QueryContext};
pub use engine::{evaluate, DecisionEngine, Outcome, Verdict};
pub use error::{Error, Result};
pub use id::{ResourceId, DEFAULT_NAMESPACE};
pub use policy::Policy;
pub use rule::{AxisRange, BreedingRule, Category, Criteria, GrowthRule, Rule};
pub use ruleset::{PolicySnapshot, RuleSet, Settings, DEFAULT_CACHE_CAPACITY};
pub use stats::{DecisionCounters, PerformanceStats};

// Re-export glam for convenience
pub use glam;
