//! Config crate - Rule files, biome tables and hot reload for Territorial
//!
//! Reads the TOML rule file into a [`logic::PolicySnapshot`], applies
//! `TERRITORIAL_*` environment overrides to its settings, and publishes
//! reloaded snapshots into a running [`logic::Policy`].
//!
//! # Example
//!
//! ```rust,no_run
//! use config::{vanilla_biomes, ConfigLoader, Reloader};
//! use logic::Policy;
//!
//! let loader = ConfigLoader::new("config/territorial-rules.toml");
//! let policy = Policy::new(loader.load_or_permissive(), vanilla_biomes());
//!
//! // Later, after the file was edited
//! let reloader = Reloader::new(loader, policy.clone());
//! reloader.reload().ok();
//! ```

mod biomes;
mod defaults;
mod error;
mod loader;
mod reload;
mod schema;
pub mod settings;

pub use biomes::{load_biomes, parse_biomes, vanilla_biomes};
pub use defaults::{DEFAULT_RULES_FILE, DEFAULT_RULES_PATH};
pub use error::{ConfigError, Result};
pub use loader::{parse_rules, ConfigLoader, LoadSummary};
pub use reload::{Reloader, RuleWatcher, DEFAULT_DEBOUNCE};
pub use schema::RuleEntry;
