//! Query context and the host world lookups the engine depends on

use crate::{Category, ResourceId};
use glam::IVec3;
use std::collections::HashMap;
use std::fmt;

/// Biome data supplied by the host world model
///
/// This trait lets the engine read biome attributes without depending on a
/// specific world implementation. Lookups that cannot be answered return
/// `None`/`false` and are treated as non-matches.
pub trait BiomeLookup {
    /// Base temperature of a biome, if known
    fn temperature(&self, biome: &str) -> Option<f32>;

    /// Whether the biome belongs to the given tag
    fn has_tag(&self, biome: &str, tag: &ResourceId) -> bool;
}

impl<T: BiomeLookup + ?Sized> BiomeLookup for &T {
    fn temperature(&self, biome: &str) -> Option<f32> {
        (**self).temperature(biome)
    }

    fn has_tag(&self, biome: &str, tag: &ResourceId) -> bool {
        (**self).has_tag(biome, tag)
    }
}

impl<T: BiomeLookup + ?Sized> BiomeLookup for std::sync::Arc<T> {
    fn temperature(&self, biome: &str) -> Option<f32> {
        (**self).temperature(biome)
    }

    fn has_tag(&self, biome: &str, tag: &ResourceId) -> bool {
        (**self).has_tag(biome, tag)
    }
}

/// Attributes of a single biome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiomeInfo {
    pub temperature: f32,
    pub tags: Vec<ResourceId>,
}

/// In-memory biome registry keyed by canonical biome id
#[derive(Debug, Clone, Default)]
pub struct BiomeRegistry {
    biomes: HashMap<String, BiomeInfo>,
}

impl BiomeRegistry {
    pub fn new() -> Self {
        BiomeRegistry::default()
    }

    /// Register or replace a biome
    pub fn insert(&mut self, id: impl Into<String>, info: BiomeInfo) {
        self.biomes.insert(id.into(), info);
    }

    /// Register a biome (builder pattern)
    pub fn with_biome(
        mut self,
        id: impl Into<String>,
        temperature: f32,
        tags: impl IntoIterator<Item = ResourceId>,
    ) -> Self {
        self.insert(
            id,
            BiomeInfo {
                temperature,
                tags: tags.into_iter().collect(),
            },
        );
        self
    }

    pub fn get(&self, id: &str) -> Option<&BiomeInfo> {
        self.biomes.get(id)
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.biomes.keys().map(String::as_str)
    }
}

impl BiomeLookup for BiomeRegistry {
    fn temperature(&self, biome: &str) -> Option<f32> {
        self.biomes.get(biome).map(|info| info.temperature)
    }

    fn has_tag(&self, biome: &str, tag: &ResourceId) -> bool {
        self.biomes
            .get(biome)
            .map_or(false, |info| info.tags.contains(tag))
    }
}

/// Everything the engine needs to decide one event
///
/// Also serves as the cache key: two contexts that compare equal always
/// produce the same verdict under the same rule snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryContext {
    pub category: Category,
    pub dimension: String,
    pub position: IVec3,
    pub biome: String,
    pub subject: String,
}

impl QueryContext {
    pub fn new(
        category: Category,
        dimension: impl Into<String>,
        position: IVec3,
        biome: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        QueryContext {
            category,
            dimension: dimension.into(),
            position,
            biome: biome.into(),
            subject: subject.into(),
        }
    }

    /// Context for a crop growth tick
    pub fn growth(
        dimension: impl Into<String>,
        position: IVec3,
        biome: impl Into<String>,
        crop: impl Into<String>,
    ) -> Self {
        QueryContext::new(Category::Growth, dimension, position, biome, crop)
    }

    /// Context for an animal breeding attempt
    pub fn breeding(
        dimension: impl Into<String>,
        position: IVec3,
        biome: impl Into<String>,
        animal: impl Into<String>,
    ) -> Self {
        QueryContext::new(Category::Breeding, dimension, position, biome, animal)
    }

    /// Whether every attribute of the cache key is present
    pub fn is_cacheable(&self) -> bool {
        !self.dimension.is_empty() && !self.biome.is_empty() && !self.subject.is_empty()
    }
}

impl fmt::Display for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {} at ({}, {}, {}) [{}]",
            self.category,
            self.subject,
            self.dimension,
            self.position.x,
            self.position.y,
            self.position.z,
            self.biome
        )
    }
}
