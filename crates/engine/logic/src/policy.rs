//! Query facade: cache in front of the decision engine

use crate::cache::LruCache;
use crate::stats::{DecisionCounters, PerformanceStats};
use crate::{
    BiomeLookup, Category, DecisionEngine, PolicySnapshot, QueryContext, RuleSet, Settings,
    Verdict,
};
use glam::IVec3;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

/// Cached verdict tagged with the snapshot generation it was computed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedVerdict {
    generation: u64,
    allowed: bool,
}

#[derive(Debug)]
struct Published {
    generation: u64,
    snapshot: Arc<PolicySnapshot>,
}

/// Shared policy state (active snapshot + decision cache + counters)
///
/// Cloning is cheap and every clone sees the same snapshot and cache. The
/// snapshot is swapped as a whole; a decision in flight keeps evaluating
/// against the snapshot it started with, and its result is never served once
/// a newer snapshot is published.
#[derive(Debug)]
pub struct Policy<L> {
    inner: Arc<PolicyInner<L>>,
}

#[derive(Debug)]
struct PolicyInner<L> {
    biomes: L,
    current: RwLock<Published>,
    cache: LruCache<QueryContext, CachedVerdict>,
    counters: DecisionCounters,
}

impl<L> Clone for Policy<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L: BiomeLookup> Policy<L> {
    /// Create a policy; the cache capacity comes from the initial settings
    pub fn new(snapshot: PolicySnapshot, biomes: L) -> Self {
        let capacity = snapshot.settings.cache_capacity;
        Self {
            inner: Arc::new(PolicyInner {
                biomes,
                current: RwLock::new(Published {
                    generation: 0,
                    snapshot: Arc::new(snapshot),
                }),
                cache: LruCache::new(capacity),
                counters: DecisionCounters::new(),
            }),
        }
    }

    /// Policy with no rules and default settings (allows everything)
    pub fn permissive(biomes: L) -> Self {
        Self::new(PolicySnapshot::default(), biomes)
    }

    pub fn biomes(&self) -> &L {
        &self.inner.biomes
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        self.inner.current.read().snapshot.clone()
    }

    /// Number of snapshots published since construction
    pub fn generation(&self) -> u64 {
        self.inner.current.read().generation
    }

    fn current(&self) -> (u64, Arc<PolicySnapshot>) {
        let current = self.inner.current.read();
        (current.generation, current.snapshot.clone())
    }

    /// Publish a new snapshot and drop every cached verdict
    ///
    /// The cache keeps the capacity it was created with.
    pub fn replace_snapshot(&self, snapshot: PolicySnapshot) {
        let rules = snapshot.rules.len();
        let capacity = snapshot.settings.cache_capacity;
        if capacity != self.cache_capacity() {
            tracing::warn!(
                "cache_capacity changed to {} but the cache stays at {} until restart",
                capacity,
                self.cache_capacity()
            );
        }
        {
            let mut current = self.inner.current.write();
            current.generation += 1;
            current.snapshot = Arc::new(snapshot);
        }
        self.invalidate_cache();
        tracing::info!("Published rule snapshot with {} rules", rules);
    }

    /// Publish new rules, keeping the current settings
    pub fn replace_rules(&self, rules: RuleSet) {
        let settings = self.snapshot().settings;
        self.replace_snapshot(PolicySnapshot::new(settings, rules));
    }

    /// Publish new settings, keeping the current rules
    pub fn replace_settings(&self, settings: Settings) {
        let rules = self.snapshot().rules.clone();
        self.replace_snapshot(PolicySnapshot::new(settings, rules));
    }

    /// Decide a query, serving repeated identical queries from the cache
    pub fn decide_context(&self, ctx: &QueryContext) -> bool {
        let start = Instant::now();
        let (generation, snapshot) = self.current();
        let cacheable = ctx.is_cacheable();

        if cacheable {
            if let Some(cached) = self.inner.cache.get(ctx) {
                if cached.generation == generation {
                    self.inner.counters.record_hit();
                    if snapshot.settings.debug_logging {
                        tracing::info!(
                            "Cache hit for {}: {}",
                            ctx,
                            if cached.allowed { "ALLOW" } else { "DENY" }
                        );
                    }
                    return cached.allowed;
                }
            }
        }

        let verdict = DecisionEngine::new(&snapshot, &self.inner.biomes).evaluate(ctx);

        if cacheable {
            self.inner.cache.put(
                ctx.clone(),
                CachedVerdict {
                    generation,
                    allowed: verdict.allowed,
                },
            );
        }

        self.inner.counters.record_miss(start.elapsed());
        verdict.allowed
    }

    /// Decide an event of any category
    pub fn decide(
        &self,
        category: Category,
        dimension: &str,
        position: IVec3,
        biome: &str,
        subject: &str,
    ) -> bool {
        self.decide_context(&QueryContext::new(category, dimension, position, biome, subject))
    }

    /// Whether a crop may grow at this location
    pub fn can_grow(&self, dimension: &str, position: IVec3, biome: &str, crop: &str) -> bool {
        self.decide(Category::Growth, dimension, position, biome, crop)
    }

    /// Whether an animal may breed at this location
    pub fn can_breed(&self, dimension: &str, position: IVec3, biome: &str, animal: &str) -> bool {
        self.decide(Category::Breeding, dimension, position, biome, animal)
    }

    /// Evaluate without consulting or filling the cache
    pub fn explain(&self, ctx: &QueryContext) -> Verdict {
        let snapshot = self.snapshot();
        DecisionEngine::new(&snapshot, &self.inner.biomes).evaluate(ctx)
    }

    pub fn invalidate_cache(&self) {
        self.inner.cache.clear();
        tracing::debug!("Rule evaluation cache cleared");
    }

    pub fn cache_size(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.inner.cache.capacity()
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.inner.counters.snapshot(self.cache_size())
    }

    pub fn reset_stats(&self) {
        self.inner.counters.reset();
        tracing::debug!("Performance statistics reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BiomeRegistry, Criteria, Rule};

    fn policy(rules: impl IntoIterator<Item = Rule>) -> Policy<BiomeRegistry> {
        let biomes = BiomeRegistry::new().with_biome("minecraft:plains", 0.8, []);
        Policy::new(
            PolicySnapshot::new(Settings::default(), RuleSet::from_rules(rules)),
            biomes,
        )
    }

    #[test]
    fn test_second_identical_query_hits_cache() {
        let policy = policy([Rule::growth(Criteria::new().with_allow(false), ["*"])]);

        assert!(!policy.can_grow(
            "minecraft:overworld",
            IVec3::ZERO,
            "minecraft:plains",
            "minecraft:wheat"
        ));
        assert!(!policy.can_grow(
            "minecraft:overworld",
            IVec3::ZERO,
            "minecraft:plains",
            "minecraft:wheat"
        ));

        let stats = policy.performance_stats();
        assert_eq!(stats.evaluations, 2);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_size, 1);
    }

    #[test]
    fn test_uncacheable_context_still_decides() {
        let policy = policy([Rule::growth(Criteria::new().with_allow(false), ["*"])]);

        assert!(!policy.can_grow("minecraft:overworld", IVec3::ZERO, "", "minecraft:wheat"));
        assert_eq!(policy.cache_size(), 0);
    }

    #[test]
    fn test_replace_rules_invalidates() {
        let policy = policy([]);
        let ctx = QueryContext::breeding(
            "minecraft:overworld",
            IVec3::ZERO,
            "minecraft:plains",
            "minecraft:cow",
        );

        assert!(policy.decide_context(&ctx));
        assert_eq!(policy.cache_size(), 1);

        policy.replace_rules(RuleSet::from_rules([Rule::breeding(
            Criteria::new().with_allow(false),
            ["minecraft:cow"],
        )]));
        assert_eq!(policy.cache_size(), 0);
        assert_eq!(policy.generation(), 1);
        assert!(!policy.decide_context(&ctx));
    }

    #[test]
    fn test_stale_generation_not_served() {
        let policy = policy([]);
        let ctx = QueryContext::growth(
            "minecraft:overworld",
            IVec3::ZERO,
            "minecraft:plains",
            "minecraft:wheat",
        );

        policy.replace_rules(RuleSet::from_rules([Rule::growth(
            Criteria::new().with_allow(false),
            ["*"],
        )]));

        // A decision that started before the swap finishing after the clear
        policy.inner.cache.put(
            ctx.clone(),
            CachedVerdict {
                generation: 0,
                allowed: true,
            },
        );

        assert!(!policy.decide_context(&ctx));
        assert_eq!(policy.performance_stats().cache_hits, 0);
        assert!(!policy.decide_context(&ctx));
        assert_eq!(policy.performance_stats().cache_hits, 1);
    }

    #[test]
    fn test_replace_settings_keeps_rules() {
        let policy = policy([Rule::growth(Criteria::new().with_allow(false), ["*"])]);
        policy.replace_settings(Settings {
            plant_growth_control: false,
            ..Settings::default()
        });

        assert_eq!(policy.snapshot().rules.len(), 1);
        assert!(policy.can_grow(
            "minecraft:overworld",
            IVec3::ZERO,
            "minecraft:plains",
            "minecraft:wheat"
        ));
    }

    #[test]
    fn test_capacity_change_keeps_cache_size() {
        let policy = policy([]);
        let capacity = policy.cache_capacity();
        policy.replace_settings(Settings {
            cache_capacity: capacity * 2,
            ..Settings::default()
        });

        assert_eq!(policy.cache_capacity(), capacity);
        assert_eq!(policy.snapshot().settings.cache_capacity, capacity * 2);
        assert_eq!(policy.generation(), 1);
    }

    #[test]
    fn test_reset_stats() {
        let policy = policy([]);
        policy.can_breed("minecraft:overworld", IVec3::ZERO, "minecraft:plains", "minecraft:pig");
        policy.reset_stats();
        assert_eq!(policy.performance_stats().evaluations, 0);
        assert_eq!(policy.performance_stats().cache_size, 1);
    }
}
