//! Policy facade scenarios
//!
//! End-to-end decisions through the public API: rule ranking, fallbacks,
//! caching behaviour and concurrent use during reloads.

use glam::IVec3;
use logic::{
    BiomeRegistry, Category, Criteria, Outcome, Policy, PolicySnapshot, QueryContext, ResourceId,
    Rule, RuleSet, Settings,
};
use std::thread;

const OVERWORLD: &str = "minecraft:overworld";
const NETHER: &str = "minecraft:the_nether";

/// Helper: vanilla-like biome table
fn create_biomes() -> BiomeRegistry {
    let hot = ResourceId::parse("minecraft:is_hot").unwrap();
    BiomeRegistry::new()
        .with_biome("minecraft:plains", 0.8, [])
        .with_biome("minecraft:desert", 2.0, [hot.clone()])
        .with_biome("minecraft:nether_wastes", 2.0, [hot])
        .with_biome("minecraft:snowy_plains", 0.0, [])
}

fn create_policy(rules: Vec<Rule>) -> Policy<BiomeRegistry> {
    Policy::new(
        PolicySnapshot::new(Settings::default(), RuleSet::from_rules(rules)),
        create_biomes(),
    )
}

#[test]
fn test_no_rules_allows_everything() {
    let policy = create_policy(Vec::new());

    assert!(policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:desert", "minecraft:wheat"));
    assert!(policy.can_breed(
        NETHER,
        IVec3::new(5, 70, -5),
        "minecraft:nether_wastes",
        "minecraft:cow"
    ));
}

#[test]
fn test_hot_biome_denies_wheat_only() {
    let policy = create_policy(vec![Rule::growth(
        Criteria::new()
            .with_allow(false)
            .with_biomes(["#minecraft:is_hot"])
            .with_temperature(Some(1.5), None),
        ["minecraft:wheat"],
    )]);

    assert!(!policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:desert", "minecraft:wheat"));
    assert!(policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:desert", "minecraft:carrots"));
    assert!(policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:wheat"));
}

#[test]
fn test_coordinate_rule_outranks_broad_rule() {
    // Broad deny everywhere for cows, narrow allow inside a farm zone
    let policy = create_policy(vec![
        Rule::breeding(Criteria::new().with_allow(false), ["minecraft:cow"]),
        Rule::breeding(
            Criteria::new()
                .with_x_range(Some(0), Some(100))
                .with_z_range(Some(0), Some(100)),
            ["minecraft:cow"],
        ),
    ]);

    assert!(policy.can_breed(
        OVERWORLD,
        IVec3::new(50, 64, 50),
        "minecraft:plains",
        "minecraft:cow"
    ));
    assert!(policy.can_breed(
        OVERWORLD,
        IVec3::new(100, 64, 0),
        "minecraft:plains",
        "minecraft:cow"
    ));
    assert!(!policy.can_breed(
        OVERWORLD,
        IVec3::new(101, 64, 0),
        "minecraft:plains",
        "minecraft:cow"
    ));
    assert!(policy.can_breed(
        OVERWORLD,
        IVec3::new(500, 64, 0),
        "minecraft:plains",
        "minecraft:pig"
    ));
}

#[test]
fn test_whitelist_fallback_denies_elsewhere() {
    let policy = create_policy(vec![Rule::growth(
        Criteria::new().with_dimensions([OVERWORLD]),
        ["minecraft:nether_wart"],
    )]);

    assert!(policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:nether_wart"));
    assert!(!policy.can_grow(
        NETHER,
        IVec3::ZERO,
        "minecraft:nether_wastes",
        "minecraft:nether_wart"
    ));

    let verdict = policy.explain(&QueryContext::growth(
        NETHER,
        IVec3::ZERO,
        "minecraft:nether_wastes",
        "minecraft:nether_wart",
    ));
    assert_eq!(verdict.outcome, Outcome::DimensionWhitelist { index: 0 });
}

#[test]
fn test_namespace_wildcard_subjects() {
    let policy = create_policy(vec![Rule::growth(
        Criteria::new().with_allow(false),
        ["farmersdelight:*"],
    )]);

    assert!(!policy.can_grow(
        OVERWORLD,
        IVec3::ZERO,
        "minecraft:plains",
        "farmersdelight:tomatoes"
    ));
    assert!(policy.can_grow(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:wheat"));
    assert!(policy.can_grow(
        OVERWORLD,
        IVec3::ZERO,
        "minecraft:plains",
        "farmersdelightx:tomatoes"
    ));
}

#[test]
fn test_repeated_query_served_from_cache() {
    let policy = create_policy(vec![Rule::growth(Criteria::new().with_allow(false), ["*"])]);

    for _ in 0..5 {
        assert!(!policy.can_grow(
            OVERWORLD,
            IVec3::new(1, 2, 3),
            "minecraft:plains",
            "minecraft:wheat"
        ));
    }

    let stats = policy.performance_stats();
    assert_eq!(stats.evaluations, 5);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 4);
    assert_eq!(policy.cache_size(), 1);
}

#[test]
fn test_invalidate_cache_forces_reevaluation() {
    let policy = create_policy(Vec::new());
    policy.can_breed(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:sheep");
    assert_eq!(policy.cache_size(), 1);

    policy.invalidate_cache();
    assert_eq!(policy.cache_size(), 0);

    policy.can_breed(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:sheep");
    assert_eq!(policy.performance_stats().cache_misses, 2);
}

#[test]
fn test_cache_bounded_by_capacity() {
    let settings = Settings {
        cache_capacity: 8,
        ..Settings::default()
    };
    let policy = Policy::new(PolicySnapshot::new(settings, RuleSet::new()), create_biomes());

    for x in 0..20 {
        policy.can_grow(OVERWORLD, IVec3::new(x, 64, 0), "minecraft:plains", "minecraft:wheat");
    }
    assert_eq!(policy.cache_size(), 8);
    assert_eq!(policy.cache_capacity(), 8);
}

#[test]
fn test_category_toggle_read_from_snapshot() {
    let policy = create_policy(vec![Rule::breeding(Criteria::new().with_allow(false), ["*"])]);
    assert!(!policy.can_breed(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:cow"));

    policy.replace_settings(Settings {
        animal_breeding_control: false,
        ..Settings::default()
    });
    assert!(policy.can_breed(OVERWORLD, IVec3::ZERO, "minecraft:plains", "minecraft:cow"));

    let verdict = policy.explain(&QueryContext::breeding(
        OVERWORLD,
        IVec3::ZERO,
        "minecraft:plains",
        "minecraft:cow",
    ));
    assert_eq!(verdict.outcome, Outcome::ControlDisabled);
}

#[test]
fn test_explain_does_not_touch_cache() {
    let policy = create_policy(Vec::new());
    let ctx = QueryContext::new(
        Category::Growth,
        OVERWORLD,
        IVec3::ZERO,
        "minecraft:plains",
        "minecraft:wheat",
    );

    let verdict = policy.explain(&ctx);
    assert!(verdict.allowed);
    assert_eq!(verdict.outcome, Outcome::NoRules);
    assert_eq!(policy.cache_size(), 0);
    assert_eq!(policy.performance_stats().evaluations, 0);
}

#[test]
fn test_concurrent_decisions_during_reloads() {
    let policy = create_policy(vec![Rule::growth(
        Criteria::new().with_allow(false),
        ["minecraft:wheat"],
    )]);

    let readers: Vec<_> = (0..4)
        .map(|t| {
            let policy = policy.clone();
            thread::spawn(move || {
                for i in 0..2000 {
                    let pos = IVec3::new((t * 2000 + i) % 64, 64, 0);
                    // Every published rule set denies wheat
                    assert!(!policy.can_grow(
                        OVERWORLD,
                        pos,
                        "minecraft:plains",
                        "minecraft:wheat"
                    ));
                }
            })
        })
        .collect();

    for i in 0..50 {
        let rules = RuleSet::from_rules([
            Rule::growth(Criteria::new().with_allow(false), ["minecraft:wheat"]),
            Rule::growth(Criteria::new().with_x_range(Some(i), None), ["minecraft:carrots"]),
        ]);
        policy.replace_rules(rules);
    }

    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(policy.generation(), 50);
    assert_eq!(policy.snapshot().rules.len(), 2);
    assert_eq!(policy.performance_stats().evaluations, 8000);
}
