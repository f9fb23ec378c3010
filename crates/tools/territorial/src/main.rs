use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{
    load_biomes, vanilla_biomes, ConfigLoader, LoadSummary, Reloader, DEFAULT_DEBOUNCE,
    DEFAULT_RULES_FILE,
};
use logic::glam::IVec3;
use logic::summary::describe;
use logic::{
    BiomeRegistry, Category, DecisionEngine, Outcome, Policy, PolicySnapshot, QueryContext,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "territorial")]
#[command(about = "Territorial rule file tool", long_about = None)]
struct Cli {
    /// Rule file. Defaults to TERRITORIAL_CONFIG, then config/territorial-rules.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Biome table (`[[biomes]]` TOML). Defaults to the built-in vanilla table
    #[arg(short, long, global = true)]
    biomes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    All,
    #[value(name = "plant_growth")]
    PlantGrowth,
    #[value(name = "animal_breeding")]
    AnimalBreeding,
}

impl Section {
    fn categories(self) -> &'static [Category] {
        match self {
            Section::All => &Category::ALL,
            Section::PlantGrowth => &[Category::Growth],
            Section::AnimalBreeding => &[Category::Breeding],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default rule file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Parse the rule file and report invalid rules
    Validate,

    /// List the loaded rules in plain text
    Rules {
        #[arg(value_enum, default_value = "all")]
        section: Section,
    },

    /// Decide a single event and explain the verdict
    Check {
        /// plant_growth or animal_breeding
        category: Category,

        /// Crop or animal id, e.g. minecraft:wheat
        subject: String,

        #[arg(long, default_value = "minecraft:plains")]
        biome: String,

        #[arg(long, default_value = "minecraft:overworld")]
        dimension: String,

        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i32,

        #[arg(long, default_value_t = 64, allow_hyphen_values = true)]
        y: i32,

        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        z: i32,
    },

    /// Run synthetic queries through the cache and print statistics
    Bench {
        /// Distinct positions queried
        #[arg(short, long, default_value_t = 2000)]
        positions: i32,

        /// Passes over the query set
        #[arg(short, long, default_value_t = 10)]
        iterations: u32,
    },

    /// Reload on file changes; reads `reload`, `stats`, `reset` or `quit` from stdin
    Watch {
        /// Debounce window in milliseconds
        #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
        debounce_ms: u64,
    },
}

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new(path),
        None => ConfigLoader::from_env(),
    };

    match cli.command {
        Commands::Init { force } => init(&loader, force),
        Commands::Validate => validate(&loader),
        Commands::Rules { section } => list_rules(&loader, section),
        Commands::Check {
            category,
            subject,
            biome,
            dimension,
            x,
            y,
            z,
        } => {
            let ctx = QueryContext::new(category, dimension, IVec3::new(x, y, z), biome, subject);
            check(&loader, cli.biomes, &ctx)
        }
        Commands::Bench {
            positions,
            iterations,
        } => bench(&loader, cli.biomes, positions, iterations),
        Commands::Watch { debounce_ms } => {
            watch(loader, cli.biomes, Duration::from_millis(debounce_ms))
        }
    }
}

fn biome_table(path: Option<PathBuf>) -> Result<BiomeRegistry> {
    match path {
        Some(path) => load_biomes(&path)
            .with_context(|| format!("Failed to load biome table {}", path.display())),
        None => Ok(vanilla_biomes()),
    }
}

fn read_rules(loader: &ConfigLoader) -> Result<PolicySnapshot> {
    loader
        .read()
        .with_context(|| format!("Failed to read rules from {}", loader.path().display()))
}

fn init(loader: &ConfigLoader, force: bool) -> Result<()> {
    let path = loader.path();
    if force && path.exists() {
        std::fs::write(path, DEFAULT_RULES_FILE)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Overwrote {}", path.display());
        return Ok(());
    }

    if loader.ensure_default()? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists (use --force to overwrite)", path.display());
    }
    Ok(())
}

fn validate(loader: &ConfigLoader) -> Result<()> {
    let snapshot = read_rules(loader)?;
    let summary = LoadSummary::of(&snapshot.rules);
    println!("{}: {}", loader.path().display(), summary);

    if summary.rejected > 0 {
        bail!("{} invalid rules (see warnings above)", summary.rejected);
    }
    Ok(())
}

fn list_rules(loader: &ConfigLoader, section: Section) -> Result<()> {
    let snapshot = read_rules(loader)?;

    for &category in section.categories() {
        let rules = snapshot.rules.rules(category);
        let enabled = snapshot.settings.controls(category);
        println!(
            "=== {} ({} rules{}) ===",
            category,
            rules.len(),
            if enabled { "" } else { ", control disabled" }
        );

        if rules.is_empty() {
            println!("No rules configured - always allowed");
        }

        for (i, rule) in rules.iter().enumerate() {
            println!("Rule {} (specificity {})", i + 1, rule.specificity());
            for line in describe(rule) {
                println!("  {line}");
            }
        }
        println!();
    }

    if snapshot.rules.rejected() > 0 {
        println!("{} invalid rules were skipped", snapshot.rules.rejected());
    }
    Ok(())
}

fn check(loader: &ConfigLoader, biomes: Option<PathBuf>, ctx: &QueryContext) -> Result<()> {
    let snapshot = read_rules(loader)?;
    let policy = Policy::new(snapshot, biome_table(biomes)?);
    let verdict = policy.explain(ctx);

    println!("{ctx}");
    match policy.biomes().get(&ctx.biome) {
        Some(info) => println!("Biome temperature: {}", info.temperature),
        None => println!("Biome {} is not in the biome table", ctx.biome),
    }
    println!("{verdict}");

    let snapshot = policy.snapshot();
    let rules = snapshot.rules.rules(ctx.category);
    let index = match verdict.outcome {
        Outcome::Selected { index, .. }
        | Outcome::DimensionWhitelist { index }
        | Outcome::DimensionBlacklist { index } => Some(index),
        _ => None,
    };
    if let Some(rule) = index.and_then(|i| rules.get(i)) {
        for line in describe(rule) {
            println!("  {line}");
        }
    }

    let matches = DecisionEngine::new(&snapshot, policy.biomes()).find_matches(ctx);
    if !matches.is_empty() {
        println!("Matching rules ({}):", matches.len());
        for (i, rule) in matches {
            println!(
                "  Rule {} (specificity {}, {})",
                i + 1,
                rule.specificity(),
                if rule.allows() { "allow" } else { "deny" }
            );
        }
    }
    Ok(())
}

fn bench(
    loader: &ConfigLoader,
    biomes: Option<PathBuf>,
    positions: i32,
    iterations: u32,
) -> Result<()> {
    let policy = Policy::new(read_rules(loader)?, biome_table(biomes)?);
    let biome_ids: Vec<String> = policy.biomes().ids().map(str::to_owned).collect();
    let subjects = [
        (Category::Growth, "minecraft:wheat"),
        (Category::Growth, "minecraft:carrots"),
        (Category::Breeding, "minecraft:cow"),
        (Category::Breeding, "minecraft:sheep"),
    ];
    if biome_ids.is_empty() {
        bail!("Biome table is empty");
    }

    let queries: Vec<QueryContext> = (0..positions.max(1))
        .map(|i| {
            let (category, subject) = subjects[i as usize % subjects.len()];
            let biome = &biome_ids[i as usize % biome_ids.len()];
            QueryContext::new(
                category,
                "minecraft:overworld",
                bench_position(i),
                biome.as_str(),
                subject,
            )
        })
        .collect();

    let start = Instant::now();
    let mut denied = 0usize;
    for _ in 0..iterations {
        for ctx in &queries {
            if !policy.decide_context(ctx) {
                denied += 1;
            }
        }
    }

    println!(
        "{} decisions in {:?} ({} denied)",
        queries.len() * iterations as usize,
        start.elapsed(),
        denied
    );
    println!("Cache capacity: {}", policy.cache_capacity());
    println!("{}", policy.performance_stats());
    Ok(())
}

/// Spread synthetic queries over a 4000 block square
fn bench_position(i: i32) -> IVec3 {
    IVec3::new(
        i.wrapping_mul(31).rem_euclid(4000) - 2000,
        64,
        i.wrapping_mul(17).rem_euclid(4000) - 2000,
    )
}

fn watch(loader: ConfigLoader, biomes: Option<PathBuf>, debounce: Duration) -> Result<()> {
    let policy = Policy::new(loader.load()?, biome_table(biomes)?);
    let reloader = Reloader::new(loader, policy.clone());
    let watcher = reloader.clone().watch(debounce)?;
    println!(
        "Watching {}; commands: reload, stats, reset, quit",
        reloader.loader().path().display()
    );

    for line in std::io::stdin().lock().lines() {
        match line?.trim() {
            "reload" => match reloader.reload() {
                Ok(summary) => println!("Reloaded: {summary}"),
                Err(err) => println!("Reload failed: {err}"),
            },
            "stats" => println!("{}", policy.performance_stats()),
            "reset" => {
                policy.reset_stats();
                println!("Statistics reset");
            }
            "quit" | "exit" => break,
            "" => {}
            other => println!("Unknown command: {other}"),
        }
    }

    watcher.stop();
    Ok(())
}
