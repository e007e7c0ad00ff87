//! Catalog Resolve CLI - show how URLs would be resolved
//!
//! Prints the tier and the ordered candidate types the resolution engine
//! would attempt for each URL. Nothing is fetched.
//!
//! Usage:
//!     catalog-resolve https://example.com/data.geojson
//!     catalog-resolve --config resolver.json https://example.com/ows?service=wms
//!     catalog-resolve --json --no-defaults --config resolver.json URL...

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use catalog_core::{ResolutionEngine, ResolutionPlan, ResolverConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "catalog-resolve")]
#[command(about = "Show which catalog member types would be tried for a URL")]
#[command(version)]
struct Args {
    /// URLs to plan
    #[arg(required = true)]
    urls: Vec<String>,

    /// Path to a resolver configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave out the builtin rule table
    #[arg(long)]
    no_defaults: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "catalog_core=debug" } else { "catalog_core=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => match ResolverConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                process::exit(1);
            }
        },
        None => ResolverConfig::default(),
    };
    if args.no_defaults {
        config.include_default_rules = false;
    }

    let rules = match config.build_rule_set() {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error building rules: {}", e);
            process::exit(1);
        }
    };
    tracing::debug!(rules = rules.len(), "rule set built");

    let engine = ResolutionEngine::new(Arc::new(rules));
    let plans: Vec<ResolutionPlan> = args.urls.iter().map(|url| engine.plan(url)).collect();

    if args.json {
        match serde_json::to_string_pretty(&plans) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error rendering JSON: {}", e);
                process::exit(1);
            }
        }
    } else {
        for plan in &plans {
            output_plan(plan);
        }
    }
}

fn output_plan(plan: &ResolutionPlan) {
    println!("{}", plan.url);
    match plan.tier {
        None => println!("  no rule matched"),
        Some(tier) => {
            println!("  tier: {}", tier);
            for (i, candidate) in plan.candidates.iter().enumerate() {
                println!(
                    "  {}. {} (rule #{}: {})",
                    i + 1,
                    candidate.type_id,
                    candidate.rule_order,
                    candidate.rule
                );
            }
        }
    }
    println!();
}
