use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use brewer::{BrewConfig, BrewError, Brewer, DuplicatePolicy, RecipeSource};

/// Random samples drawn by --all when the recipe cannot be enumerated.
const FALLBACK_SAMPLES: usize = 1000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recipe file
    #[arg(value_name = "RECIPE")]
    recipe: String,

    /// Number of strings to generate
    #[arg(short = 'n', long, value_name = "COUNT")]
    count: Option<usize>,

    /// Minimum candidate length
    #[arg(long, value_name = "N")]
    min: Option<usize>,

    /// Maximum candidate length
    #[arg(long, value_name = "N")]
    max: Option<usize>,

    /// Print every string the recipe can produce
    #[arg(short = 'a', long)]
    all: bool,

    /// Seed for reproducible output
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Attempts allowed to meet --min/--max
    #[arg(long, value_name = "N", default_value_t = 100)]
    attempts: usize,

    /// Reject recipes that define an ingredient twice
    #[arg(long)]
    strict_duplicates: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = BrewConfig {
        attempts: args.attempts,
        duplicates: if args.strict_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::LastWins
        },
        ..BrewConfig::default()
    };
    let brewer = Brewer::new(RecipeSource::FromPath(args.recipe.clone().into()), config)
        .with_context(|| format!("Failed to load recipe {}", args.recipe))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if args.all {
        match brewer.generate_all() {
            Ok(strings) => {
                for s in strings.take(args.count.unwrap_or(usize::MAX)) {
                    println!("{s}");
                }
                return Ok(());
            }
            Err(BrewError::UnboundedPattern) => {
                log::info!(
                    "{} is unbounded; sampling {} strings instead",
                    args.recipe,
                    args.count.unwrap_or(FALLBACK_SAMPLES)
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    let count = args.count.unwrap_or(if args.all { FALLBACK_SAMPLES } else { 1 });
    for _ in 0..count {
        let synthesis = brewer.generate_with(&mut rng, args.min, args.max);
        if !synthesis.satisfied {
            log::warn!(
                "length bounds not met after {} attempts",
                synthesis.attempts
            );
        }
        println!("{}", synthesis.text);
    }
    Ok(())
}
