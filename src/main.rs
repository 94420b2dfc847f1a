use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use probable_prime::{is_probable_prime, search, CandidateShape};

#[derive(Parser)]
#[command(name = "probable-prime", about = "Generate and test probable primes")]
struct Cli {
    /// Miller-Rabin rounds; a composite survives with probability <= 2^-certainty
    #[arg(long, env = "PRIME_CERTAINTY", default_value_t = 20)]
    certainty: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print random probable primes, one per line
    Gen {
        /// Maximum bit length (exact with --exact)
        #[arg(long, allow_negative_numbers = true)]
        bits: i64,
        /// How many primes to print
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Force the top bit so every prime has exactly --bits bits
        #[arg(long)]
        exact: bool,
    },
    /// Test a decimal number
    Check {
        value: String,
    },
    /// Time repeated searches and print a RESULT line
    Bench {
        #[arg(long)]
        bits: i64,
        #[arg(long, default_value_t = 10)]
        reps: usize,
        #[arg(long)]
        exact: bool,
    },
}

fn shape(exact: bool) -> CandidateShape {
    if exact {
        CandidateShape::Exact
    } else {
        CandidateShape::AtMost
    }
}

fn avg(d: Duration, n: usize) -> Duration {
    if n == 0 { d } else { Duration::from_nanos((d.as_nanos() / n as u128) as u64) }
}

fn run_bench(bits: i64, certainty: usize, reps: usize, exact: bool) -> Result<()> {
    let mut rng = OsRng.unwrap_err();
    let mut total = Duration::ZERO;
    let mut candidates = 0usize;

    for _ in 0..reps {
        let t = Instant::now();
        let found = search(bits, certainty, shape(exact), &mut rng)?;
        total += t.elapsed();
        candidates += found.candidates;
    }

    let avg_candidates = if reps == 0 { 0.0 } else { candidates as f64 / reps as f64 };
    println!(
        "RESULT,bits={},certainty={},exact={},reps={},avg_ms={:.3},avg_candidates={:.1}",
        bits,
        certainty,
        exact,
        reps,
        avg(total, reps).as_secs_f64() * 1e3,
        avg_candidates,
    );
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if std::env::var("LOG_FORMAT").unwrap_or_default() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let mut rng = OsRng.unwrap_err();

    match cli.command {
        Commands::Gen { bits, count, exact } => {
            info!(bits, count, exact, certainty = cli.certainty, "generating primes");
            for _ in 0..count {
                let found = search(bits, cli.certainty, shape(exact), &mut rng)
                    .with_context(|| format!("cannot search for a {bits}-bit prime"))?;
                println!("{}", found.prime);
            }
        }
        Commands::Check { value } => {
            let n: BigUint = value
                .trim()
                .parse()
                .with_context(|| format!("not a non-negative decimal integer: {value:?}"))?;
            if is_probable_prime(&n, cli.certainty, &mut rng) {
                println!("probably prime");
            } else {
                println!("composite");
            }
        }
        Commands::Bench { bits, reps, exact } => run_bench(bits, cli.certainty, reps, exact)?,
    }

    Ok(())
}
