//! keyspace — exhaustive keyspace search from the command line.
//!
//! Usage:
//!   cargo run --release -- 4711 --preset digits --max-length 4
//!   cargo run --release -- abC9 --preset alnum --max-length 4 --threads 8
//!   cargo run --release -- xyz --alphabet zyx --max-length 3

use std::time::Duration;

use clap::Parser;
use log::info;

use keyspace::{format_count, Alphabet, Estimate, LogReporter, Preset};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "keyspace")]
#[command(about = "Exhaustive parallel keyspace search")]
#[command(version)]
struct Args {
    /// String to search for
    target: String,

    /// Named alphabet: 1/digits, 2/letters, 3/alnum, 4/all
    #[arg(short, long, default_value = "alnum", conflicts_with = "alphabet")]
    preset: String,

    /// Custom alphabet, in enumeration order
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Longest candidate length to try
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    max_length: u16,

    /// Worker threads (default: logical CPU count)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Assumed candidates per second for the up-front estimate
    #[arg(long, default_value_t = keyspace::DEFAULT_ASSUMED_RATE)]
    estimate_rate: f64,

    /// Minimum milliseconds between progress lines
    #[arg(long, default_value = "500")]
    progress_interval: u64,
}

fn build_alphabet(args: &Args) -> anyhow::Result<Alphabet> {
    match &args.alphabet {
        Some(custom) => Ok(Alphabet::new(custom)?),
        None => Ok(Preset::from_choice(&args.preset)?.into()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let alphabet = build_alphabet(&args)?;
    let max_length = usize::from(args.max_length);
    info!("alphabet: {} symbols, max length {}", alphabet.len(), max_length);

    let total = keyspace::indexer::total_combinations(alphabet.len(), max_length)
        .ok_or_else(|| anyhow::anyhow!("search space too large to count"))?;
    println!("Total combinations up to length {}: {}", max_length, format_count(total));
    println!(
        "Estimated time at {} candidates/s:\n{}",
        format_count(args.estimate_rate as u128),
        Estimate::at_rate(total, args.estimate_rate)
    );

    let mut builder = keyspace::search(args.target.as_str())
        .alphabet(alphabet)
        .max_length(max_length)
        .reporter(LogReporter::new(Duration::from_millis(args.progress_interval)));
    if let Some(threads) = args.threads {
        builder = builder.threads(threads);
    }

    let result = builder.run()?;

    println!();
    println!("{}", "=".repeat(50));
    match &result.candidate {
        Some(candidate) => println!("Found: {candidate}"),
        None => println!("Not found"),
    }
    println!("Total time: {:.2}s", result.elapsed.as_secs_f64());
    println!("Tested: {}", format_count(result.tested_total));
    println!(
        "Average rate: {} candidates/s",
        format_count(result.average_rate as u128)
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset_and_length() {
        let args = Args::try_parse_from(["keyspace", "42", "--preset", "1", "--max-length", "2"]).unwrap();
        assert_eq!(args.max_length, 2);
        assert_eq!(build_alphabet(&args).unwrap(), Alphabet::from(Preset::Digits));
    }

    #[test]
    fn test_custom_alphabet() {
        let args = Args::try_parse_from(["keyspace", "ba", "-a", "ab", "-m", "2"]).unwrap();
        assert_eq!(build_alphabet(&args).unwrap().to_string(), "ab");
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(Args::try_parse_from(["keyspace", "x", "--max-length", "0"]).is_err());
    }

    #[test]
    fn test_unknown_preset_is_an_error() {
        let args = Args::try_parse_from(["keyspace", "x", "-p", "hex", "-m", "1"]).unwrap();
        assert!(build_alphabet(&args).is_err());
    }

    #[test]
    fn test_duplicate_custom_symbols_rejected() {
        let args = Args::try_parse_from(["keyspace", "x", "-a", "xx", "-m", "1"]).unwrap();
        assert!(build_alphabet(&args).is_err());
    }
}
