use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write a synthetic consumption/production-by-source CSV.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV path
    #[arg(default_value = "sample_data.csv")]
    output: PathBuf,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Fraction of rows written with the -1 sentinel ratio
    #[arg(long, default_value = "0.03")]
    sentinel_rate: f64,

    /// Fraction of rows written with an empty ratio cell
    #[arg(long, default_value = "0.02")]
    missing_rate: f64,
}

const COUNTRIES: [&str; 14] = [
    "Argentina",
    "Australia",
    "Brazil",
    "Canada",
    "Chad",
    "Germany",
    "India",
    "Japan",
    "Kenya",
    "Norway",
    "Peru",
    "Poland",
    "United States",
    "Vietnam",
];

/// (source, typical log-ratio centre)
const SOURCES: [(&str, f64); 6] = [
    ("coal", 0.2),
    ("gas", 0.1),
    ("oil", 0.4),
    ("hydro", -0.1),
    ("solar", -0.3),
    ("wind", -0.2),
];

/// Footprint is reported as a signed relative deviation: consumption over
/// production, minus one.
fn footprint(rng: &mut StdRng, centre: f64) -> f64 {
    let log_ratio = centre + rng.gen_range(-0.6..0.6);
    log_ratio.exp() - 1.0
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["Entity", "Year", "footprint_ratio", "source"])?;

    let mut rows = 0usize;
    for country in COUNTRIES {
        for year in 2005..=2022 {
            let year = year.to_string();
            for (source, centre) in SOURCES {
                let roll: f64 = rng.gen();
                let ratio = if roll < args.sentinel_rate {
                    "-1".to_string()
                } else if roll < args.sentinel_rate + args.missing_rate {
                    String::new()
                } else {
                    format!("{:.3}", footprint(&mut rng, centre))
                };
                writer.write_record([country, year.as_str(), ratio.as_str(), source])?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", args.output.display());
    Ok(())
}
