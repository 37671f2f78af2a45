use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;

use rusty_bars::{Pipeline, PipelineConfig, Preset};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Diverging,
    DivergingRelative,
    Sequential,
    Test,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Diverging => Preset::Diverging,
            PresetArg::DivergingRelative => Preset::DivergingRelative,
            PresetArg::Sequential => Preset::Sequential,
            PresetArg::Test => Preset::Test,
        }
    }
}

#[derive(Parser)]
#[command(name = "rusty-bars")]
#[command(about = "Turn a CSV dataset into chart-ready bar series (JSON)")]
#[command(after_help = "PRESETS:\n  \
    diverging           footprint ratio per country, stacked by source, 2010-2020\n  \
    diverging-relative  renewables cp ratio per country for 2010\n  \
    sequential          US solar share per year, coloured by oil share\n  \
    test                releases per year\n\n\
Set RUST_LOG=info (or debug) to see filter and sampling decisions.")]
struct Args {
    /// Built-in chart variant (default: diverging)
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// JSON pipeline config, used instead of a preset
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// CSV path, or '-' for stdin (overrides the configured source)
    #[arg(short, long)]
    input: Option<String>,

    /// Number of categories to sample
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for the category sample
    #[arg(long)]
    seed: Option<u64>,

    /// Inclusive lower year bound
    #[arg(long)]
    min_year: Option<f64>,

    /// Inclusive upper year bound
    #[arg(long)]
    max_year: Option<f64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Print the effective config and exit
    #[arg(long)]
    dump_config: bool,
}

impl Args {
    fn config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::preset(self.preset.map_or(Preset::Diverging, Preset::from)),
        };
        if let Some(input) = &self.input {
            config.source = input.clone();
        }
        if self.sample.is_some() {
            config.sample_size = self.sample;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.min_year.is_some() {
            config.rules.min_year = self.min_year;
        }
        if self.max_year.is_some() {
            config.rules.max_year = self.max_year;
        }
        Ok(config)
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>, pretty: bool) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.config()?;
    if args.dump_config {
        return write_json(&config, args.output.as_ref(), true);
    }

    let source = config.source.clone();
    let pipeline = Pipeline::new(config).context("invalid pipeline config")?;
    let chart = pipeline
        .run()
        .with_context(|| format!("building chart from {source}"))?;
    info!(
        "{} categories, {} series, value domain {:?}",
        chart.category_domain.len(),
        chart.series_domain.len(),
        chart.value_domain
    );

    write_json(&chart, args.output.as_ref(), args.pretty)
}
