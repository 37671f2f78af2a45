use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;

use rusty_bars::data::loader;
use rusty_bars::{Layout, Pipeline, PipelineConfig, PipelineError, Preset};

fn footprint_csv(rows: &[(&str, i32, &str, &str)]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Entity,Year,footprint_ratio,source").unwrap();
    for (entity, year, ratio, source) in rows {
        writeln!(file, "{entity},{year},{ratio},{source}").unwrap();
    }
    file
}

fn diverging_for(file: &NamedTempFile) -> PipelineConfig {
    PipelineConfig {
        source: file.path().to_str().unwrap().to_string(),
        seed: Some(11),
        ..PipelineConfig::preset(Preset::Diverging)
    }
}

#[test]
fn sample_larger_than_countries_keeps_all() {
    let file = footprint_csv(&[
        ("Chad", 2012, "0.4", "solar"),
        ("Peru", 2012, "-0.2", "solar"),
        ("Peru", 2012, "0.3", "oil"),
        ("Kenya", 2014, "1.1", "wind"),
        ("Japan", 2015, "-0.7", "oil"),
        ("Norway", 2016, "0.2", "hydro"),
    ]);
    let chart = Pipeline::new(diverging_for(&file)).unwrap().run().unwrap();

    assert_eq!(chart.layout, Layout::Stacked);
    assert_eq!(chart.category_domain.len(), 5);
    assert_eq!(chart.category_domain[..2], ["Japan", "Peru"]);
    assert_eq!(chart.series_domain, vec!["solar", "oil", "wind", "hydro"]);
}

#[test]
fn seeded_sample_is_reproducible() {
    let countries = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];
    let rows: Vec<(&str, i32, &str, &str)> =
        countries.iter().map(|c| (*c, 2015, "0.5", "oil")).collect();
    let file = footprint_csv(&rows);
    let pipeline = Pipeline::new(diverging_for(&file)).unwrap();

    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();
    assert_eq!(first.category_domain.len(), 10);
    assert_eq!(first, second);

    let raw = loader::load(file.path().to_str().unwrap()).unwrap();
    let a = pipeline
        .run_rows_with(&raw, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let b = pipeline
        .run_rows_with(&raw, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn dropped_rows_are_reported() {
    let file = footprint_csv(&[
        ("Chad", 2012, "0.4", "solar"),
        ("Chad", 2021, "0.4", "oil"),
        ("Chad", 2020, "-1", "wind"),
        ("Chad", 2010, "", "coal"),
    ]);
    let chart = Pipeline::new(diverging_for(&file)).unwrap().run().unwrap();

    assert_eq!(chart.report.read, 4);
    assert_eq!(chart.report.kept, 1);
    assert_eq!(chart.report.dropped_total(), 3);

    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["report"]["dropped"]["year_out_of_range"], 1);
    assert_eq!(json["report"]["dropped"]["sentinel"], 1);
    assert_eq!(json["report"]["dropped"]["missing"], 1);
}

#[test]
fn missing_file_aborts_with_load_error() {
    let config = PipelineConfig {
        source: "/no/such/dir/data.csv".into(),
        ..PipelineConfig::preset(Preset::Diverging)
    };
    let err = Pipeline::new(config).unwrap().run().unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));
}

#[test]
fn test_chart_starts_at_zero() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Year,Count").unwrap();
    writeln!(file, "2008,120").unwrap();
    writeln!(file, "2009,80").unwrap();

    let config = PipelineConfig {
        source: file.path().to_str().unwrap().to_string(),
        ..PipelineConfig::preset(Preset::Test)
    };
    let chart = Pipeline::new(config).unwrap().run().unwrap();
    assert_eq!(chart.category_domain, vec!["2008", "2009"]);
    assert_eq!(chart.value_domain, [0.0, 120.0]);
    assert_eq!(chart.series[0].fill.as_deref(), Some("#4e79a7"));
}
