//! Pipeline configuration: one explicit object instead of per-script
//! constants. Load it from JSON or start from a built-in preset.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chart::{BarOptions, ChartFields, Layout, StackOrder};
use crate::color::{ColorRamp, Palette};
use crate::data::filter::DropRules;
use crate::data::schema::{ColumnSpec, Roles, Schema};

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CSV path, or `-` for stdin.
    pub source: String,
    pub schema: Schema,
    #[serde(default)]
    pub rules: DropRules,
    /// Number of category groups to keep. `None` keeps all.
    #[serde(default)]
    pub sample_size: Option<usize>,
    /// Fixes the sample. `None` draws from OS entropy on every run.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub stack_order: StackOrder,
    #[serde(default = "default_headroom")]
    pub headroom: f64,
    #[serde(default)]
    pub include_zero: bool,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub ramp: ColorRamp,
}

fn default_headroom() -> f64 {
    1.0
}

/// The chart variants shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Footprint ratio per country, stacked by energy source.
    Diverging,
    /// Relative consumption/production ratio of renewables, one bar per
    /// country, coloured by relative production.
    DivergingRelative,
    /// Solar share of US electricity per year, coloured by oil share.
    Sequential,
    /// Releases per year.
    Test,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Diverging,
        Preset::DivergingRelative,
        Preset::Sequential,
        Preset::Test,
    ];
}

impl PipelineConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Diverging => Self {
                source: "data/generated_consumption_production_by_source.csv".into(),
                schema: Schema {
                    columns: vec![
                        ColumnSpec::text("Entity", "country"),
                        ColumnSpec::number("Year", "year"),
                        ColumnSpec::number("footprint_ratio", "footprint"),
                        ColumnSpec::text("source", "source"),
                    ],
                    roles: Roles {
                        category: "country".into(),
                        series: Some("source".into()),
                        value: "footprint".into(),
                        year: Some("year".into()),
                        color: None,
                    },
                },
                rules: DropRules {
                    min_year: Some(2010.0),
                    max_year: Some(2020.0),
                    ..Default::default()
                },
                sample_size: Some(10),
                ..Self::base()
            },
            Preset::DivergingRelative => Self {
                source: "data/transformed/generated_consumption_production_by_source.csv".into(),
                schema: Schema {
                    columns: vec![
                        ColumnSpec::text("entity", "country"),
                        ColumnSpec::number("year", "year"),
                        ColumnSpec::number("cp_ratio", "cp_ratio"),
                        ColumnSpec::number(
                            "cp_ratio_relative_to_source",
                            "cp_ratio_relative_to_source",
                        ),
                        ColumnSpec::text("source", "source"),
                        ColumnSpec::text("renewable", "renewable"),
                        ColumnSpec::number(
                            "consumption_relative_to_source",
                            "consumption_relative_to_source",
                        ),
                        ColumnSpec::number(
                            "production_relative_to_source",
                            "production_relative_to_source",
                        ),
                    ],
                    roles: Roles {
                        category: "country".into(),
                        series: Some("source".into()),
                        value: "cp_ratio_relative_to_source".into(),
                        year: Some("year".into()),
                        color: Some("production_relative_to_source".into()),
                    },
                },
                rules: DropRules {
                    min_year: Some(2010.0),
                    max_year: Some(2010.0),
                    sentinel: None,
                    target_series: Some("agg_renew".into()),
                    ..Default::default()
                },
                sample_size: Some(10),
                layout: Layout::Bars,
                ramp: ColorRamp::RdYlGn,
                ..Self::base()
            },
            Preset::Sequential => Self {
                source: "data/share-elec-produc-by-source.csv".into(),
                schema: Schema {
                    columns: vec![
                        ColumnSpec::number("Year", "year"),
                        ColumnSpec::number("Hydro (% electricity)", "hydro"),
                        ColumnSpec::number("Solar (% electricity)", "solar"),
                        ColumnSpec::number("Wind (% electricity)", "wind"),
                        ColumnSpec::number("Other renewables (% electricity)", "other"),
                        ColumnSpec::number("Oil (% electricity)", "oil"),
                    ],
                    roles: Roles {
                        category: "year".into(),
                        series: None,
                        value: "solar".into(),
                        year: Some("year".into()),
                        color: Some("oil".into()),
                    },
                },
                rules: DropRules {
                    min_year: Some(2010.0),
                    max_year: Some(2020.0),
                    sentinel: None,
                    target_entity: Some("United States".into()),
                    entity_column: Some("Entity".into()),
                    ..Default::default()
                },
                layout: Layout::Bars,
                headroom: 1.1,
                ..Self::base()
            },
            Preset::Test => Self {
                source: "data/videogames_NDSsold2008byconsole.csv".into(),
                schema: Schema {
                    columns: vec![
                        ColumnSpec::number("Year", "sales_year"),
                        ColumnSpec::number("Count", "total_releases"),
                    ],
                    roles: Roles {
                        category: "sales_year".into(),
                        series: None,
                        value: "total_releases".into(),
                        year: None,
                        color: None,
                    },
                },
                rules: DropRules {
                    sentinel: None,
                    ..Default::default()
                },
                layout: Layout::Bars,
                include_zero: true,
                ..Self::base()
            },
        }
    }

    fn base() -> Self {
        Self {
            source: String::new(),
            schema: Schema {
                columns: Vec::new(),
                roles: Roles {
                    category: String::new(),
                    series: None,
                    value: String::new(),
                    year: None,
                    color: None,
                },
            },
            rules: DropRules::default(),
            sample_size: None,
            seed: None,
            layout: Layout::default(),
            stack_order: StackOrder::default(),
            headroom: default_headroom(),
            include_zero: false,
            palette: Palette::default(),
            ramp: ColorRamp::default(),
        }
    }

    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn fields(&self) -> ChartFields {
        let roles = &self.schema.roles;
        ChartFields {
            category: roles.category.clone(),
            series: roles.series.clone(),
            value: roles.value.clone(),
            color: roles.color.clone(),
        }
    }

    pub fn bar_options(&self) -> BarOptions {
        BarOptions {
            headroom: self.headroom,
            include_zero: self.include_zero,
        }
    }
}
