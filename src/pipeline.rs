//! Loader → RowFilter → Grouper → SeriesBuilder, run once per input.

use std::io::Read;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chart::{build_bars, build_stack, ChartData, Layout};
use crate::color::ColorMap;
use crate::config::PipelineConfig;
use crate::data::filter::{FilterReport, RowFilter};
use crate::data::group::Grouping;
use crate::data::loader;
use crate::data::model::RawRow;
use crate::error::{PipelineError, SchemaError};

/// A validated configuration, ready to run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    filter: RowFilter,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        if config.layout == Layout::Stacked && config.schema.roles.series.is_none() {
            return Err(SchemaError::MissingSeries.into());
        }
        let filter = RowFilter::new(config.schema.clone(), config.rules.clone())?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured source and build the chart.
    pub fn run(&self) -> Result<ChartData, PipelineError> {
        let rows = loader::load(&self.config.source)?;
        self.run_rows(&rows)
    }

    pub fn run_reader<R: Read>(
        &self,
        reader: R,
        delimiter: u8,
    ) -> Result<ChartData, PipelineError> {
        let rows = loader::load_reader(reader, delimiter)?;
        self.run_rows(&rows)
    }

    /// Build from already loaded rows, sampling with the configured seed.
    pub fn run_rows(&self, raw: &[RawRow]) -> Result<ChartData, PipelineError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_rows_with(raw, &mut rng)
    }

    /// Build from already loaded rows with a caller-supplied random source.
    pub fn run_rows_with<R: Rng + ?Sized>(
        &self,
        raw: &[RawRow],
        rng: &mut R,
    ) -> Result<ChartData, PipelineError> {
        let (rows, report) = self.filter.apply(raw);
        info!(
            "kept {} of {} rows ({} dropped)",
            report.kept,
            report.read,
            report.dropped_total()
        );
        let no_data = |report: &FilterReport| PipelineError::NoData {
            read: report.read,
            kept: report.kept,
        };
        if rows.is_empty() {
            warn!("every row was dropped");
            return Err(no_data(&report));
        }

        let fields = self.config.fields();
        let mut grouping = Grouping::by(rows, &fields.category);
        info!("{} groups by '{}'", grouping.len(), grouping.field);
        if let Some(n) = self.config.sample_size {
            grouping = grouping.sample(n, rng);
        }
        let rows = grouping.into_rows();

        let mut chart = match self.config.layout {
            Layout::Stacked => build_stack(&rows, &fields, self.config.stack_order),
            Layout::Bars => build_bars(&rows, &fields, self.config.bar_options()),
        };
        if chart.is_empty() {
            warn!("nothing left to draw after sampling");
            return Err(no_data(&report));
        }

        self.paint(&mut chart);
        chart.report = report;
        Ok(chart)
    }

    fn paint(&self, chart: &mut ChartData) {
        if let Some(domain) = chart.color_domain {
            for point in chart.series.iter_mut().flat_map(|s| s.points.iter_mut()) {
                point.fill = point
                    .color_value
                    .map(|v| self.config.ramp.scaled(v, domain));
            }
            return;
        }

        let colors = ColorMap::new(
            chart.series_domain.iter().map(String::as_str),
            self.config.palette,
        );
        for series in &mut chart.series {
            series.fill = Some(colors.color_for(&series.key).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::data::filter::DropReason;

    const FOOTPRINT: &str = "\
Entity,Year,footprint_ratio,source
A,2015,-2,solar
A,2015,3,oil
B,2015,1,solar
B,2009,5,oil
C,2015,-0.5,oil
";

    fn diverging() -> PipelineConfig {
        PipelineConfig {
            seed: Some(3),
            ..PipelineConfig::preset(Preset::Diverging)
        }
    }

    #[test]
    fn builds_stacked_chart_with_legend_colors() {
        let pipeline = Pipeline::new(diverging()).unwrap();
        let chart = pipeline.run_reader(FOOTPRINT.as_bytes(), b',').unwrap();

        assert_eq!(chart.report.read, 5);
        assert_eq!(chart.report.kept, 4);
        assert_eq!(chart.category_domain, vec!["A", "C", "B"]);
        assert_eq!(chart.series_domain, vec!["solar", "oil"]);
        assert_eq!(chart.extent_of("A", "solar"), Some((-2.0, 0.0)));
        assert_eq!(chart.extent_of("A", "oil"), Some((0.0, 3.0)));
        assert_eq!(chart.value_domain, [-2.0, 3.0]);
        assert_eq!(chart.series("solar").unwrap().fill.as_deref(), Some("#4e79a7"));
    }

    #[test]
    fn all_rows_dropped_is_no_data() {
        let pipeline = Pipeline::new(diverging()).unwrap();
        let csv = "Entity,Year,footprint_ratio,source\nA,1990,1,oil\n";
        let err = pipeline.run_reader(csv.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, PipelineError::NoData { read: 1, kept: 0 }));
    }

    #[test]
    fn zero_sample_is_no_data() {
        let config = PipelineConfig {
            sample_size: Some(0),
            ..diverging()
        };
        let err = Pipeline::new(config)
            .unwrap()
            .run_reader(FOOTPRINT.as_bytes(), b',')
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoData { .. }));
    }

    #[test]
    fn sentinel_row_never_reaches_the_chart() {
        let csv = "Entity,Year,footprint_ratio,source\nA,2015,-2,solar\nC,2015,-1,oil\n";
        let chart = Pipeline::new(diverging())
            .unwrap()
            .run_reader(csv.as_bytes(), b',')
            .unwrap();
        assert_eq!(chart.report.kept, 1);
        assert_eq!(chart.report.dropped.get(&DropReason::Sentinel), Some(&1));
        assert_eq!(chart.category_domain, vec!["A"]);
    }

    #[test]
    fn series_target_without_series_role_is_rejected() {
        let mut config = PipelineConfig::preset(Preset::Test);
        config.rules.target_series = Some("nope".into());
        let err = Pipeline::new(config).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(SchemaError::MissingSeries)));
    }

    #[test]
    fn year_bounds_without_year_role_are_rejected() {
        let mut config = PipelineConfig::preset(Preset::Test);
        config.rules.min_year = Some(2009.0);
        let err = Pipeline::new(config).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(SchemaError::MissingYear)));
    }

    #[test]
    fn stacked_layout_requires_series() {
        let mut config = diverging();
        config.schema.roles.series = None;
        let err = Pipeline::new(config).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(SchemaError::MissingSeries)));
    }

    #[test]
    fn sequential_bars_are_colored_by_measure() {
        let csv = "\
Entity,Year,Hydro (% electricity),Solar (% electricity),Wind (% electricity),Other renewables (% electricity),Oil (% electricity)
United States,2010,6.2,0.1,2.3,1.4,0.9
Canada,2010,60,0.1,1.5,1.4,1.0
United States,2011,7.8,0.2,2.9,1.4,0.7
United States,2021,6.1,2.8,9.1,1.5,0.5
";
        let pipeline = Pipeline::new(PipelineConfig::preset(Preset::Sequential)).unwrap();
        let chart = pipeline.run_reader(csv.as_bytes(), b',').unwrap();

        assert_eq!(chart.category_domain, vec!["2010", "2011"]);
        assert_eq!(chart.color_domain, Some([0.7, 0.9]));
        let points = &chart.series[0].points;
        assert_eq!(points[0].fill.as_deref(), Some("#800026"));
        assert_eq!(points[1].fill.as_deref(), Some("#ffffcc"));
        assert!((chart.value_domain[1] - 0.22).abs() < 1e-12);
    }
}
