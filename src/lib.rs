//! rusty-bars: CSV rows to chart-ready bar series.
//!
//! A run loads a CSV resource, translates and filters each row against a
//! schema, groups rows by category (optionally keeping a seeded random
//! sample of groups) and lays them out as diverging stacked bars or plain
//! bars. The resulting [`ChartData`] carries every domain, extent and fill a
//! renderer needs.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;


pub use chart::{ChartData, Layout, StackOrder};
pub use config::{PipelineConfig, Preset};
pub use error::{LoadError, PipelineError, SchemaError};
pub use pipeline::Pipeline;
