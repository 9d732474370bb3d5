#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod filter;
pub mod observations;
pub mod period;
pub mod policy;
pub mod registry;
pub mod row;
pub mod series;

pub use engine::MetricEngine;
pub use error::{ConfigError, MetricError, Result};
pub use filter::{FilterSet, MetricBounds};
pub use observations::{ObservationSet, TickerObservations};
pub use period::{FISCAL_YEARS, PeriodIndex, QuarterPeriod};
pub use policy::CalculationPolicy;
pub use registry::{MetricCategory, MetricDefinition, MetricRegistry, default_metrics};
pub use row::{MetricValue, TickerMetricRow};
pub use series::{AlignedSeries, SeriesResolver};
