#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod table;

pub use export::{BASE_COLUMNS, ExportError, ExportFormat, Exporter, ScreenResponse};
pub use report::{MISSING, format_value, render_definitions, render_table};
pub use table::{MetricSummary, summarize, to_dataframe};
