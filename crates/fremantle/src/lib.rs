#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod screener;
pub mod universe;

// Re-export main types from sub-crates
pub use fremantle_data as data;
pub use fremantle_metrics as metrics;
pub use fremantle_output as output;

pub use error::{Result, ScreenError};
pub use screener::{ScreenRequest, Screener};
pub use universe::{
    CandidateFilter, NO_MATCH_EXPLANATION, ProfileUniverse, PropertyType, Universe,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
