#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fremantle/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod import;
pub mod source;
pub mod store;
pub mod types;
pub mod yahoo;

pub use error::{DataError, Result};
pub use source::{FundamentalsSource, ProfileSource};
pub use store::{SqliteStore, StoreStats};
pub use types::{LineItemObservation, PriceObservation, ReitProfile, StatementKind};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
