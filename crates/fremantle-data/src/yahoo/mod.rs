//! Yahoo Finance data providers.

pub mod prices;

pub use prices::YahooPriceProvider;
