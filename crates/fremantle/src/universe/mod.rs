//! Candidate universes for the screener.
//!
//! A universe is the set of REIT profiles a screen starts from. Descriptive
//! filters narrow it to candidates before any metric is computed.

pub mod candidate;
pub mod property;

pub use candidate::{CandidateFilter, NO_MATCH_EXPLANATION};
pub use property::PropertyType;

use fremantle_data::{ProfileSource, ReitProfile};
use std::collections::{BTreeMap, BTreeSet};

/// Trait for ticker universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().iter().any(|s| s == symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

/// Universe backed by stored REIT profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUniverse {
    profiles: Vec<ReitProfile>,
}

impl ProfileUniverse {
    /// Create a universe from profiles, keeping their order.
    pub const fn new(profiles: Vec<ReitProfile>) -> Self {
        Self { profiles }
    }

    /// Load every profile from `source`.
    pub fn load<S: ProfileSource + ?Sized>(source: &S) -> fremantle_data::Result<Self> {
        Ok(Self::new(source.fetch_profiles()?))
    }

    /// All profiles.
    pub fn profiles(&self) -> &[ReitProfile] {
        &self.profiles
    }

    /// Look up one profile.
    pub fn get(&self, ticker: &str) -> Option<&ReitProfile> {
        self.profiles.iter().find(|p| p.ticker == ticker)
    }

    /// Profiles passing `filter`, in universe order.
    pub fn filter(&self, filter: &CandidateFilter) -> Vec<ReitProfile> {
        self.profiles
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.profiles
            .iter()
            .filter_map(|p| p.country_region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of profiles per classified property type.
    ///
    /// A profile listing several types counts once toward each.
    pub fn property_type_counts(&self) -> BTreeMap<PropertyType, usize> {
        let mut counts = BTreeMap::new();
        for profile in &self.profiles {
            let label = profile.property_type.as_deref().unwrap_or_default();
            for t in PropertyType::parse_list(label) {
                *counts.entry(t).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Profiles whose property type label matches no known type.
    pub fn unclassified(&self) -> Vec<&ReitProfile> {
        self.profiles
            .iter()
            .filter(|p| {
                PropertyType::parse_list(p.property_type.as_deref().unwrap_or_default()).is_empty()
            })
            .collect()
    }
}

impl Universe for ProfileUniverse {
    fn symbols(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.ticker.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> ProfileUniverse {
        ProfileUniverse::new(vec![
            ReitProfile::new("AVB")
                .with_country("United States")
                .with_property_type("Apartments"),
            ReitProfile::new("PLD")
                .with_country("United States")
                .with_property_type("Industrial, Data Centers"),
            ReitProfile::new("REI.UN")
                .with_country("Canada")
                .with_property_type("Retail Centers, Residential"),
            ReitProfile::new("FARM"),
        ])
    }

    #[test]
    fn test_universe_trait() {
        let universe = universe();
        assert!(universe.contains("PLD"));
        assert!(!universe.contains("NOTREAL"));
        assert_eq!(universe.size(), 4);
        assert_eq!(universe.get("AVB").unwrap().ticker, "AVB");
    }

    #[test]
    fn test_filter_keeps_order() {
        let filtered = universe().filter(&CandidateFilter::new().with_country("United States"));
        let tickers: Vec<_> = filtered.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(tickers, ["AVB", "PLD"]);
    }

    #[test]
    fn test_property_type_counts() {
        let counts = universe().property_type_counts();
        assert_eq!(counts.get(&PropertyType::Residential), Some(&2));
        assert_eq!(counts.get(&PropertyType::Industrial), Some(&1));
        assert_eq!(counts.get(&PropertyType::DataCenter), Some(&1));
        assert_eq!(counts.get(&PropertyType::Retail), Some(&1));
        assert_eq!(counts.get(&PropertyType::Office), None);
    }

    #[test]
    fn test_unclassified_and_countries() {
        let universe = universe();
        let unclassified: Vec<_> = universe.unclassified().iter().map(|p| p.ticker.clone()).collect();
        assert_eq!(unclassified, ["FARM"]);
        assert_eq!(universe.countries(), ["Canada", "United States"]);
    }
}
