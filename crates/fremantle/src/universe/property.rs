//! REIT property sector classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Property sectors a REIT can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyType {
    /// Apartments and multifamily
    Residential,

    /// Single family rental houses
    SingleFamily,

    /// Manufactured housing communities
    ManufacturedHomes,

    /// Warehouses and logistics
    Industrial,

    /// Office buildings
    Office,

    /// Data centers
    DataCenter,

    /// Hotels and resorts
    Lodging,

    /// Shopping centers and malls
    Retail,

    /// Senior housing and health care communities
    HealthCare,

    /// Medical office and hospital facilities
    Medical,

    /// Life science laboratories
    LifeScience,

    /// Self storage
    SelfStorage,

    /// Towers, fiber and energy infrastructure
    Infrastructure,

    /// Timberland
    Timber,

    /// Other specialty assets
    Specialty,

    /// Mixed portfolios
    Diversified,
}

// Checked in order: more specific labels first so that "Medical Office"
// classifies as medical rather than office.
const KEYWORDS: [(PropertyType, &[&str]); 16] = [
    (PropertyType::LifeScience, &["life science", "laboratory", "lab space"]),
    (PropertyType::Medical, &["medical", "hospital"]),
    (PropertyType::DataCenter, &["data center", "data centre"]),
    (PropertyType::SingleFamily, &["single family"]),
    (PropertyType::ManufacturedHomes, &["manufactured", "mobile home"]),
    (PropertyType::SelfStorage, &["storage"]),
    (PropertyType::HealthCare, &["health care", "healthcare", "senior"]),
    (PropertyType::Lodging, &["hotel", "resort", "lodging", "hospitality"]),
    (PropertyType::Industrial, &["industrial", "logistics", "warehouse"]),
    (PropertyType::Office, &["office"]),
    (PropertyType::Retail, &["retail", "shopping", "mall"]),
    (PropertyType::Residential, &["residential", "apartment", "multifamily", "multi family"]),
    (PropertyType::Infrastructure, &["infrastructure", "tower", "fiber"]),
    (PropertyType::Timber, &["timber"]),
    (PropertyType::Diversified, &["diversified"]),
    (PropertyType::Specialty, &["specialty", "speciality"]),
];

impl PropertyType {
    /// Returns all property types.
    pub fn all() -> Vec<Self> {
        KEYWORDS.iter().map(|(t, _)| *t).collect()
    }

    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::SingleFamily => "Single Family Houses",
            Self::ManufacturedHomes => "Manufactured Homes",
            Self::Industrial => "Industrial",
            Self::Office => "Office",
            Self::DataCenter => "Data Centers",
            Self::Lodging => "Hotels/Resorts",
            Self::Retail => "Retail",
            Self::HealthCare => "Health Care",
            Self::Medical => "Medical Facilities",
            Self::LifeScience => "Life Science Laboratories",
            Self::SelfStorage => "Self Storage",
            Self::Infrastructure => "Infrastructure",
            Self::Timber => "Timber",
            Self::Specialty => "Specialty",
            Self::Diversified => "Diversified",
        }
    }

    /// Classify a single free-text label such as `"Apartments"` or
    /// `"Industrial Assets"`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = normalize(label);
        if normalized.is_empty() {
            return None;
        }
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| normalized.contains(w)))
            .map(|(t, _)| *t)
    }

    /// Classify every entry of a comma or semicolon separated label.
    ///
    /// Unrecognized entries are skipped and duplicates collapse.
    pub fn parse_list(label: &str) -> Vec<Self> {
        let mut types: Vec<Self> = Vec::new();
        for t in label.split([',', ';']).filter_map(Self::parse) {
            if !types.contains(&t) {
                types.push(t);
            }
        }
        types
    }
}

fn normalize(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_all_types() {
        let types = PropertyType::all();
        assert_eq!(types.len(), 16);
        let mut unique = types.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), types.len());
    }

    #[rstest]
    #[case("Apartments", Some(PropertyType::Residential))]
    #[case("Industrial Assets", Some(PropertyType::Industrial))]
    #[case("Office Buildings", Some(PropertyType::Office))]
    #[case("Data Centers", Some(PropertyType::DataCenter))]
    #[case("Single Family Houses", Some(PropertyType::SingleFamily))]
    #[case("single-family residential", Some(PropertyType::SingleFamily))]
    #[case("Hotels/Resorts", Some(PropertyType::Lodging))]
    #[case("Retail Centers", Some(PropertyType::Retail))]
    #[case("Health Care Communities", Some(PropertyType::HealthCare))]
    #[case("Self Storage", Some(PropertyType::SelfStorage))]
    #[case("Infrastructure", Some(PropertyType::Infrastructure))]
    #[case("Manufactured Homes", Some(PropertyType::ManufacturedHomes))]
    #[case("Specialty", Some(PropertyType::Specialty))]
    #[case("Timber", Some(PropertyType::Timber))]
    #[case("Medical Office", Some(PropertyType::Medical))]
    #[case("Life Science Laboratories", Some(PropertyType::LifeScience))]
    #[case("  ", None)]
    #[case("Farmland", None)]
    fn test_parse(#[case] label: &str, #[case] expected: Option<PropertyType>) {
        assert_eq!(PropertyType::parse(label), expected);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            PropertyType::parse_list("Residential, Industrial; apartments, Farmland"),
            vec![PropertyType::Residential, PropertyType::Industrial]
        );
        assert!(PropertyType::parse_list("").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PropertyType::Lodging), "Hotels/Resorts");
    }

    #[test]
    fn test_names_classify_as_themselves() {
        for t in PropertyType::all() {
            assert_eq!(PropertyType::parse(t.name()), Some(t), "{t}");
        }
    }
}
