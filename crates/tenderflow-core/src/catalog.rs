//! Product catalog entries and per-query match records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::specmatch::SpecCheck;

/// Sentinel SKU for a requirement no catalog entry could satisfy.
pub const NO_MATCH_SKU: &str = "NO_MATCH";
/// Sentinel SKU emitted when the catalog index itself is unavailable.
pub const DB_ERROR_SKU: &str = "DB_ERROR";

/// Product category. Stored as a plain string in the catalog; unknown
/// values survive round-trips instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Cable,
    Service,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cable => "Cable",
            Self::Service => "Service",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Cable" => Self::Cable,
            "Service" => Self::Service,
            _ => Self::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

/// One product in the catalog. SKUs are unique within the store; seeding
/// the same SKU twice upserts rather than duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    pub details: String,
    pub category: Category,
    pub price: f64,
    /// Structured attributes, serialized to a JSON string inside the store's
    /// metadata and deserialized again on retrieval.
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

/// One retrieved candidate, scored against a requirement. Ephemeral —
/// produced per query for the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// 1-based retrieval rank.
    pub rank: u32,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<Category>,
    /// Distance-derived score, clamped to [0, 100].
    pub match_score: u8,
    pub spec_breakdown: Vec<SpecCheck>,
}

/// The matcher's selection for one requirement: either a real catalog
/// product or a sentinel (`NO_MATCH`, `DB_ERROR`), always carrying the full
/// comparison table when one was computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub match_score: u8,
    #[serde(default)]
    pub comparison_table: Vec<CandidateMatch>,
}

impl Recommendation {
    /// No candidate cleared the acceptance threshold. `match_score` carries
    /// the best individual candidate score for transparency.
    pub fn no_match(match_score: u8, comparison_table: Vec<CandidateMatch>) -> Self {
        Self {
            sku: NO_MATCH_SKU.to_string(),
            name: "No suitable product found".to_string(),
            description: String::new(),
            price: None,
            category: None,
            match_score,
            comparison_table,
        }
    }

    /// The catalog index could not be queried at all.
    pub fn db_error() -> Self {
        Self {
            sku: DB_ERROR_SKU.to_string(),
            name: "Catalog index not available".to_string(),
            description: String::new(),
            price: None,
            category: None,
            match_score: 0,
            comparison_table: Vec::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sku == NO_MATCH_SKU || self.sku == DB_ERROR_SKU
    }
}

/// The fixed demo catalog: two cable products and three service offerings.
pub fn seed_entries() -> Vec<CatalogEntry> {
    fn specs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    vec![
        CatalogEntry {
            sku: "CABLE-HV-001".into(),
            name: "11kV XLPE Power Cable 3C x 300sqmm".into(),
            details: "High Tension aluminum cable, XLPE insulation, galvanized steel strip armour. Voltage: 11kV.".into(),
            category: Category::Cable,
            price: 4500.0,
            specs: specs(&[
                ("voltage", "11kV"),
                ("insulation", "XLPE"),
                ("cores", "3"),
                ("armouring", "Strip"),
            ]),
        },
        CatalogEntry {
            sku: "CABLE-LV-002".into(),
            name: "1.1kV PVC Control Cable 12C x 1.5sqmm".into(),
            details: "Low Voltage copper control cable, PVC insulated, unarmoured. Voltage: 1.1kV.".into(),
            category: Category::Cable,
            price: 850.0,
            specs: specs(&[
                ("voltage", "1.1kV"),
                ("insulation", "PVC"),
                ("cores", "12"),
                ("armouring", "Unarmoured"),
            ]),
        },
        CatalogEntry {
            sku: "SVC-CLOUD-001".into(),
            name: "Enterprise Cloud Hosting & Managed Services".into(),
            details: "Secure cloud hosting on AWS/Azure, inclusive of 24/7 monitoring, OS patching, and uptime SLA 99.9%.".into(),
            category: Category::Service,
            price: 12000.0,
            specs: specs(&[("type", "Cloud"), ("sla", "99.9%"), ("platform", "AWS/Azure")]),
        },
        CatalogEntry {
            sku: "SVC-DEV-002".into(),
            name: "Custom Portal Development".into(),
            details: "Software development services for web portals, e-RCS systems, and dashboard customization.".into(),
            category: Category::Service,
            price: 25000.0,
            specs: specs(&[
                ("type", "Development"),
                ("domain", "Web Portal"),
                ("customization", "Yes"),
            ]),
        },
        CatalogEntry {
            sku: "SVC-AMC-003".into(),
            name: "Annual Maintenance Contract (AMC) - Software".into(),
            details: "Post-deployment maintenance, bug fixes, and minor enhancements for 1 year.".into(),
            category: Category::Service,
            price: 5000.0,
            specs: specs(&[
                ("type", "Support"),
                ("duration", "1 Year"),
                ("coverage", "Bug Fixes"),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_string_roundtrip() {
        let json = serde_json::to_string(&Category::Cable).unwrap();
        assert_eq!(json, r#""Cable""#);

        let parsed: Category = serde_json::from_str(r#""Service""#).unwrap();
        assert_eq!(parsed, Category::Service);

        let unknown: Category = serde_json::from_str(r#""Hardware""#).unwrap();
        assert_eq!(unknown, Category::Other("Hardware".into()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), r#""Hardware""#);
    }

    #[test]
    fn seed_catalog_has_unique_skus() {
        let entries = seed_entries();
        assert_eq!(entries.len(), 5);

        let mut skus: Vec<&str> = entries.iter().map(|e| e.sku.as_str()).collect();
        skus.sort_unstable();
        skus.dedup();
        assert_eq!(skus.len(), 5, "seed SKUs must be unique");
    }

    #[test]
    fn catalog_entry_json_roundtrip() {
        let entry = &seed_entries()[0];
        let json = serde_json::to_string(entry).unwrap();
        let parsed: CatalogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sku, "CABLE-HV-001");
        assert_eq!(parsed.category, Category::Cable);
        assert_eq!(parsed.specs["voltage"], "11kV");
    }

    #[test]
    fn sentinel_recommendations() {
        let nm = Recommendation::no_match(15, Vec::new());
        assert_eq!(nm.sku, NO_MATCH_SKU);
        assert_eq!(nm.match_score, 15);
        assert!(nm.is_sentinel());
        assert!(nm.price.is_none());

        let db = Recommendation::db_error();
        assert_eq!(db.sku, DB_ERROR_SKU);
        assert_eq!(db.match_score, 0);
        assert!(db.is_sentinel());
    }
}
