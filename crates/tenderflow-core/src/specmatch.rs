//! Spec comparison policy for requirement/candidate attribute pairs.
//!
//! This is a demo heuristic, not a correctness guarantee: two values
//! "match" when one contains the other
//! case-insensitively, and a requirement value containing the token "not"
//! is treated as a wildcard (no constraint). Stricter unit- or range-aware
//! comparison is deliberately out of scope.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, Category};
use crate::requirement::Requirement;

/// Attributes compared when present on both sides. Extend here to widen the
/// comparison without touching the matcher.
pub const COMPARED_SPECS: &[&str] = &["voltage", "insulation"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecStatus {
    Match,
    Mismatch,
}

/// One row of a candidate's spec breakdown. `value` echoes the candidate's
/// attribute so the comparison table is readable on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecCheck {
    pub spec: String,
    pub status: SpecStatus,
    pub value: String,
}

/// Compare a requirement's specs against a candidate entry.
///
/// Only attributes in [`COMPARED_SPECS`] present on BOTH sides produce a
/// row; anything else is skipped. Service-category candidates get one
/// synthetic "Service Type" match row so service quotes are never penalised
/// for lacking cable attributes.
pub fn compare_specs(req: &Requirement, candidate: &CatalogEntry) -> Vec<SpecCheck> {
    let mut breakdown = Vec::new();

    for &key in COMPARED_SPECS {
        let (Some(req_value), Some(cand_value)) = (req.specs.get(key), candidate.specs.get(key))
        else {
            continue;
        };

        let status = if values_match(req_value, cand_value) {
            SpecStatus::Match
        } else {
            SpecStatus::Mismatch
        };
        breakdown.push(SpecCheck {
            spec: title_case(key),
            status,
            value: cand_value.clone(),
        });
    }

    if candidate.category == Category::Service {
        breakdown.push(SpecCheck {
            spec: "Service Type".to_string(),
            status: SpecStatus::Match,
            value: candidate.name.clone(),
        });
    }

    breakdown
}

/// Substring containment in either direction, case-insensitive; "not" in
/// the requirement value is a wildcard.
fn values_match(required: &str, candidate: &str) -> bool {
    let r = required.to_lowercase();
    let c = candidate.to_lowercase();
    r.contains("not") || c.contains(&r) || r.contains(&c)
}

/// "voltage" → "Voltage". Breakdown rows use the display form.
fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_entries;

    fn hv_cable() -> CatalogEntry {
        seed_entries().into_iter().next().unwrap()
    }

    #[test]
    fn exact_specs_all_match() {
        let req = Requirement::new("11kV cable")
            .with_spec("voltage", "11kV")
            .with_spec("insulation", "XLPE");

        let breakdown = compare_specs(&req, &hv_cable());
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].spec, "Voltage");
        assert_eq!(breakdown[0].status, SpecStatus::Match);
        assert_eq!(breakdown[1].spec, "Insulation");
        assert_eq!(breakdown[1].status, SpecStatus::Match);
    }

    #[test]
    fn containment_is_case_insensitive_both_directions() {
        assert!(values_match("xlpe", "XLPE"));
        assert!(values_match("11kV", "Voltage grade 11kv"));
        assert!(values_match("Voltage grade 11kv", "11kV"));
        assert!(!values_match("PVC", "XLPE"));
    }

    #[test]
    fn not_token_acts_as_wildcard() {
        assert!(values_match("not specified", "XLPE"));
        assert!(values_match("Not Applicable", "anything"));
    }

    #[test]
    fn mismatched_insulation_flagged() {
        let req = Requirement::new("cable")
            .with_spec("voltage", "11kV")
            .with_spec("insulation", "PVC");

        let breakdown = compare_specs(&req, &hv_cable());
        assert_eq!(breakdown[0].status, SpecStatus::Match);
        assert_eq!(breakdown[1].status, SpecStatus::Mismatch);
        // Candidate value is echoed, not the requirement's.
        assert_eq!(breakdown[1].value, "XLPE");
    }

    #[test]
    fn no_comparable_keys_yields_empty_breakdown() {
        let req = Requirement::new("something").with_spec("cores", "3");
        let breakdown = compare_specs(&req, &hv_cable());
        assert!(breakdown.is_empty(), "cores is not a compared attribute");
    }

    #[test]
    fn service_candidates_get_synthetic_row() {
        let service = seed_entries()
            .into_iter()
            .find(|e| e.sku == "SVC-CLOUD-001")
            .unwrap();
        let req = Requirement::new("cloud hosting");

        let breakdown = compare_specs(&req, &service);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].spec, "Service Type");
        assert_eq!(breakdown[0].status, SpecStatus::Match);
        assert_eq!(breakdown[0].value, service.name);
    }
}
