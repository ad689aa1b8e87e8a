//! Extracted RFP requirements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single scope-of-supply line item extracted from an RFP document.
///
/// Produced by the requirement extractor and consumed read-only by the
/// matcher. `specs` holds free-form attribute pairs (e.g. `voltage: 11kV`);
/// only the attributes named in [`crate::specmatch::COMPARED_SPECS`] take
/// part in candidate comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    /// Requested quantity; documents that omit it are treated as quantity 1.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

fn default_quantity() -> f64 {
    1.0
}

impl Requirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            specs: BTreeMap::new(),
        }
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.insert(key.into(), value.into());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Text used to query the catalog index: name plus all spec values.
    pub fn search_text(&self) -> String {
        let mut text = self.name.clone();
        for value in self.specs.values() {
            text.push(' ');
            text.push_str(value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let req: Requirement =
            serde_json::from_str(r#"{"name": "11kV XLPE Cable", "specs": {"voltage": "11kV"}}"#)
                .unwrap();
        assert_eq!(req.quantity, 1.0);
        assert_eq!(req.specs["voltage"], "11kV");
    }

    #[test]
    fn specs_default_to_empty() {
        let req: Requirement = serde_json::from_str(r#"{"name": "Cable", "quantity": 5}"#).unwrap();
        assert!(req.specs.is_empty());
        assert_eq!(req.quantity, 5.0);
    }

    #[test]
    fn search_text_joins_name_and_spec_values() {
        let req = Requirement::new("Power Cable")
            .with_spec("voltage", "11kV")
            .with_spec("insulation", "XLPE");
        let text = req.search_text();
        assert!(text.starts_with("Power Cable"));
        assert!(text.contains("11kV"));
        assert!(text.contains("XLPE"));
    }
}
