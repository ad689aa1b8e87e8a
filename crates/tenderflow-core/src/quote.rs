//! Line items and the final quote payload.

use serde::{Deserialize, Serialize};

use crate::catalog::Recommendation;
use crate::pricing::{CommercialSummary, Pricing};
use crate::requirement::Requirement;
use crate::scoring::StrategicAnalysis;

/// One requirement paired with its matched product. Built by the matcher
/// with `pricing: None`; the pricing calculator fills it in afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub requirement: Requirement,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

impl LineItem {
    pub fn new(requirement: Requirement, recommendation: Recommendation) -> Self {
        Self {
            requirement,
            recommendation,
            pricing: None,
        }
    }
}

/// Final pipeline output: annotated line items, commercial totals, and the
/// pass-through technical/strategic summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    pub summary: String,
    pub strategic_analysis: StrategicAnalysis,
    pub line_items: Vec<LineItem>,
    pub commercial_summary: CommercialSummary,
    pub raw_text_snippet: String,
}
