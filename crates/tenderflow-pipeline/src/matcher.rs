//! Per-requirement candidate retrieval and selection.

use std::sync::Arc;

use tracing::warn;

use tenderflow_core::{
    CandidateMatch, LineItem, Recommendation, Requirement, compare_specs, score_from_distance,
};
use tenderflow_store::ProductIndex;

/// Candidates retrieved per requirement.
pub const TOP_K: usize = 3;
/// Best scores below this are downgraded to the NO_MATCH sentinel.
pub const ACCEPT_THRESHOLD: u8 = 20;

/// Matches requirements against the product catalog.
///
/// Never fails: catalog errors become the DB_ERROR sentinel so one bad
/// requirement cannot abort the document pipeline.
#[derive(Clone)]
pub struct Matcher {
    index: Arc<dyn ProductIndex>,
}

impl Matcher {
    pub fn new(index: Arc<dyn ProductIndex>) -> Self {
        Self { index }
    }

    /// Produce an unpriced line item for one requirement.
    pub async fn match_requirement(&self, requirement: &Requirement) -> LineItem {
        let recommendation = self.recommend(requirement).await;
        LineItem::new(requirement.clone(), recommendation)
    }

    async fn recommend(&self, requirement: &Requirement) -> Recommendation {
        let hits = match self.index.search(&requirement.search_text(), TOP_K).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(requirement = %requirement.name, error = %e, "catalog search failed");
                return Recommendation::db_error();
            }
        };

        if hits.is_empty() {
            return Recommendation::no_match(0, Vec::new());
        }

        let candidates: Vec<CandidateMatch> = hits
            .iter()
            .enumerate()
            .map(|(idx, hit)| CandidateMatch {
                rank: idx as u32 + 1,
                sku: hit.entry.sku.clone(),
                name: hit.entry.name.clone(),
                description: hit.entry.details.clone(),
                price: Some(hit.entry.price),
                category: Some(hit.entry.category.clone()),
                match_score: score_from_distance(hit.distance),
                spec_breakdown: compare_specs(requirement, &hit.entry),
            })
            .collect();

        // Strict comparison keeps the earliest retrieval rank on ties.
        let mut best = 0;
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.match_score > candidates[best].match_score {
                best = i;
            }
        }

        let winner = &candidates[best];
        if winner.match_score < ACCEPT_THRESHOLD {
            let top_score = winner.match_score;
            return Recommendation::no_match(top_score, candidates);
        }

        Recommendation {
            sku: winner.sku.clone(),
            name: winner.name.clone(),
            description: winner.description.clone(),
            price: winner.price,
            category: winner.category.clone(),
            match_score: winner.match_score,
            comparison_table: candidates,
        }
    }
}
