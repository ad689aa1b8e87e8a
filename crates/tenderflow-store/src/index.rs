//! The similarity-search seam the matcher consumes.

use async_trait::async_trait;

use tenderflow_core::CatalogEntry;

use crate::StoreError;

/// One nearest-neighbour result. Smaller distance means closer match.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: CatalogEntry,
    pub distance: f32,
}

/// Product catalog with nearest-neighbour text search.
///
/// `upsert` is idempotent by SKU; `search` returns up to `k` hits ordered
/// by ascending distance. Object-safe so the matcher can run against an
/// in-memory fake in tests.
#[async_trait]
pub trait ProductIndex: Send + Sync {
    async fn upsert(&self, entries: &[CatalogEntry]) -> Result<(), StoreError>;

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, StoreError>;
}
