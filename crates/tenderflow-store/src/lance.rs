//! LanceDB storage for the product catalog.
//!
//! One table, `product_catalog`, keyed by SKU: product columns, the specs
//! map serialized as a JSON string, and an embedding column over
//! `"{name} - {details}"`. The database directory persists across process
//! restarts; re-seeding merge-inserts rather than duplicating rows.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, FixedSizeListBuilder, Float32Array, Float32Builder, Float64Array, RecordBatchIterator,
    StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use tracing::info;

use tenderflow_ai::TextEmbedder;
use tenderflow_core::CatalogEntry;

use crate::index::{ProductIndex, SearchHit};
use crate::StoreError;

const CATALOG_TABLE: &str = "product_catalog";

/// LanceDB-backed [`ProductIndex`].
///
/// The embedder is fixed at open time; all rows in a database must come
/// from the same embedder or distances are meaningless.
pub struct CatalogStore {
    db: lancedb::Connection,
    embedder: Arc<dyn TextEmbedder>,
}

impl CatalogStore {
    /// Connect to a LanceDB database at the given path, creating the
    /// directory if needed.
    pub async fn open(path: &Path, embedder: Arc<dyn TextEmbedder>) -> Result<Self, StoreError> {
        let uri = path
            .to_str()
            .ok_or_else(|| StoreError::Other("non-UTF8 database path".into()))?;
        let db = lancedb::connect(uri).execute().await?;
        Ok(Self { db, embedder })
    }

    /// Rows currently in the catalog table (0 before first seeding).
    pub async fn count(&self) -> Result<usize, StoreError> {
        let table = match self.db.open_table(CATALOG_TABLE).execute().await {
            Ok(table) => table,
            Err(lancedb::Error::TableNotFound { .. }) => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        Ok(table.count_rows(None).await?)
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("sku", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("details", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
            Field::new("specs", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.embedder.dim() as i32,
                ),
                true,
            ),
        ]))
    }

    /// Build one RecordBatch for the given entries, embeddings included.
    fn entries_to_batch(&self, entries: &[CatalogEntry]) -> Result<RecordBatch, StoreError> {
        let mut skus = Vec::with_capacity(entries.len());
        let mut names = Vec::with_capacity(entries.len());
        let mut details = Vec::with_capacity(entries.len());
        let mut categories = Vec::with_capacity(entries.len());
        let mut prices = Vec::with_capacity(entries.len());
        let mut specs = Vec::with_capacity(entries.len());
        let mut emb_builder =
            FixedSizeListBuilder::new(Float32Builder::new(), self.embedder.dim() as i32);

        for entry in entries {
            skus.push(entry.sku.as_str());
            names.push(entry.name.as_str());
            details.push(entry.details.as_str());
            categories.push(entry.category.as_str());
            prices.push(entry.price);
            specs.push(serde_json::to_string(&entry.specs).unwrap_or_else(|_| "{}".to_string()));

            let embedding = self
                .embedder
                .embed(&format!("{} - {}", entry.name, entry.details))?;
            let values = emb_builder.values();
            for value in embedding {
                values.append_value(value);
            }
            emb_builder.append(true);
        }

        let batch = RecordBatch::try_new(
            self.schema(),
            vec![
                Arc::new(StringArray::from(skus)),
                Arc::new(StringArray::from(names)),
                Arc::new(StringArray::from(details)),
                Arc::new(StringArray::from(categories)),
                Arc::new(Float64Array::from(prices)),
                Arc::new(StringArray::from(
                    specs.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                )),
                Arc::new(emb_builder.finish()),
            ],
        )?;
        Ok(batch)
    }
}

#[async_trait]
impl ProductIndex for CatalogStore {
    /// Merge-insert entries by SKU: existing rows are updated, new rows
    /// inserted. Seeding twice with the same SKU set leaves the row count
    /// unchanged.
    async fn upsert(&self, entries: &[CatalogEntry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let batch = self.entries_to_batch(entries)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![batch].into_iter().map(Ok), schema);

        let existing = self.db.table_names().execute().await?;
        if existing.contains(&CATALOG_TABLE.to_string()) {
            let table = self.db.open_table(CATALOG_TABLE).execute().await?;
            let mut merge = table.merge_insert(&["sku"]);
            merge
                .when_matched_update_all(None)
                .when_not_matched_insert_all();
            merge.execute(Box::new(reader)).await?;
        } else {
            self.db
                .create_table(CATALOG_TABLE, Box::new(reader))
                .execute()
                .await?;
        }

        info!(count = entries.len(), "upserted catalog entries");
        Ok(())
    }

    /// Embed the query and return the `k` nearest entries by ascending
    /// distance. An unseeded store yields no hits rather than an error.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, StoreError> {
        let query_vector = self.embedder.embed(query)?;

        let table = match self.db.open_table(CATALOG_TABLE).execute().await {
            Ok(table) => table,
            Err(lancedb::Error::TableNotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let batches: Vec<RecordBatch> = table
            .vector_search(query_vector.as_slice())?
            .limit(k)
            .execute()
            .await?
            .try_collect()
            .await?;

        let mut hits = Vec::new();
        for batch in &batches {
            for row in 0..batch.num_rows() {
                hits.push(hit_from_row(batch, row)?);
            }
        }
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}

fn hit_from_row(batch: &RecordBatch, row: usize) -> Result<SearchHit, StoreError> {
    let specs_json = column_str(batch, "specs", row)?;
    let specs: BTreeMap<String, String> = serde_json::from_str(specs_json).unwrap_or_default();

    let entry = CatalogEntry {
        sku: column_str(batch, "sku", row)?.to_string(),
        name: column_str(batch, "name", row)?.to_string(),
        details: column_str(batch, "details", row)?.to_string(),
        category: column_str(batch, "category", row)?.to_string().into(),
        price: column_f64(batch, "price", row)?,
        specs,
    };

    let distance = batch
        .column_by_name("_distance")
        .and_then(|col| col.as_any().downcast_ref::<Float32Array>())
        .map(|arr| arr.value(row))
        .ok_or_else(|| StoreError::Other("search result missing _distance column".into()))?;

    Ok(SearchHit { entry, distance })
}

fn column_str<'a>(batch: &'a RecordBatch, name: &str, row: usize) -> Result<&'a str, StoreError> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<StringArray>())
        .map(|arr| arr.value(row))
        .ok_or_else(|| StoreError::Other(format!("missing or non-utf8 column '{name}'")))
}

fn column_f64(batch: &RecordBatch, name: &str, row: usize) -> Result<f64, StoreError> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<Float64Array>())
        .map(|arr| arr.value(row))
        .ok_or_else(|| StoreError::Other(format!("missing or non-f64 column '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tenderflow_ai::HashingEmbedder;
    use tenderflow_core::{Category, seed_entries};

    async fn open_store(tmp: &TempDir) -> CatalogStore {
        let db_path = tmp.path().join("catalog_db");
        CatalogStore::open(&db_path, Arc::new(HashingEmbedder::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_empty_database() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_before_seeding_returns_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        let hits = store.search("anything", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;

        store.upsert(&seed_entries()).await.unwrap();
        let count1 = store.count().await.unwrap();
        assert_eq!(count1, 5);

        store.upsert(&seed_entries()).await.unwrap();
        let count2 = store.count().await.unwrap();
        assert_eq!(count1, count2, "re-seeding must not duplicate SKUs");
    }

    #[tokio::test]
    async fn search_returns_entries_with_specs() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        store.upsert(&seed_entries()).await.unwrap();

        let hits = store
            .search("Enterprise Cloud Hosting & Managed Services - Secure cloud hosting", 3)
            .await
            .unwrap();
        assert!(!hits.is_empty());
        assert!(hits.len() <= 3);

        // Ordered by ascending distance.
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }

        let cloud = hits
            .iter()
            .find(|h| h.entry.sku == "SVC-CLOUD-001")
            .expect("cloud hosting entry should be retrieved");
        assert_eq!(cloud.entry.category, Category::Service);
        assert_eq!(cloud.entry.specs["type"], "Cloud");
        assert_eq!(cloud.entry.price, 12000.0);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_sku() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        store.upsert(&seed_entries()).await.unwrap();

        let mut updated = seed_entries();
        updated[0].price = 4999.0;
        store.upsert(&updated[..1]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 5);

        let query = format!("{} - {}", updated[0].name, updated[0].details);
        let hits = store.search(&query, 3).await.unwrap();
        let hv = hits
            .iter()
            .find(|h| h.entry.sku == "CABLE-HV-001")
            .expect("updated entry should be retrieved");
        assert_eq!(hv.entry.price, 4999.0);
    }
}
