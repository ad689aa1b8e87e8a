//! Catalog storage: the ProductIndex search seam and its LanceDB backend.

mod error;
mod index;

pub use error::StoreError;
pub use index::{ProductIndex, SearchHit};

#[cfg(feature = "lancedb")]
mod lance;
#[cfg(feature = "lancedb")]
pub use lance::CatalogStore;
