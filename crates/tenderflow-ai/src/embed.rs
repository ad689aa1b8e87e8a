//! Text embedding seam and the offline hashing implementation.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::AiError;

/// Produces normalized embedding vectors for similarity search.
///
/// Implementations must return unit-length vectors of `dim()` components so
/// the store's squared L2 distances stay bounded to [0, 4], with close
/// matches well under the matcher's 1.5 score ceiling.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, AiError>;

    /// Embedding dimensionality.
    fn dim(&self) -> usize;
}

/// Deterministic feature-hashed bag-of-tokens embedder.
///
/// The always-available fallback when no sentence-transformer model is
/// configured: each lowercase alphanumeric token is hashed into one of
/// `dim` signed buckets and the result is L2-normalized. Texts sharing
/// tokens land measurably closer than disjoint texts, which is enough for
/// the demo catalog; it is not a semantic model.
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashingEmbedder {
    /// Same dimensionality as all-MiniLM-L6-v2 so stores are layout
    /// compatible across embedder choices.
    fn default() -> Self {
        Self::new(384)
    }
}

impl TextEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, AiError> {
        let mut vector = vec![0.0f32; self.dim];

        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash % self.dim as u64) as usize;
            // Signed buckets keep colliding tokens from always reinforcing.
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        normalize(&mut vector);
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Lowercase alphanumeric token stream.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// L2-normalize a vector in place.
pub(crate) fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
