//! Vector store abstraction for Kural.
//!
//! Provides a trait-based interface over the persisted index of embedded
//! couplets. The index is rebuilt wholesale from the corpus; there is no
//! incremental update path.

mod sqlite;

pub use sqlite::SqliteKuralStore;

use crate::corpus::KuralRecord;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A kural stored in the vector index: the corpus record plus its embedding.
#[derive(Debug, Clone)]
pub struct IndexedKural {
    /// The full corpus record, carried as retrievable metadata.
    pub record: KuralRecord,
    /// Embedding of the bilingual couplet text.
    pub embedding: Vec<f32>,
    /// When this record was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedKural {
    /// Create an indexed kural stamped with the current time.
    pub fn new(record: KuralRecord, embedding: Vec<f32>) -> Self {
        Self {
            record,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with similarity score.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched kural.
    pub kural: IndexedKural,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// Trait for kural index implementations.
#[async_trait]
pub trait KuralStore: Send + Sync {
    /// Replace the entire index contents in one transaction.
    async fn replace_all(&self, kurals: &[IndexedKural]) -> Result<usize>;

    /// Return the `limit` nearest kurals to the query embedding.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>>;

    /// Exact-match lookup by corpus ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<IndexedKural>>;

    /// Number of indexed kurals.
    async fn count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
