//! SQLite-based kural index implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust. The corpus is small
//! (1,330 rows) so a full scan per query is acceptable; for larger datasets
//! consider the sqlite-vec extension or a dedicated vector database.

use super::{cosine_similarity, IndexedKural, KuralStore, SearchHit};
use crate::corpus::KuralRecord;
use crate::error::{KuralError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kurals (
    id INTEGER PRIMARY KEY,
    kural_tamil TEXT NOT NULL,
    kural_english TEXT NOT NULL,
    paal TEXT NOT NULL,
    adhigaram TEXT NOT NULL,
    iyal TEXT NOT NULL,
    meaning_tamil TEXT NOT NULL,
    meaning_english TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_kurals_paal ON kurals(paal);
"#;

/// SQLite-based kural store.
pub struct SqliteKuralStore {
    conn: Mutex<Connection>,
}

impl SqliteKuralStore {
    /// Open (or create) the index database at the given path.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite kural store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KuralError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_kural(row: &Row<'_>) -> rusqlite::Result<IndexedKural> {
        let embedding_bytes: Vec<u8> = row.get(8)?;
        let indexed_at_str: String = row.get(9)?;

        Ok(IndexedKural {
            record: KuralRecord {
                id: row.get(0)?,
                kural_tamil: row.get(1)?,
                kural_english: row.get(2)?,
                paal: row.get(3)?,
                adhigaram: row.get(4)?,
                iyal: row.get(5)?,
                meaning_tamil: row.get(6)?,
                meaning_english: row.get(7)?,
            },
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

const SELECT_COLUMNS: &str = "id, kural_tamil, kural_english, paal, adhigaram, iyal, \
                              meaning_tamil, meaning_english, embedding, indexed_at";

#[async_trait]
impl KuralStore for SqliteKuralStore {
    #[instrument(skip_all, fields(count = kurals.len()))]
    async fn replace_all(&self, kurals: &[IndexedKural]) -> Result<usize> {
        let conn = self.lock_conn()?;

        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM kurals", [])?;

        for kural in kurals {
            let r = &kural.record;
            tx.execute(
                r#"
                INSERT INTO kurals
                (id, kural_tamil, kural_english, paal, adhigaram, iyal,
                 meaning_tamil, meaning_english, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    r.id,
                    r.kural_tamil,
                    r.kural_english,
                    r.paal,
                    r.adhigaram,
                    r.iyal,
                    r.meaning_tamil,
                    r.meaning_english,
                    Self::embedding_to_bytes(&kural.embedding),
                    kural.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Replaced index contents with {} kurals", kurals.len());
        Ok(kurals.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM kurals", SELECT_COLUMNS))?;
        let kurals = stmt.query_map([], Self::row_to_kural)?;

        let mut results: Vec<SearchHit> = kurals
            .filter_map(|k| k.ok())
            .map(|kural| {
                let score = cosine_similarity(query_embedding, &kural.embedding);
                SearchHit { kural, score }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching kurals", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<IndexedKural>> {
        let conn = self.lock_conn()?;

        let result = conn.query_row(
            &format!("SELECT {} FROM kurals WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            Self::row_to_kural,
        );

        match result {
            Ok(kural) => Ok(Some(kural)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.lock_conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kurals", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_kural(id: i64, paal: &str, embedding: Vec<f32>) -> IndexedKural {
        IndexedKural::new(
            KuralRecord {
                id,
                kural_tamil: format!("தமிழ் குறள் {}", id),
                kural_english: format!("English couplet {}", id),
                paal: paal.to_string(),
                adhigaram: "கடவுள் வாழ்த்து".to_string(),
                iyal: "பாயிரவியல்".to_string(),
                meaning_tamil: format!("தமிழ் பொருள் {}", id),
                meaning_english: format!("English meaning {}", id),
            },
            embedding,
        )
    }

    #[tokio::test]
    async fn test_replace_and_lookup() {
        let store = SqliteKuralStore::in_memory().unwrap();

        let kurals = vec![
            sample_kural(1, "Arathuppaal", vec![1.0, 0.0, 0.0]),
            sample_kural(2, "Porutpaal", vec![0.0, 1.0, 0.0]),
        ];
        assert_eq!(store.replace_all(&kurals).await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let found = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.record.id, 1);
        assert_eq!(found.record.kural_tamil, kurals[0].record.kural_tamil);
        assert_eq!(found.record.kural_english, kurals[0].record.kural_english);
        assert_eq!(found.record.meaning_english, "English meaning 1");
        assert_eq!(found.embedding, vec![1.0, 0.0, 0.0]);

        assert!(store.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_all_is_wholesale() {
        let store = SqliteKuralStore::in_memory().unwrap();

        let first = vec![sample_kural(1, "Arathuppaal", vec![1.0, 0.0])];
        store.replace_all(&first).await.unwrap();

        let second = vec![
            sample_kural(2, "Porutpaal", vec![0.0, 1.0]),
            sample_kural(3, "Kaamathuppaal", vec![1.0, 1.0]),
        ];
        store.replace_all(&second).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.get_by_id(1).await.unwrap().is_none());
        assert!(store.get_by_id(2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = SqliteKuralStore::in_memory().unwrap();

        let kurals = vec![
            sample_kural(1, "Arathuppaal", vec![1.0, 0.0, 0.0]),
            sample_kural(2, "Porutpaal", vec![0.9, 0.1, 0.0]),
            sample_kural(3, "Kaamathuppaal", vec![0.0, 1.0, 0.0]),
        ];
        store.replace_all(&kurals).await.unwrap();

        let hits = store.search(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kural.record.id, 1);
        assert_eq!(hits[1].kural.record.id, 2);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_search_limit_caps_results() {
        let store = SqliteKuralStore::in_memory().unwrap();

        let kurals: Vec<_> = (1..=8)
            .map(|i| sample_kural(i, "Arathuppaal", vec![i as f32, 1.0]))
            .collect();
        store.replace_all(&kurals).await.unwrap();

        let hits = store.search(&[1.0, 1.0], 5).await.unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[tokio::test]
    async fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kurals.db");

        {
            let store = SqliteKuralStore::new(&path).unwrap();
            store
                .replace_all(&[sample_kural(7, "Porutpaal", vec![0.5, 0.5])])
                .await
                .unwrap();
        }

        let reopened = SqliteKuralStore::new(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        let found = reopened.get_by_id(7).await.unwrap().unwrap();
        assert_eq!(found.record.paal, "Porutpaal");
    }
}
