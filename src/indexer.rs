//! Index build pipeline for Kural.
//!
//! Loads the corpus CSV, embeds each couplet's bilingual text, and replaces
//! the persisted index wholesale. Rebuilding is idempotent: a fresh run
//! supersedes the previous index in one transaction.

use crate::config::Settings;
use crate::corpus::{self, KuralRecord};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::vector_store::{IndexedKural, KuralStore, SqliteKuralStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// Builds the kural index from the corpus source.
pub struct Indexer {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    store: Arc<SqliteKuralStore>,
}

impl Indexer {
    /// Create an indexer with default components from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store = Arc::new(SqliteKuralStore::new(&settings.sqlite_path())?);

        Ok(Self {
            settings,
            embedder,
            store,
        })
    }

    /// Create an indexer with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<SqliteKuralStore>,
    ) -> Self {
        Self {
            settings,
            embedder,
            store,
        }
    }

    /// Get a reference to the store (as trait object).
    pub fn store(&self) -> Arc<dyn KuralStore> {
        self.store.clone() as Arc<dyn KuralStore>
    }

    /// Build the index from scratch.
    ///
    /// A missing corpus file is fatal; so is an embedding failure — no
    /// partial index is written.
    #[instrument(skip(self))]
    pub async fn build_index(&self) -> Result<IndexResult> {
        let records = corpus::load_corpus(self.settings.corpus_path())?;
        info!("Indexing {} kurals", records.len());

        let indexed = self.embed_records(records).await?;
        let count = self.store.replace_all(&indexed).await?;

        Ok(IndexResult {
            entries_indexed: count,
        })
    }

    /// Embed records and pair them with their vectors.
    async fn embed_records(&self, records: Vec<KuralRecord>) -> Result<Vec<IndexedKural>> {
        let texts: Vec<String> = records.iter().map(|r| r.embedding_text()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        Ok(records
            .into_iter()
            .zip(embeddings)
            .map(|(record, embedding)| IndexedKural::new(record, embedding))
            .collect())
    }
}

/// Result of an index build.
#[derive(Debug)]
pub struct IndexResult {
    /// Number of kurals indexed.
    pub entries_indexed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KuralError;
    use async_trait::async_trait;
    use std::io::Write;

    /// Deterministic embedder: one dimension per record, keyed off text length.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn settings_with_corpus(dir: &std::path::Path) -> Settings {
        let csv_path = dir.join("thirukural_data.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        write!(
            file,
            "ID,Kural,Couplet,Paal,Iyal,Adhigaram,M_Varadharajanar,Meaning\n\
             1,அகர முதல,A as its first of letters,Arathuppaal,பாயிரவியல்,கடவுள் வாழ்த்து,பொருள் ஒன்று,First meaning\n\
             2,கற்றதனால் ஆய,What profit have those,Arathuppaal,பாயிரவியல்,கடவுள் வாழ்த்து,பொருள் இரண்டு,Second meaning\n"
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.corpus.data_path = csv_path.to_string_lossy().into_owned();
        settings.vector_store.sqlite_path =
            dir.join("kurals.db").to_string_lossy().into_owned();
        settings
    }

    #[tokio::test]
    async fn test_build_index_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());

        let store = Arc::new(SqliteKuralStore::in_memory().unwrap());
        let indexer =
            Indexer::with_components(settings, Arc::new(StubEmbedder), store.clone());

        let result = indexer.build_index().await.unwrap();
        assert_eq!(result.entries_indexed, 2);

        let found = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.record.kural_english, "A as its first of letters");
        assert_eq!(found.record.meaning_english, "First meaning");
        assert_eq!(found.embedding.len(), 2);
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());

        let store = Arc::new(SqliteKuralStore::in_memory().unwrap());
        let indexer =
            Indexer::with_components(settings, Arc::new(StubEmbedder), store.clone());

        indexer.build_index().await.unwrap();
        indexer.build_index().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        // Same id maps to the same text after reindexing.
        let found = store.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(found.record.kural_english, "What profit have those");
    }

    #[tokio::test]
    async fn test_missing_corpus_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.corpus.data_path = dir
            .path()
            .join("missing.csv")
            .to_string_lossy()
            .into_owned();

        let store = Arc::new(SqliteKuralStore::in_memory().unwrap());
        let indexer = Indexer::with_components(settings, Arc::new(StubEmbedder), store);

        let err = indexer.build_index().await.unwrap_err();
        assert!(matches!(err, KuralError::Corpus(_)));
    }
}
