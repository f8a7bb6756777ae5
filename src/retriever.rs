//! The three retrieval operations over the kural index and corpus.
//!
//! Each operation returns a plain-text block consumed verbatim by the agent
//! loop, so the formats here are part of the tool protocol.

use crate::config::Settings;
use crate::corpus::{self, canonicalize_paal};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::indexer::Indexer;
use crate::vector_store::{KuralStore, SqliteKuralStore};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

/// Fixed result count for semantic search.
const SEARCH_RESULTS: usize = 5;

/// Read-only query interface over the index and the raw corpus.
///
/// The store handle is created on first use and reused for the process
/// lifetime; concurrent first queries await a single initialization. If the
/// index is absent or empty, the first use rebuilds it from the corpus.
pub struct Retriever {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    store: OnceCell<Arc<dyn KuralStore>>,
}

impl Retriever {
    /// Create a retriever; the index is opened lazily on first query.
    pub fn new(settings: Settings, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            settings,
            embedder,
            store: OnceCell::new(),
        }
    }

    /// Create a retriever over an already-open store (used in tests).
    pub fn with_store(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn KuralStore>,
    ) -> Self {
        Self {
            settings,
            embedder,
            store: OnceCell::new_with(Some(store)),
        }
    }

    /// Get the store handle, building the index first if it is empty.
    async fn store(&self) -> Result<&Arc<dyn KuralStore>> {
        self.store
            .get_or_try_init(|| async {
                let store = Arc::new(SqliteKuralStore::new(&self.settings.sqlite_path())?);

                if store.count().await? == 0 {
                    info!("Index is empty, building fresh index from corpus");
                    let indexer = Indexer::with_components(
                        self.settings.clone(),
                        self.embedder.clone(),
                        store.clone(),
                    );
                    indexer.build_index().await?;
                }

                Ok(store as Arc<dyn KuralStore>)
            })
            .await
    }

    /// Semantic search: the top 5 kurals nearest to the query.
    ///
    /// The query may be in Tamil or English. No minimum-score threshold is
    /// applied; up to 5 results come back even when barely relevant.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<String> {
        let embedding = self.embedder.embed(query).await?;
        let hits = self.store().await?.search(&embedding, SEARCH_RESULTS).await?;

        let mut output = String::from("Top 5 Related Kurals:\n\n");
        for (i, hit) in hits.iter().enumerate() {
            let r = &hit.kural.record;
            output.push_str(&format!(
                "{}. ID: {} | Category: {}\nTamil: {}\nEnglish: {}\n\n",
                i + 1,
                r.id,
                r.paal,
                r.kural_tamil,
                r.kural_english
            ));
        }
        Ok(output)
    }

    /// Detailed explanation for a specific kural ID.
    ///
    /// An unknown ID is a normal "not found" result, never an error.
    #[instrument(skip(self))]
    pub async fn lookup(&self, kural_id: i64) -> Result<String> {
        let Some(kural) = self.store().await?.get_by_id(kural_id).await? else {
            return Ok(format!("Kural with ID {} not found.", kural_id));
        };

        let r = &kural.record;
        Ok(format!(
            "Explanation for Kural {}:\n\n\
             Tamil Kural: {}\n\
             English Kural: {}\n\n\
             Tamil Meaning (மு.வ): {}\n\n\
             English Meaning: {}\n",
            r.id, r.kural_tamil, r.kural_english, r.meaning_tamil, r.meaning_english
        ))
    }

    /// A uniformly random kural from the given category (Paal).
    ///
    /// Reads the raw corpus rather than the index, so it works even before
    /// the index is built. Sampling is fresh per call and not seedable.
    #[instrument(skip(self))]
    pub async fn random(&self, category: &str) -> Result<String> {
        let target = canonicalize_paal(category);
        let records = corpus::load_corpus(self.settings.corpus_path())?;

        let filtered: Vec<_> = records.into_iter().filter(|r| r.paal == target).collect();

        let Some(record) = filtered.choose(&mut rand::thread_rng()) else {
            return Ok(format!(
                "No Kurals found for category: {}. Try Arathuppaal, Porutpaal, or Kaamathuppaal.",
                category
            ));
        };

        Ok(format!(
            "Random Kural from {}:\n\nID: {}\nTamil: {}\nEnglish: {}\n",
            target, record.id, record.kural_tamil, record.kural_english
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::KuralRecord;
    use crate::vector_store::IndexedKural;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::io::Write;

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

    fn record(id: i64, paal: &str) -> KuralRecord {
        KuralRecord {
            id,
            kural_tamil: format!("தமிழ் குறள் {}", id),
            kural_english: format!("English couplet {}", id),
            paal: paal.to_string(),
            adhigaram: "அதிகாரம்".to_string(),
            iyal: "இயல்".to_string(),
            meaning_tamil: format!("தமிழ் பொருள் {}", id),
            meaning_english: format!("English meaning {}", id),
        }
    }

    async fn retriever_with_index(settings: Settings) -> Retriever {
        let store = Arc::new(SqliteKuralStore::in_memory().unwrap());
        let kurals: Vec<_> = (1..=7)
            .map(|i| IndexedKural::new(record(i, "Arathuppaal"), vec![i as f32, 1.0]))
            .collect();
        store.replace_all(&kurals).await.unwrap();

        Retriever::with_store(settings, Arc::new(StubEmbedder), store)
    }

    fn settings_with_corpus(dir: &std::path::Path) -> Settings {
        let csv_path = dir.join("thirukural_data.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "ID,Kural,Couplet,Paal,Iyal,Adhigaram,M_Varadharajanar,Meaning").unwrap();
        for id in 1..=4 {
            writeln!(
                file,
                "{id},தமிழ் {id},English {id},Arathuppaal,இயல்,அதிகாரம்,பொருள் {id},Meaning {id}"
            )
            .unwrap();
        }
        for id in 5..=6 {
            writeln!(
                file,
                "{id},தமிழ் {id},English {id},Porutpaal,இயல்,அதிகாரம்,பொருள் {id},Meaning {id}"
            )
            .unwrap();
        }

        let mut settings = Settings::default();
        settings.corpus.data_path = csv_path.to_string_lossy().into_owned();
        settings.vector_store.sqlite_path =
            dir.join("kurals.db").to_string_lossy().into_owned();
        settings
    }

    #[tokio::test]
    async fn test_search_formats_top_results() {
        let retriever = retriever_with_index(Settings::default()).await;

        let output = retriever.search("friendship").await.unwrap();
        assert!(output.starts_with("Top 5 Related Kurals:"));
        // 7 indexed, capped at 5
        assert!(output.contains("5. ID: "));
        assert!(!output.contains("6. ID: "));
        assert!(output.contains("Category: Arathuppaal"));
        assert!(output.contains("Tamil: "));
        assert!(output.contains("English: "));
    }

    #[tokio::test]
    async fn test_lookup_returns_texts_and_meanings() {
        let retriever = retriever_with_index(Settings::default()).await;

        let output = retriever.lookup(1).await.unwrap();
        assert!(output.starts_with("Explanation for Kural 1:"));
        assert!(output.contains("Tamil Kural: தமிழ் குறள் 1"));
        assert!(output.contains("English Kural: English couplet 1"));
        assert!(output.contains("Tamil Meaning (மு.வ): தமிழ் பொருள் 1"));
        assert!(output.contains("English Meaning: English meaning 1"));
    }

    #[tokio::test]
    async fn test_lookup_unknown_id_not_found() {
        let retriever = retriever_with_index(Settings::default()).await;

        let output = retriever.lookup(9999).await.unwrap();
        assert_eq!(output, "Kural with ID 9999 not found.");
    }

    #[tokio::test]
    async fn test_random_stays_in_category_and_covers_it() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());
        let retriever = retriever_with_index(settings).await;

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let output = retriever.random("Virtue").await.unwrap();
            assert!(output.starts_with("Random Kural from Arathuppaal:"));

            let id: i64 = output
                .lines()
                .find_map(|l| l.strip_prefix("ID: "))
                .unwrap()
                .parse()
                .unwrap();
            assert!((1..=4).contains(&id), "id {} outside Arathuppaal", id);
            seen.insert(id);
        }
        // Uniform sampling over 4 records reaches all of them in 200 draws.
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test]
    async fn test_random_alias_forms_hit_same_subset() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());
        let retriever = retriever_with_index(settings).await;

        for input in ["virtue", "Virtue", "அறத்துப்பால்", "Arathuppaal"] {
            let output = retriever.random(input).await.unwrap();
            assert!(
                output.starts_with("Random Kural from Arathuppaal:"),
                "input {:?} gave {:?}",
                input,
                output
            );
        }
    }

    #[tokio::test]
    async fn test_random_unknown_category_lists_valid_paals() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());
        let retriever = retriever_with_index(settings).await;

        let output = retriever.random("politics").await.unwrap();
        assert_eq!(
            output,
            "No Kurals found for category: politics. Try Arathuppaal, Porutpaal, or Kaamathuppaal."
        );
    }

    #[tokio::test]
    async fn test_lazy_store_builds_index_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_corpus(dir.path());

        let retriever = Retriever::new(settings, Arc::new(StubEmbedder));

        // No index on disk yet; first query triggers a build from the corpus.
        let output = retriever.lookup(3).await.unwrap();
        assert!(output.starts_with("Explanation for Kural 3:"));

        let count = retriever.store().await.unwrap().count().await.unwrap();
        assert_eq!(count, 6);
    }
}
