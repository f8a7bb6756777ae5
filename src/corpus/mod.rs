//! The Thirukkural record store.
//!
//! Loads the bilingual corpus from its CSV source and provides Paal
//! (section) name normalization. The corpus is the source of truth for
//! the vector index and is also queried directly for category sampling.

use crate::error::{KuralError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// The three canonical Paal (section) names of the Thirukkural.
pub const VALID_PAALS: [&str; 3] = ["Arathuppaal", "Porutpaal", "Kaamathuppaal"];

/// One row of the corpus CSV, as stored in the source file.
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Kural")]
    kural: String,
    #[serde(rename = "Couplet")]
    couplet: String,
    #[serde(rename = "Paal")]
    paal: String,
    #[serde(rename = "Iyal")]
    iyal: String,
    #[serde(rename = "Adhigaram")]
    adhigaram: String,
    #[serde(rename = "M_Varadharajanar")]
    meaning_tamil: String,
    /// Optional column; when absent or empty the English couplet stands in.
    #[serde(rename = "Meaning", default)]
    meaning_english: Option<String>,
}

/// One Thirukkural couplet with its bilingual text and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct KuralRecord {
    /// Stable corpus identifier (1..=1330).
    pub id: i64,
    /// The Tamil couplet, with line-break markup normalized to spaces.
    pub kural_tamil: String,
    /// The English rendering of the couplet.
    pub kural_english: String,
    /// Top-level section (Arathuppaal, Porutpaal, Kaamathuppaal).
    pub paal: String,
    /// Chapter within the section.
    pub adhigaram: String,
    /// Sub-section grouping.
    pub iyal: String,
    /// Tamil explanatory meaning (M. Varadharajanar commentary).
    pub meaning_tamil: String,
    /// English explanatory meaning.
    pub meaning_english: String,
}

impl KuralRecord {
    /// Text embedded for this record: both languages, tagged so the
    /// embedding model can relate them.
    pub fn embedding_text(&self) -> String {
        format!("Tamil: {}\nEnglish: {}", self.kural_tamil, self.kural_english)
    }
}

impl From<RawRecord> for KuralRecord {
    fn from(raw: RawRecord) -> Self {
        let kural_english = raw.couplet.trim().to_string();
        let meaning_english = match raw.meaning_english {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => kural_english.clone(),
        };

        Self {
            id: raw.id,
            kural_tamil: clean_kural_text(&raw.kural),
            kural_english,
            paal: raw.paal.trim().to_string(),
            adhigaram: raw.adhigaram.trim().to_string(),
            iyal: raw.iyal.trim().to_string(),
            meaning_tamil: raw.meaning_tamil.trim().to_string(),
            meaning_english,
        }
    }
}

/// Normalize Tamil couplet text: the source stores the couplet's two lines
/// separated by `<br />` markup.
pub fn clean_kural_text(text: &str) -> String {
    text.replace("<br />", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a user-supplied category to a canonical Paal name.
///
/// Accepts English names, Tamil script names, and the canonical names
/// themselves, case-insensitively. Unrecognized input is returned as-is so
/// exact matches against the raw column still work.
pub fn canonicalize_paal(category: &str) -> String {
    let trimmed = category.trim();
    match trimmed.to_lowercase().as_str() {
        "virtue" | "aram" | "arathuppaal" | "அறத்துப்பால்" | "அறம்" => "Arathuppaal".to_string(),
        "wealth" | "porul" | "porutpaal" | "பொருட்பால்" | "பொருள்" => "Porutpaal".to_string(),
        "love" | "inbam" | "kaamathuppaal" | "காமத்துப்பால்" | "இன்பம்" => {
            "Kaamathuppaal".to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Load the full corpus from its CSV source.
///
/// A missing file is fatal; a row with a missing optional meaning falls back
/// to the English couplet rather than failing the load.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<KuralRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(KuralError::Corpus(format!(
            "Corpus file not found at {}. Set [corpus].data_path in the config.",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize::<RawRecord>() {
        records.push(KuralRecord::from(row?));
    }

    debug!("Loaded {} kurals from corpus", records.len());
    Ok(records)
}
