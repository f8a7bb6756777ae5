//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{KuralError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing requires the corpus file and the API key.
    Index,
    /// Search and chat embed the query, so they require the API key.
    Query,
    /// Random sampling reads the corpus directly; no API key needed.
    Random,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Index => {
            check_corpus_file(settings)?;
            check_api_key()?;
        }
        Operation::Query => {
            check_api_key()?;
        }
        Operation::Random => {
            check_corpus_file(settings)?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(KuralError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(KuralError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the corpus CSV exists at the configured path.
fn check_corpus_file(settings: &Settings) -> Result<()> {
    let path = settings.corpus_path();
    if path.exists() {
        Ok(())
    } else {
        Err(KuralError::Config(format!(
            "Corpus file not found at {}. Set [corpus].data_path in the config.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_requires_corpus_file() {
        let mut settings = Settings::default();
        settings.corpus.data_path = "/nonexistent/thirukural_data.csv".to_string();

        let err = check(Operation::Random, &settings).unwrap_err();
        assert!(matches!(err, KuralError::Config(_)));
    }
}
