//! Random command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::retriever::Retriever;
use anyhow::Result;
use std::sync::Arc;

/// Run the random command.
pub async fn run_random(category: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Random, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let retriever = Retriever::new(settings, embedder);

    match retriever.random(category).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Random draw failed: {}", e));
            Err(e.into())
        }
    }
}
