//! Lookup command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::retriever::Retriever;
use anyhow::Result;
use std::sync::Arc;

/// Run the lookup command.
pub async fn run_lookup(id: i64, settings: Settings) -> Result<()> {
    // Lookup itself needs no embedding call, but an absent index triggers a
    // rebuild, which does.
    if let Err(e) = preflight::check(Operation::Query, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let retriever = Retriever::new(settings, embedder);

    match retriever.lookup(id).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Lookup failed: {}", e));
            Err(e.into())
        }
    }
}
