//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::indexer::Indexer;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let indexer = Indexer::new(settings)?;

    let spinner = Output::spinner("Embedding and indexing the corpus...");
    let result = indexer.build_index().await;
    spinner.finish_and_clear();

    match result {
        Ok(r) => {
            Output::success(&format!("Indexed {} kurals.", r.entries_indexed));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            Err(e.into())
        }
    }
}
