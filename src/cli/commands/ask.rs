//! Ask command implementation.

use crate::agent::{ChatSession, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::retriever::Retriever;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command: a single question through the scholar agent.
pub async fn run_ask(question: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Query, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut chat_settings = settings.chat.clone();
    if let Some(m) = model {
        chat_settings.model = m;
    }

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let retriever = Arc::new(Retriever::new(settings, embedder));
    let mut session = ChatSession::new(ToolContext::new(retriever), &chat_settings);

    let spinner = Output::spinner("The scholar is thinking...");
    let result = session.send_message(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
