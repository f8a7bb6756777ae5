//! Kural - Thirukkural retrieval and chat
//!
//! A CLI assistant for exploring the Thirukkural, a corpus of 1,330 classical
//! Tamil couplets with English renderings and classification metadata.
//!
//! # Overview
//!
//! Kural allows you to:
//! - Build a searchable vector index over the bilingual corpus
//! - Search couplets semantically, in Tamil or English
//! - Look up a specific couplet by ID with both meanings
//! - Draw a random couplet from one of the three Paals (sections)
//! - Chat with a scholar agent that answers bilingually with citations
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt constants
//! - `corpus` - The CSV-backed record store and Paal normalization
//! - `embedding` - Embedding generation
//! - `vector_store` - Persisted vector index
//! - `indexer` - Corpus-to-index build pipeline
//! - `retriever` - The three query operations over the index and corpus
//! - `agent` - Tool-calling chat loop
//!
//! # Example
//!
//! ```rust,no_run
//! use kural::config::Settings;
//! use kural::indexer::Indexer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let indexer = Indexer::new(settings)?;
//!
//!     let result = indexer.build_index().await?;
//!     println!("Indexed {} kurals", result.entries_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod retriever;
pub mod vector_store;

pub use error::{KuralError, Result};
