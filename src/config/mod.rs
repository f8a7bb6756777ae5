//! Configuration module for Kural.
//!
//! Handles loading and managing application settings and prompt constants.

mod prompts;
mod settings;

pub use prompts::{SCHOLAR_SYSTEM_PROMPT, TURN_INSTRUCTION};
pub use settings::{
    ChatSettings, CorpusSettings, EmbeddingSettings, GeneralSettings, Settings,
    VectorStoreSettings,
};
