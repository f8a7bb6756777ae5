//! CLI module for Kural.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kural - Thirukkural retrieval and chat
///
/// A CLI assistant for exploring the Thirukkural: semantic search over the
/// bilingual corpus, couplet lookup, and a scholar chat agent.
#[derive(Parser, Debug)]
#[command(name = "kural")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build (or rebuild) the vector index from the corpus CSV
    Index,

    /// Find the 5 kurals most related to a query (Tamil or English)
    Search {
        /// Search query
        query: String,
    },

    /// Show a kural's couplet and meanings by ID
    Lookup {
        /// Kural ID (1-1330)
        id: i64,
    },

    /// Draw a random kural from a Paal (Virtue, Wealth, or Love)
    Random {
        /// Category name, in Tamil or English
        category: String,
    },

    /// Ask the scholar a single question
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session with the scholar
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
