//! Tool definitions and implementations for the scholar agent.
//!
//! The three tool names, argument names, and descriptions are the contract
//! the model's tool selection depends on; change them and retrieval behavior
//! drifts.

use crate::error::{KuralError, Result};
use crate::retriever::Retriever;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Semantic search over the corpus.
    SearchKurals { query: String },

    /// Detailed bilingual explanation for a specific kural.
    GetKuralExplanation { kural_id: i64 },

    /// Random kural from a Paal (section).
    GetRandomKuralByCategory { category: String },
}

/// Tool execution context wrapping the retriever.
pub struct ToolContext {
    retriever: Arc<Retriever>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::SearchKurals { query } => self.retriever.search(query).await,
            ToolCall::GetKuralExplanation { kural_id } => self.retriever.lookup(*kural_id).await,
            ToolCall::GetRandomKuralByCategory { category } => {
                self.retriever.random(category).await
            }
        }
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "search_kurals".to_string(),
                description: Some(
                    "Semantic search to find top 5 related Kurals based on a word or context. \
                    Input can be in Tamil or English."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The concept, word, or question to search for"
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_kural_explanation".to_string(),
                description: Some(
                    "Provides a detailed explanation for a specific Kural ID in both \
                    Tamil and English."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "kural_id": {
                            "type": "integer",
                            "description": "The Kural ID (1-1330)"
                        }
                    },
                    "required": ["kural_id"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_random_kural_by_category".to_string(),
                description: Some(
                    "Pulls up a random Kural from a specific category (Paal). \
                    Categories include: Arathuppaal (Virtue), Porutpaal (Wealth), \
                    Kaamathuppaal (Love)."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "The Paal name, in Tamil or English"
                        }
                    },
                    "required": ["category"]
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| KuralError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "search_kurals" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| KuralError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            Ok(ToolCall::SearchKurals { query })
        }
        "get_kural_explanation" => {
            let kural_id = args["kural_id"]
                .as_i64()
                .ok_or_else(|| KuralError::Agent("Missing 'kural_id' argument".to_string()))?;
            Ok(ToolCall::GetKuralExplanation { kural_id })
        }
        "get_random_kural_by_category" => {
            let category = args["category"]
                .as_str()
                .ok_or_else(|| KuralError::Agent("Missing 'category' argument".to_string()))?
                .to_string();
            Ok(ToolCall::GetRandomKuralByCategory { category })
        }
        _ => Err(KuralError::Agent(format!("Unknown tool: {}", name))),
    }
}
