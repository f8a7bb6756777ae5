//! Scholar agent: a tool-calling chat loop over the retriever.
//!
//! The model alternates between requesting retrieval operations and
//! synthesizing bilingual answers until it produces a final response.

mod chat;
mod tools;

pub use chat::{ChatSession, ChatTurn, Role};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
