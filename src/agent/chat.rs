//! Scholar chat session with a bounded tool-calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::{ChatSettings, SCHOLAR_SYSTEM_PROMPT, TURN_INSTRUCTION};
use crate::error::{KuralError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use tracing::{debug, info};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation, as kept in session history.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// A conversation with the scholar agent.
///
/// History holds only user and assistant turns; tool-call exchanges are
/// transient within a single send. Each send windows the history to the most
/// recent turns, appends the formatting instruction to the new user turn,
/// and runs the tool loop until the model produces a final answer.
pub struct ChatSession {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    tools: ToolContext,
    history: Vec<ChatTurn>,
    max_tool_iterations: usize,
    history_turns: usize,
}

impl ChatSession {
    /// Create a new chat session.
    pub fn new(tools: ToolContext, settings: &ChatSettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            tools,
            history: Vec::new(),
            max_tool_iterations: settings.max_tool_iterations,
            history_turns: settings.history_turns,
        }
    }

    /// The conversation so far.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Forget the conversation.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Send a user message and get the scholar's response.
    pub async fn send_message(&mut self, user_input: &str) -> Result<String> {
        self.history.push(ChatTurn {
            role: Role::User,
            content: user_input.to_string(),
        });

        let mut messages = self.build_request_messages()?;
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_tool_iterations {
                return Err(KuralError::Agent(format!(
                    "Exceeded maximum tool iterations ({})",
                    self.max_tool_iterations
                )));
            }

            debug!("Chat iteration {}, {} messages", iterations, messages.len());

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions())
                .build()
                .map_err(|e| KuralError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| KuralError::OpenAI(format!("Chat API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| KuralError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => {
                    // Final answer
                    let content = choice.message.content.clone().unwrap_or_default();
                    self.history.push(ChatTurn {
                        role: Role::Assistant,
                        content: content.clone(),
                    });
                    return Ok(content);
                }
            };

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| KuralError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in &tool_calls {
                let name = &tool_call.function.name;
                let arguments = &tool_call.function.arguments;

                info!("Scholar calling tool: {} with args: {}", name, arguments);

                let result = match parse_tool_call(name, arguments) {
                    Ok(tool) => match self.tools.execute(&tool).await {
                        Ok(output) => output,
                        Err(e) => format!("Tool error: {}", e),
                    },
                    Err(e) => format!("Failed to parse tool call: {}", e),
                };

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(result)
                    .build()
                    .map_err(|e| KuralError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());
            }
        }
    }

    /// Build the request messages for the current turn: system prompt plus
    /// the windowed history, with the per-turn instruction appended to the
    /// newest user turn.
    fn build_request_messages(&self) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SCHOLAR_SYSTEM_PROMPT)
                .build()
                .map_err(|e| KuralError::Agent(e.to_string()))?
                .into(),
        ];

        let window = windowed(&self.history, self.history_turns);
        let last = window.len().saturating_sub(1);

        for (i, turn) in window.iter().enumerate() {
            let message: ChatCompletionRequestMessage = match turn.role {
                Role::User => {
                    let content = if i == last {
                        format!("{} {}", turn.content, TURN_INSTRUCTION)
                    } else {
                        turn.content.clone()
                    };
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(content)
                        .build()
                        .map_err(|e| KuralError::Agent(e.to_string()))?
                        .into()
                }
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| KuralError::Agent(e.to_string()))?
                    .into(),
            };
            messages.push(message);
        }

        Ok(messages)
    }
}

/// The most recent `max_turns` turns of a conversation.
fn windowed(history: &[ChatTurn], max_turns: usize) -> &[ChatTurn] {
    let start = history.len().saturating_sub(max_turns);
    &history[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: Role, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_windowed_keeps_most_recent_turns() {
        let history: Vec<ChatTurn> = (0..15)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                turn(role, &format!("turn {}", i))
            })
            .collect();

        let window = windowed(&history, 10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "turn 5");
        assert_eq!(window[9].content, "turn 14");
    }

    #[test]
    fn test_windowed_short_history_unchanged() {
        let history = vec![turn(Role::User, "hello")];
        assert_eq!(windowed(&history, 10).len(), 1);
    }
}
