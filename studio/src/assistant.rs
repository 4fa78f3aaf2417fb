//! Assistant dialogue

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::BuilderError;
use crate::http::completions::{CompletionProvider, CompletionRequest, Sampling};
use crate::models::chat::{AssistantReply, ChatMessage, MessageMetadata};
use crate::prompts;

/// Number of prior messages replayed to the model
pub const CONTEXT_WINDOW: usize = 10;

const CHAT_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 1000,
    top_p: Some(0.9),
};

/// Which instruction frames the conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    /// General questions about automation
    #[default]
    Chat,
    /// Designing a concrete workflow, may end in a generation request
    Workflow,
}

/// A running dialogue with the language model
pub struct AssistantSession {
    provider: Arc<dyn CompletionProvider>,
    model: Option<String>,
    history: Vec<ChatMessage>,
}

impl AssistantSession {
    /// Start a session with the welcome message
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            model: None,
            history: vec![ChatMessage::system(prompts::WELCOME).with_emotion("friendly")],
        }
    }

    /// Use a specific model instead of the provider default
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Select the model for later messages
    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    /// All messages so far
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Send a user message.
    ///
    /// Blank input is ignored and yields `Ok(None)`. Chat replies are appended
    /// to the history; a generation request is returned without being stored.
    /// On failure an apology is appended and the error returned.
    pub async fn send(
        &mut self,
        content: &str,
        mode: AssistantMode,
    ) -> Result<Option<AssistantReply>, BuilderError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let request = self.build_request(content, mode);
        self.history.push(ChatMessage::user(content));

        let started = Instant::now();
        let completion = match self.provider.complete(&request).await {
            Ok(completion) => completion,
            Err(e) => {
                error!("Assistant request failed: {}", e);
                self.history
                    .push(ChatMessage::assistant(prompts::APOLOGY).with_emotion("apologetic"));
                return Err(e);
            }
        };
        let elapsed = started.elapsed();

        let reply = AssistantReply::from_model_output(&completion.content);
        debug!("Assistant replied in {:?}: {:?}", elapsed, reply);

        if let AssistantReply::Chat { text } = &reply {
            let metadata = MessageMetadata {
                model: Some(completion.model.clone()),
                tokens: Some(completion.usage.total_tokens),
                processing_time_ms: Some(elapsed.as_millis() as u64),
            };
            self.history
                .push(ChatMessage::assistant(text.clone()).with_metadata(metadata));
        }

        Ok(Some(reply))
    }

    /// System instruction, the last messages of the history, then the new turn
    fn build_request(&self, content: &str, mode: AssistantMode) -> CompletionRequest {
        let instruction = match mode {
            AssistantMode::Chat => prompts::assistant_chat(),
            AssistantMode::Workflow => prompts::assistant_workflow(),
        };

        let window_start = self.history.len().saturating_sub(CONTEXT_WINDOW);
        let mut messages = vec![ChatMessage::system(instruction).to_turn()];
        messages.extend(self.history[window_start..].iter().map(ChatMessage::to_turn));
        messages.push(ChatMessage::user(content).to_turn());

        CompletionRequest {
            model: self.model.clone(),
            messages,
            sampling: CHAT_SAMPLING,
        }
    }
}
