//! Chat dialogue models

use chrono::{DateTime, Utc};
use openapi_client::models::ChatTurn;
use serde::{Deserialize, Serialize};

use crate::utils::generate_uuid;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// Details about how an assistant message was produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub model: Option<String>,
    pub tokens: Option<u32>,
    pub processing_time_ms: Option<u64>,
}

/// A message in the assistant dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: generate_uuid(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            emotion: None,
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Wire form for the completion endpoint
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role.as_str().to_string(),
            content: self.content.clone(),
        }
    }
}

/// Structured assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantReply {
    /// Ordinary conversational answer
    Chat { text: String },

    /// The user confirmed a workflow; `prompt` describes it for generation
    GenerateWorkflow { prompt: String },
}

impl AssistantReply {
    /// Interpret raw model output.
    ///
    /// Output that is not a tagged JSON object is taken as plain chat text.
    pub fn from_model_output(raw: &str) -> Self {
        let candidate = crate::utils::strip_code_fence(raw);
        match serde_json::from_str::<AssistantReply>(candidate) {
            Ok(reply) => reply,
            Err(_) => AssistantReply::Chat {
                text: raw.trim().to_string(),
            },
        }
    }
}
