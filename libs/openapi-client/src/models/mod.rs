//! API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================ EXECUTION PLATFORM ================================= //

/// List envelope returned by the platform's collection endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    /// Cursor for the next page, absent on the last page
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
        }
    }
}

/// Manual execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteWorkflowRequest {
    pub data: Option<serde_json::Value>,
}

/// Execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Canceled,
    Crashed,
    Error,
    New,
    Running,
    Success,
    Unknown,
    Waiting,
    #[serde(other)]
    Other,
}

/// A single workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: serde_json::Value,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub status: Option<ExecutionStatus>,

    #[serde(rename = "workflowId", default)]
    pub workflow_id: Option<serde_json::Value>,

    #[serde(rename = "startedAt", default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(rename = "stoppedAt", default)]
    pub stopped_at: Option<DateTime<Utc>>,

    /// Run data, only present when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================== CHAT COMPLETIONS ================================= //

/// One turn sent to the completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Chat completion response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatTurn,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
