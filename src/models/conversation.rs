use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Model that produced this message, for assistant turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Summary row in the conversation browser.
///
/// Carries token totals and the model list so the browser can render
/// counts without a second fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: String,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub agent_id: Option<Uuid>,
    pub agent_name: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
    pub message_count: i64,
    pub total_tokens: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full transcript returned by `GET /conversations/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    pub messages: Vec<Message>,
}

/// Ingest/processing state of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingState {
    /// Terminal states need no further polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingState::Completed | ProcessingState::Failed)
    }
}

/// Processing status of one tracked item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub id: Uuid,
    pub state: ProcessingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
