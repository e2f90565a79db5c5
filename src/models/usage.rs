use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate totals for the selected window and scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageOverview {
    pub conversation_count: i64,
    pub message_count: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    /// Distinct users with at least one conversation in the window.
    pub active_user_count: i64,
}

/// One day of aggregated activity for the time-series chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub conversation_count: i64,
    pub message_count: i64,
    pub total_tokens: i64,
}

/// Per-user slice of the breakdown charts.
///
/// `user_id` is None for unattributed activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBreakdown {
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub conversation_count: i64,
    pub message_count: i64,
    pub total_tokens: i64,
}

/// Per-agent slice of the breakdown charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentBreakdown {
    pub agent_id: Option<Uuid>,
    pub agent_name: Option<String>,
    pub conversation_count: i64,
    pub message_count: i64,
    pub total_tokens: i64,
}

/// Per-model slice of the breakdown charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBreakdown {
    pub model: String,
    pub conversation_count: i64,
    pub message_count: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}

/// Full usage report returned by `GET /usage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub overview: UsageOverview,
    #[serde(default)]
    pub time_series: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub breakdown_by_user: Vec<UserBreakdown>,
    #[serde(default)]
    pub breakdown_by_agent: Vec<AgentBreakdown>,
    #[serde(default)]
    pub breakdown_by_model: Vec<ModelBreakdown>,
}
