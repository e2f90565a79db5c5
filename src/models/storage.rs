use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which storage slice the view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageViewKind {
    Overview,
    Datasets,
}

impl StorageViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageViewKind::Overview => "overview",
            StorageViewKind::Datasets => "datasets",
        }
    }
}

/// Aggregate storage totals for the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageOverview {
    pub total_bytes: i64,
    pub document_count: i64,
    pub dataset_count: i64,
}

/// Per-dataset storage breakdown row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStorage {
    pub dataset_id: Uuid,
    pub dataset_name: String,
    pub total_bytes: i64,
    pub document_count: i64,
}

/// Per-user storage breakdown row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStorage {
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub total_bytes: i64,
    pub document_count: i64,
}

/// Full storage report returned by `GET /storage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReport {
    pub overview: StorageOverview,
    #[serde(default)]
    pub by_dataset: Vec<DatasetStorage>,
    #[serde(default)]
    pub by_user: Vec<UserStorage>,
}
