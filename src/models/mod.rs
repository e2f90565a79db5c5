//! Typed response models for the gateway's console API.

mod conversation;
mod reference;
mod storage;
mod usage;

use serde::{Deserialize, Serialize};

pub use conversation::{
    ConversationDetail, ConversationSummary, Message, ProcessingState, ProcessingStatus,
};
pub use reference::{AgentRef, ObservableMember, ReferenceLists, TeamRef, UserRef};
pub use storage::{DatasetStorage, StorageOverview, StorageReport, StorageViewKind, UserStorage};
pub use usage::{
    AgentBreakdown, ModelBreakdown, TimeSeriesPoint, UsageOverview, UsageReport, UserBreakdown,
};

/// Paginated envelope for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching rows, independent of the current page.
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
