//! Console views.
//!
//! Each view subscribes to the shared filter state, derives its own
//! query parameters from the effective filter, and owns the data it
//! fetched. Commits are guarded by a [`FetchTicket`]: only the result of
//! the most recently issued fetch for the current filter generation is
//! ever committed, so a slow response from an abandoned configuration
//! cannot overwrite fresher state.

pub mod conversations;
pub mod export;
pub mod status;
pub mod storage;
pub mod usage;

use crate::client::ClientResult;

pub use conversations::{ConversationBrowser, PageState, SortDirection, SortField};
pub use export::ExportPipeline;
pub use status::StatusPoller;
pub use storage::StorageView;
pub use usage::UsageView;

/// A view's fetch lifecycle.
///
/// While a refresh is in flight the previous payload stays available, so
/// the UI renders it dimmed instead of blanking.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<T> {
    Empty,
    Loading { previous: Option<T> },
    Ready(T),
    Failed { message: String, previous: Option<T> },
}

impl<T> Default for ViewData<T> {
    fn default() -> Self {
        ViewData::Empty
    }
}

impl<T> ViewData<T> {
    /// The payload to render, current or previous.
    pub fn current(&self) -> Option<&T> {
        match self {
            ViewData::Ready(data) => Some(data),
            ViewData::Loading { previous } | ViewData::Failed { previous, .. } => previous.as_ref(),
            ViewData::Empty => None,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self, ViewData::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewData::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_payload(self) -> Option<T> {
        match self {
            ViewData::Ready(data) => Some(data),
            ViewData::Loading { previous } | ViewData::Failed { previous, .. } => previous,
            ViewData::Empty => None,
        }
    }

    /// Marks a refresh as in flight, keeping the previous payload.
    pub fn begin(&mut self) {
        let previous = std::mem::take(self).into_payload();
        *self = ViewData::Loading { previous };
    }

    fn resolve(&mut self, result: ClientResult<T>) {
        match result {
            Ok(data) => *self = ViewData::Ready(data),
            Err(err) => {
                let previous = std::mem::take(self).into_payload();
                *self = ViewData::Failed {
                    message: err.to_string(),
                    previous,
                };
            }
        }
    }
}

/// Generation snapshot captured when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn new(generation: u64) -> Self {
        FetchTicket(generation)
    }

    /// Whether the filter state the fetch was issued for is still the
    /// current one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// Commits a fetch result into a view slot, unless the ticket is stale.
///
/// Returns whether the result was committed.
pub(crate) fn commit_guarded<T>(
    slot: &mut ViewData<T>,
    ticket: FetchTicket,
    generation: u64,
    result: ClientResult<T>,
    view: &'static str,
) -> bool {
    if !ticket.is_current(generation) {
        tracing::debug!(view, "stale response discarded");
        return false;
    }
    slot.resolve(result);
    true
}
