//! Paginated conversation browser.
//!
//! The browser is the only view with pagination/sort substate. Any
//! filter mutation resets the page to 0; sort changes do not.

use serde::{Deserialize, Serialize};

use crate::client::{ClientResult, ListQuery};
use crate::models::{ConversationDetail, ConversationSummary, Page};

use super::{FetchTicket, ViewData, commit_guarded};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    UpdatedAt,
    CreatedAt,
    MessageCount,
    TotalTokens,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::UpdatedAt => "updated_at",
            SortField::CreatedAt => "created_at",
            SortField::MessageCount => "message_count",
            SortField::TotalTokens => "total_tokens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Pagination and sort substate, owned by the browser alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 0-based page index.
    pub page: u32,
    pub page_size: u32,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        PageState {
            page: 0,
            page_size,
            sort_field: SortField::UpdatedAt,
            sort_direction: SortDirection::Desc,
        }
    }

    pub fn skip(&self) -> u32 {
        self.page * self.page_size
    }

    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            limit: self.page_size,
            skip: self.skip(),
            order_by: self.sort_field.as_str(),
            order_direction: self.sort_direction.as_str(),
        }
    }
}

/// Conversation list plus the opened transcript.
#[derive(Debug)]
pub struct ConversationBrowser {
    data: ViewData<Page<ConversationSummary>>,
    detail: ViewData<ConversationDetail>,
    page: PageState,
    /// Filter generation this browser last synchronized with.
    seen_generation: u64,
}

impl ConversationBrowser {
    pub fn new(page_size: u32) -> Self {
        ConversationBrowser {
            data: ViewData::default(),
            detail: ViewData::default(),
            page: PageState::new(page_size),
            seen_generation: 0,
        }
    }

    pub fn data(&self) -> &ViewData<Page<ConversationSummary>> {
        &self.data
    }

    pub fn detail(&self) -> &ViewData<ConversationDetail> {
        &self.detail
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn list_query(&self) -> ListQuery {
        self.page.list_query()
    }

    /// Synchronizes with the filter generation. Any filter change since
    /// the last sync lands the browser back on the first page.
    pub fn sync_filter(&mut self, generation: u64) {
        if self.seen_generation != generation {
            self.seen_generation = generation;
            if self.page.page != 0 {
                tracing::debug!("filter changed, resetting browser to page 0");
                self.page.page = 0;
            }
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.page.page = page;
    }

    /// Changes the ordering. Deliberately leaves the page untouched.
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.page.sort_field = field;
        self.page.sort_direction = direction;
    }

    pub fn begin(&mut self) {
        self.data.begin();
    }

    pub fn commit(
        &mut self,
        ticket: FetchTicket,
        generation: u64,
        result: ClientResult<Page<ConversationSummary>>,
    ) -> bool {
        commit_guarded(&mut self.data, ticket, generation, result, "conversations")
    }

    pub fn begin_detail(&mut self) {
        self.detail.begin();
    }

    /// Transcript commits are keyed by the conversation id rather than
    /// the filter generation: an open transcript stays valid while the
    /// list refreshes around it.
    pub fn commit_detail(&mut self, result: ClientResult<ConversationDetail>) {
        match result {
            Ok(detail) => self.detail = ViewData::Ready(detail),
            Err(err) => {
                self.detail = ViewData::Failed {
                    message: err.to_string(),
                    previous: None,
                }
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = ViewData::Empty;
    }
}
