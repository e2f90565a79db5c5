//! Usage overview: aggregate charts with drill-down into the browser.

use crate::client::ClientResult;
use crate::filter::FilterPatch;
use crate::models::{AgentBreakdown, ModelBreakdown, TimeSeriesPoint, UsageReport, UserBreakdown};

use super::{FetchTicket, ViewData, commit_guarded};

/// Holds the usage report and turns chart clicks into drill-down
/// patches.
#[derive(Debug, Default)]
pub struct UsageView {
    data: ViewData<UsageReport>,
}

impl UsageView {
    pub fn new() -> Self {
        UsageView::default()
    }

    pub fn data(&self) -> &ViewData<UsageReport> {
        &self.data
    }

    pub fn begin(&mut self) {
        self.data.begin();
    }

    pub fn commit(
        &mut self,
        ticket: FetchTicket,
        generation: u64,
        result: ClientResult<UsageReport>,
    ) -> bool {
        commit_guarded(&mut self.data, ticket, generation, result, "usage")
    }

    /// Click on a time-series bucket: narrow to that day.
    pub fn drill_into_day(&self, point: &TimeSeriesPoint) -> FilterPatch {
        FilterPatch::day(point.date)
    }

    /// Click on an agent slice. Unattributed slices are not navigable.
    pub fn drill_into_agent(&self, breakdown: &AgentBreakdown) -> Option<FilterPatch> {
        breakdown.agent_id.map(FilterPatch::agent)
    }

    /// Click on a model slice.
    pub fn drill_into_model(&self, breakdown: &ModelBreakdown) -> FilterPatch {
        FilterPatch::model(breakdown.model.clone())
    }

    /// Click on a user slice. Carries the user along so the browser
    /// opens scoped to them.
    pub fn drill_into_user(&self, breakdown: &UserBreakdown) -> Option<FilterPatch> {
        breakdown
            .user_id
            .map(|id| FilterPatch::default().with_user(id))
    }
}
