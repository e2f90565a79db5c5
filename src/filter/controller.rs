//! The single owner of the console's filter state.
//!
//! Every mutation goes through one of the entry points below; views hold
//! read-only snapshots and communicate intents upward. Entry points
//! validate against the current capability descriptor (scope violations
//! fail closed, leaving state untouched), are idempotent, and bump a
//! monotonic generation counter that doubles as the request token for
//! page resets and stale-fetch suppression.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::auth::Principal;

use super::date_range::{self, EffectiveWindow};
use super::error::FilterError;
use super::scope::{self, ScopeDescriptor};
use super::state::{DateRangeSelection, FilterState, Mode, TeamSelection};

/// Partial filter overlay carried by a drill-down navigation event.
///
/// Present fields overwrite the corresponding filter field; everything
/// else is retained, so a chart click narrows the view without dropping
/// the user's existing context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub specific_date: Option<NaiveDate>,
    pub agent_id: Option<Uuid>,
    pub model: Option<String>,
    pub user_id: Option<Uuid>,
}

impl FilterPatch {
    /// Patch for a click on a time-series bucket.
    pub fn day(date: NaiveDate) -> Self {
        FilterPatch {
            specific_date: Some(date),
            ..FilterPatch::default()
        }
    }

    /// Patch for a click on an agent breakdown slice.
    pub fn agent(agent_id: Uuid) -> Self {
        FilterPatch {
            agent_id: Some(agent_id),
            ..FilterPatch::default()
        }
    }

    /// Patch for a click on a model breakdown slice.
    pub fn model(model: impl Into<String>) -> Self {
        FilterPatch {
            model: Some(model.into()),
            ..FilterPatch::default()
        }
    }

    /// Carries the clicked user along, for breakdown charts that are
    /// already per-user.
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Owns and serializes every change to [`FilterState`].
pub struct FilterController {
    principal: Principal,
    state: FilterState,
    default_days: u16,
    generation: u64,
}

impl FilterController {
    pub fn new(principal: Principal, default_days: u16) -> Self {
        FilterController {
            principal,
            state: FilterState::new(default_days),
            default_days,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Monotonic counter, bumped on every effective change. Views key
    /// page resets and stale-response suppression off it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Capability descriptor for the current role and mode.
    pub fn scope(&self) -> ScopeDescriptor {
        scope::resolve(&self.principal, &self.state)
    }

    /// Resolves the current effective window. Fails only on an
    /// incomplete or inverted custom range.
    pub fn window(&self) -> Result<EffectiveWindow, FilterError> {
        date_range::resolve(&self.state.date_range, self.state.specific_date)
    }

    /// Switches between individual and team scope.
    ///
    /// Transition side effects clear every field that is meaningless in
    /// the new mode; no stale cross-mode value survives.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), FilterError> {
        if !self.scope().can_switch_mode {
            return Err(FilterError::ScopeViolation(format!(
                "role {} cannot switch modes",
                self.principal.role.as_str()
            )));
        }
        if self.state.mode == mode {
            return Ok(());
        }
        match mode {
            Mode::Team => {
                self.state.user_id = None;
                self.state.team = Some(TeamSelection::All);
                self.state.observable_member_id = None;
            }
            Mode::Individual => {
                self.state.user_id = None;
                self.state.team = None;
                self.state.observable_member_id = None;
            }
        }
        self.state.mode = mode;
        self.bump("mode");
        Ok(())
    }

    /// Picks a preset range. Leaving a drill-down also clears the
    /// specific date.
    pub fn set_date_range(&mut self, selection: DateRangeSelection) -> Result<(), FilterError> {
        if self.state.date_range == selection && self.state.specific_date.is_none() {
            return Ok(());
        }
        self.state.date_range = selection;
        self.state.specific_date = None;
        self.bump("date_range");
        Ok(())
    }

    /// Sets an explicit custom range, validating eagerly so the picker
    /// can surface an invalid pair inline before any request is built.
    pub fn set_custom_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<(), FilterError> {
        let selection = DateRangeSelection::Custom {
            start: Some(start),
            end: Some(end),
            start_time,
            end_time,
        };
        date_range::resolve(&selection, None)?;
        self.set_date_range(selection)
    }

    /// Sets or clears the single-day drill-down.
    pub fn set_specific_date(&mut self, date: Option<NaiveDate>) -> Result<(), FilterError> {
        if self.state.specific_date == date {
            return Ok(());
        }
        self.state.specific_date = date;
        self.bump("specific_date");
        Ok(())
    }

    pub fn set_user(&mut self, user_id: Option<Uuid>) -> Result<(), FilterError> {
        if !self.scope().can_filter_by_user {
            return Err(FilterError::ScopeViolation(
                "user filter is not available for this role and mode".to_string(),
            ));
        }
        if self.state.user_id == user_id {
            return Ok(());
        }
        self.state.user_id = user_id;
        self.bump("user");
        Ok(())
    }

    /// Selects a team scope. Changing teams invalidates the member
    /// selection, which belongs to the previous team's consent list.
    pub fn set_team(&mut self, team: TeamSelection) -> Result<(), FilterError> {
        if !self.scope().can_filter_by_team {
            return Err(FilterError::ScopeViolation(
                "team filter is only available to team observers in team mode".to_string(),
            ));
        }
        if self.state.team == Some(team) {
            return Ok(());
        }
        self.state.team = Some(team);
        self.state.observable_member_id = None;
        self.bump("team");
        Ok(())
    }

    pub fn set_observable_member(&mut self, member_id: Option<Uuid>) -> Result<(), FilterError> {
        if !self.scope().can_filter_by_team {
            return Err(FilterError::ScopeViolation(
                "member filter is only available to team observers in team mode".to_string(),
            ));
        }
        if self.state.observable_member_id == member_id {
            return Ok(());
        }
        self.state.observable_member_id = member_id;
        self.bump("observable_member");
        Ok(())
    }

    pub fn set_agent(&mut self, agent_id: Option<Uuid>) -> Result<(), FilterError> {
        if self.state.agent_id == agent_id {
            return Ok(());
        }
        self.state.agent_id = agent_id;
        self.bump("agent");
        Ok(())
    }

    pub fn set_model(&mut self, model: Option<String>) -> Result<(), FilterError> {
        if self.state.model == model {
            return Ok(());
        }
        self.state.model = model;
        self.bump("model");
        Ok(())
    }

    /// Sets the free-text search. Whitespace-only input clears it.
    pub fn set_search(&mut self, search: Option<String>) -> Result<(), FilterError> {
        let search = search.filter(|s| !s.trim().is_empty());
        if self.state.search == search {
            return Ok(());
        }
        self.state.search = search;
        self.bump("search");
        Ok(())
    }

    /// Resets every dimension filter and the date range, keeping the
    /// current mode (and its team scope, in team mode).
    pub fn clear_all(&mut self) -> Result<(), FilterError> {
        let mut next = FilterState::new(self.default_days);
        next.mode = self.state.mode;
        if next.mode == Mode::Team {
            next.team = Some(TeamSelection::All);
        }
        if next == self.state {
            return Ok(());
        }
        self.state = next;
        self.bump("clear_all");
        Ok(())
    }

    /// Merges a drill-down patch into the current state.
    ///
    /// Merge, not replace: patch fields overwrite, all other fields are
    /// retained, so an active date-range or user filter survives the
    /// navigation unless the patch explicitly overrides it.
    pub fn apply_patch(&mut self, patch: FilterPatch) -> Result<(), FilterError> {
        if patch.user_id.is_some() && !self.scope().can_filter_by_user {
            return Err(FilterError::ScopeViolation(
                "drill-down carries a user filter this role cannot apply".to_string(),
            ));
        }

        let mut next = self.state.clone();
        if let Some(date) = patch.specific_date {
            next.specific_date = Some(date);
        }
        if let Some(agent_id) = patch.agent_id {
            next.agent_id = Some(agent_id);
        }
        if let Some(model) = patch.model {
            next.model = Some(model);
        }
        if let Some(user_id) = patch.user_id {
            next.user_id = Some(user_id);
        }

        if next == self.state {
            return Ok(());
        }
        self.state = next;
        self.bump("drill_down");
        Ok(())
    }

    fn bump(&mut self, field: &'static str) {
        self.generation += 1;
        tracing::debug!(field, generation = self.generation, "filter state changed");
    }
}
