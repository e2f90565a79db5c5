use uuid::Uuid;

use crate::filter::{EffectiveWindow, FilterState, ScopeDescriptor, TeamSelection};

const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fully resolved, role-scoped query parameters.
///
/// This is the only type the network layer accepts. It is derived from
/// the scope descriptor and the resolved window, never from raw
/// [`FilterState`] fields that scope resolution would have rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveFilter {
    pub window: EffectiveWindow,
    pub user_id: Option<Uuid>,
    pub team: Option<TeamSelection>,
    pub agent_id: Option<Uuid>,
    pub model: Option<String>,
    pub search: Option<String>,
}

impl EffectiveFilter {
    /// Combines the capability descriptor with the resolved window and
    /// the breakdown-dimension filters, which scope resolution leaves
    /// untouched.
    pub fn new(scope: &ScopeDescriptor, state: &FilterState, window: EffectiveWindow) -> Self {
        EffectiveFilter {
            window,
            user_id: scope.effective_user_id,
            team: scope.effective_team,
            agent_id: state.agent_id,
            model: state.model.clone(),
            search: state.search.clone(),
        }
    }

    /// Query pairs for the time window alone. Emits either `days` or
    /// explicit bounds, never both; `Unbounded` emits nothing.
    pub fn window_pairs(&self) -> Vec<(&'static str, String)> {
        match self.window {
            EffectiveWindow::Unbounded => Vec::new(),
            EffectiveWindow::LastDays(days) => vec![("days", days.to_string())],
            EffectiveWindow::Bounded { start, end } => vec![
                ("start_date", start.format(BOUND_FORMAT).to_string()),
                ("end_date", end.format(BOUND_FORMAT).to_string()),
            ],
        }
    }

    /// Full outbound parameter set: window plus scoped ids and
    /// breakdown dimensions.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.window_pairs();
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id", user_id.to_string()));
        }
        if let Some(team) = self.team {
            pairs.push(("team_id", team.as_param()));
        }
        if let Some(agent_id) = self.agent_id {
            pairs.push(("agent_id", agent_id.to_string()));
        }
        if let Some(model) = &self.model {
            pairs.push(("model", model.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    /// Scope-only pairs for endpoints that ignore the time window, like
    /// the storage breakdown.
    pub fn scope_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id", user_id.to_string()));
        }
        if let Some(team) = self.team {
            pairs.push(("team_id", team.as_param()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::auth::{Principal, Role};
    use crate::filter::{DateRangeSelection, FilterController, Mode, scope};

    use super::*;

    fn keys(pairs: &[(&'static str, String)]) -> Vec<&'static str> {
        pairs.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_seven_day_user_filter_emits_exactly_user_and_days() {
        let mut ctl = FilterController::new(
            Principal {
                user_id: Uuid::new_v4(),
                role: Role::Admin,
            },
            30,
        );
        let user = Uuid::new_v4();
        ctl.set_date_range(DateRangeSelection::days(7)).unwrap();
        ctl.set_user(Some(user)).unwrap();

        let filter = EffectiveFilter::new(&ctl.scope(), ctl.state(), ctl.window().unwrap());
        let pairs = filter.query_pairs();
        assert_eq!(keys(&pairs), vec!["days", "user_id"]);
        assert_eq!(pairs[0].1, "7");
        assert_eq!(pairs[1].1, user.to_string());
    }

    #[test]
    fn test_bounded_window_never_emits_day_count() {
        let mut ctl = FilterController::new(
            Principal {
                user_id: Uuid::new_v4(),
                role: Role::Admin,
            },
            30,
        );
        ctl.set_custom_range(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            None,
            None,
        )
        .unwrap();

        let filter = EffectiveFilter::new(&ctl.scope(), ctl.state(), ctl.window().unwrap());
        let pairs = filter.query_pairs();
        assert_eq!(keys(&pairs), vec!["start_date", "end_date"]);
        assert_eq!(pairs[0].1, "2025-01-01T00:00:00");
        assert_eq!(pairs[1].1, "2025-01-03T23:59:59");
    }

    #[test]
    fn test_unbounded_window_emits_no_time_params() {
        let mut ctl = FilterController::new(
            Principal {
                user_id: Uuid::new_v4(),
                role: Role::Admin,
            },
            30,
        );
        ctl.set_date_range(DateRangeSelection::All).unwrap();

        let filter = EffectiveFilter::new(&ctl.scope(), ctl.state(), ctl.window().unwrap());
        assert!(filter.window_pairs().is_empty());
    }

    #[test]
    fn test_member_query_is_self_scoped_despite_stale_filter() {
        let caller = Principal {
            user_id: Uuid::new_v4(),
            role: Role::Member,
        };
        // Simulate a stale user filter left over in raw state; scope
        // resolution must rewrite it to the caller.
        let mut state = crate::filter::FilterState::default();
        state.user_id = Some(Uuid::new_v4());

        let scope = scope::resolve(&caller, &state);
        let filter = EffectiveFilter::new(&scope, &state, EffectiveWindow::LastDays(30));
        assert_eq!(filter.user_id, Some(caller.user_id));
    }

    #[test]
    fn test_team_mode_emits_all_sentinel() {
        let caller = Principal {
            user_id: Uuid::new_v4(),
            role: Role::TeamObserver,
        };
        let mut state = crate::filter::FilterState::default();
        state.mode = Mode::Team;

        let scope = scope::resolve(&caller, &state);
        let filter = EffectiveFilter::new(&scope, &state, EffectiveWindow::LastDays(7));
        let pairs = filter.query_pairs();
        assert!(pairs.contains(&("team_id", "all".to_string())));
        assert!(!keys(&pairs).contains(&"user_id"));
    }
}
