//! Authorization scoping.
//!
//! The sole client-side authorization boundary: every outbound query is
//! built from the [`ScopeDescriptor`] computed here, never from raw
//! filter state, so a view bug cannot leak a disallowed field into a
//! request.

use uuid::Uuid;

use crate::auth::{Principal, Role};

use super::state::{FilterState, Mode, TeamSelection};

/// What the caller may see and edit given their role and the current
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeDescriptor {
    /// Whether the user picker is available.
    pub can_filter_by_user: bool,
    /// Whether the team picker is available (team mode only).
    pub can_filter_by_team: bool,
    /// Whether the individual/team mode toggle is shown at all.
    pub can_switch_mode: bool,
    /// User the query may reference. `None` means "all users reachable
    /// in this scope": every user for admins, every consenting member of
    /// the scoped team(s) in team mode.
    pub effective_user_id: Option<Uuid>,
    /// Team scope in team mode; `None` outside it.
    pub effective_team: Option<TeamSelection>,
}

impl ScopeDescriptor {
    fn self_scoped(user_id: Uuid, can_switch_mode: bool) -> Self {
        ScopeDescriptor {
            can_filter_by_user: false,
            can_filter_by_team: false,
            can_switch_mode,
            effective_user_id: Some(user_id),
            effective_team: None,
        }
    }
}

/// Computes the capability descriptor for the current pass.
///
/// Called before every outbound query construction and by every filter
/// mutation entry point.
pub fn resolve(principal: &Principal, state: &FilterState) -> ScopeDescriptor {
    match principal.role {
        // Mode is irrelevant for admins; the raw user filter is honored
        // as-is, with absence meaning "all users".
        Role::Admin => ScopeDescriptor {
            can_filter_by_user: true,
            can_filter_by_team: false,
            can_switch_mode: false,
            effective_user_id: state.user_id,
            effective_team: None,
        },
        Role::TeamObserver if state.mode == Mode::Team => ScopeDescriptor {
            can_filter_by_user: false,
            can_filter_by_team: true,
            can_switch_mode: true,
            // Absence means "all observable members of the scoped
            // team(s)". Non-consenting members are never offered by the
            // picker and are rejected server-side.
            effective_user_id: state.observable_member_id,
            effective_team: Some(state.team.unwrap_or(TeamSelection::All)),
        },
        // An observer in individual mode behaves exactly like an
        // ordinary member: forced to self, regardless of any stale user
        // filter value.
        Role::TeamObserver => ScopeDescriptor::self_scoped(principal.user_id, true),
        Role::Member => ScopeDescriptor::self_scoped(principal.user_id, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_admin_honors_raw_user_filter() {
        let caller = principal(Role::Admin);
        let other = Uuid::new_v4();
        let mut state = FilterState::default();
        state.user_id = Some(other);

        let scope = resolve(&caller, &state);
        assert!(scope.can_filter_by_user);
        assert!(!scope.can_switch_mode);
        assert_eq!(scope.effective_user_id, Some(other));
        assert_eq!(scope.effective_team, None);
    }

    #[test]
    fn test_admin_without_user_filter_sees_all() {
        let scope = resolve(&principal(Role::Admin), &FilterState::default());
        assert_eq!(scope.effective_user_id, None);
    }

    #[test]
    fn test_member_is_forced_to_self() {
        let caller = principal(Role::Member);
        let mut state = FilterState::default();
        // A stale user filter must not widen the scope.
        state.user_id = Some(Uuid::new_v4());

        let scope = resolve(&caller, &state);
        assert!(!scope.can_filter_by_user);
        assert!(!scope.can_filter_by_team);
        assert_eq!(scope.effective_user_id, Some(caller.user_id));
    }

    #[test]
    fn test_observer_in_individual_mode_matches_member() {
        let caller = principal(Role::TeamObserver);
        let mut state = FilterState::default();
        state.user_id = Some(Uuid::new_v4());

        let scope = resolve(&caller, &state);
        assert!(!scope.can_filter_by_user);
        assert!(scope.can_switch_mode);
        assert_eq!(scope.effective_user_id, Some(caller.user_id));
        assert_eq!(scope.effective_team, None);
    }

    #[test]
    fn test_observer_in_team_mode_scopes_by_team_and_member() {
        let caller = principal(Role::TeamObserver);
        let team = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut state = FilterState::default();
        state.mode = Mode::Team;
        state.team = Some(TeamSelection::Team(team));
        state.observable_member_id = Some(member);

        let scope = resolve(&caller, &state);
        assert!(scope.can_filter_by_team);
        assert_eq!(scope.effective_team, Some(TeamSelection::Team(team)));
        assert_eq!(scope.effective_user_id, Some(member));
    }

    #[test]
    fn test_observer_team_mode_defaults_to_all_teams() {
        let caller = principal(Role::TeamObserver);
        let mut state = FilterState::default();
        state.mode = Mode::Team;

        let scope = resolve(&caller, &state);
        assert_eq!(scope.effective_team, Some(TeamSelection::All));
        assert_eq!(scope.effective_user_id, None);
    }
}
