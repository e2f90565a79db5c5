use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Console role, derived once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform admin or developer. Sees every user's data; the
    /// individual/team mode toggle is irrelevant for this role.
    Admin,
    /// Team manager. Self-scoped in individual mode; in team mode, sees
    /// the consenting members of the teams they manage.
    TeamObserver,
    /// Ordinary member. Always scoped to their own activity.
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::TeamObserver => "team_observer",
            Role::Member => "member",
        }
    }
}

/// Session fields the console receives from the gateway at sign-in.
///
/// `roles` carries the raw IdP role strings; `managed_team_ids` the teams
/// the caller manages, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub managed_team_ids: Vec<Uuid>,
}

/// Who is driving the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

impl Principal {
    /// Whether this principal may see activity other than their own in
    /// at least one mode.
    pub fn can_view_others(&self) -> bool {
        matches!(self.role, Role::Admin | Role::TeamObserver)
    }
}

/// Derives the console role from explicit session data.
///
/// `admin` and `developer` IdP roles map to the unrestricted role.
/// Anyone managing at least one team becomes a team observer; everyone
/// else is an ordinary member.
pub fn resolve_role(session: &SessionContext) -> Principal {
    let role = if session
        .roles
        .iter()
        .any(|r| r == "admin" || r == "developer")
    {
        Role::Admin
    } else if !session.managed_team_ids.is_empty() {
        Role::TeamObserver
    } else {
        Role::Member
    };

    Principal {
        user_id: session.user_id,
        role,
    }
}
