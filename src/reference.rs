//! Reference data for the filter pickers.
//!
//! Picker lists are keyed on their own dependencies only (mode and team
//! scope), never on the rest of the filter state, so options a user
//! selected earlier stay addressable while they filter. Load failures
//! degrade to empty-but-functional pickers and never block the primary
//! data fetch.

use crate::client::GatewayClient;
use crate::filter::{Mode, TeamSelection};
use crate::models::{AgentRef, ObservableMember, ReferenceLists, TeamRef, UserRef};

/// Dependency key for the reference lists; a reload happens only when
/// this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceKey {
    pub mode: Mode,
    pub team: Option<TeamSelection>,
}

/// Holds the unfiltered picker lists and the observable-member list.
#[derive(Debug, Default)]
pub struct ReferenceData {
    lists: ReferenceLists,
    observable_members: Vec<ObservableMember>,
    loaded_for: Option<ReferenceKey>,
}

impl ReferenceData {
    pub fn users(&self) -> &[UserRef] {
        &self.lists.users
    }

    pub fn agents(&self) -> &[AgentRef] {
        &self.lists.agents
    }

    pub fn teams(&self) -> &[TeamRef] {
        &self.lists.teams
    }

    /// Consenting members of the scoped team(s). Empty outside team
    /// mode, and the member picker is disabled whenever this is empty.
    pub fn observable_members(&self) -> &[ObservableMember] {
        &self.observable_members
    }

    /// True when the dependency key changed since the last load.
    pub fn needs_reload(&self, key: ReferenceKey) -> bool {
        self.loaded_for != Some(key)
    }

    /// Refreshes the picker lists for the given key.
    ///
    /// A 403 or any other failure leaves the affected list empty rather
    /// than failing the caller.
    pub async fn reload(&mut self, client: &GatewayClient, key: ReferenceKey) {
        let team_scope = (key.mode == Mode::Team).then_some(key.team).flatten();
        self.lists = match client.reference_lists(team_scope).await {
            Ok(lists) => lists,
            Err(err) => {
                tracing::warn!(error = %err, "reference list load failed; pickers degrade to empty");
                ReferenceLists::default()
            }
        };

        self.observable_members = match (key.mode, key.team) {
            (Mode::Team, Some(team)) => match client.observable_members(team).await {
                Ok(members) => members,
                Err(err) => {
                    tracing::warn!(error = %err, "observable member load failed");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        self.loaded_for = Some(key);
    }
}
