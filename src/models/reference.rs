use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Picker entry for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserRef {
    /// Display label: name, then email, then the raw id.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Picker entry for an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: Uuid,
    pub name: String,
}

/// Picker entry for a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

/// A user who has consented to manager visibility.
///
/// The picker only ever offers consenting members; consent is enforced
/// server-side as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservableMember {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ObservableMember {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// Unfiltered id-to-label lookups returned by `GET /filters`.
///
/// Independent of the filter state so previously selected options stay
/// addressable while the user filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceLists {
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default)]
    pub agents: Vec<AgentRef>,
    #[serde(default)]
    pub teams: Vec<TeamRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_email_then_id() {
        let id = Uuid::new_v4();
        let member = ObservableMember {
            user_id: id,
            name: None,
            email: Some("ada@example.com".to_string()),
        };
        assert_eq!(member.label(), "ada@example.com");

        let anonymous = ObservableMember {
            user_id: id,
            name: None,
            email: None,
        };
        assert_eq!(anonymous.label(), id.to_string());
    }
}
