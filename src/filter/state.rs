use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether the console is scoped to the caller's own activity or to a
/// team's consenting members. Only switchable for team observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Individual,
    Team,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Individual => "individual",
            Mode::Team => "team",
        }
    }
}

/// Declarative date selector edited by the range picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRangeSelection {
    /// Rolling window of the last N days.
    Days { days: u16 },
    /// No time bound at all.
    All,
    /// Explicit calendar bounds. Dates stay optional while the picker is
    /// half-filled; resolution rejects an incomplete pair.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        start_time: Option<NaiveTime>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_time: Option<NaiveTime>,
    },
}

impl DateRangeSelection {
    pub fn days(days: u16) -> Self {
        DateRangeSelection::Days { days }
    }

    /// Short picker label, e.g. `7d`, `all`, `custom`.
    pub fn label(&self) -> String {
        match self {
            DateRangeSelection::Days { days } => format!("{days}d"),
            DateRangeSelection::All => "all".to_string(),
            DateRangeSelection::Custom { .. } => "custom".to_string(),
        }
    }
}

/// Team filter in team mode. `All` means every team the caller manages;
/// on the wire it serializes to the string `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSelection {
    All,
    Team(Uuid),
}

impl TeamSelection {
    /// Wire form used in query parameters.
    pub fn as_param(&self) -> String {
        match self {
            TeamSelection::All => "all".to_string(),
            TeamSelection::Team(id) => id.to_string(),
        }
    }
}

impl std::fmt::Display for TeamSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_param())
    }
}

impl std::str::FromStr for TeamSelection {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(TeamSelection::All)
        } else {
            Ok(TeamSelection::Team(s.parse()?))
        }
    }
}

impl Serialize for TeamSelection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_param())
    }
}

impl<'de> Deserialize<'de> for TeamSelection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The canonical combined filter record, shared by every view.
///
/// This is the raw state the UI edits. Queries are never built from it
/// directly; they go through scope and date-range resolution first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub mode: Mode,
    pub date_range: DateRangeSelection,
    /// Exact-day drill-down. Supersedes `date_range` while present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Only meaningful in team mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSelection>,
    /// Consenting member selection; only meaningful in team mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observable_member_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterState {
    pub fn new(default_days: u16) -> Self {
        FilterState {
            mode: Mode::Individual,
            date_range: DateRangeSelection::days(default_days),
            specific_date: None,
            user_id: None,
            agent_id: None,
            model: None,
            team: None,
            observable_member_id: None,
            search: None,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState::new(30)
    }
}
