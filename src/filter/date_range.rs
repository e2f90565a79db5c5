//! Date range resolution.
//!
//! Turns the declarative selector into a concrete [`EffectiveWindow`].
//! Pure: identical input yields an identical window within a filtering
//! pass, so repeated derivations cannot disagree.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::FilterError;
use super::state::DateRangeSelection;

fn day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).expect("valid time of day")
}

/// Fully resolved time window consumed by the network layer.
///
/// `LastDays` passes the day count through instead of materializing
/// bounds, so an outbound request carries either `days` or explicit
/// bounds, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveWindow {
    /// No time filter emitted at all.
    Unbounded,
    /// Rolling window of the last N days, materialized server-side.
    LastDays(u16),
    /// Concrete inclusive instant bounds.
    Bounded {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl EffectiveWindow {
    /// The `[00:00:00, 23:59:59]` window of a single calendar day, used
    /// by every consumer of a specific-date drill-down.
    pub fn single_day(date: NaiveDate) -> Self {
        EffectiveWindow::Bounded {
            start: date.and_time(NaiveTime::MIN),
            end: date.and_time(day_end()),
        }
    }
}

/// Resolves the selector (and an overriding specific date, if any) into
/// a concrete window.
///
/// Fails only on a custom range with a missing bound or with its end
/// before its start.
pub fn resolve(
    selection: &DateRangeSelection,
    specific_date: Option<NaiveDate>,
) -> Result<EffectiveWindow, FilterError> {
    if let Some(date) = specific_date {
        return Ok(EffectiveWindow::single_day(date));
    }

    match selection {
        DateRangeSelection::All => Ok(EffectiveWindow::Unbounded),
        DateRangeSelection::Days { days } => Ok(EffectiveWindow::LastDays(*days)),
        DateRangeSelection::Custom {
            start,
            end,
            start_time,
            end_time,
        } => {
            let (Some(start), Some(end)) = (start, end) else {
                return Err(FilterError::InvalidRange(
                    "custom range requires both a start and an end date".to_string(),
                ));
            };
            let start_at = start.and_time(start_time.unwrap_or(NaiveTime::MIN));
            let end_at = end.and_time(end_time.unwrap_or_else(day_end));
            if end_at < start_at {
                return Err(FilterError::InvalidRange(format!(
                    "end {end_at} precedes start {start_at}"
                )));
            }
            Ok(EffectiveWindow::Bounded {
                start: start_at,
                end: end_at,
            })
        }
    }
}
