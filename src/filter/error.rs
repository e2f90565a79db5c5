use thiserror::Error;

/// Errors surfaced by the filter layer.
///
/// Both variants are caught before any request is sent; nothing here is
/// fatal to the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Malformed or incomplete custom date range. Surfaced inline next
    /// to the date picker.
    #[error("invalid date range: {0}")]
    InvalidRange(String),

    /// A mutation outside the caller's capability descriptor. The filter
    /// state is left unchanged; reaching this through the UI is a
    /// programming error in the caller.
    #[error("scope violation: {0}")]
    ScopeViolation(String),
}
