//! Export request construction and download handling.
//!
//! The export must reproduce exactly the effective window and scope the
//! on-screen view is displaying; any divergence between what is exported
//! and what is on screen is a correctness failure, so requests are built
//! from [`EffectiveFilter`] like every other fetch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::query::EffectiveFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// What an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// One specific conversation; dimension and time filters are
    /// irrelevant.
    Single(Uuid),
    /// The current effective filter, exactly as displayed.
    Filtered,
    /// Everything in the caller's scope: dimension filters are dropped
    /// but the time window is kept.
    All,
}

/// A fully built export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub scope: ExportScope,
    pub format: ExportFormat,
    pub include_content: bool,
    filter: EffectiveFilter,
}

impl ExportRequest {
    pub fn new(
        scope: ExportScope,
        format: ExportFormat,
        include_content: bool,
        filter: EffectiveFilter,
    ) -> Self {
        ExportRequest {
            scope,
            format,
            include_content,
            filter,
        }
    }

    /// Outbound query pairs for `GET /export`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("format", self.format.as_str().to_string()),
            ("include_content", self.include_content.to_string()),
        ];
        match self.scope {
            ExportScope::Single(id) => pairs.push(("conversation_id", id.to_string())),
            ExportScope::Filtered => pairs.extend(self.filter.query_pairs()),
            ExportScope::All => {
                pairs.extend(self.filter.window_pairs());
                pairs.extend(self.filter.scope_pairs());
            }
        }
        pairs
    }

    /// Fallback filename when the response carries no
    /// `Content-Disposition` header.
    pub fn default_filename(&self) -> String {
        let stamp = chrono::Utc::now().format("%Y%m%d");
        format!("conversations-{stamp}.{}", self.format.extension())
    }
}

/// A completed export download.
#[derive(Debug, Clone)]
pub struct ExportDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Extracts the filename from a `Content-Disposition` header value,
/// e.g. `attachment; filename="usage-2025.csv"`.
pub(crate) fn filename_from_content_disposition(value: &str) -> Option<String> {
    let part = value
        .split(';')
        .map(str::trim)
        .find_map(|p| p.strip_prefix("filename="))?;
    let name = part.trim_matches('"').trim();
    (!name.is_empty()).then(|| name.to_string())
}
