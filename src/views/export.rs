//! Export pipeline.
//!
//! Serializes the currently effective filter -- never the raw state --
//! into a file-producing request, so what is exported is exactly what is
//! on screen.

use crate::client::{EffectiveFilter, ExportDownload, ExportFormat, ExportRequest, ExportScope};

/// Export settings plus the outcome of the last run.
#[derive(Debug, Default)]
pub struct ExportPipeline {
    pub format: ExportFormat,
    pub include_content: bool,
    last_filename: Option<String>,
}

impl ExportPipeline {
    pub fn new() -> Self {
        ExportPipeline::default()
    }

    /// Builds the outbound request for the given scope from the
    /// effective filter of the current pass.
    pub fn request(&self, scope: ExportScope, filter: &EffectiveFilter) -> ExportRequest {
        ExportRequest::new(scope, self.format, self.include_content, filter.clone())
    }

    pub fn record(&mut self, download: &ExportDownload) {
        tracing::info!(
            filename = %download.filename,
            bytes = download.bytes.len(),
            "export completed"
        );
        self.last_filename = Some(download.filename.clone());
    }

    pub fn last_filename(&self) -> Option<&str> {
        self.last_filename.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::EffectiveWindow;

    use super::*;

    #[test]
    fn test_request_uses_pipeline_settings() {
        let mut pipeline = ExportPipeline::new();
        pipeline.format = ExportFormat::Json;
        pipeline.include_content = true;

        let filter = EffectiveFilter {
            window: EffectiveWindow::Unbounded,
            user_id: None,
            team: None,
            agent_id: None,
            model: None,
            search: None,
        };
        let request = pipeline.request(ExportScope::Filtered, &filter);
        let pairs = request.query_pairs();
        assert!(pairs.contains(&("format", "json".to_string())));
        assert!(pairs.contains(&("include_content", "true".to_string())));
    }
}
