//! HTTP client for the gateway's console API.

use reqwest::Client;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::filter::TeamSelection;
use crate::models::{
    ConversationDetail, ConversationSummary, ObservableMember, Page, ProcessingStatus,
    ReferenceLists, StorageReport, StorageViewKind, UsageReport,
};

use super::error::{ClientError, ClientResult};
use super::export::{ExportDownload, ExportRequest, filename_from_content_disposition};
use super::query::EffectiveFilter;

/// List windowing and ordering for paginated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub skip: u32,
    pub order_by: &'static str,
    pub order_direction: &'static str,
}

impl ListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("skip", self.skip.to_string()),
            ("order_by", self.order_by.to_string()),
            ("order_direction", self.order_direction.to_string()),
        ]
    }
}

/// Client for the console endpoints of the gateway.
///
/// All fetches are asynchronous and non-blocking; failures map to
/// [`ClientError`] and are recovered by the owning view.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    /// `base_url` is the gateway origin, with or without a trailing
    /// slash.
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        GatewayClient {
            http,
            base_url,
            api_key,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
    }

    async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T> {
        tracing::debug!(path, params = query.len(), "gateway fetch");
        let response = self.get(path).query(query).send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Reachability probe used by the shell before first paint.
    pub async fn health(&self) -> ClientResult<()> {
        let response = self.get("/health").send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// `GET /usage`: overview, time series, and breakdowns.
    pub async fn usage(&self, filter: &EffectiveFilter) -> ClientResult<UsageReport> {
        self.get_json("/usage", &filter.query_pairs()).await
    }

    /// `GET /conversations`: paginated summaries.
    pub async fn conversations(
        &self,
        filter: &EffectiveFilter,
        list: &ListQuery,
    ) -> ClientResult<Page<ConversationSummary>> {
        let mut query = filter.query_pairs();
        query.extend(list.query_pairs());
        self.get_json("/conversations", &query).await
    }

    /// `GET /conversations/{id}`: full transcript.
    pub async fn conversation(&self, id: Uuid) -> ClientResult<ConversationDetail> {
        self.get_json(&format!("/conversations/{id}"), &[]).await
    }

    /// `GET /conversations/status`: processing states for tracked items.
    pub async fn conversation_statuses(&self, ids: &[Uuid]) -> ClientResult<Vec<ProcessingStatus>> {
        let ids = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.get_json("/conversations/status", &[("ids", ids)]).await
    }

    /// `GET /storage`: scope-filtered storage report. The time window
    /// does not apply to storage.
    pub async fn storage(
        &self,
        filter: &EffectiveFilter,
        dataset_id: Option<Uuid>,
        view: StorageViewKind,
    ) -> ClientResult<StorageReport> {
        let mut query = filter.scope_pairs();
        if let Some(dataset_id) = dataset_id {
            query.push(("dataset_id", dataset_id.to_string()));
        }
        query.push(("view", view.as_str().to_string()));
        self.get_json("/storage", &query).await
    }

    /// `GET /filters`: unfiltered reference lists for the pickers.
    pub async fn reference_lists(&self, team: Option<TeamSelection>) -> ClientResult<ReferenceLists> {
        let query = match team {
            Some(team) => vec![("team_id", team.as_param())],
            None => Vec::new(),
        };
        self.get_json("/filters", &query).await
    }

    /// Consenting members of one team, or of every managed team.
    pub async fn observable_members(
        &self,
        team: TeamSelection,
    ) -> ClientResult<Vec<ObservableMember>> {
        let path = match team {
            TeamSelection::All => "/teams/observable-members".to_string(),
            TeamSelection::Team(id) => format!("/teams/{id}/observable-members"),
        };
        self.get_json(&path, &[]).await
    }

    /// `GET /export`: file download with a filename from
    /// `Content-Disposition` or a generated default.
    pub async fn export(&self, request: &ExportRequest) -> ClientResult<ExportDownload> {
        let response = self.get("/export").query(&request.query_pairs()).send().await?;
        let response = Self::check(response).await?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition)
            .unwrap_or_else(|| request.default_filename());

        let bytes = response.bytes().await?;
        Ok(ExportDownload {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::filter::EffectiveWindow;

    use super::super::export::{ExportFormat, ExportScope};
    use super::*;

    fn client(server: &MockServer) -> GatewayClient {
        GatewayClient::new(Client::new(), server.uri(), Some("test-key".to_string()))
    }

    fn filter() -> EffectiveFilter {
        EffectiveFilter {
            window: EffectiveWindow::LastDays(7),
            user_id: None,
            team: None,
            agent_id: None,
            model: None,
            search: None,
        }
    }

    fn usage_body() -> serde_json::Value {
        serde_json::json!({
            "overview": {
                "conversation_count": 1,
                "message_count": 2,
                "input_tokens": 10,
                "output_tokens": 20,
                "total_tokens": 30,
                "active_user_count": 1
            }
        })
    }

    #[tokio::test]
    async fn test_usage_sends_effective_filter_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(usage_body()))
            .expect(1)
            .mount(&server)
            .await;

        let report = client(&server).usage(&filter()).await.unwrap();
        assert_eq!(report.overview.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usage"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).usage(&filter()).await.unwrap_err();
        assert!(err.is_forbidden());
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_conversations_include_list_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .and(query_param("days", "7"))
            .and(query_param("limit", "25"))
            .and(query_param("skip", "50"))
            .and(query_param("order_by", "updated_at"))
            .and(query_param("order_direction", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [],
                "total": 0,
                "limit": 25,
                "skip": 50
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = ListQuery {
            limit: 25,
            skip: 50,
            order_by: "updated_at",
            order_direction: "desc",
        };
        let page = client(&server)
            .conversations(&filter(), &list)
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_export_filename_from_content_disposition() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .and(query_param("format", "csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-disposition", "attachment; filename=\"week.csv\"")
                    .set_body_string("id,title\n"),
            )
            .mount(&server)
            .await;

        let request = ExportRequest::new(ExportScope::Filtered, ExportFormat::Csv, false, filter());
        let download = client(&server).export(&request).await.unwrap();
        assert_eq!(download.filename, "week.csv");
        assert_eq!(download.bytes, b"id,title\n");
    }

    #[tokio::test]
    async fn test_export_filename_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let request = ExportRequest::new(ExportScope::Filtered, ExportFormat::Json, false, filter());
        let download = client(&server).export(&request).await.unwrap();
        assert!(download.filename.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_observable_members_path_per_team_selection() {
        let server = MockServer::start().await;
        let team = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/teams/{team}/observable-members")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"user_id": Uuid::new_v4(), "name": "Ada", "email": null}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/teams/observable-members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let c = client(&server);
        let members = c
            .observable_members(TeamSelection::Team(team))
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        let members = c.observable_members(TeamSelection::All).await.unwrap();
        assert!(members.is_empty());
    }
}
