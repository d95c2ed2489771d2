use super::{
    ApiClient, ArrError, RequestOptions, ServiceKind, SystemStatus, Transport, with_query,
};
use crate::config::ServiceConfig;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

const API_VERSION: &str = "v1";

/// A client for interacting with Prowlarr API.
/// https://prowlarr.com/docs/api/
#[derive(Clone, Debug)]
pub struct ProwlarrClient {
    api: ApiClient,
}

impl ProwlarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ArrError> {
        let api = ApiClient::new(ServiceKind::Prowlarr, API_VERSION, config)?;
        Ok(Self { api })
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let api =
            ApiClient::with_transport(ServiceKind::Prowlarr, API_VERSION, config, transport)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn status(&self) -> Result<SystemStatus, ArrError> {
        self.api.system_status().await
    }

    pub async fn indexers(&self) -> Result<Vec<Indexer>, ArrError> {
        self.api.get("/indexer").await
    }

    pub async fn indexer_by_id(&self, id: u64) -> Result<Indexer, ArrError> {
        self.api.get(&format!("/indexer/{id}")).await
    }

    /// Run the connectivity test of every indexer.
    ///
    /// Prowlarr answers 200 only when every indexer passed. If any indexer
    /// fails it answers 400, so the per-indexer results arrive as the body of
    /// [`ArrError::Api`] and can be decoded into `Vec<IndexerTestResult>`.
    pub async fn test_all_indexers(&self) -> Result<Vec<IndexerTestResult>, ArrError> {
        self.api
            .request("/indexer/testall", RequestOptions::new(Method::POST))
            .await
    }

    /// Test a single indexer. The indexer resource is fetched as raw JSON and
    /// posted back unchanged so that fields this crate doesn't model survive.
    pub async fn test_indexer(&self, id: u64) -> Result<IndexerTestResult, ArrError> {
        let indexer: Value = self.api.get(&format!("/indexer/{id}")).await?;
        let _: Value = self.api.post("/indexer/test", &indexer).await?;
        debug!("indexer {id} passed its test");
        Ok(IndexerTestResult {
            id,
            is_valid: true,
            validation_failures: Vec::new(),
        })
    }

    pub async fn indexer_stats(&self) -> Result<IndexerStats, ArrError> {
        self.api.get("/indexerstats").await
    }

    /// Search every enabled indexer, optionally limited to Newznab
    /// `categories` (e.g. 2000 for movies, 5000 for TV).
    pub async fn search(
        &self,
        query: &str,
        categories: &[u32],
    ) -> Result<Vec<Release>, ArrError> {
        let mut params = vec![("query", query.to_owned()), ("type", "search".to_owned())];
        params.extend(categories.iter().map(|c| ("categories", c.to_string())));
        self.api.get(&with_query("/search", &params)).await
    }

    pub async fn test_connection(&self) -> bool {
        self.api.test_connection().await
    }
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub app_profile_id: Option<u64>,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub implementation_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub added: Option<DateTime<Utc>>,
}

impl Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("unnamed");
        write!(f, "{name}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IndexerTestResult {
    pub id: u64,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub validation_failures: Vec<ValidationFailure>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationFailure {
    pub property_name: Option<String>,
    pub error_message: String,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property_name {
            Some(property) if !property.is_empty() => {
                write!(f, "{property}: {}", self.error_message)
            }
            _ => f.write_str(&self.error_message),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexerStats {
    pub indexers: Vec<IndexerStatistics>,
    pub user_agents: Vec<UserAgentStatistics>,
    pub hosts: Vec<HostStatistics>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexerStatistics {
    pub indexer_id: u64,
    pub indexer_name: String,
    pub average_response_time: u64,
    pub number_of_queries: u64,
    pub number_of_grabs: u64,
    pub number_of_rss_queries: u64,
    pub number_of_auth_queries: u64,
    pub number_of_failed_queries: u64,
    pub number_of_failed_grabs: u64,
    pub number_of_failed_rss_queries: u64,
    pub number_of_failed_auth_queries: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAgentStatistics {
    pub user_agent: Option<String>,
    pub number_of_queries: u64,
    pub number_of_grabs: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HostStatistics {
    pub host: Option<String>,
    pub number_of_queries: u64,
    pub number_of_grabs: u64,
}

/// A release found by [`ProwlarrClient::search`].
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Release {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub indexer_id: Option<u64>,
    pub indexer: Option<String>,
    pub size: u64,
    pub seeders: Option<u32>,
    pub leechers: Option<u32>,
    pub grabs: Option<u32>,
    pub protocol: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
    pub info_url: Option<String>,
    pub magnet_url: Option<String>,
    pub imdb_id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub tvdb_id: Option<u64>,
    pub categories: Vec<ReleaseCategory>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseCategory {
    pub id: u32,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::{MockTransport, config};
    use reqwest::StatusCode;
    use serde_json::json;

    fn client(transport: &MockTransport) -> ProwlarrClient {
        ProwlarrClient::with_transport(&config("http://prowlarr:9696"), Arc::new(transport.clone()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_test_all_indexers() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([
            { "id": 1, "isValid": true, "validationFailures": [] },
            { "id": 2, "isValid": true }
        ]));
        let client = client(&transport);

        let results = client.test_all_indexers().await?;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_valid));

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://prowlarr:9696/api/v1/indexer/testall");
        assert_eq!(request.body, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_test_all_indexers_with_failures() -> anyhow::Result<()> {
        let transport = MockTransport::status(
            StatusCode::BAD_REQUEST,
            &json!([
                { "id": 1, "isValid": true, "validationFailures": [] },
                { "id": 2, "isValid": false, "validationFailures": [
                    { "propertyName": "ApiKey", "errorMessage": "Invalid API key", "severity": "error" },
                    { "propertyName": "", "errorMessage": "Unable to connect" }
                ]}
            ])
            .to_string(),
        );
        let client = client(&transport);

        let err = client.test_all_indexers().await.unwrap_err();
        let ArrError::Api { status, body, .. } = &err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(*status, 400);

        let results: Vec<IndexerTestResult> = serde_json::from_str(body)?;
        assert!(results[0].is_valid);
        assert!(!results[1].is_valid);
        let messages: Vec<_> = results[1]
            .validation_failures
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(messages, vec!["ApiKey: Invalid API key", "Unable to connect"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_test_indexer_posts_raw_resource() -> anyhow::Result<()> {
        let indexer = json!({
            "id": 4,
            "name": "Nyaa",
            "fields": [{ "name": "baseUrl", "value": "https://nyaa.si" }]
        });
        let transport = MockTransport::raw(StatusCode::OK, "");
        transport.push(StatusCode::OK, indexer.clone());
        let client = client(&transport);

        let result = client.test_indexer(4).await?;
        assert_eq!(result.id, 4);
        assert!(result.is_valid);
        assert!(result.validation_failures.is_empty());

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "http://prowlarr:9696/api/v1/indexer/4");
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].url, "http://prowlarr:9696/api/v1/indexer/test");
        assert_eq!(requests[1].body, Some(indexer));
        Ok(())
    }

    #[tokio::test]
    async fn test_test_indexer_failure() {
        let transport = MockTransport::status(
            StatusCode::BAD_REQUEST,
            r#"[{"propertyName":"","errorMessage":"Unable to connect"}]"#,
        );
        transport.push(StatusCode::OK, json!({ "id": 4, "name": "Nyaa" }));
        let client = client(&transport);

        let err = client.test_indexer(4).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Unable to connect"));
    }

    #[tokio::test]
    async fn test_search_query() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([{
            "guid": "abc",
            "title": "Heat.1995.1080p",
            "indexer": "Nyaa",
            "size": 1024,
            "seeders": 10,
            "categories": [{ "id": 2000, "name": "Movies" }]
        }]));
        let client = client(&transport);

        let releases = client.search("heat 1995", &[2000, 5000]).await?;
        assert_eq!(releases[0].categories[0].id, 2000);
        assert_eq!(
            transport.last_request().url,
            "http://prowlarr:9696/api/v1/search?query=heat%201995&type=search&categories=2000&categories=5000"
        );

        client.search("heat", &[]).await?;
        assert_eq!(
            transport.last_request().url,
            "http://prowlarr:9696/api/v1/search?query=heat&type=search"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_indexers_and_stats() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([{ "id": 1, "name": "Nyaa", "enable": true }]));
        let client = client(&transport);

        let indexers = client.indexers().await?;
        assert_eq!(format!("{indexers:?}"), "[Nyaa(1)]");
        assert_eq!(transport.last_request().url, "http://prowlarr:9696/api/v1/indexer");

        transport.push(StatusCode::OK, json!({ "id": 3 }));
        let indexer = client.indexer_by_id(3).await?;
        assert_eq!(indexer.name, None);
        assert!(!indexer.enable);
        assert_eq!(format!("{indexer:?}"), "unnamed(3)");
        assert_eq!(transport.last_request().url, "http://prowlarr:9696/api/v1/indexer/3");

        transport.push(StatusCode::OK, json!([{ "id": 3 }]));
        let results = client.test_all_indexers().await?;
        assert!(!results[0].is_valid);

        transport.push(
            StatusCode::OK,
            json!({ "indexers": [{ "indexerId": 1, "indexerName": "Nyaa", "numberOfQueries": 12 }] }),
        );
        let stats = client.indexer_stats().await?;
        assert_eq!(stats.indexers[0].number_of_queries, 12);
        assert!(stats.hosts.is_empty());
        assert_eq!(
            transport.last_request().url,
            "http://prowlarr:9696/api/v1/indexerstats"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_connection() {
        let transport = MockTransport::ok(json!({ "appName": "Prowlarr", "version": "1.0" }));
        let client = client(&transport);
        assert!(client.test_connection().await);
        assert_eq!(
            transport.last_request().url,
            "http://prowlarr:9696/api/v1/system/status"
        );
    }
}
