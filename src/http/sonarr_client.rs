use super::{
    ApiClient, ArrError, CommandResponse, Image, QualityProfile, QueueItem, QueuePage, RootFolder,
    SearchResult, ServiceKind, SystemStatus, Transport, calendar_params, merge_add_payload,
    with_query,
};
use crate::config::ServiceConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Debug;
use std::sync::Arc;

const API_VERSION: &str = "v3";
const INCLUDE_UNKNOWN: &str = "includeUnknownSeriesItems";

/// A client for interacting with Sonarr API.
/// https://sonarr.tv/docs/api/#v3
#[derive(Clone, Debug)]
pub struct SonarrClient {
    api: ApiClient,
}

impl SonarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ArrError> {
        let api = ApiClient::new(ServiceKind::Sonarr, API_VERSION, config)?;
        Ok(Self { api })
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let api = ApiClient::with_transport(ServiceKind::Sonarr, API_VERSION, config, transport)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn status(&self) -> Result<SystemStatus, ArrError> {
        self.api.system_status().await
    }

    /// https://sonarr.tv/docs/api/#v3/tag/queue/GET/api/v3/queue
    pub async fn queue(&self) -> Result<QueuePage<QueueItem>, ArrError> {
        self.api.queue(INCLUDE_UNKNOWN).await
    }

    /// Episodes airing between `start` and `end`.
    /// https://sonarr.tv/docs/api/#v3/tag/calendar/GET/api/v3/calendar
    pub async fn calendar(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Value>, ArrError> {
        let endpoint = with_query("/calendar", &calendar_params(start, end));
        self.api.get(&endpoint).await
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>, ArrError> {
        self.api.root_folders().await
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, ArrError> {
        self.api.quality_profiles().await
    }

    /// https://sonarr.tv/docs/api/#v3/tag/series/GET/api/v3/series
    pub async fn series(&self) -> Result<Vec<Series>, ArrError> {
        self.api.get("/series").await
    }

    pub async fn series_by_id(&self, id: u64) -> Result<Series, ArrError> {
        self.api.get(&format!("/series/{id}")).await
    }

    /// Look a series up on the metadata provider (TheTVDB).
    /// https://sonarr.tv/docs/api/#v3/tag/series-lookup
    pub async fn lookup_series(&self, term: &str) -> Result<Vec<SearchResult>, ArrError> {
        self.api
            .get(&with_query("/series/lookup", &[("term", term)]))
            .await
    }

    /// Add a series and immediately search for its missing episodes.
    /// https://sonarr.tv/docs/api/#v3/tag/series/POST/api/v3/series
    pub async fn add_series(&self, series: &NewSeries) -> Result<Series, ArrError> {
        let payload = merge_add_payload(
            json!({ "monitored": true, "seasonFolder": true }),
            series,
            json!({ "searchForMissingEpisodes": true }),
        )?;
        self.api.post("/series", &payload).await
    }

    pub async fn search_series(&self, series_id: u64) -> Result<CommandResponse, ArrError> {
        self.api
            .command("SeriesSearch", json!({ "seriesId": series_id }))
            .await
    }

    /// Get episodes for a given series ID
    /// https://sonarr.tv/docs/api/#v3/tag/episode/GET/api/v3/episode
    pub async fn episodes(&self, series_id: u64) -> Result<Vec<Episode>, ArrError> {
        self.api
            .get(&format!("/episode?seriesId={series_id}"))
            .await
    }

    pub async fn episode_by_id(&self, id: u64) -> Result<Episode, ArrError> {
        self.api.get(&format!("/episode/{id}")).await
    }

    pub async fn search_episodes(&self, episode_ids: &[u64]) -> Result<CommandResponse, ArrError> {
        self.api
            .command("EpisodeSearch", json!({ "episodeIds": episode_ids }))
            .await
    }

    pub async fn search_missing_episodes(&self) -> Result<CommandResponse, ArrError> {
        self.api.command("MissingEpisodeSearch", Value::Null).await
    }

    pub async fn test_connection(&self) -> bool {
        self.api.test_connection().await
    }
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub quality_profile_id: Option<u64>,
    #[serde(default)]
    pub season_folder: bool,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<u64>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub title_slug: Option<String>,
    #[serde(default)]
    pub added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
}

impl Debug for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.title.as_deref().unwrap_or("untitled");
        write!(f, "{title}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesStatistics {
    pub season_count: u32,
    pub episode_count: u32,
    pub episode_file_count: u32,
    pub total_episode_count: u32,
    pub size_on_disk: u64,
    pub percent_of_episodes: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub statistics: Option<SeasonStatistics>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonStatistics {
    pub next_airing: Option<DateTime<Utc>>,
    pub previous_airing: Option<DateTime<Utc>>,
    pub episode_file_count: u32,
    pub episode_count: u32,
    pub total_episode_count: u32,
    pub size_on_disk: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub series_id: Option<u64>,
    #[serde(default)]
    pub episode_file_id: Option<u64>,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub episode_number: Option<u32>,
    #[serde(default)]
    pub absolute_episode_number: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub air_date_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
}

impl std::fmt::Display for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.season_number, self.episode_number) {
            (Some(season), Some(episode)) => write!(f, "s{season:02}e{episode:02}"),
            _ => write!(f, "episode {}", self.id),
        }
    }
}

/// Fields for [`SonarrClient::add_series`]. Unset options fall back to the
/// service defaults (monitored, season folders on).
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub tvdb_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub root_folder_path: String,
    pub quality_profile_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_profile_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_folder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::{MockTransport, config};
    use chrono::TimeZone;
    use reqwest::{Method, StatusCode};

    fn client(transport: &MockTransport) -> SonarrClient {
        SonarrClient::with_transport(&config("http://sonarr:8989/"), Arc::new(transport.clone()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_versioned_url_and_api_key() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([]));
        let client = client(&transport);

        client.series().await?;
        client.root_folders().await?;
        client.quality_profiles().await?;

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://sonarr:8989/api/v3/series",
                "http://sonarr:8989/api/v3/rootfolder",
                "http://sonarr:8989/api/v3/qualityprofile",
            ]
        );
        for request in transport.requests() {
            assert_eq!(request.headers.get("x-api-key").unwrap(), "test-key");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_add_series_defaults() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({ "id": 10, "title": "Foo", "tvdbId": 1 }));
        let client = client(&transport);

        let new_series = NewSeries {
            tvdb_id: 1,
            root_folder_path: "/tv".to_owned(),
            quality_profile_id: 2,
            ..Default::default()
        };
        let series = client.add_series(&new_series).await?;
        assert_eq!(series.id, 10);

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://sonarr:8989/api/v3/series");
        let body = request.body.unwrap();
        assert_eq!(body["tvdbId"], 1);
        assert_eq!(body["rootFolderPath"], "/tv");
        assert_eq!(body["qualityProfileId"], 2);
        assert_eq!(body["monitored"], true);
        assert_eq!(body["seasonFolder"], true);
        assert_eq!(body["addOptions"]["searchForMissingEpisodes"], true);
        assert!(body.get("tags").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_series_overrides() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({ "id": 10, "title": "Foo" }));
        let client = client(&transport);

        let new_series = NewSeries {
            tvdb_id: 1,
            root_folder_path: "/tv".to_owned(),
            quality_profile_id: 2,
            monitored: Some(false),
            season_folder: Some(false),
            ..Default::default()
        };
        client.add_series(&new_series).await?;

        let body = transport.last_request().body.unwrap();
        assert_eq!(body["monitored"], false);
        assert_eq!(body["seasonFolder"], false);
        assert_eq!(body["addOptions"]["searchForMissingEpisodes"], true);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_episodes_command() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({
            "id": 123,
            "name": "EpisodeSearch",
            "status": "queued",
            "queued": "2024-01-01T00:00:00Z"
        }));
        let client = client(&transport);

        let response = client.search_episodes(&[1, 2, 3]).await?;
        assert_eq!(response, CommandResponse { id: 123 });

        let request = transport.last_request();
        assert_eq!(request.url, "http://sonarr:8989/api/v3/command");
        assert_eq!(
            request.body,
            Some(json!({ "name": "EpisodeSearch", "episodeIds": [1, 2, 3] }))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_series_and_missing_search_commands() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({ "id": 1 }));
        let client = client(&transport);

        client.search_series(5).await?;
        assert_eq!(
            transport.last_request().body,
            Some(json!({ "name": "SeriesSearch", "seriesId": 5 }))
        );

        client.search_missing_episodes().await?;
        assert_eq!(
            transport.last_request().body,
            Some(json!({ "name": "MissingEpisodeSearch" }))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_query() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([{ "id": 1, "title": "Pilot" }]));
        let client = client(&transport);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let entries = client.calendar(None, None).await?;
        assert_eq!(entries[0]["title"], "Pilot");
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/calendar"
        );

        client.calendar(Some(start), None).await?;
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/calendar?start=2024-01-01T00%3A00%3A00Z"
        );

        client.calendar(Some(start), Some(end)).await?;
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/calendar?start=2024-01-01T00%3A00%3A00Z&end=2024-02-01T00%3A00%3A00Z"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_episodes_and_lookup() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!([{
            "id": 11,
            "seriesId": 3,
            "seasonNumber": 1,
            "episodeNumber": 2,
            "hasFile": true,
            "monitored": true
        }]));
        let client = client(&transport);

        let episodes = client.episodes(3).await?;
        assert_eq!(episodes[0].to_string(), "s01e02");
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/episode?seriesId=3"
        );

        transport.push(
            StatusCode::OK,
            json!([{ "title": "The Office", "tvdbId": 73244, "year": 2005 }]),
        );
        let hits = client.lookup_series("the office").await?;
        assert_eq!(hits[0].tvdb_id, Some(73244));
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/series/lookup?term=the%20office"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_series_deser() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({
            "id": 3,
            "title": "Foo",
            "tvdbId": 1,
            "monitored": true,
            "statistics": { "sizeOnDisk": 1024, "episodeFileCount": 2 },
            "seasons": [{ "seasonNumber": 1, "monitored": true,
                          "statistics": { "episodeFileCount": 2, "totalEpisodeCount": 10 } }],
            "unknownField": [1, 2, 3]
        }));
        let client = client(&transport);

        let series = client.series_by_id(3).await?;
        assert_eq!(format!("{series:?}"), "Foo(3)");
        assert_eq!(series.statistics.unwrap().size_on_disk, 1024);
        assert_eq!(series.seasons[0].statistics.as_ref().unwrap().total_episode_count, 10);
        assert_eq!(
            transport.last_request().url,
            "http://sonarr:8989/api/v3/series/3"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_minimal_resources() -> anyhow::Result<()> {
        let transport = MockTransport::ok(json!({ "id": 7 }));
        let client = client(&transport);

        let series = client.series_by_id(7).await?;
        assert_eq!(series.title, None);
        assert_eq!(format!("{series:?}"), "untitled(7)");

        let episode = client.episode_by_id(7).await?;
        assert_eq!(episode.series_id, None);
        assert_eq!(episode.to_string(), "episode 7");

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://sonarr:8989/api/v3/series/7",
                "http://sonarr:8989/api/v3/episode/7",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let transport = MockTransport::status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let client = client(&transport);

        let err = client.series().await.unwrap_err();
        assert!(err.to_string().contains("Sonarr"));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
        assert!(client.queue().await.is_err());
        assert!(client.search_episodes(&[1]).await.is_err());
        assert!(!client.test_connection().await);
    }
}
