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
const INCLUDE_UNKNOWN: &str = "includeUnknownMovieItems";

/// A client for interacting with Radarr API.
/// https://radarr.video/docs/api/
#[derive(Clone, Debug)]
pub struct RadarrClient {
    api: ApiClient,
}

impl RadarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ArrError> {
        let api = ApiClient::new(ServiceKind::Radarr, API_VERSION, config)?;
        Ok(Self { api })
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let api = ApiClient::with_transport(ServiceKind::Radarr, API_VERSION, config, transport)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn status(&self) -> Result<SystemStatus, ArrError> {
        self.api.system_status().await
    }

    /// https://radarr.video/docs/api/#/Queue/get_api_v3_queue
    pub async fn queue(&self) -> Result<QueuePage<QueueItem>, ArrError> {
        self.api.queue(INCLUDE_UNKNOWN).await
    }

    /// Movies with a cinema, digital or physical release between `start` and
    /// `end`.
    /// https://radarr.video/docs/api/#/Calendar/get_api_v3_calendar
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

    /// https://radarr.video/docs/api/#/Movie/get_api_v3_movie
    pub async fn movies(&self) -> Result<Vec<Movie>, ArrError> {
        self.api.get("/movie").await
    }

    /// https://radarr.video/docs/api/#/Movie/get_api_v3_movie__id_
    pub async fn movie_by_id(&self, id: u64) -> Result<Movie, ArrError> {
        self.api.get(&format!("/movie/{id}")).await
    }

    /// Look a movie up on TMDB through Radarr.
    pub async fn lookup_movies(&self, term: &str) -> Result<Vec<SearchResult>, ArrError> {
        self.api
            .get(&with_query("/movie/lookup", &[("term", term)]))
            .await
    }

    /// Add a movie and immediately search for it.
    /// https://radarr.video/docs/api/#/Movie/post_api_v3_movie
    pub async fn add_movie(&self, movie: &NewMovie) -> Result<Movie, ArrError> {
        let payload = merge_add_payload(
            json!({ "monitored": true }),
            movie,
            json!({ "searchForMovie": true }),
        )?;
        self.api.post("/movie", &payload).await
    }

    pub async fn search_movies(&self, movie_ids: &[u64]) -> Result<CommandResponse, ArrError> {
        self.api
            .command("MoviesSearch", json!({ "movieIds": movie_ids }))
            .await
    }

    pub async fn search_missing_movies(&self) -> Result<CommandResponse, ArrError> {
        self.api.command("MissingMoviesSearch", Value::Null).await
    }

    pub async fn test_connection(&self) -> bool {
        self.api.test_connection().await
    }
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub in_cinemas: Option<DateTime<Utc>>,
    #[serde(default)]
    pub physical_release: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digital_release: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub minimum_availability: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub root_folder_path: Option<String>,
    #[serde(default)]
    pub quality_profile_id: Option<u64>,
    #[serde(default)]
    pub size_on_disk: Option<u64>,
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
    pub statistics: Option<MovieStatistics>,
}

impl Debug for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.title.as_deref().unwrap_or("untitled");
        write!(f, "{title}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieStatistics {
    pub movie_file_count: u32,
    pub size_on_disk: u64,
    pub release_groups: Vec<String>,
}

/// Fields for [`RadarrClient::add_movie`].
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub tmdb_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub root_folder_path: String,
    pub quality_profile_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_availability: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}
