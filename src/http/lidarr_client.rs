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

const API_VERSION: &str = "v1";
const INCLUDE_UNKNOWN: &str = "includeUnknownArtistItems";

/// A client for interacting with Lidarr API.
/// https://lidarr.audio/docs/api/
#[derive(Clone, Debug)]
pub struct LidarrClient {
    api: ApiClient,
}

impl LidarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ArrError> {
        let api = ApiClient::new(ServiceKind::Lidarr, API_VERSION, config)?;
        Ok(Self { api })
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let api = ApiClient::with_transport(ServiceKind::Lidarr, API_VERSION, config, transport)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn status(&self) -> Result<SystemStatus, ArrError> {
        self.api.system_status().await
    }

    pub async fn queue(&self) -> Result<QueuePage<QueueItem>, ArrError> {
        self.api.queue(INCLUDE_UNKNOWN).await
    }

    /// Albums released between `start` and `end`.
    pub async fn calendar(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Album>, ArrError> {
        let endpoint = with_query("/calendar", &calendar_params(start, end));
        self.api.get(&endpoint).await
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>, ArrError> {
        self.api.root_folders().await
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, ArrError> {
        self.api.quality_profiles().await
    }

    pub async fn artists(&self) -> Result<Vec<Artist>, ArrError> {
        self.api.get("/artist").await
    }

    pub async fn artist_by_id(&self, id: u64) -> Result<Artist, ArrError> {
        self.api.get(&format!("/artist/{id}")).await
    }

    /// Look an artist up on MusicBrainz through Lidarr.
    pub async fn lookup_artists(&self, term: &str) -> Result<Vec<SearchResult>, ArrError> {
        self.api
            .get(&with_query("/artist/lookup", &[("term", term)]))
            .await
    }

    /// Add an artist and immediately search for its missing albums.
    pub async fn add_artist(&self, artist: &NewArtist) -> Result<Artist, ArrError> {
        let payload = merge_add_payload(
            json!({ "monitored": true }),
            artist,
            json!({ "searchForMissingAlbums": true }),
        )?;
        self.api.post("/artist", &payload).await
    }

    pub async fn search_artist(&self, artist_id: u64) -> Result<CommandResponse, ArrError> {
        self.api
            .command("ArtistSearch", json!({ "artistId": artist_id }))
            .await
    }

    /// Albums of one artist, or of the whole library when `artist_id` is
    /// `None`.
    pub async fn albums(&self, artist_id: Option<u64>) -> Result<Vec<Album>, ArrError> {
        let endpoint = match artist_id {
            Some(id) => format!("/album?artistId={id}"),
            None => "/album".to_owned(),
        };
        self.api.get(&endpoint).await
    }

    pub async fn album_by_id(&self, id: u64) -> Result<Album, ArrError> {
        self.api.get(&format!("/album/{id}")).await
    }

    pub async fn search_albums(&self, album_ids: &[u64]) -> Result<CommandResponse, ArrError> {
        self.api
            .command("AlbumSearch", json!({ "albumIds": album_ids }))
            .await
    }

    pub async fn search_missing_albums(&self) -> Result<CommandResponse, ArrError> {
        self.api.command("MissingAlbumSearch", Value::Null).await
    }

    pub async fn test_connection(&self) -> bool {
        self.api.test_connection().await
    }
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u64,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub foreign_artist_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub artist_type: Option<String>,
    #[serde(default)]
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub root_folder_path: Option<String>,
    #[serde(default)]
    pub quality_profile_id: Option<u64>,
    #[serde(default)]
    pub metadata_profile_id: Option<u64>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub statistics: Option<ArtistStatistics>,
}

impl Debug for Artist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let artist_name = self.artist_name.as_deref().unwrap_or("unnamed");
        write!(f, "{artist_name}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistStatistics {
    pub album_count: u32,
    pub track_file_count: u32,
    pub track_count: u32,
    pub total_track_count: u32,
    pub size_on_disk: u64,
    pub percent_of_tracks: f64,
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_id: Option<u64>,
    #[serde(default)]
    pub foreign_album_id: Option<String>,
    #[serde(default)]
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub any_release_ok: bool,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artist: Option<Box<Artist>>,
    #[serde(default)]
    pub statistics: Option<AlbumStatistics>,
}

impl Debug for Album {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.title.as_deref().unwrap_or("untitled");
        write!(f, "{title}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumStatistics {
    pub track_file_count: u32,
    pub track_count: u32,
    pub total_track_count: u32,
    pub size_on_disk: u64,
    pub percent_of_tracks: f64,
}

/// Fields for [`LidarrClient::add_artist`].
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewArtist {
    pub foreign_artist_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    pub root_folder_path: String,
    pub quality_profile_id: u64,
    pub metadata_profile_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}
