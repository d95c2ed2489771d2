//! Resources shared by every *arr flavour.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /system/status`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub app_name: Option<String>,
    pub instance_name: Option<String>,
    pub version: Option<String>,
    pub build_time: Option<DateTime<Utc>>,
    pub is_debug: bool,
    pub is_production: bool,
    pub is_admin: bool,
    pub is_user_interactive: bool,
    pub startup_path: Option<String>,
    pub app_data: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub is_net_core: bool,
    pub is_linux: bool,
    pub is_osx: bool,
    pub is_windows: bool,
    pub is_docker: bool,
    pub mode: Option<String>,
    pub branch: Option<String>,
    pub authentication: Option<String>,
    pub url_base: Option<String>,
    pub runtime_version: Option<String>,
    pub runtime_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

/// One page of the download queue, exactly as the service returned it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_records: u32,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueItem {
    pub id: u64,
    pub series_id: Option<u64>,
    pub episode_id: Option<u64>,
    pub movie_id: Option<u64>,
    pub artist_id: Option<u64>,
    pub album_id: Option<u64>,
    pub author_id: Option<u64>,
    pub book_id: Option<u64>,
    pub title: Option<String>,
    pub size: f64,
    #[serde(rename = "sizeleft")]
    pub size_left: f64,
    #[serde(rename = "timeleft")]
    pub time_left: Option<String>,
    pub estimated_completion_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub tracked_download_status: Option<String>,
    pub tracked_download_state: Option<String>,
    pub status_messages: Vec<StatusMessage>,
    pub error_message: Option<String>,
    pub download_id: Option<String>,
    pub protocol: Option<String>,
    pub download_client: Option<String>,
    pub indexer: Option<String>,
    pub output_path: Option<String>,
}

impl QueueItem {
    /// Percentage downloaded, `0.0` when the size is unknown.
    pub fn progress(&self) -> f64 {
        if self.size <= 0.0 {
            return 0.0;
        }
        ((self.size - self.size_left) / self.size * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusMessage {
    pub title: Option<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootFolder {
    pub id: u64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub accessible: Option<bool>,
    #[serde(default)]
    pub free_space: Option<u64>,
    #[serde(default)]
    pub total_space: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfile {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub upgrade_allowed: Option<bool>,
    #[serde(default)]
    pub cutoff: Option<u64>,
}

/// A lookup hit from the service's metadata provider. Only the foreign id
/// relevant to the queried service is usually set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub overview: Option<String>,
    pub remote_poster: Option<String>,
    pub tvdb_id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub imdb_id: Option<String>,
    pub foreign_artist_id: Option<String>,
    pub foreign_author_id: Option<String>,
    pub artist_name: Option<String>,
    pub author_name: Option<String>,
    pub images: Vec<Image>,
}

impl SearchResult {
    /// Display name regardless of which service produced the hit.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.artist_name.as_deref())
            .or(self.author_name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub cover_type: Option<String>,
    pub url: Option<String>,
    pub remote_url: Option<String>,
}

/// Acknowledgement of a queued background command. The command's outcome is
/// not tracked.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandResponse {
    pub id: u64,
}
