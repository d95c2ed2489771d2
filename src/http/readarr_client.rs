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
const INCLUDE_UNKNOWN: &str = "includeUnknownAuthorItems";

/// A client for interacting with Readarr API.
#[derive(Clone, Debug)]
pub struct ReadarrClient {
    api: ApiClient,
}

impl ReadarrClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ArrError> {
        let api = ApiClient::new(ServiceKind::Readarr, API_VERSION, config)?;
        Ok(Self { api })
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let api = ApiClient::with_transport(ServiceKind::Readarr, API_VERSION, config, transport)?;
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

    /// Books released between `start` and `end`.
    pub async fn calendar(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Book>, ArrError> {
        let endpoint = with_query("/calendar", &calendar_params(start, end));
        self.api.get(&endpoint).await
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>, ArrError> {
        self.api.root_folders().await
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, ArrError> {
        self.api.quality_profiles().await
    }

    pub async fn authors(&self) -> Result<Vec<Author>, ArrError> {
        self.api.get("/author").await
    }

    pub async fn author_by_id(&self, id: u64) -> Result<Author, ArrError> {
        self.api.get(&format!("/author/{id}")).await
    }

    pub async fn lookup_authors(&self, term: &str) -> Result<Vec<SearchResult>, ArrError> {
        self.api
            .get(&with_query("/author/lookup", &[("term", term)]))
            .await
    }

    /// Add an author and immediately search for their missing books.
    pub async fn add_author(&self, author: &NewAuthor) -> Result<Author, ArrError> {
        let payload = merge_add_payload(
            json!({ "monitored": true }),
            author,
            json!({ "searchForMissingBooks": true }),
        )?;
        self.api.post("/author", &payload).await
    }

    pub async fn search_author(&self, author_id: u64) -> Result<CommandResponse, ArrError> {
        self.api
            .command("AuthorSearch", json!({ "authorId": author_id }))
            .await
    }

    /// Books of one author, or the whole library when `author_id` is `None`.
    pub async fn books(&self, author_id: Option<u64>) -> Result<Vec<Book>, ArrError> {
        let endpoint = match author_id {
            Some(id) => format!("/book?authorId={id}"),
            None => "/book".to_owned(),
        };
        self.api.get(&endpoint).await
    }

    pub async fn book_by_id(&self, id: u64) -> Result<Book, ArrError> {
        self.api.get(&format!("/book/{id}")).await
    }

    pub async fn search_books(&self, book_ids: &[u64]) -> Result<CommandResponse, ArrError> {
        self.api
            .command("BookSearch", json!({ "bookIds": book_ids }))
            .await
    }

    pub async fn search_missing_books(&self) -> Result<CommandResponse, ArrError> {
        self.api.command("MissingBookSearch", Value::Null).await
    }

    pub async fn test_connection(&self) -> bool {
        self.api.test_connection().await
    }
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: u64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub foreign_author_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
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
    pub statistics: Option<AuthorStatistics>,
}

impl Debug for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let author_name = self.author_name.as_deref().unwrap_or("unnamed");
        write!(f, "{author_name}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorStatistics {
    pub book_file_count: u32,
    pub book_count: u32,
    pub available_book_count: u32,
    pub total_book_count: u32,
    pub size_on_disk: u64,
    pub percent_of_books: f64,
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_title: Option<String>,
    #[serde(default)]
    pub series_title: Option<String>,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub foreign_book_id: Option<String>,
    #[serde(default)]
    pub title_slug: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub any_edition_ok: bool,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub author: Option<Box<Author>>,
    #[serde(default)]
    pub statistics: Option<BookStatistics>,
}

impl Debug for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.title.as_deref().unwrap_or("untitled");
        write!(f, "{title}({})", self.id)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookStatistics {
    pub book_file_count: u32,
    pub book_count: u32,
    pub total_book_count: u32,
    pub size_on_disk: u64,
    pub percent_of_books: f64,
}

/// Fields for [`ReadarrClient::add_author`].
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    pub foreign_author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub root_folder_path: String,
    pub quality_profile_id: u64,
    pub metadata_profile_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}
