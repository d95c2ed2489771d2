use crate::config::ServiceConfig;
use crate::http::{
    ApiClient, ArrError, LidarrClient, ProwlarrClient, QualityProfile, QueueItem, QueuePage,
    RadarrClient, ReadarrClient, RootFolder, SearchResult, ServiceKind, SonarrClient,
    SystemStatus,
};
use anyhow::bail;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Any of the supported clients, for callers that pick the service at
/// runtime.
#[derive(Clone, Debug)]
pub enum Service {
    Sonarr(SonarrClient),
    Radarr(RadarrClient),
    Lidarr(LidarrClient),
    Readarr(ReadarrClient),
    Prowlarr(ProwlarrClient),
}

impl Service {
    pub fn new(kind: ServiceKind, config: &ServiceConfig) -> Result<Self, ArrError> {
        let service = match kind {
            ServiceKind::Sonarr => Service::Sonarr(SonarrClient::new(config)?),
            ServiceKind::Radarr => Service::Radarr(RadarrClient::new(config)?),
            ServiceKind::Lidarr => Service::Lidarr(LidarrClient::new(config)?),
            ServiceKind::Readarr => Service::Readarr(ReadarrClient::new(config)?),
            ServiceKind::Prowlarr => Service::Prowlarr(ProwlarrClient::new(config)?),
        };
        Ok(service)
    }

    pub fn kind(&self) -> ServiceKind {
        self.api().service()
    }

    pub fn api(&self) -> &ApiClient {
        match self {
            Service::Sonarr(client) => client.api(),
            Service::Radarr(client) => client.api(),
            Service::Lidarr(client) => client.api(),
            Service::Readarr(client) => client.api(),
            Service::Prowlarr(client) => client.api(),
        }
    }

    pub async fn status(&self) -> anyhow::Result<SystemStatus> {
        Ok(self.api().system_status().await?)
    }

    pub async fn test_connection(&self) -> bool {
        self.api().test_connection().await
    }

    pub async fn queue(&self) -> anyhow::Result<QueuePage<QueueItem>> {
        let queue = match self {
            Service::Sonarr(client) => client.queue().await?,
            Service::Radarr(client) => client.queue().await?,
            Service::Lidarr(client) => client.queue().await?,
            Service::Readarr(client) => client.queue().await?,
            Service::Prowlarr(_) => bail!("Prowlarr has no download queue"),
        };
        Ok(queue)
    }

    /// Calendar entries as JSON, since their shape differs per service.
    pub async fn calendar(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Value> {
        let entries = match self {
            Service::Sonarr(client) => serde_json::to_value(client.calendar(start, end).await?)?,
            Service::Radarr(client) => serde_json::to_value(client.calendar(start, end).await?)?,
            Service::Lidarr(client) => serde_json::to_value(client.calendar(start, end).await?)?,
            Service::Readarr(client) => serde_json::to_value(client.calendar(start, end).await?)?,
            Service::Prowlarr(_) => bail!("Prowlarr has no calendar"),
        };
        Ok(entries)
    }

    pub async fn lookup(&self, term: &str) -> anyhow::Result<Vec<SearchResult>> {
        let hits = match self {
            Service::Sonarr(client) => client.lookup_series(term).await?,
            Service::Radarr(client) => client.lookup_movies(term).await?,
            Service::Lidarr(client) => client.lookup_artists(term).await?,
            Service::Readarr(client) => client.lookup_authors(term).await?,
            Service::Prowlarr(_) => bail!("Prowlarr has no catalog lookup, use search instead"),
        };
        Ok(hits)
    }

    pub async fn root_folders(&self) -> anyhow::Result<Vec<RootFolder>> {
        if let Service::Prowlarr(_) = self {
            bail!("Prowlarr has no root folders");
        }
        Ok(self.api().root_folders().await?)
    }

    pub async fn quality_profiles(&self) -> anyhow::Result<Vec<QualityProfile>> {
        if let Service::Prowlarr(_) = self {
            bail!("Prowlarr has no quality profiles");
        }
        Ok(self.api().quality_profiles().await?)
    }
}
