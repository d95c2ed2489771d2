use crate::http::ServiceKind;
use anyhow::Context;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::Path;

/// Connection settings of a single *arr instance.
#[derive(Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Contents of the config file. Every service section is optional.
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    pub sonarr: Option<ServiceConfig>,
    pub radarr: Option<ServiceConfig>,
    pub lidarr: Option<ServiceConfig>,
    pub readarr: Option<ServiceConfig>,
    pub prowlarr: Option<ServiceConfig>,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config)
            .with_context(|| format!("unable to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn service(&self, kind: ServiceKind) -> Option<&ServiceConfig> {
        match kind {
            ServiceKind::Sonarr => self.sonarr.as_ref(),
            ServiceKind::Radarr => self.radarr.as_ref(),
            ServiceKind::Lidarr => self.lidarr.as_ref(),
            ServiceKind::Readarr => self.readarr.as_ref(),
            ServiceKind::Prowlarr => self.prowlarr.as_ref(),
        }
    }

    /// All configured services in a stable order.
    pub fn configured(&self) -> Vec<(ServiceKind, &ServiceConfig)> {
        ServiceKind::ALL
            .into_iter()
            .filter_map(|kind| Some((kind, self.service(kind)?)))
            .collect()
    }
}
