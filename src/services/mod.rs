pub mod service;

pub use service::Service;

use crate::config::Config;
use crate::http::{ProwlarrClient, ServiceKind};
use anyhow::{Context, bail};
use log::{error, info};
use std::{collections::HashMap, sync::Arc};

/// Every *arr service defined in the config file, keyed by kind.
#[derive(Clone, Debug)]
pub struct Services(Arc<HashMap<ServiceKind, Service>>);

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut services = HashMap::new();
        for (kind, service_config) in config.configured() {
            let service = Service::new(kind, service_config)
                .with_context(|| format!("unable to set up {kind} client"))?;
            services.insert(kind, service);
        }
        Ok(Self(Arc::new(services)))
    }

    pub fn from_services(services: impl IntoIterator<Item = Service>) -> Self {
        let services = services.into_iter().map(|s| (s.kind(), s)).collect();
        Self(Arc::new(services))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, kind: ServiceKind) -> anyhow::Result<&Service> {
        self.0
            .get(&kind)
            .with_context(|| format!("no \"{kind}\" section is configured"))
    }

    pub fn prowlarr(&self) -> anyhow::Result<&ProwlarrClient> {
        match self.get(ServiceKind::Prowlarr)? {
            Service::Prowlarr(client) => Ok(client),
            other => bail!("{} is registered as Prowlarr", other.kind()),
        }
    }

    /// Test the connection to every configured service concurrently and log
    /// the outcome. Results are ordered by service kind.
    pub async fn check(&self) -> Vec<(ServiceKind, bool)> {
        let checks = self.0.values().map(|service| async move {
            let reachable = service.test_connection().await;
            if reachable {
                info!("{} at {} is reachable", service.kind(), service.api().api_url());
            } else {
                error!("{} at {} is unreachable", service.kind(), service.api().api_url());
            }
            (service.kind(), reachable)
        });
        let mut results = futures::future::join_all(checks).await;
        results.sort_by_key(|(kind, _)| *kind);
        results
    }
}
