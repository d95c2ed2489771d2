pub mod api_client;
pub mod error;
pub mod lidarr_client;
pub mod models;
pub mod prowlarr_client;
pub mod radarr_client;
pub mod readarr_client;
pub mod sonarr_client;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use api_client::{ApiClient, RequestOptions};
pub use error::ArrError;
pub use lidarr_client::LidarrClient;
pub use models::*;
pub use prowlarr_client::ProwlarrClient;
pub use radarr_client::RadarrClient;
pub use readarr_client::ReadarrClient;
pub use sonarr_client::SonarrClient;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt::Display, str::FromStr};

const SONARR_NAME: &str = "Sonarr";
const RADARR_NAME: &str = "Radarr";
const LIDARR_NAME: &str = "Lidarr";
const READARR_NAME: &str = "Readarr";
const PROWLARR_NAME: &str = "Prowlarr";

/// The *arr service a client talks to.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ServiceKind {
    Sonarr,
    Radarr,
    Lidarr,
    Readarr,
    Prowlarr,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Sonarr,
        ServiceKind::Radarr,
        ServiceKind::Lidarr,
        ServiceKind::Readarr,
        ServiceKind::Prowlarr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Sonarr => SONARR_NAME,
            ServiceKind::Radarr => RADARR_NAME,
            ServiceKind::Lidarr => LIDARR_NAME,
            ServiceKind::Readarr => READARR_NAME,
            ServiceKind::Prowlarr => PROWLARR_NAME,
        }
    }
}

impl Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown service \"{s}\""))
    }
}

impl<'de> Deserialize<'de> for ServiceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ServiceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Append `params` to `path` as a URL-encoded query string. Returns `path`
/// untouched when there are no params.
pub(crate) fn with_query<K, V>(path: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return path.to_owned();
    }
    let query = params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Query params for the `/calendar` endpoints. Missing bounds are left out.
pub(crate) fn calendar_params(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<(&'static str, String)> {
    [("start", start), ("end", end)]
        .into_iter()
        .filter_map(|(name, dt)| Some((name, dt?.to_rfc3339_opts(SecondsFormat::Secs, true))))
        .collect()
}

/// Build the body for an `add*` call: `defaults`, then every field the caller
/// set, then `add_options` under the `addOptions` key. Unset optional fields
/// must be skipped on serialization so they don't overwrite defaults.
pub fn merge_add_payload<T: Serialize>(
    defaults: Value,
    fields: &T,
    add_options: Value,
) -> Result<Value, ArrError> {
    let mut payload = match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(fields) = serde_json::to_value(fields).map_err(ArrError::Encode)? {
        payload.extend(fields);
    }
    payload.insert("addOptions".to_owned(), add_options);
    Ok(Value::Object(payload))
}
