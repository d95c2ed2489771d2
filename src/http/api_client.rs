use super::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use super::{
    ArrError, CommandResponse, QualityProfile, QueueItem, QueuePage, RootFolder, ServiceKind,
    SystemStatus,
};
use crate::config::ServiceConfig;
use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Debug;
use std::sync::Arc;

const API_KEY_HEADER: &str = "x-api-key";

/// Per-call overrides for [`ApiClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Inserted after the default headers, replacing any with the same name.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Request dispatcher shared by every service client: builds
/// `{base_url}/api/{version}{endpoint}`, attaches the API key and turns
/// non-success statuses into [`ArrError::Api`].
#[derive(Clone)]
pub struct ApiClient {
    service: ServiceKind,
    base_url: String,
    default_headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(
        service: ServiceKind,
        version: &str,
        config: &ServiceConfig,
    ) -> Result<Self, ArrError> {
        Self::with_transport(service, version, config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(
        service: ServiceKind,
        version: &str,
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ArrError> {
        let base_url = config.base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url).map_err(|e| {
            ArrError::InvalidConfig(format!("invalid {service} base url \"{base_url}\": {e}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ArrError::InvalidConfig(format!(
                "invalid {service} base url \"{base_url}\""
            )));
        }

        Ok(Self {
            service,
            base_url: format!("{base_url}/api/{version}"),
            default_headers: default_headers(&config.api_key)?,
            transport,
        })
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    /// Versioned API root, e.g. `http://localhost:8989/api/v3`.
    pub fn api_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a single request to `endpoint` (which may carry a query string)
    /// and decode the JSON body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ArrError> {
        let RequestOptions {
            method,
            body,
            headers,
        } = options;

        let mut merged = self.default_headers.clone();
        merged.extend(headers);

        let url = format!("{}{endpoint}", self.base_url);
        let request = ApiRequest {
            method: method.clone(),
            url: url.clone(),
            headers: merged,
            body,
        };
        let response = self.transport.send(request).await?;
        let body = self.handle_error(&method, &url, response)?;
        decode(self.service, &body)
    }

    fn handle_error(
        &self,
        method: &Method,
        url: &str,
        response: ApiResponse,
    ) -> Result<String, ArrError> {
        let ApiResponse { status, body } = response;
        if status.is_success() {
            debug!("{method} {url} succeeded with {status}");
            Ok(body)
        } else {
            warn!("{method} {url} failed with status {status}");
            Err(ArrError::Api {
                service: self.service,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            })
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ArrError> {
        self.request(endpoint, RequestOptions::new(Method::GET))
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ArrError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ArrError::Encode)?;
        self.request(endpoint, RequestOptions::new(Method::POST).body(body))
            .await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ArrError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ArrError::Encode)?;
        self.request(endpoint, RequestOptions::new(Method::PUT).body(body))
            .await
    }

    /// Queue a named background command, e.g. `SeriesSearch`. `fields` must be
    /// a JSON object (or null) and is merged next to `name`.
    pub async fn command(&self, name: &str, fields: Value) -> Result<CommandResponse, ArrError> {
        let mut body = json!({ "name": name });
        if let (Value::Object(body), Value::Object(fields)) = (&mut body, fields) {
            body.extend(fields);
        }
        debug!("queueing {} command {name}", self.service);
        self.post("/command", &body).await
    }

    /// https://sonarr.tv/docs/api/#v3/tag/system/GET/api/v3/system/status
    pub async fn system_status(&self) -> Result<SystemStatus, ArrError> {
        self.get("/system/status").await
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>, ArrError> {
        self.get("/rootfolder").await
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, ArrError> {
        self.get("/qualityprofile").await
    }

    /// Current download queue, including items the service couldn't match to
    /// its catalog. `include_unknown` is the service specific flag name, e.g.
    /// `includeUnknownSeriesItems`.
    pub async fn queue(&self, include_unknown: &str) -> Result<QueuePage<QueueItem>, ArrError> {
        self.get(&format!("/queue?{include_unknown}=true")).await
    }

    /// `true` if `/system/status` answers successfully. Any failure, transport
    /// or API, is reduced to `false`.
    pub async fn test_connection(&self) -> bool {
        match self.system_status().await {
            Ok(status) => {
                debug!(
                    "{} is reachable, version {}",
                    self.service,
                    status.version.as_deref().unwrap_or("unknown")
                );
                true
            }
            Err(err) => {
                debug!("{} connection test failed: {err}", self.service);
                false
            }
        }
    }
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.service, self.base_url)
    }
}

fn default_headers(api_key: &str) -> Result<HeaderMap, ArrError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let mut header_value = HeaderValue::from_str(api_key)?;
    header_value.set_sensitive(true);
    default_headers.insert(API_KEY_HEADER, header_value);
    Ok(default_headers)
}

/// Decode a successful body. An empty body is treated as JSON `null`.
fn decode<T: DeserializeOwned>(service: ServiceKind, body: &str) -> Result<T, ArrError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|source| ArrError::Decode { service, source })
}
