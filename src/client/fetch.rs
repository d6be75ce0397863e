//! Main OctoPrint HTTP client implementation.
//!
//! Provides [`OctoPrintClient`], which owns the HTTP connection pool, adds
//! authentication, normalizes response bodies and maps error statuses.
//!
//! # Examples
//!
//! ## Reading the current job
//!
//! ```ignore
//! use octoprint_client::{ClientConfig, OctoPrintClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OctoPrintClient::new(
//!         ClientConfig::new("http://octopi.local").with_api_key("API_KEY"),
//!     )?;
//!     let job = client.job().get().await?;
//!     println!("State: {}", job.state);
//!     Ok(())
//! }
//! ```
//!
//! ## Talking to an endpoint without a typed wrapper
//!
//! ```ignore
//! use serde_json::Value;
//!
//! let plugins: Value = client.get("api/plugin/softwareupdate").await?;
//! ```

use crate::client::{config::ClientConfig, utils, ApiResponse};
use crate::error::{OctoPrintError, Result};
use crate::protocol::API_KEY_HEADER;
use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// The OctoPrint REST client.
///
/// Cheap to clone; clones share the connection pool and configuration.
/// Resource handles such as [`files`](OctoPrintClient::files) borrow the
/// client and expose typed operations per endpoint group.
#[derive(Clone)]
pub struct OctoPrintClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
}

impl std::fmt::Debug for OctoPrintClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctoPrintClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.config.api_key.is_some())
            .finish()
    }
}

impl OctoPrintClient {
    /// Create a client for the configured instance.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(OctoPrintError::Config(format!(
                "base url cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(config.user_agent.clone());

        if !config.proxy_url.is_empty() {
            builder = builder.proxy(reqwest::Proxy::all(&config.proxy_url)?);
        }

        Ok(OctoPrintClient {
            client: builder.build()?,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Create a client from `OCTOPRINT_URL` / `OCTOPRINT_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The parsed base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (e.g. `api/files/local`) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        utils::endpoint_url(&self.base_url, path)
    }

    /// `GET` a path and deserialize the normalized body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.model(self.send(Method::GET, path, &[], None).await?)
    }

    /// `GET` with query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.model(self.send(Method::GET, path, query, None).await?)
    }

    /// `POST` a JSON body and deserialize the normalized response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.model(self.send(Method::POST, path, &[], Some(body)).await?)
    }

    /// `PUT` a JSON body and deserialize the normalized response.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.model(self.send(Method::PUT, path, &[], Some(body)).await?)
    }

    /// `PATCH` a JSON body and deserialize the normalized response.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.model(self.send(Method::PATCH, path, &[], Some(body)).await?)
    }

    /// `DELETE` a path and deserialize the normalized response.
    ///
    /// Use `T = ()` for endpoints answering `204 No Content`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.model(self.send(Method::DELETE, path, &[], None).await?)
    }

    /// `POST` a command body, ignoring whatever the server answers.
    ///
    /// OctoPrint's command endpoints (`{"command": "..."}`) answer with
    /// `204 No Content` on success.
    pub async fn post_command<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// `POST` a multipart form. Never retried, forms are single-use.
    pub async fn upload(&self, path: &str, form: Form) -> Result<ApiResponse> {
        let url = self.url(path)?;
        if self.config.enable_logging {
            tracing::debug!(method = "POST", url = %url, "multipart upload");
        }
        let request = self.request(Method::POST, url).multipart(form);
        let response = request.send().await?;
        self.finish(response).await
    }

    /// Download raw bytes from an API path or an absolute URL.
    ///
    /// Absolute URLs are used as given, which allows passing the
    /// `refs.download` links OctoPrint includes in file listings. The API key
    /// is only sent when the URL points at the configured instance.
    pub async fn download(&self, target: &str) -> Result<Bytes> {
        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.url(target)?,
            Err(e) => return Err(e.into()),
        };
        let (_, body) = self.send_raw(Method::GET, url, None).await?;
        Ok(body)
    }

    /// Send a request with optional query and JSON body, retrying retryable
    /// failures up to `max_retries` times.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let mut attempt = 0;
        loop {
            match self.send_once(method.clone(), path, query, body.as_ref()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = utils::exponential_backoff(attempt, self.config.retry_delay_ms);
                    if self.config.enable_logging {
                        tracing::warn!(
                            "Request to {} failed (attempt {}), retrying after {:?}: {}",
                            path,
                            attempt + 1,
                            delay,
                            e
                        );
                    }
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a request and return status and raw body without normalization.
    ///
    /// Error statuses are still mapped to [`OctoPrintError`].
    pub(crate) async fn send_raw(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(u16, Bytes)> {
        if self.config.enable_logging {
            tracing::trace!(method = %method, url = %url, "raw request");
        }
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        Ok((status.as_u16(), body))
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.url(path)?;
        if self.config.enable_logging {
            tracing::debug!(method = %method, url = %url, "request");
        }

        let mut request = self.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.finish(response).await
    }

    /// Deserialize a response body into a model.
    pub(crate) fn model<T: DeserializeOwned>(&self, response: ApiResponse) -> Result<T> {
        response.into_model().inspect_err(|e| {
            if self.config.enable_logging {
                tracing::debug!(
                    target_type = std::any::type_name::<T>(),
                    error = %e,
                    "response did not match model"
                );
            }
        })
    }

    /// Build a request, attaching the API key only for the instance's own origin.
    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let same_origin = url.origin() == self.base_url.origin();
        let request = self.client.request(method, url);
        match &self.config.api_key {
            Some(key) if same_origin => request.header(API_KEY_HEADER, key),
            Some(_) => {
                if self.config.enable_logging {
                    tracing::debug!("foreign origin, request sent without api key");
                }
                request
            }
            None => request,
        }
    }

    async fn finish(&self, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();

        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            let err = status_error(status, &body);
            if self.config.enable_logging {
                tracing::debug!(status = status.as_u16(), error = %err, "request rejected");
            }
            return Err(err);
        }

        ApiResponse::from_parts(status.as_u16(), headers, &body)
    }
}

fn status_error(status: reqwest::StatusCode, body: &Bytes) -> OctoPrintError {
    let fallback = status.canonical_reason().unwrap_or("unknown status");
    let message = utils::error_message(&String::from_utf8_lossy(body), fallback);
    OctoPrintError::from_status(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OctoPrintClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.config().max_retries, 0);
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = OctoPrintClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, OctoPrintError::InvalidUrl(_)));

        let err = OctoPrintClient::new(ClientConfig::new("data:text/plain,hi")).unwrap_err();
        assert!(matches!(err, OctoPrintError::Config(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client =
            OctoPrintClient::new(ClientConfig::default().with_api_key("SECRET")).unwrap();
        let dbg = format!("{:?}", client);
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("has_api_key: true"));
    }

    #[test]
    fn test_model_mismatch_is_deserialize_error() {
        let config = ClientConfig {
            enable_logging: false,
            ..ClientConfig::default()
        };
        let client = OctoPrintClient::new(config).unwrap();
        let body = Bytes::from_static(br#"{"api": "0.1"}"#);
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = ApiResponse::from_parts(200, headers, &body).unwrap();
        let err = client.model::<Vec<String>>(response).unwrap_err();
        assert!(matches!(err, OctoPrintError::Deserialize(_)));
    }

    #[test]
    fn test_same_origin_gets_api_key() {
        let client =
            OctoPrintClient::new(ClientConfig::new("http://octopi.local/octoprint").with_api_key("K"))
                .unwrap();
        let own = client
            .request(Method::GET, Url::parse("http://octopi.local/downloads/x").unwrap())
            .build()
            .unwrap();
        assert_eq!(own.headers().get(API_KEY_HEADER).unwrap(), "K");

        let foreign = client
            .request(Method::GET, Url::parse("http://octopi.local:8080/x").unwrap())
            .build()
            .unwrap();
        assert!(foreign.headers().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_status_error_prefers_json_message() {
        let body = Bytes::from_static(br#"{"error": "Unknown user"}"#);
        let err = status_error(reqwest::StatusCode::NOT_FOUND, &body);
        assert!(matches!(err, OctoPrintError::NotFound(ref m) if m == "Unknown user"));

        let err = status_error(reqwest::StatusCode::CONFLICT, &Bytes::new());
        assert!(matches!(err, OctoPrintError::Conflict(ref m) if m == "Conflict"));
    }
}
