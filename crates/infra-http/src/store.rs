// HTTP ApplicationStore Implementation

use crate::config::HttpStoreConfig;
use crate::envelope;
use crate::error::HttpStoreError;
use async_trait::async_trait;
use jobtrack_core::domain::{Application, ApplicationPatch, Job};
use jobtrack_core::port::{ApplicationStore, StoreError};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;
use url::Url;

const COLLECTION: &str = "applications";

// Helper to convert reqwest::Error to StoreError, keeping the cause for logs
fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        StoreError::Transport(format!("connection failed: {err}"))
    } else if err.is_decode() {
        StoreError::Malformed(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}

/// Application store reached over HTTP
///
/// ```text
/// GET    {base}/applications
/// POST   {base}/applications          body: Job
/// PATCH  {base}/applications/{id}     body: { status?, notes? }
/// DELETE {base}/applications/{id}
/// ```
#[derive(Clone)]
pub struct HttpApplicationStore {
    http: Client,
    base_url: Url,
}

impl HttpApplicationStore {
    /// Create a store client with its own connection pool and timeout
    pub fn new(config: &HttpStoreConfig) -> Result<Self, HttpStoreError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        let base_url = Url::parse(&config.base_url)?;
        Self::with_client(base_url, http)
    }

    /// Create a store client around an existing reqwest client
    pub fn with_client(base_url: Url, http: Client) -> Result<Self, HttpStoreError> {
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpStoreError::UnsupportedUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// `{base}/applications[/{id}]`, with `id` percent-encoded as one segment
    fn endpoint(&self, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::Transport(format!("base URL {} cannot hold a path", self.base_url))
            })?;
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "Application store request");
        self.http.request(method, url)
    }
}

#[async_trait]
impl ApplicationStore for HttpApplicationStore {
    async fn list(&self) -> Result<Vec<Application>, StoreError> {
        let url = self.endpoint(None)?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        envelope::read::<Vec<Application>>(response).await?.into_data()
    }

    async fn create(&self, job: &Job) -> Result<Application, StoreError> {
        let url = self.endpoint(None)?;
        let response = self
            .request(Method::POST, url)
            .json(job)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        envelope::read::<Application>(response).await?.into_data()
    }

    async fn patch(&self, id: &str, patch: &ApplicationPatch) -> Result<Application, StoreError> {
        let url = self.endpoint(Some(id))?;
        let response = self
            .request(Method::PATCH, url)
            .json(patch)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        envelope::read::<Application>(response).await?.into_data()
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let url = self.endpoint(Some(id))?;
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        envelope::read::<Value>(response).await.map(|_| ())
    }
}
