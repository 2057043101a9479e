//! REST implementation of [`EntityService`]
//!
//! Resource layout (relative to the configured API url):
//!
//! | operation      | request                      |
//! |----------------|------------------------------|
//! | get_actives    | `GET    /{resource}/ativos`   |
//! | get_inactives  | `GET    /{resource}/inativos` |
//! | get_by_id      | `GET    /{resource}/{id}`     |
//! | create         | `POST   /{resource}`          |
//! | update         | `PUT    /{resource}/{id}`     |
//! | delete         | `DELETE /{resource}/{id}`     |

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::config::Config;
use crate::core::entity::Record;
use crate::core::identity::EntityId;
use crate::core::service::{EntityService, ServiceError};

/// Shared HTTP configuration: one connection pool for every resource
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(config.api_url(), Duration::from_secs(config.timeout_secs()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute url from path segments
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment.trim_matches('/'));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!(%method, url, "sending request");
        self.client.request(method, url)
    }
}

/// Entity service for one record kind backed by the REST API
pub struct RestService<T> {
    api: ApiClient,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RestService<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _record: PhantomData,
        }
    }

    fn collection_url(&self, suffix: Option<&str>) -> String {
        match suffix {
            Some(suffix) => self.api.url(&[T::KIND.resource(), suffix]),
            None => self.api.url(&[T::KIND.resource()]),
        }
    }

    fn item_url(&self, id: EntityId) -> String {
        self.api.url(&[T::KIND.resource(), &id.to_string()])
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request failed");
            ServiceError::Http(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);
        tracing::warn!(status = status.as_u16(), message = ?message, "backend returned an error");
        Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ServiceError> {
        response
            .json::<R>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl<T: Record> EntityService<T> for RestService<T> {
    async fn get_actives(&self) -> Result<Vec<T>, ServiceError> {
        let url = self.collection_url(Some("ativos"));
        let response = self.send(self.api.request(Method::GET, &url)).await?;
        Self::decode(response).await
    }

    async fn get_inactives(&self) -> Result<Vec<T>, ServiceError> {
        let url = self.collection_url(Some("inativos"));
        let response = self.send(self.api.request(Method::GET, &url)).await?;
        Self::decode(response).await
    }

    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError> {
        let url = self.item_url(id);
        match self.send(self.api.request(Method::GET, &url)).await {
            Ok(response) => Self::decode(response).await,
            Err(ServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ServiceError::NotFound { kind: T::KIND, id })
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, record: &T) -> Result<T, ServiceError> {
        let url = self.collection_url(None);
        let response = self
            .send(self.api.request(Method::POST, &url).json(record))
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, id: EntityId, record: &T) -> Result<T, ServiceError> {
        let url = self.item_url(id);
        let response = self
            .send(self.api.request(Method::PUT, &url).json(record))
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ServiceError> {
        let url = self.item_url(id);
        self.send(self.api.request(Method::DELETE, &url)).await?;
        Ok(())
    }
}

/// Pull a human-readable description out of an error body.
///
/// JSON bodies are searched for `message`, `error` or `detail`; a short
/// plain-text body is used as is.
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        return ["message", "error", "detail"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from);
    }

    if trimmed.len() <= 200 && !trimmed.starts_with('<') {
        Some(trimmed.to_string())
    } else {
        None
    }
}
