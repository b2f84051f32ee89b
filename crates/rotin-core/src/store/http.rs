//! REST backend client.
//!
//! Endpoints: `GET/POST /tasks`, `PUT/DELETE /tasks/{id}`, the same under
//! `/schedule`, and `GET/POST /notes/{day}` where POST replaces the day's
//! subject list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{NotesStore, RemoteCollection, Resource};
use crate::day::DayKey;
use crate::error::StoreError;
use crate::notes::Subject;
use crate::storage::config::RemoteConfig;

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// HTTP implementation of every remote store contract.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base: Url,
    client: Client,
}

impl HttpStore {
    /// # Errors
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.base_url).map_err(|e| StoreError::Transport {
            url: config.base_url.clone(),
            message: format!("invalid base url: {e}"),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StoreError::from)?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| StoreError::Transport {
                url: self.base.to_string(),
                message: "base url cannot be a base".to_string(),
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Turn a non-success response into a status error carrying the body's
    /// `detail`, when there is one.
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
        Err(StoreError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl<T: Resource> RemoteCollection<T> for HttpStore {
    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let url = self.endpoint(&[T::PATH])?;
        tracing::debug!(%url, "listing {}", T::PATH);
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn create(&self, item: &T) -> Result<T, StoreError> {
        let url = self.endpoint(&[T::PATH])?;
        tracing::debug!(%url, id = item.id(), "creating");
        let response = self.client.post(url).json(item).send().await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &str, item: &T) -> Result<T, StoreError> {
        let url = self.endpoint(&[T::PATH, id])?;
        tracing::debug!(%url, "updating");
        let response = self.client.put(url).json(item).send().await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.endpoint(&[T::PATH, id])?;
        tracing::debug!(%url, "deleting");
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl NotesStore for HttpStore {
    async fn list_notes(&self, day: &DayKey) -> Result<Vec<Subject>, StoreError> {
        let url = self.endpoint(&["notes", &day.to_string()])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn save_notes(&self, day: &DayKey, subjects: &[Subject]) -> Result<Vec<Subject>, StoreError> {
        let url = self.endpoint(&["notes", &day.to_string()])?;
        tracing::debug!(%url, count = subjects.len(), "saving notes");
        let response = self.client.post(url).json(subjects).send().await?;
        Self::decode(response).await
    }
}
