use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{MovieDraft, MovieId, MovieRecord, PageRequest},
    protocol::{MovieDraftWire, MoviesPage},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub mod dispatcher;
pub mod state;

pub use dispatcher::{first_fired, Action, DispatchConfig, Dispatcher};
pub use state::{search_records, ClientState};

pub const DEFAULT_API_BASE_URL: &str =
    "https://carsmoviesinventoryproject-production.up.railway.app/api/v1/carsmovies";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("invalid inventory base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("inventory request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("inventory response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The remote operations the dispatcher depends on.
///
/// A status other than the expected one is reported as `Ok(false)` (or an
/// empty page), never as an error. `Err` means the request did not complete.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn fetch_page(&self, page: &PageRequest) -> Result<Vec<MovieRecord>, InventoryError>;
    async fn create(&self, draft: &MovieDraft) -> Result<bool, InventoryError>;
    async fn update(&self, id: MovieId, draft: &MovieDraft) -> Result<bool, InventoryError>;
    async fn delete(&self, id: MovieId) -> Result<bool, InventoryError>;
}

#[async_trait]
impl<T> InventoryService for Arc<T>
where
    T: InventoryService + ?Sized,
{
    async fn fetch_page(&self, page: &PageRequest) -> Result<Vec<MovieRecord>, InventoryError> {
        (**self).fetch_page(page).await
    }

    async fn create(&self, draft: &MovieDraft) -> Result<bool, InventoryError> {
        (**self).create(draft).await
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> Result<bool, InventoryError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: MovieId) -> Result<bool, InventoryError> {
        (**self).delete(id).await
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, InventoryError> {
    let invalid = |reason: String| InventoryError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot carry a path".to_string()));
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct InventoryClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl InventoryClientConfig {
    pub fn new(base_url: &str) -> Result<Self, InventoryError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `InventoryService` over the inventory's JSON HTTP API.
pub struct HttpInventoryClient {
    http: Client,
    base_url: Url,
}

impl HttpInventoryClient {
    pub fn new(config: InventoryClientConfig) -> Result<Self, InventoryError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InventoryError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn movie_url(&self, id: MovieId) -> Result<Url, InventoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| InventoryError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn fetch_page(&self, page: &PageRequest) -> Result<Vec<MovieRecord>, InventoryError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&page.query_pairs())
            .send()
            .await
            .map_err(InventoryError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                status = status.as_u16(),
                page = page.page,
                size = page.size,
                "inventory fetch returned non-success status; treating page as empty"
            );
            return Ok(Vec::new());
        }

        let body: MoviesPage = response.json().await.map_err(InventoryError::Decode)?;
        debug!(
            count = body.movies.len(),
            page = page.page,
            "inventory page fetched"
        );
        Ok(body.movies.into_iter().map(MovieRecord::from).collect())
    }

    async fn create(&self, draft: &MovieDraft) -> Result<bool, InventoryError> {
        let response = self
            .http
            .post(self.base_url.clone())
            .json(&MovieDraftWire::from(draft))
            .send()
            .await
            .map_err(InventoryError::Transport)?;

        let created = response.status() == StatusCode::CREATED;
        if created {
            info!(name = %draft.name, "inventory movie created");
        } else {
            warn!(
                status = response.status().as_u16(),
                name = %draft.name,
                "inventory rejected movie create"
            );
        }
        Ok(created)
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> Result<bool, InventoryError> {
        let response = self
            .http
            .put(self.movie_url(id)?)
            .json(&MovieDraftWire::from(draft))
            .send()
            .await
            .map_err(InventoryError::Transport)?;

        let updated = response.status() == StatusCode::OK;
        if updated {
            info!(movie_id = id.0, "inventory movie updated");
        } else {
            warn!(
                status = response.status().as_u16(),
                movie_id = id.0,
                "inventory rejected movie update"
            );
        }
        Ok(updated)
    }

    async fn delete(&self, id: MovieId) -> Result<bool, InventoryError> {
        let response = self
            .http
            .delete(self.movie_url(id)?)
            .send()
            .await
            .map_err(InventoryError::Transport)?;

        let deleted = response.status() == StatusCode::NO_CONTENT;
        if deleted {
            info!(movie_id = id.0, "inventory movie deleted");
        } else {
            warn!(
                status = response.status().as_u16(),
                movie_id = id.0,
                "inventory rejected movie delete"
            );
        }
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
