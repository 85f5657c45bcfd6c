use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::cache::ContentCache;

pub mod cache;
pub mod history;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    ParseUrl(#[from] url::ParseError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("request failed with status code: {0}")]
    Status(StatusCode),
    #[error("record has no id")]
    MissingId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A content record as returned by the catalog API. The admin tooling treats
/// records as opaque JSON apart from the `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Value);

impl Record {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

/// The content mutations the admin surface performs, behind a seam so the
/// undo/redo history can be exercised against an in-memory implementation.
#[async_trait]
pub trait ContentApi {
    async fn create(&self, record: &Record) -> Result<Record>;
    async fn update(&self, id: &str, record: &Record) -> Result<Record>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
    cache: ContentCache,
}

impl Client {
    /// The cache is passed in rather than owned globally so each admin view
    /// (or test) works against its own instance.
    pub fn new(base: Url, cache: ContentCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    #[instrument(skip(self), err)]
    pub async fn content(&self) -> Result<Vec<Record>> {
        if let Some(records) = self.cache.get() {
            return Ok(records.as_ref().clone());
        }
        let url = self.endpoint("api/content")?;
        let response = self.http.get(url).send().await?;
        let records: Vec<Record> = expect_json(response).await?;
        self.cache.set(records.clone());
        Ok(records)
    }
}

async fn expect_json<T>(response: reqwest::Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }
    Ok(response.json().await?)
}

#[async_trait]
impl ContentApi for Client {
    async fn create(&self, record: &Record) -> Result<Record> {
        let url = self.endpoint("api/content")?;
        let response = self.http.post(url).json(record).send().await?;
        self.cache.invalidate();
        expect_json(response).await
    }

    async fn update(&self, id: &str, record: &Record) -> Result<Record> {
        let url = self.endpoint(&format!("api/content/{id}"))?;
        let response = self.http.put(url).json(record).send().await?;
        self.cache.invalidate();
        expect_json(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("api/content/{id}"))?;
        let response = self.http.delete(url).send().await?;
        self.cache.invalidate();
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        Ok(())
    }
}
