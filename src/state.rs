use std::path::PathBuf;

use axum::extract::FromRef;
use chrono::Duration;
use serde::Deserialize;

use crate::datasource::JsonStore;
use crate::errors::InternalError;
use crate::models::Content;
use crate::request_cache::RequestCache;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub content_cache: RequestCache<Vec<Content>>,
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            content_cache: RequestCache::new(Duration::minutes(5)),
        }
    }
}

impl FromRef<AppState> for JsonStore {
    fn from_ref(input: &AppState) -> Self {
        input.store.clone()
    }
}

impl FromRef<AppState> for RequestCache<Vec<Content>> {
    fn from_ref(input: &AppState) -> Self {
        input.content_cache.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Config {
    /// Reads `CATALOG_DATA_DIR` and `CATALOG_PORT` from the environment.
    pub fn from_env() -> Result<Self, InternalError> {
        Ok(envy::prefixed("CATALOG_").from_env()?)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_port() -> u16 {
    3000
}
