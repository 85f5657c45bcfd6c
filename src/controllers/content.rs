use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::controllers::Message;
use crate::datasource::repository;
use crate::datasource::JsonStore;
use crate::errors::Error;
use crate::models::{Content, ContentDraft};
use crate::request_cache::RequestCache;

const LISTING_KEY: &str = "";

pub(crate) async fn get_collection(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
) -> Result<Json<Vec<Content>>, Error> {
    if let Some(cached) = cache.get(LISTING_KEY) {
        return Ok(Json(cached.to_vec()));
    }
    let content = repository::content::get_collection(&store).await?;
    cache.insert(LISTING_KEY, content.clone());
    Ok(Json(content))
}

pub(crate) async fn create(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
    Json(draft): Json<ContentDraft>,
) -> Result<(StatusCode, Json<Content>), Error> {
    let record = repository::content::create(&store, draft).await?;
    cache.invalidate_all();
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkCreated {
    message: String,
    items: Vec<Content>,
}

pub(crate) async fn create_bulk(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<BulkCreated>), Error> {
    let serde_json::Value::Array(items) = body else {
        return Err(Error::validation(
            "Request body must be an array of content objects.",
        ));
    };
    // Elements that are not content objects fall back to an empty draft and
    // get skipped by the required-field check, like any other invalid item.
    let drafts = items
        .into_iter()
        .map(|item| serde_json::from_value::<ContentDraft>(item).unwrap_or_default())
        .collect();
    let outcome = repository::content::create_bulk(&store, drafts).await?;
    cache.invalidate_all();
    let response = BulkCreated {
        message: format!(
            "{} of {} items added successfully.",
            outcome.added.len(),
            outcome.requested
        ),
        items: outcome.added,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub(crate) async fn update(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
    Path(id): Path<String>,
    Json(draft): Json<ContentDraft>,
) -> Result<Json<Content>, Error> {
    let record = repository::content::update(&store, &id, draft).await?;
    cache.invalidate_all();
    Ok(Json(record))
}

pub(crate) async fn remove(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
    Path(id): Path<String>,
) -> Result<Json<Message>, Error> {
    repository::content::remove(&store, &id).await?;
    cache.invalidate_all();
    Ok(Json(Message::new(format!(
        "Content {id} deleted successfully."
    ))))
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDelete {
    #[serde(default)]
    ids: Vec<String>,
}

pub(crate) async fn remove_bulk(
    State(store): State<JsonStore>,
    State(cache): State<RequestCache<Vec<Content>>>,
    Json(body): Json<BulkDelete>,
) -> Result<Json<Message>, Error> {
    if body.ids.is_empty() {
        return Err(Error::validation("An array of content IDs is required."));
    }
    let removed = repository::content::remove_bulk(&store, &body.ids).await?;
    cache.invalidate_all();
    Ok(Json(Message::new(format!(
        "{removed} items deleted successfully."
    ))))
}
