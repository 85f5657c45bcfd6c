use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::controllers::Message;
use crate::datasource::repository;
use crate::datasource::repository::media::MediaEntry;
use crate::datasource::JsonStore;
use crate::errors::Error;
use crate::models::{MediaBundle, MediaKind};

pub(crate) async fn get_bundle(
    Path(id): Path<String>,
    State(store): State<JsonStore>,
) -> Result<Json<MediaBundle>, Error> {
    let bundle = repository::media::get(&store, &id).await?;
    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddMediaBody {
    name: Option<String>,
    url: Option<String>,
    quality: Option<String>,
}

pub(crate) async fn add(
    Path((id, kind)): Path<(String, String)>,
    State(store): State<JsonStore>,
    Json(body): Json<AddMediaBody>,
) -> Result<(StatusCode, Json<Message>), Error> {
    let kind =
        MediaKind::from_path(&kind).ok_or_else(|| Error::validation("Invalid media type."))?;
    let entry = entry_for(kind, body)?;
    repository::media::add(&store, &id, entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Media added successfully.")),
    ))
}

fn entry_for(kind: MediaKind, body: AddMediaBody) -> Result<MediaEntry, Error> {
    let missing = || Error::validation("Missing required media data.");
    let url = body.url.ok_or_else(missing)?;
    Ok(match kind {
        MediaKind::Trailers => MediaEntry::Trailer {
            name: body.name.ok_or_else(missing)?,
            url,
        },
        MediaKind::Screenshots => MediaEntry::Screenshot { url },
        MediaKind::DownloadLinks => MediaEntry::DownloadLink {
            quality: body.quality.ok_or_else(missing)?,
            url,
        },
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveMediaBody {
    key: Option<String>,
}

pub(crate) async fn remove(
    Path((id, kind)): Path<(String, String)>,
    State(store): State<JsonStore>,
    Json(body): Json<RemoveMediaBody>,
) -> Result<Json<Message>, Error> {
    let kind =
        MediaKind::from_path(&kind).ok_or_else(|| Error::validation("Invalid media type."))?;
    let key = body
        .key
        .ok_or_else(|| Error::validation("Missing required media data."))?;
    repository::media::remove(&store, &id, kind, &key).await?;
    Ok(Json(Message::new("Media deleted successfully.")))
}
