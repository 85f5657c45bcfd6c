use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::controllers::Message;
use crate::datasource::repository;
use crate::datasource::JsonStore;
use crate::errors::Error;
use crate::models::{Commenter, ContentRequest, Reply};

pub(crate) async fn get_collection(
    State(store): State<JsonStore>,
) -> Result<Json<Vec<ContentRequest>>, Error> {
    let requests = repository::requests::get_collection(&store).await?;
    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewRequestBody {
    user: Option<Commenter>,
    text: Option<String>,
    content_id: Option<String>,
}

pub(crate) async fn create(
    State(store): State<JsonStore>,
    Json(body): Json<NewRequestBody>,
) -> Result<(StatusCode, Json<ContentRequest>), Error> {
    let (Some(user), Some(text)) = (body.user, body.text) else {
        return Err(Error::validation("User and text are required."));
    };
    let request = repository::requests::create(&store, user, text, body.content_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyBody {
    reply_text: Option<String>,
}

pub(crate) async fn reply(
    Path(id): Path<String>,
    State(store): State<JsonStore>,
    Json(body): Json<ReplyBody>,
) -> Result<(StatusCode, Json<Reply>), Error> {
    let Some(reply_text) = body.reply_text else {
        return Err(Error::validation("Reply text is required."));
    };
    let reply = repository::requests::reply(&store, &id, reply_text).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub(crate) async fn remove(
    Path(id): Path<String>,
    State(store): State<JsonStore>,
) -> Result<Json<Message>, Error> {
    repository::requests::remove(&store, &id).await?;
    Ok(Json(Message::new("Request deleted successfully.")))
}
