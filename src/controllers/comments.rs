use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::controllers::Message;
use crate::datasource::repository;
use crate::datasource::JsonStore;
use crate::errors::Error;
use crate::models::{CommentOverview, Commenter, Reply, Submission};

pub(crate) async fn get_merged(
    Path(content_id): Path<String>,
    State(store): State<JsonStore>,
) -> Result<Json<Vec<Submission>>, Error> {
    let submissions = repository::comments::merged(&store, &content_id).await?;
    Ok(Json(submissions))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewCommentBody {
    user: Option<Commenter>,
    text: Option<String>,
}

pub(crate) async fn add(
    Path(content_id): Path<String>,
    State(store): State<JsonStore>,
    Json(body): Json<NewCommentBody>,
) -> Result<(StatusCode, Json<Submission>), Error> {
    let (Some(user), Some(text)) = (body.user, body.text) else {
        return Err(Error::validation("User and text are required."));
    };
    let comment = repository::comments::add(&store, &content_id, user, text).await?;
    Ok((StatusCode::CREATED, Json(Submission::Comment(comment))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyBody {
    comment_id: Option<String>,
    reply_text: Option<String>,
}

pub(crate) async fn reply(
    Path(content_id): Path<String>,
    State(store): State<JsonStore>,
    Json(body): Json<ReplyBody>,
) -> Result<(StatusCode, Json<Reply>), Error> {
    let (Some(comment_id), Some(reply_text)) = (body.comment_id, body.reply_text) else {
        return Err(Error::validation("Comment ID and reply text are required."));
    };
    let reply = repository::comments::reply(&store, &content_id, &comment_id, reply_text).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub(crate) async fn remove(
    Path((content_id, comment_id)): Path<(String, String)>,
    State(store): State<JsonStore>,
) -> Result<Json<Message>, Error> {
    repository::comments::remove(&store, &content_id, &comment_id).await?;
    Ok(Json(Message::new("Comment deleted successfully.")))
}

pub(crate) async fn overview(
    State(store): State<JsonStore>,
) -> Result<Json<Vec<CommentOverview>>, Error> {
    let overview = repository::comments::overview(&store).await?;
    Ok(Json(overview))
}
