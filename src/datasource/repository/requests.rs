use chrono::Utc;

use crate::datasource::{Document, JsonStore};
use crate::errors::Error;
use crate::models::{Commenter, ContentRequest, Reply};

pub async fn get_collection(store: &JsonStore) -> Result<Vec<ContentRequest>, Error> {
    store.read(Document::Requests).await
}

/// Requests reference content loosely; one may be filed without a content id.
pub async fn create(
    store: &JsonStore,
    user: Commenter,
    text: String,
    content_id: Option<String>,
) -> Result<ContentRequest, Error> {
    let mut requests: Vec<ContentRequest> = store.read(Document::Requests).await?;
    let now = Utc::now();
    let request = ContentRequest {
        id: format!("req-{}", now.timestamp_millis()),
        content_id: content_id.unwrap_or_else(|| "N/A".to_string()),
        status: "pending".to_string(),
        user,
        text,
        date: now,
        replies: Vec::new(),
    };
    requests.insert(0, request.clone());
    store.write(Document::Requests, &requests).await?;
    Ok(request)
}

pub async fn reply(store: &JsonStore, request_id: &str, text: String) -> Result<Reply, Error> {
    let mut requests: Vec<ContentRequest> = store.read(Document::Requests).await?;
    let request = requests
        .iter_mut()
        .find(|request| request.id == request_id)
        .ok_or_else(|| Error::not_found("Request not found."))?;
    let reply = super::admin_reply(text);
    request.replies.push(reply.clone());
    store.write(Document::Requests, &requests).await?;
    Ok(reply)
}

pub async fn remove(store: &JsonStore, request_id: &str) -> Result<(), Error> {
    let mut requests: Vec<ContentRequest> = store.read(Document::Requests).await?;
    let before = requests.len();
    requests.retain(|request| request.id != request_id);
    if requests.len() == before {
        return Err(Error::not_found("Request not found."));
    }
    store.write(Document::Requests, &requests).await
}
