use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::Utc;
use itertools::Itertools;

use super::content;
use crate::datasource::{CommentsByContent, Document, JsonStore};
use crate::errors::Error;
use crate::models::{Comment, CommentOverview, Commenter, ContentRequest, Reply, Submission};

/// Stored id when present, otherwise the legacy `<epoch-millis>-<index>`
/// fallback derived from the comment's date and position.
fn identifier(comment: &Comment, index: usize) -> String {
    comment
        .id
        .clone()
        .unwrap_or_else(|| format!("{}-{index}", comment.date.timestamp_millis()))
}

/// The content's comments merged with the requests that reference it, newest
/// first.
pub async fn merged(store: &JsonStore, content_id: &str) -> Result<Vec<Submission>, Error> {
    let comments: CommentsByContent = store.read(Document::Comments).await?;
    let requests: Vec<ContentRequest> = store.read(Document::Requests).await?;
    let submissions = comments
        .get(content_id)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(Submission::Comment)
        .chain(
            requests
                .into_iter()
                .filter(|request| request.content_id == content_id)
                .map(Submission::Request),
        )
        .sorted_by_key(|submission| Reverse(submission.date()))
        .collect();
    Ok(submissions)
}

pub async fn add(
    store: &JsonStore,
    content_id: &str,
    user: Commenter,
    text: String,
) -> Result<Comment, Error> {
    let mut all: CommentsByContent = store.read(Document::Comments).await?;
    let now = Utc::now();
    let comment = Comment {
        id: Some(format!("comment-{}", now.timestamp_millis())),
        user,
        text,
        date: now,
        replies: Vec::new(),
    };
    all.entry(content_id.to_string())
        .or_default()
        .insert(0, comment.clone());
    store.write(Document::Comments, &all).await?;
    Ok(comment)
}

pub async fn reply(
    store: &JsonStore,
    content_id: &str,
    comment_id: &str,
    text: String,
) -> Result<Reply, Error> {
    let mut all: CommentsByContent = store.read(Document::Comments).await?;
    let thread = all
        .get_mut(content_id)
        .ok_or_else(|| Error::not_found("Content not found."))?;
    let comment = thread
        .iter_mut()
        .enumerate()
        .find(|(index, comment)| identifier(comment, *index) == comment_id)
        .map(|(_, comment)| comment)
        .ok_or_else(|| Error::not_found("Comment not found."))?;
    let reply = super::admin_reply(text);
    comment.replies.push(reply.clone());
    store.write(Document::Comments, &all).await?;
    Ok(reply)
}

pub async fn remove(store: &JsonStore, content_id: &str, comment_id: &str) -> Result<(), Error> {
    let mut all: CommentsByContent = store.read(Document::Comments).await?;
    let thread = all
        .get_mut(content_id)
        .ok_or_else(|| Error::not_found("Content not found."))?;
    let retained: Vec<Comment> = thread
        .iter()
        .enumerate()
        .filter(|(index, comment)| identifier(comment, *index) != comment_id)
        .map(|(_, comment)| comment.clone())
        .collect();
    if retained.len() == thread.len() {
        return Err(Error::not_found("Comment not found."));
    }
    *thread = retained;
    store.write(Document::Comments, &all).await
}

/// Every content's comments flattened into one listing, annotated with the
/// owning content's title, newest first.
pub async fn overview(store: &JsonStore) -> Result<Vec<CommentOverview>, Error> {
    let comments: CommentsByContent = store.read(Document::Comments).await?;
    let content = content::get_collection(store).await?;
    let titles: HashMap<&str, &str> = content
        .iter()
        .map(|c| (c.id.as_str(), c.title.as_str()))
        .collect();
    let overview = comments
        .iter()
        .flat_map(|(content_id, thread)| {
            let content_title = titles
                .get(content_id.as_str())
                .copied()
                .unwrap_or("Unknown Content")
                .to_string();
            thread
                .iter()
                .enumerate()
                .map(move |(index, comment)| CommentOverview {
                    content_id: content_id.clone(),
                    content_title: content_title.clone(),
                    comment_id: identifier(comment, index),
                    comment: comment.clone(),
                })
        })
        .sorted_by_key(|entry| Reverse(entry.comment.date))
        .collect();
    Ok(overview)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::{ContentDraft, ContentKind};

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    fn commenter(name: &str) -> Commenter {
        Commenter::Name(name.into())
    }

    async fn seed_content(store: &JsonStore, title: &str) -> String {
        let draft = ContentDraft {
            title: Some(title.into()),
            kind: Some(ContentKind::Movie),
            year: Some(2020),
            ..ContentDraft::default()
        };
        content::create(store, draft).await.unwrap().id
    }

    #[tokio::test]
    async fn merged_interleaves_requests_newest_first() {
        let (_dir, store) = store();
        let comment = add(&store, "dark", commenter("ana"), "older".into())
            .await
            .unwrap();
        let mut requests: Vec<ContentRequest> =
            store.read(Document::Requests).await.unwrap();
        requests.push(ContentRequest {
            id: "req-1".into(),
            content_id: "dark".into(),
            status: "pending".into(),
            user: commenter("bo"),
            text: "newer".into(),
            date: comment.date + chrono::Duration::minutes(1),
            replies: vec![],
        });
        requests.push(ContentRequest {
            id: "req-2".into(),
            content_id: "other".into(),
            status: "pending".into(),
            user: commenter("cy"),
            text: "elsewhere".into(),
            date: comment.date,
            replies: vec![],
        });
        store.write(Document::Requests, &requests).await.unwrap();

        let merged = merged(&store, "dark").await.unwrap();
        assert_eq!(merged.len(), 2);
        assert!(matches!(&merged[0], Submission::Request(r) if r.id == "req-1"));
        assert!(matches!(&merged[1], Submission::Comment(_)));
    }

    #[tokio::test]
    async fn merged_tags_entries_on_the_wire() {
        let (_dir, store) = store();
        add(&store, "dark", commenter("ana"), "hi".into())
            .await
            .unwrap();
        let merged = merged(&store, "dark").await.unwrap();
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value[0]["type"], "comment");
        assert_eq!(value[0]["text"], "hi");
    }

    #[tokio::test]
    async fn reply_appends_an_admin_entry() {
        let (_dir, store) = store();
        let comment = add(&store, "dark", commenter("ana"), "hi".into())
            .await
            .unwrap();
        let reply = reply(&store, "dark", comment.id.as_deref().unwrap(), "hello".into())
            .await
            .unwrap();
        assert_eq!(reply.user, "Admin");

        let all: CommentsByContent = store.read(Document::Comments).await.unwrap();
        assert_eq!(all["dark"][0].replies.len(), 1);
    }

    #[tokio::test]
    async fn legacy_comments_are_addressed_by_the_fallback_identifier() {
        let (_dir, store) = store();
        let date = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let legacy = Comment {
            id: None,
            user: commenter("ana"),
            text: "old".into(),
            date,
            replies: vec![],
        };
        let mut all = CommentsByContent::default();
        all.insert("dark".into(), vec![legacy]);
        store.write(Document::Comments, &all).await.unwrap();

        let fallback = format!("{}-0", date.timestamp_millis());
        remove(&store, "dark", &fallback).await.unwrap();
        let all: CommentsByContent = store.read(Document::Comments).await.unwrap();
        assert!(all["dark"].is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_comment_is_not_found() {
        let (_dir, store) = store();
        add(&store, "dark", commenter("ana"), "hi".into())
            .await
            .unwrap();
        let result = remove(&store, "dark", "comment-0").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = remove(&store, "ghost", "comment-0").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn overview_annotates_with_content_titles() {
        let (_dir, store) = store();
        let id = seed_content(&store, "Dark").await;
        add(&store, &id, commenter("ana"), "hi".into()).await.unwrap();
        add(&store, "gone", commenter("bo"), "stale".into())
            .await
            .unwrap();

        let overview = overview(&store).await.unwrap();
        assert_eq!(overview.len(), 2);
        let by_content: HashMap<&str, &str> = overview
            .iter()
            .map(|entry| (entry.content_id.as_str(), entry.content_title.as_str()))
            .collect();
        assert_eq!(by_content["dark"], "Dark");
        assert_eq!(by_content["gone"], "Unknown Content");
    }
}
