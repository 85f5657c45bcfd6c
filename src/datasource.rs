use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Error;
use crate::models::{Comment, EpisodeTree, MediaBundle};

pub mod repository;

pub type MediaByContent = BTreeMap<String, MediaBundle>;
pub type EpisodesByContent = BTreeMap<String, EpisodeTree>;
pub type CommentsByContent = BTreeMap<String, Vec<Comment>>;

/// One flat JSON document per concern, each read and rewritten in full on
/// every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Content,
    Media,
    Episodes,
    Comments,
    Requests,
}

impl Document {
    fn file_name(self) -> &'static str {
        match self {
            Self::Content => "content.json",
            Self::Media => "media.json",
            Self::Episodes => "episodes.json",
            Self::Comments => "comments.json",
            Self::Requests => "requests.json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: Arc<PathBuf>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Arc::new(data_dir.into()),
        }
    }

    fn path(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }

    /// A missing or blank document reads as its empty default.
    pub async fn read<T>(&self, document: Document) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(document);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn write<T>(&self, document: Document, value: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let body = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.path(document), body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, ContentKind};

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn missing_document_reads_as_default() {
        let (_dir, store) = store();
        let content: Vec<Content> = store.read(Document::Content).await.unwrap();
        assert!(content.is_empty());
        let media: MediaByContent = store.read(Document::Media).await.unwrap();
        assert!(media.is_empty());
    }

    #[tokio::test]
    async fn blank_document_reads_as_default() {
        let (dir, store) = store();
        tokio::fs::write(dir.path().join("content.json"), "  \n")
            .await
            .unwrap();
        let content: Vec<Content> = store.read(Document::Content).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn written_document_reads_back() {
        let (_dir, store) = store();
        let record: Content = serde_json::from_value(serde_json::json!({
            "id": "pilot",
            "title": "Pilot",
            "type": "movie",
            "year": 2001,
        }))
        .unwrap();
        assert_eq!(record.kind, ContentKind::Movie);
        store
            .write(Document::Content, &vec![record.clone()])
            .await
            .unwrap();
        let read: Vec<Content> = store.read(Document::Content).await.unwrap();
        assert_eq!(read, vec![record]);
    }
}
