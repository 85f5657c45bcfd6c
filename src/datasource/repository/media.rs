use crate::datasource::{Document, JsonStore, MediaByContent};
use crate::errors::Error;
use crate::models::{MediaBundle, MediaKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEntry {
    Trailer { name: String, url: String },
    Screenshot { url: String },
    DownloadLink { quality: String, url: String },
}

pub async fn get(store: &JsonStore, content_id: &str) -> Result<MediaBundle, Error> {
    let all: MediaByContent = store.read(Document::Media).await?;
    Ok(all.get(content_id).cloned().unwrap_or_default())
}

/// The per-content bundle is created lazily; adding a trailer or download
/// link under an existing name/quality overwrites it.
pub async fn add(store: &JsonStore, content_id: &str, entry: MediaEntry) -> Result<(), Error> {
    let mut all: MediaByContent = store.read(Document::Media).await?;
    let bundle = all.entry(content_id.to_string()).or_default();
    match entry {
        MediaEntry::Trailer { name, url } => {
            bundle.trailers.insert(name, url);
        }
        MediaEntry::Screenshot { url } => bundle.screenshots.push(url),
        MediaEntry::DownloadLink { quality, url } => {
            bundle.download_links.insert(quality, url);
        }
    }
    store.write(Document::Media, &all).await
}

/// Trailers and download links are removed by key, screenshots by index.
/// Removing an absent key or an out-of-range index is a silent no-op.
pub async fn remove(
    store: &JsonStore,
    content_id: &str,
    kind: MediaKind,
    key: &str,
) -> Result<(), Error> {
    let mut all: MediaByContent = store.read(Document::Media).await?;
    let bundle = all
        .get_mut(content_id)
        .ok_or_else(|| Error::not_found("Content ID not found."))?;
    match kind {
        MediaKind::Trailers => {
            bundle.trailers.remove(key);
        }
        MediaKind::Screenshots => {
            let index: usize = key
                .parse()
                .map_err(|_| Error::validation("Invalid screenshot index."))?;
            if index < bundle.screenshots.len() {
                bundle.screenshots.remove(index);
            }
        }
        MediaKind::DownloadLinks => {
            bundle.download_links.remove(key);
        }
    }
    store.write(Document::Media, &all).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn missing_bundle_reads_as_empty_defaults() {
        let (_dir, store) = store();
        assert_eq!(get(&store, "ghost").await.unwrap(), MediaBundle::default());
    }

    #[tokio::test]
    async fn add_creates_the_bundle_lazily() {
        let (_dir, store) = store();
        add(
            &store,
            "dark",
            MediaEntry::Trailer {
                name: "teaser".into(),
                url: "http://t".into(),
            },
        )
        .await
        .unwrap();
        add(
            &store,
            "dark",
            MediaEntry::Screenshot {
                url: "http://s".into(),
            },
        )
        .await
        .unwrap();
        add(
            &store,
            "dark",
            MediaEntry::DownloadLink {
                quality: "1080p".into(),
                url: "http://d".into(),
            },
        )
        .await
        .unwrap();

        let bundle = get(&store, "dark").await.unwrap();
        assert_eq!(bundle.trailers["teaser"], "http://t");
        assert_eq!(bundle.screenshots, vec!["http://s".to_string()]);
        assert_eq!(bundle.download_links["1080p"], "http://d");
    }

    #[tokio::test]
    async fn remove_by_key_and_index() {
        let (_dir, store) = store();
        for url in ["http://one", "http://two"] {
            add(&store, "dark", MediaEntry::Screenshot { url: url.into() })
                .await
                .unwrap();
        }
        remove(&store, "dark", MediaKind::Screenshots, "0")
            .await
            .unwrap();
        let bundle = get(&store, "dark").await.unwrap();
        assert_eq!(bundle.screenshots, vec!["http://two".to_string()]);

        // Out-of-range index is a no-op, unknown content id is not.
        remove(&store, "dark", MediaKind::Screenshots, "9")
            .await
            .unwrap();
        let result = remove(&store, "ghost", MediaKind::Trailers, "teaser").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn screenshot_index_must_be_numeric() {
        let (_dir, store) = store();
        add(
            &store,
            "dark",
            MediaEntry::Screenshot {
                url: "http://s".into(),
            },
        )
        .await
        .unwrap();
        let result = remove(&store, "dark", MediaKind::Screenshots, "first").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
