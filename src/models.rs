use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Webseries,
    Animes,
}

impl ContentKind {
    pub fn has_episodes(self) -> bool {
        matches!(self, Self::Webseries | Self::Animes)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub director: Vec<String>,
    pub studio: Option<String>,
    pub duration: Option<String>,
    pub poster_image: Option<String>,
    pub hero_image: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub quality: Vec<String>,
}

/// Create/update payload for a content record. Everything is optional at the
/// wire level; the repository checks the required fields and rejects with a
/// validation error instead of a deserialization failure.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ContentKind>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub cast: Option<Vec<String>>,
    pub director: Option<Vec<String>>,
    pub studio: Option<String>,
    pub duration: Option<String>,
    pub poster_image: Option<String>,
    pub hero_image: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub quality: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaBundle {
    #[serde(default)]
    pub trailers: BTreeMap<String, String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub download_links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Trailers,
    Screenshots,
    DownloadLinks,
}

impl MediaKind {
    pub fn from_path(value: &str) -> Option<Self> {
        match value {
            "trailers" => Some(Self::Trailers),
            "screenshots" => Some(Self::Screenshots),
            "downloadLinks" => Some(Self::DownloadLinks),
            _ => None,
        }
    }
}

/// Season keys are numeric; `BTreeMap<u32, _>` keeps them in numeric order
/// regardless of insertion order while serializing to the string-keyed object
/// form stored on disk.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeTree {
    #[serde(default)]
    pub seasons: BTreeMap<u32, Season>,
    #[serde(default)]
    pub zip_files: Vec<ZipFile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Season {
    #[serde(default)]
    pub qualities: BTreeMap<String, Vec<Episode>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub episode_number: u32,
    pub title: String,
    pub download_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ZipFile {
    pub label: String,
    pub url: String,
}

/// Commenters are either a bare display name or a small profile object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Commenter {
    Profile {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Name(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Absent on entries that predate generated comment ids; those are
    /// addressed by a `<epoch-millis>-<index>` fallback identifier instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user: Commenter,
    pub text: String,
    #[serde(default = "unix_epoch")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Reply {
    pub user: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub id: String,
    pub content_id: String,
    pub status: String,
    pub user: Commenter,
    pub text: String,
    #[serde(default = "unix_epoch")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// A comment or request in the merged per-content listing, tagged with its
/// origin on the wire.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Submission {
    Comment(Comment),
    Request(ContentRequest),
}

impl Submission {
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Self::Comment(comment) => comment.date,
            Self::Request(request) => request.date,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentOverview {
    pub content_id: String,
    pub content_title: String,
    pub comment_id: String,
    #[serde(flatten)]
    pub comment: Comment,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}
