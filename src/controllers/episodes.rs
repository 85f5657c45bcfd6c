use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::controllers::Message;
use crate::datasource::repository;
use crate::datasource::JsonStore;
use crate::errors::Error;
use crate::models::{Episode, EpisodeTree};

/// Season and episode numbers arrive as JSON numbers or numeric strings,
/// depending on the form that produced them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    Text(String),
}

impl NumberOrString {
    fn parse(&self) -> Option<u32> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Season path segments are looked up as keys; anything that is not a number
/// is simply an absent season.
fn season_key(segment: &str) -> Result<u32, Error> {
    segment
        .parse()
        .map_err(|_| Error::not_found("Season not found."))
}

pub(crate) async fn get_tree(
    Path(id): Path<String>,
    State(store): State<JsonStore>,
) -> Result<Json<EpisodeTree>, Error> {
    let tree = repository::episodes::get(&store, &id).await?;
    Ok(Json(tree))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddSeasonBody {
    season_number: Option<NumberOrString>,
}

pub(crate) async fn add_season(
    Path(id): Path<String>,
    State(store): State<JsonStore>,
    Json(body): Json<AddSeasonBody>,
) -> Result<(StatusCode, Json<Message>), Error> {
    let season = body
        .season_number
        .as_ref()
        .and_then(NumberOrString::parse)
        .ok_or_else(|| Error::validation("Valid season number is required."))?;
    repository::episodes::add_season(&store, &id, season).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new(format!("Season {season} added successfully."))),
    ))
}

pub(crate) async fn remove_season(
    Path((id, season)): Path<(String, String)>,
    State(store): State<JsonStore>,
) -> Result<Json<Message>, Error> {
    let season = season_key(&season)?;
    repository::episodes::remove_season(&store, &id, season).await?;
    Ok(Json(Message::new(format!(
        "Season {season} deleted successfully."
    ))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddEpisodeBody {
    episode_number: Option<NumberOrString>,
    title: Option<String>,
    quality: Option<String>,
    download_url: Option<String>,
}

pub(crate) async fn add_episode(
    Path((id, season)): Path<(String, String)>,
    State(store): State<JsonStore>,
    Json(body): Json<AddEpisodeBody>,
) -> Result<(StatusCode, Json<Message>), Error> {
    let season = season_key(&season)?;
    let (Some(number), Some(title), Some(quality), Some(download_url)) = (
        body.episode_number.as_ref().and_then(NumberOrString::parse),
        body.title,
        body.quality,
        body.download_url,
    ) else {
        return Err(Error::validation("Missing required episode data."));
    };
    let episode = Episode {
        episode_number: number,
        title,
        download_url,
    };
    repository::episodes::add_episode(&store, &id, season, &quality, episode).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Episode added successfully.")),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateEpisodeBody {
    original_quality: Option<String>,
    original_episode_number: Option<NumberOrString>,
    updated_episode: Option<UpdatedEpisode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatedEpisode {
    episode_number: Option<NumberOrString>,
    title: Option<String>,
    quality: Option<String>,
    download_url: Option<String>,
}

pub(crate) async fn update_episode(
    Path((id, season)): Path<(String, String)>,
    State(store): State<JsonStore>,
    Json(body): Json<UpdateEpisodeBody>,
) -> Result<Json<Message>, Error> {
    let season = season_key(&season)?;
    let missing = || Error::validation("Missing required data for update.");
    let original_quality = body.original_quality.ok_or_else(missing)?;
    let original_number = body
        .original_episode_number
        .as_ref()
        .and_then(NumberOrString::parse)
        .ok_or_else(missing)?;
    let updated = body.updated_episode.ok_or_else(missing)?;
    let (Some(number), Some(title), Some(quality), Some(download_url)) = (
        updated.episode_number.as_ref().and_then(NumberOrString::parse),
        updated.title,
        updated.quality,
        updated.download_url,
    ) else {
        return Err(missing());
    };
    let episode = Episode {
        episode_number: number,
        title,
        download_url,
    };
    repository::episodes::update_episode(
        &store,
        &id,
        season,
        &original_quality,
        original_number,
        &quality,
        episode,
    )
    .await?;
    Ok(Json(Message::new("Episode updated successfully.")))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveEpisodeBody {
    key: Option<String>,
}

/// Episodes are deleted by a `quality:index` key into the bucket's current
/// list, not by episode number.
pub(crate) async fn remove_episode(
    Path((id, season)): Path<(String, String)>,
    State(store): State<JsonStore>,
    Json(body): Json<RemoveEpisodeBody>,
) -> Result<Json<Message>, Error> {
    let season = season_key(&season)?;
    let (quality, index) = body
        .key
        .as_deref()
        .and_then(|key| key.split_once(':'))
        .ok_or_else(|| Error::validation("Invalid key format for episode deletion."))?;
    let index: usize = index
        .parse()
        .map_err(|_| Error::not_found("Episode not found."))?;
    repository::episodes::remove_episode(&store, &id, season, quality, index).await?;
    Ok(Json(Message::new("Episode deleted successfully.")))
}
