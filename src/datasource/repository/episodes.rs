use std::collections::btree_map::Entry;

use crate::datasource::{Document, EpisodesByContent, JsonStore};
use crate::errors::Error;
use crate::models::{Episode, EpisodeTree, Season};

pub async fn get(store: &JsonStore, content_id: &str) -> Result<EpisodeTree, Error> {
    let all: EpisodesByContent = store.read(Document::Episodes).await?;
    Ok(all.get(content_id).cloned().unwrap_or_default())
}

/// The content's episode tree is created lazily; the season itself must not
/// already exist.
pub async fn add_season(
    store: &JsonStore,
    content_id: &str,
    season_number: u32,
) -> Result<(), Error> {
    let mut all: EpisodesByContent = store.read(Document::Episodes).await?;
    let tree = all.entry(content_id.to_string()).or_default();
    match tree.seasons.entry(season_number) {
        Entry::Occupied(_) => {
            return Err(Error::conflict(format!(
                "Season {season_number} already exists."
            )))
        }
        Entry::Vacant(vacant) => {
            vacant.insert(Season::default());
        }
    }
    store.write(Document::Episodes, &all).await
}

pub async fn remove_season(
    store: &JsonStore,
    content_id: &str,
    season_number: u32,
) -> Result<(), Error> {
    let mut all: EpisodesByContent = store.read(Document::Episodes).await?;
    let removed = all
        .get_mut(content_id)
        .and_then(|tree| tree.seasons.remove(&season_number));
    if removed.is_none() {
        return Err(Error::not_found("Season not found."));
    }
    store.write(Document::Episodes, &all).await
}

pub async fn add_episode(
    store: &JsonStore,
    content_id: &str,
    season_number: u32,
    quality: &str,
    episode: Episode,
) -> Result<(), Error> {
    let mut all: EpisodesByContent = store.read(Document::Episodes).await?;
    let season = all
        .get_mut(content_id)
        .and_then(|tree| tree.seasons.get_mut(&season_number))
        .ok_or_else(|| Error::not_found("Season not found."))?;
    insert_episode(season, quality, episode)?;
    store.write(Document::Episodes, &all).await
}

/// Locates the episode by its original quality and number, then updates it in
/// place or moves it into another quality bucket.
pub async fn update_episode(
    store: &JsonStore,
    content_id: &str,
    season_number: u32,
    original_quality: &str,
    original_number: u32,
    quality: &str,
    updated: Episode,
) -> Result<(), Error> {
    let mut all: EpisodesByContent = store.read(Document::Episodes).await?;
    let season = all
        .get_mut(content_id)
        .and_then(|tree| tree.seasons.get_mut(&season_number))
        .ok_or_else(|| Error::not_found("Season not found."))?;
    relocate_episode(season, original_quality, original_number, quality, updated)?;
    store.write(Document::Episodes, &all).await
}

/// Deletes by position within the quality's current list. The season key
/// survives even when its last quality bucket is pruned.
pub async fn remove_episode(
    store: &JsonStore,
    content_id: &str,
    season_number: u32,
    quality: &str,
    index: usize,
) -> Result<(), Error> {
    let mut all: EpisodesByContent = store.read(Document::Episodes).await?;
    let season = all
        .get_mut(content_id)
        .and_then(|tree| tree.seasons.get_mut(&season_number))
        .ok_or_else(|| Error::not_found("Episode not found."))?;
    remove_at(season, quality, index)?;
    store.write(Document::Episodes, &all).await
}

/// Episode numbers are unique within a (season, quality) pair and the bucket
/// stays sorted ascending.
fn insert_episode(season: &mut Season, quality: &str, episode: Episode) -> Result<(), Error> {
    let bucket = season.qualities.entry(quality.to_string()).or_default();
    if bucket
        .iter()
        .any(|ep| ep.episode_number == episode.episode_number)
    {
        return Err(Error::conflict(format!(
            "Episode {} already exists for {quality}.",
            episode.episode_number
        )));
    }
    bucket.push(episode);
    bucket.sort_by_key(|ep| ep.episode_number);
    Ok(())
}

fn relocate_episode(
    season: &mut Season,
    original_quality: &str,
    original_number: u32,
    quality: &str,
    updated: Episode,
) -> Result<(), Error> {
    let index = season
        .qualities
        .get(original_quality)
        .ok_or_else(|| Error::not_found(format!("Quality '{original_quality}' not found.")))?
        .iter()
        .position(|ep| ep.episode_number == original_number)
        .ok_or_else(|| Error::not_found(format!("Episode {original_number} not found.")))?;

    let moved = original_quality != quality || original_number != updated.episode_number;
    if moved {
        let occupied = season.qualities.get(quality).is_some_and(|bucket| {
            bucket
                .iter()
                .any(|ep| ep.episode_number == updated.episode_number)
        });
        if occupied {
            return Err(Error::conflict(format!(
                "Episode {} already exists in {quality}.",
                updated.episode_number
            )));
        }
    }

    if original_quality == quality {
        let bucket = season
            .qualities
            .get_mut(original_quality)
            .expect("bucket was located above");
        bucket[index] = updated;
        bucket.sort_by_key(|ep| ep.episode_number);
    } else {
        let bucket = season
            .qualities
            .get_mut(original_quality)
            .expect("bucket was located above");
        bucket.remove(index);
        if bucket.is_empty() {
            season.qualities.remove(original_quality);
        }
        let target = season.qualities.entry(quality.to_string()).or_default();
        target.push(updated);
        target.sort_by_key(|ep| ep.episode_number);
    }
    Ok(())
}

fn remove_at(season: &mut Season, quality: &str, index: usize) -> Result<(), Error> {
    let bucket = season
        .qualities
        .get_mut(quality)
        .ok_or_else(|| Error::not_found("Episode not found."))?;
    if index >= bucket.len() {
        return Err(Error::not_found("Episode not found."));
    }
    bucket.remove(index);
    if bucket.is_empty() {
        season.qualities.remove(quality);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn episode(number: u32, title: &str) -> Episode {
        Episode {
            episode_number: number,
            title: title.into(),
            download_url: format!("http://example.com/{number}"),
        }
    }

    fn season_with(quality: &str, numbers: &[u32]) -> Season {
        let mut season = Season::default();
        for &number in numbers {
            insert_episode(&mut season, quality, episode(number, "ep")).unwrap();
        }
        season
    }

    fn numbers(season: &Season, quality: &str) -> Vec<u32> {
        season.qualities[quality]
            .iter()
            .map(|ep| ep.episode_number)
            .collect()
    }

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn insert_keeps_the_bucket_sorted() {
        let mut season = Season::default();
        for number in [3, 1, 2] {
            insert_episode(&mut season, "1080p", episode(number, "ep")).unwrap();
        }
        assert_eq!(numbers(&season, "1080p"), vec![1, 2, 3]);
    }

    #[test]
    fn insert_rejects_a_duplicate_number_in_the_same_bucket() {
        let mut season = season_with("1080p", &[1]);
        let result = insert_episode(&mut season, "1080p", episode(1, "again"));
        assert!(matches!(result, Err(Error::Conflict(_))));
        // A different quality is a different bucket.
        insert_episode(&mut season, "720p", episode(1, "ep")).unwrap();
    }

    #[test]
    fn relocate_in_place_renumbers_and_resorts() {
        let mut season = season_with("1080p", &[1, 2, 3]);
        relocate_episode(&mut season, "1080p", 1, "1080p", episode(9, "moved")).unwrap();
        assert_eq!(numbers(&season, "1080p"), vec![2, 3, 9]);
    }

    #[test]
    fn relocate_rejects_an_occupied_destination_number() {
        let mut season = season_with("1080p", &[1, 2]);
        let result = relocate_episode(&mut season, "1080p", 1, "1080p", episode(2, "clash"));
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(numbers(&season, "1080p"), vec![1, 2]);
    }

    #[test]
    fn relocate_with_unchanged_key_replaces_in_place() {
        let mut season = season_with("1080p", &[1, 2]);
        relocate_episode(&mut season, "1080p", 2, "1080p", episode(2, "retitled")).unwrap();
        assert_eq!(season.qualities["1080p"][1].title, "retitled");
    }

    #[test]
    fn relocate_across_buckets_prunes_an_emptied_source() {
        let mut season = season_with("1080p", &[1]);
        relocate_episode(&mut season, "1080p", 1, "720p", episode(1, "ep")).unwrap();
        assert!(!season.qualities.contains_key("1080p"));
        assert_eq!(numbers(&season, "720p"), vec![1]);
    }

    #[test]
    fn relocate_across_buckets_checks_the_destination() {
        let mut season = season_with("1080p", &[1]);
        insert_episode(&mut season, "720p", episode(1, "ep")).unwrap();
        let result = relocate_episode(&mut season, "1080p", 1, "720p", episode(1, "ep"));
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(numbers(&season, "1080p"), vec![1]);
    }

    #[test]
    fn relocate_missing_episode_is_not_found() {
        let mut season = season_with("1080p", &[1]);
        let missing_quality = relocate_episode(&mut season, "480p", 1, "480p", episode(1, "ep"));
        assert!(matches!(missing_quality, Err(Error::NotFound(_))));
        let missing_number = relocate_episode(&mut season, "1080p", 7, "1080p", episode(7, "ep"));
        assert!(matches!(missing_number, Err(Error::NotFound(_))));
    }

    #[test]
    fn remove_at_prunes_an_emptied_bucket() {
        let mut season = season_with("1080p", &[1]);
        remove_at(&mut season, "1080p", 0).unwrap();
        assert!(!season.qualities.contains_key("1080p"));
    }

    #[test]
    fn remove_at_rejects_an_out_of_range_index() {
        let mut season = season_with("1080p", &[1]);
        assert!(matches!(
            remove_at(&mut season, "1080p", 1),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            remove_at(&mut season, "720p", 0),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn add_season_rejects_a_duplicate() {
        let (_dir, store) = store();
        add_season(&store, "dark", 1).await.unwrap();
        let result = add_season(&store, "dark", 1).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn seasons_are_presented_in_numeric_order() {
        let (_dir, store) = store();
        for season in [10, 2, 1] {
            add_season(&store, "dark", season).await.unwrap();
        }
        let tree = get(&store, "dark").await.unwrap();
        let order: Vec<u32> = tree.seasons.keys().copied().collect();
        assert_eq!(order, vec![1, 2, 10]);
    }

    #[tokio::test]
    async fn add_episode_requires_the_season() {
        let (_dir, store) = store();
        let result = add_episode(&store, "dark", 1, "1080p", episode(1, "Pilot")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn season_and_episode_round_trip_wire_shape() {
        let (_dir, store) = store();
        add_season(&store, "dark", 1).await.unwrap();
        add_episode(
            &store,
            "dark",
            1,
            "1080p",
            Episode {
                episode_number: 1,
                title: "Pilot".into(),
                download_url: "http://x".into(),
            },
        )
        .await
        .unwrap();

        let tree = get(&store, "dark").await.unwrap();
        let expected = json!({
            "seasons": {
                "1": {
                    "qualities": {
                        "1080p": [
                            {
                                "episodeNumber": 1,
                                "title": "Pilot",
                                "downloadUrl": "http://x",
                            },
                        ],
                    },
                },
            },
            "zipFiles": [],
        });
        assert_eq!(serde_json::to_value(&tree).unwrap(), expected);
    }

    #[tokio::test]
    async fn deleting_the_last_episode_prunes_the_bucket_but_not_the_season() {
        let (_dir, store) = store();
        add_season(&store, "dark", 1).await.unwrap();
        add_episode(&store, "dark", 1, "1080p", episode(1, "Pilot"))
            .await
            .unwrap();
        remove_episode(&store, "dark", 1, "1080p", 0).await.unwrap();

        let tree = get(&store, "dark").await.unwrap();
        let season = tree.seasons.get(&1).expect("season should survive");
        assert!(season.qualities.is_empty());
    }

    #[tokio::test]
    async fn remove_season_drops_the_whole_subtree() {
        let (_dir, store) = store();
        add_season(&store, "dark", 1).await.unwrap();
        add_episode(&store, "dark", 1, "1080p", episode(1, "Pilot"))
            .await
            .unwrap();
        remove_season(&store, "dark", 1).await.unwrap();
        let tree = get(&store, "dark").await.unwrap();
        assert!(tree.seasons.is_empty());

        let result = remove_season(&store, "dark", 1).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
