use std::collections::HashSet;

use crate::datasource::{
    CommentsByContent, Document, EpisodesByContent, JsonStore, MediaByContent,
};
use crate::errors::Error;
use crate::models::{Content, ContentDraft, EpisodeTree, MediaBundle};

const REQUIRED_FIELDS: &str = "Title, type, and year are required.";

pub async fn get_collection(store: &JsonStore) -> Result<Vec<Content>, Error> {
    store.read(Document::Content).await
}

/// Creates one record: assigns the slug id, prepends to the listing, and
/// seeds the empty sibling documents. The four writes are sequential and
/// best-effort; there is no rollback on a partial failure.
pub async fn create(store: &JsonStore, draft: ContentDraft) -> Result<Content, Error> {
    let mut content: Vec<Content> = store.read(Document::Content).await?;
    let record = build(draft, &content, &[])?;
    content.insert(0, record.clone());

    let mut media: MediaByContent = store.read(Document::Media).await?;
    let mut episodes: EpisodesByContent = store.read(Document::Episodes).await?;
    let mut comments: CommentsByContent = store.read(Document::Comments).await?;
    seed_siblings(&record, &mut media, &mut episodes, &mut comments);

    store.write(Document::Content, &content).await?;
    store.write(Document::Media, &media).await?;
    store.write(Document::Episodes, &episodes).await?;
    store.write(Document::Comments, &comments).await?;
    Ok(record)
}

#[derive(Debug)]
pub struct BulkOutcome {
    pub added: Vec<Content>,
    pub requested: usize,
}

/// Bulk create skips invalid items instead of failing the batch. Slugs are
/// deduplicated against both the stored listing and the items added earlier
/// in the same batch.
pub async fn create_bulk(
    store: &JsonStore,
    drafts: Vec<ContentDraft>,
) -> Result<BulkOutcome, Error> {
    let requested = drafts.len();
    let content: Vec<Content> = store.read(Document::Content).await?;
    let mut media: MediaByContent = store.read(Document::Media).await?;
    let mut episodes: EpisodesByContent = store.read(Document::Episodes).await?;
    let mut comments: CommentsByContent = store.read(Document::Comments).await?;

    let mut added: Vec<Content> = Vec::new();
    for draft in drafts {
        let Ok(record) = build(draft, &content, &added) else {
            continue;
        };
        seed_siblings(&record, &mut media, &mut episodes, &mut comments);
        added.push(record);
    }
    let content: Vec<Content> = added.iter().cloned().chain(content).collect();

    store.write(Document::Content, &content).await?;
    store.write(Document::Media, &media).await?;
    store.write(Document::Episodes, &episodes).await?;
    store.write(Document::Comments, &comments).await?;
    Ok(BulkOutcome { added, requested })
}

/// Full-record merge: fields present in the draft overwrite, absent fields
/// are preserved. The id is never recomputed.
pub async fn update(store: &JsonStore, id: &str, draft: ContentDraft) -> Result<Content, Error> {
    if draft.title.is_none() || draft.kind.is_none() || draft.year.is_none() {
        return Err(Error::validation(REQUIRED_FIELDS));
    }
    let mut content: Vec<Content> = store.read(Document::Content).await?;
    let record = content
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| Error::not_found(format!("Content with ID {id} not found.")))?;
    apply(record, draft);
    let updated = record.clone();
    store.write(Document::Content, &content).await?;
    Ok(updated)
}

pub async fn remove(store: &JsonStore, id: &str) -> Result<(), Error> {
    let mut content: Vec<Content> = store.read(Document::Content).await?;
    let mut media: MediaByContent = store.read(Document::Media).await?;
    let mut episodes: EpisodesByContent = store.read(Document::Episodes).await?;
    let mut comments: CommentsByContent = store.read(Document::Comments).await?;

    let index = content
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| Error::not_found(format!("Content with ID {id} not found.")))?;
    content.remove(index);
    media.remove(id);
    episodes.remove(id);
    comments.remove(id);

    store.write(Document::Content, &content).await?;
    store.write(Document::Media, &media).await?;
    store.write(Document::Episodes, &episodes).await?;
    store.write(Document::Comments, &comments).await?;
    Ok(())
}

/// Not-found only when no id matched; a partial match removes the matched
/// subset silently. Requests referencing the removed content are left alone.
pub async fn remove_bulk(store: &JsonStore, ids: &[String]) -> Result<usize, Error> {
    let mut content: Vec<Content> = store.read(Document::Content).await?;
    let mut media: MediaByContent = store.read(Document::Media).await?;
    let mut episodes: EpisodesByContent = store.read(Document::Episodes).await?;
    let mut comments: CommentsByContent = store.read(Document::Comments).await?;

    let before = content.len();
    content.retain(|c| !ids.contains(&c.id));
    if content.len() == before {
        return Err(Error::not_found("None of the provided IDs were found."));
    }
    for id in ids {
        media.remove(id);
        episodes.remove(id);
        comments.remove(id);
    }

    store.write(Document::Content, &content).await?;
    store.write(Document::Media, &media).await?;
    store.write(Document::Episodes, &episodes).await?;
    store.write(Document::Comments, &comments).await?;
    Ok(before - content.len())
}

fn build(draft: ContentDraft, existing: &[Content], pending: &[Content]) -> Result<Content, Error> {
    let ContentDraft {
        title,
        kind,
        year,
        rating,
        genres,
        cast,
        director,
        studio,
        duration,
        poster_image,
        hero_image,
        description,
        full_description,
        tags,
        languages,
        quality,
    } = draft;
    let (Some(title), Some(kind), Some(year)) = (title, kind, year) else {
        return Err(Error::validation(REQUIRED_FIELDS));
    };
    let id = generate_id(&title, existing, pending);
    Ok(Content {
        id,
        title,
        kind,
        year,
        rating: rating.unwrap_or_default(),
        genres: genres.unwrap_or_default(),
        cast: cast.unwrap_or_default(),
        director: director.unwrap_or_default(),
        studio,
        duration,
        poster_image,
        hero_image,
        description,
        full_description,
        tags: tags.unwrap_or_default(),
        languages: languages.unwrap_or_default(),
        quality: quality.unwrap_or_default(),
    })
}

fn apply(record: &mut Content, draft: ContentDraft) {
    let ContentDraft {
        title,
        kind,
        year,
        rating,
        genres,
        cast,
        director,
        studio,
        duration,
        poster_image,
        hero_image,
        description,
        full_description,
        tags,
        languages,
        quality,
    } = draft;
    if let Some(title) = title {
        record.title = title;
    }
    if let Some(kind) = kind {
        record.kind = kind;
    }
    if let Some(year) = year {
        record.year = year;
    }
    if let Some(rating) = rating {
        record.rating = rating;
    }
    if let Some(genres) = genres {
        record.genres = genres;
    }
    if let Some(cast) = cast {
        record.cast = cast;
    }
    if let Some(director) = director {
        record.director = director;
    }
    if let Some(studio) = studio {
        record.studio = Some(studio);
    }
    if let Some(duration) = duration {
        record.duration = Some(duration);
    }
    if let Some(poster_image) = poster_image {
        record.poster_image = Some(poster_image);
    }
    if let Some(hero_image) = hero_image {
        record.hero_image = Some(hero_image);
    }
    if let Some(description) = description {
        record.description = Some(description);
    }
    if let Some(full_description) = full_description {
        record.full_description = Some(full_description);
    }
    if let Some(tags) = tags {
        record.tags = tags;
    }
    if let Some(languages) = languages {
        record.languages = languages;
    }
    if let Some(quality) = quality {
        record.quality = quality;
    }
}

fn seed_siblings(
    record: &Content,
    media: &mut MediaByContent,
    episodes: &mut EpisodesByContent,
    comments: &mut CommentsByContent,
) {
    media.insert(record.id.clone(), MediaBundle::default());
    if record.kind.has_episodes() {
        episodes.insert(record.id.clone(), EpisodeTree::default());
    }
    comments.insert(record.id.clone(), Vec::new());
}

/// Derives a URL-safe, unique id from a human-entered title. The base slug is
/// permanent for the record's lifetime; collisions get a `-2`, `-3`, …
/// suffix. Ids pending in the same bulk batch count as taken.
pub fn generate_id(title: &str, existing: &[Content], pending: &[Content]) -> String {
    let taken: HashSet<&str> = existing
        .iter()
        .chain(pending)
        .map(|c| c.id.as_str())
        .collect();
    let base = slugify(title);
    if !taken.contains(base.as_str()) {
        return base;
    }
    let mut counter = 2u32;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Lower-cases, drops everything outside ASCII alphanumerics and hyphens,
/// collapses runs of whitespace and underscores into single hyphens, and
/// trims hyphens from both ends.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() || c == '_' {
            gap = true;
        } else if c.is_ascii_alphanumeric() || c == '-' {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(c);
        }
    }
    slug.trim_matches('-').to_string()
}
