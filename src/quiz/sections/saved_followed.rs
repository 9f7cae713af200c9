//! Saved & Followed: which albums, tracks and artists are in the user's library.

use std::collections::HashSet;

use rand::Rng;

use crate::{
    errors::AppResult,
    models::domain::{Choice, Question},
    quiz::{
        choices::{album_choice, artist_choice, checkbox_question, track_choice},
        selection::{random_excluding, random_from_list},
        user_data::UserData,
    },
    spotify::models::{SimpleAlbum, TimeRange},
};

const CHOICES: usize = 4;

/// Between one and four library items are correct; the rest are drawn from
/// `pool`, skipping anything that is also in the library.
fn library_question<T, K, R>(
    text: &str,
    library: &[T],
    pool: &[T],
    key: impl Fn(&T) -> K,
    build: impl Fn(&T, bool) -> Choice,
    rng: &mut R,
) -> Option<Question>
where
    T: Clone,
    K: Eq + std::hash::Hash,
    R: Rng + ?Sized,
{
    if library.is_empty() {
        return None;
    }

    let correct_count = rng.random_range(1..=library.len().min(CHOICES));
    let correct = random_from_list(library, correct_count, rng)?;

    let excluded: HashSet<K> = library.iter().map(&key).collect();
    let incorrect = random_excluding(pool, &excluded, &key, CHOICES - correct_count, rng)?;

    checkbox_question(text, true, &correct, &incorrect, build, rng)
}

pub async fn saved_albums<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let saved: Vec<SimpleAlbum> = data
        .saved_albums()
        .await?
        .iter()
        .cloned()
        .map(SimpleAlbum::from)
        .collect();
    if saved.is_empty() {
        return Ok(None);
    }
    let pool: Vec<SimpleAlbum> = data
        .music_taste()
        .await?
        .iter()
        .map(|t| t.album.clone())
        .collect();

    Ok(library_question(
        "Which of these albums does the user have saved to their library?",
        &saved,
        &pool,
        |album| album.id.clone(),
        album_choice,
        rng,
    ))
}

pub async fn saved_tracks<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let saved = data.saved_tracks().await?.to_vec();
    if saved.is_empty() {
        return Ok(None);
    }
    let pool = data.music_taste().await?.to_vec();

    Ok(library_question(
        "Which of these tracks does the user have saved to their library?",
        &saved,
        &pool,
        |track| track.id.clone(),
        track_choice,
        rng,
    ))
}

pub async fn followed_artists<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let followed = data.followed_artists().await?.to_vec();
    if followed.is_empty() {
        return Ok(None);
    }
    let pool = data.top_artists(TimeRange::LongTerm).await?.to_vec();

    Ok(library_question(
        "Which of these artists does the user follow?",
        &followed,
        &pool,
        |artist| artist.id.clone(),
        artist_choice,
        rng,
    ))
}
