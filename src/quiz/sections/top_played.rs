//! Top Played: which track, artist or genre the user listens to most.

use std::collections::HashSet;

use rand::Rng;

use crate::{
    errors::AppResult,
    models::domain::Question,
    quiz::{
        choices::{artist_choice, checkbox_question, genre_choice, track_choice},
        selection::{random_excluding, random_from_list},
        user_data::UserData,
    },
    spotify::models::TimeRange,
};

const DISTRACTORS: usize = 3;

pub async fn top_track<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    range: TimeRange,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let tracks = data.top_tracks(range).await?;
    let Some((top, rest)) = tracks.split_first() else {
        return Ok(None);
    };
    let Some(others) = random_from_list(rest, DISTRACTORS, rng) else {
        return Ok(None);
    };

    Ok(checkbox_question(
        format!("What is their most listened to track {}?", range.describe()),
        false,
        std::slice::from_ref(top),
        &others,
        track_choice,
        rng,
    ))
}

pub async fn top_artist<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    range: TimeRange,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let artists = data.top_artists(range).await?;
    let Some((top, rest)) = artists.split_first() else {
        return Ok(None);
    };
    let Some(others) = random_from_list(rest, DISTRACTORS, rng) else {
        return Ok(None);
    };

    Ok(checkbox_question(
        format!("What is their most listened to artist {}?", range.describe()),
        false,
        std::slice::from_ref(top),
        &others,
        artist_choice,
        rng,
    ))
}

/// The answer is one genre of the top artist. Distractors are genres of the
/// other top artists that the top artist does not share.
pub async fn top_genre<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    range: TimeRange,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let genre_lists: Vec<Vec<String>> = data
        .top_genres(range)
        .await?
        .into_iter()
        .filter(|genres| !genres.is_empty())
        .collect();

    let Some((top_genres, rest)) = genre_lists.split_first() else {
        return Ok(None);
    };
    let top_genre = &top_genres[rng.random_range(0..top_genres.len())];

    let excluded: HashSet<&str> = top_genres.iter().map(String::as_str).collect();
    let pool: Vec<&str> = rest.iter().flatten().map(String::as_str).collect();
    let Some(others) = random_excluding(&pool, &excluded, |g| *g, DISTRACTORS, rng) else {
        return Ok(None);
    };

    Ok(checkbox_question(
        format!("What is their most listened to genre {}?", range.describe()),
        false,
        &[top_genre.as_str()],
        &others,
        |genre, answer| genre_choice(genre, answer),
        rng,
    ))
}
