//! Popularity & Playlists: followers, the most followed playlist, and what
//! is inside one of the user's playlists.

use std::collections::HashSet;

use rand::Rng;

use crate::{
    errors::AppResult,
    models::domain::Question,
    quiz::{
        choices::{checkbox_question, playlist_choice, track_choice},
        selection::{random_excluding, random_from_list, Untried},
        user_data::UserData,
    },
    spotify::models::{Playlist, Track},
};

const MIN_FOLLOWER_SPAN: i64 = 5;
const MIN_PUBLIC_PLAYLISTS: usize = 4;
const PLAYLIST_CHOICES: usize = 4;

pub async fn user_followers<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let followers = data.personal_data().await?.followers.total as i64;
    if followers == 0 {
        return Ok(None);
    }

    let mut max = followers + rng.random_range(1..=10);
    let min = (followers - rng.random_range(1..=10)).max(0);
    if max - min < MIN_FOLLOWER_SPAN {
        max = min + MIN_FOLLOWER_SPAN;
    }

    Ok(Question::slider(
        "How many followers does the user have?",
        min,
        max,
        followers,
    ))
}

/// Needs four public playlists, a most followed one with at least one
/// follower, and three others with strictly fewer followers.
pub async fn popular_playlist<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let public: Vec<Playlist> = data
        .playlists()
        .await?
        .iter()
        .filter(|p| p.is_public())
        .cloned()
        .collect();
    if public.len() < MIN_PUBLIC_PLAYLISTS {
        return Ok(None);
    }

    let followers = data.playlist_followers().await?;
    let count = |p: &Playlist| followers.get(&p.id).copied().unwrap_or(0);

    let Some(most_followed) = public.iter().max_by_key(|p| count(p)) else {
        return Ok(None);
    };
    let max_followers = count(most_followed);
    if max_followers < 1 {
        return Ok(None);
    }

    let less_followed: Vec<Playlist> = public
        .iter()
        .filter(|p| count(p) < max_followers)
        .cloned()
        .collect();
    let Some(others) = random_from_list(&less_followed, PLAYLIST_CHOICES - 1, rng) else {
        return Ok(None);
    };

    Ok(checkbox_question(
        "Which of the user's playlists has the most followers?",
        false,
        std::slice::from_ref(most_followed),
        &others,
        playlist_choice,
        rng,
    ))
}

/// Picks a random public playlist with at least four tracks; one to four of
/// its tracks are correct and the rest come from the user's music taste.
pub async fn playlist_tracks<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let public: Vec<Playlist> = data
        .playlists()
        .await?
        .iter()
        .filter(|p| p.is_public() && p.tracks.total as usize >= PLAYLIST_CHOICES)
        .cloned()
        .collect();

    let mut candidates = Untried::new(public);
    let (playlist, tracks) = loop {
        let Some(playlist) = candidates.draw(rng) else {
            return Ok(None);
        };
        let Some(tracks) = data.playlist_tracks(&playlist.id).await? else {
            continue;
        };
        let mut seen = HashSet::new();
        let tracks: Vec<Track> = tracks
            .iter()
            .filter(|t| seen.insert(t.id.clone()))
            .cloned()
            .collect();
        if tracks.len() >= PLAYLIST_CHOICES {
            break (playlist, tracks);
        }
    };

    let correct_count = rng.random_range(1..=PLAYLIST_CHOICES);
    let Some(correct) = random_from_list(&tracks, correct_count, rng) else {
        return Ok(None);
    };

    let excluded: HashSet<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let taste = data.music_taste().await?;
    let Some(incorrect) = random_excluding(
        taste,
        &excluded,
        |t| t.id.clone(),
        PLAYLIST_CHOICES - correct_count,
        rng,
    ) else {
        return Ok(None);
    };

    Ok(checkbox_question(
        format!("Which of these tracks are in the user's playlist {}?", playlist.name),
        true,
        &correct,
        &incorrect,
        track_choice,
        rng,
    ))
}
