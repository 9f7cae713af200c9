//! Music Taste: slider questions about what the user's top tracks sound like.

use chrono::{Datelike, Utc};
use rand::Rng;

use crate::{
    errors::AppResult,
    models::domain::Question,
    quiz::user_data::UserData,
    spotify::models::AudioFeatures,
};

fn percentage(count: usize, total: usize) -> i64 {
    (100 * count / total) as i64
}

fn average_percent(features: &[AudioFeatures], value: impl Fn(&AudioFeatures) -> f64) -> i64 {
    let sum: f64 = features.iter().map(value).sum();
    (100.0 * sum / features.len() as f64) as i64
}

/// Slider from 0 to 100 over an audio feature averaged across the music taste.
async fn feature_question(
    data: &mut UserData<'_>,
    text: &str,
    value: impl Fn(&AudioFeatures) -> f64,
) -> AppResult<Option<Question>> {
    let features = data.audio_features().await?;
    if features.is_empty() {
        return Ok(None);
    }
    Ok(Question::slider(text, 0, 100, average_percent(features, value)))
}

pub async fn explicitness(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    let taste = data.music_taste().await?;
    if taste.is_empty() {
        return Ok(None);
    }
    let explicit = taste.iter().filter(|t| t.explicit).count();

    Ok(Question::slider(
        "What percentage of the user's music is explicit?",
        0,
        100,
        percentage(explicit, taste.len()),
    ))
}

pub async fn energy(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    feature_question(
        data,
        "From 0 to 100, 100 being crazy energetic, how energetic is the user's music taste?",
        |f| f.energy,
    )
    .await
}

pub async fn acousticness(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    let features = data.audio_features().await?;
    if features.is_empty() {
        return Ok(None);
    }
    let acoustic = features.iter().filter(|f| f.acousticness > 0.5).count();

    Ok(Question::slider(
        "What percentage of the user's music taste is acoustic?",
        0,
        100,
        percentage(acoustic, features.len()),
    ))
}

pub async fn happiness(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    feature_question(
        data,
        "From 0 to 100, how happy is the user's music taste (0=sad, 100=happy)?",
        |f| f.valence,
    )
    .await
}

pub async fn danceability(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    feature_question(
        data,
        "From 0 to 100, how danceable is the user's music taste (0=no dancing, 100=dance all night)?",
        |f| f.danceability,
    )
    .await
}

/// Average track length in seconds; the slider reaches 40 to 120 seconds either side.
pub async fn duration<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Question>> {
    let taste = data.music_taste().await?;
    if taste.is_empty() {
        return Ok(None);
    }
    let total_ms: u64 = taste.iter().map(|t| t.duration_ms).sum();
    let average = (total_ms / taste.len() as u64 / 1000) as i64;

    let min = (average - rng.random_range(40..=120)).max(0);
    let max = average + rng.random_range(40..=120);

    Ok(Question::slider(
        "On average, how long are the songs that the user listens to (in seconds)?",
        min,
        max,
        average,
    ))
}

/// Average release year. The range spans the oldest and newest years,
/// widened by five when either is within five years of the average, and
/// never reaches past the current year.
pub async fn release_year(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    let years: Vec<i64> = data
        .music_taste()
        .await?
        .iter()
        .filter_map(|t| t.release_year())
        .collect();
    let (Some(&oldest), Some(&newest)) = (years.iter().min(), years.iter().max()) else {
        return Ok(None);
    };
    let average = years.iter().sum::<i64>() / years.len() as i64;

    let mut min = oldest;
    let mut max = newest;
    if min >= average - 5 {
        min -= 5;
    }
    if max <= average + 5 {
        max += 5;
    }
    max = max.min(Utc::now().year() as i64);

    Ok(Question::slider(
        "On average, what year was the user's music taste released in?",
        min,
        max,
        average,
    ))
}

pub async fn popularity(data: &mut UserData<'_>) -> AppResult<Option<Question>> {
    let taste = data.music_taste().await?;
    if taste.is_empty() {
        return Ok(None);
    }
    let total: u64 = taste.iter().map(|t| t.popularity as u64).sum();

    Ok(Question::slider(
        "How mainstream is the user's music taste?",
        0,
        100,
        (total / taste.len() as u64) as i64,
    ))
}
