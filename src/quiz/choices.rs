use rand::{seq::SliceRandom, Rng};

use crate::{
    models::domain::{Choice, Question},
    quiz::selection::largest_image,
    spotify::models::{Artist, Playlist, SimpleAlbum, Track},
};

pub fn track_choice(track: &Track, answer: bool) -> Choice {
    Choice::new(
        track.name.clone(),
        track.artists.first().map(|a| a.name.clone()),
        largest_image(&track.album.images),
        answer,
    )
}

pub fn album_choice(album: &SimpleAlbum, answer: bool) -> Choice {
    Choice::new(
        album.name.clone(),
        album.artists.first().map(|a| a.name.clone()),
        largest_image(&album.images),
        answer,
    )
}

pub fn artist_choice(artist: &Artist, answer: bool) -> Choice {
    Choice::new(artist.name.clone(), None, largest_image(&artist.images), answer)
}

pub fn genre_choice(genre: &str, answer: bool) -> Choice {
    Choice::new(genre, None, None, answer)
}

pub fn playlist_choice(playlist: &Playlist, answer: bool) -> Choice {
    Choice::new(playlist.name.clone(), None, largest_image(&playlist.images), answer)
}

/// Builds `correct` and `incorrect` choices with `build` and shuffles them.
pub fn checkbox_question<T, F, R>(
    text: impl Into<String>,
    multiselect: bool,
    correct: &[T],
    incorrect: &[T],
    build: F,
    rng: &mut R,
) -> Option<Question>
where
    F: Fn(&T, bool) -> Choice,
    R: Rng + ?Sized,
{
    let mut choices: Vec<Choice> = correct
        .iter()
        .map(|item| build(item, true))
        .chain(incorrect.iter().map(|item| build(item, false)))
        .collect();
    choices.shuffle(rng);

    Question::checkbox(text, multiselect, choices)
}
