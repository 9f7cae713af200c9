//! Question generators grouped into quiz sections.
//!
//! A section holds a set of generators and a quota. Picking a section calls
//! its generators in random order, each at most once, until the quota of
//! questions is met. A quiz is every section, in random order.

pub mod music_taste;
pub mod popularity_playlists;
pub mod saved_followed;
pub mod top_played;

use rand::{seq::SliceRandom, Rng};

use crate::{
    errors::AppResult,
    models::domain::Question,
    quiz::{selection::Untried, user_data::UserData},
    spotify::models::TimeRange,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    TopTrack(TimeRange),
    TopArtist(TimeRange),
    TopGenre(TimeRange),
    SavedAlbums,
    SavedTracks,
    FollowedArtists,
    Explicitness,
    Energy,
    Acousticness,
    Happiness,
    Danceability,
    Duration,
    ReleaseYear,
    Popularity,
    Followers,
    PopularPlaylist,
    PlaylistTracks,
}

impl Generator {
    /// Builds one question, or `None` when the user's data cannot support it.
    pub async fn generate<R: Rng + ?Sized>(
        self,
        data: &mut UserData<'_>,
        rng: &mut R,
    ) -> AppResult<Option<Question>> {
        match self {
            Generator::TopTrack(range) => top_played::top_track(data, range, rng).await,
            Generator::TopArtist(range) => top_played::top_artist(data, range, rng).await,
            Generator::TopGenre(range) => top_played::top_genre(data, range, rng).await,
            Generator::SavedAlbums => saved_followed::saved_albums(data, rng).await,
            Generator::SavedTracks => saved_followed::saved_tracks(data, rng).await,
            Generator::FollowedArtists => saved_followed::followed_artists(data, rng).await,
            Generator::Explicitness => music_taste::explicitness(data).await,
            Generator::Energy => music_taste::energy(data).await,
            Generator::Acousticness => music_taste::acousticness(data).await,
            Generator::Happiness => music_taste::happiness(data).await,
            Generator::Danceability => music_taste::danceability(data).await,
            Generator::Duration => music_taste::duration(data, rng).await,
            Generator::ReleaseYear => music_taste::release_year(data).await,
            Generator::Popularity => music_taste::popularity(data).await,
            Generator::Followers => popularity_playlists::user_followers(data, rng).await,
            Generator::PopularPlaylist => popularity_playlists::popular_playlist(data, rng).await,
            Generator::PlaylistTracks => popularity_playlists::playlist_tracks(data, rng).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    TopPlayed,
    SavedFollowed,
    MusicTaste,
    PopularityPlaylists,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::TopPlayed,
        Section::SavedFollowed,
        Section::MusicTaste,
        Section::PopularityPlaylists,
    ];

    /// Number of questions the section contributes to a quiz.
    pub fn quota(&self) -> usize {
        match self {
            Section::TopPlayed => 3,
            Section::SavedFollowed => 2,
            Section::MusicTaste => 3,
            Section::PopularityPlaylists => 2,
        }
    }

    pub fn generators(&self) -> Vec<Generator> {
        match self {
            Section::TopPlayed => TimeRange::ALL
                .into_iter()
                .flat_map(|range| {
                    [
                        Generator::TopTrack(range),
                        Generator::TopArtist(range),
                        Generator::TopGenre(range),
                    ]
                })
                .collect(),
            Section::SavedFollowed => vec![
                Generator::SavedAlbums,
                Generator::SavedTracks,
                Generator::FollowedArtists,
            ],
            Section::MusicTaste => vec![
                Generator::Explicitness,
                Generator::Energy,
                Generator::Acousticness,
                Generator::Happiness,
                Generator::Danceability,
                Generator::Duration,
                Generator::ReleaseYear,
                Generator::Popularity,
            ],
            Section::PopularityPlaylists => vec![
                Generator::Followers,
                Generator::PopularPlaylist,
                Generator::PlaylistTracks,
            ],
        }
    }

    pub async fn pick<R: Rng + ?Sized>(
        &self,
        data: &mut UserData<'_>,
        rng: &mut R,
    ) -> AppResult<Option<Vec<Question>>> {
        let questions = pick_until(self.generators(), self.quota(), data, rng).await?;
        if questions.is_none() {
            log::warn!("Section {:?} could not fill its quota of {}", self, self.quota());
        }
        Ok(questions)
    }
}

/// Runs randomly drawn generators, each at most once, until `count` of
/// them produce a question.
///
/// Stops with `None` as soon as the untried generators can no longer make
/// up the shortfall. Spotify errors abort the whole pick.
pub async fn pick_until<R: Rng + ?Sized>(
    generators: Vec<Generator>,
    count: usize,
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Vec<Question>>> {
    if generators.len() < count {
        return Ok(None);
    }

    let mut untried = Untried::new(generators);
    let mut questions = Vec::with_capacity(count);

    while questions.len() < count {
        if questions.len() + untried.len() < count {
            return Ok(None);
        }
        let Some(generator) = untried.draw(rng) else {
            return Ok(None);
        };

        match generator.generate(data, rng).await? {
            Some(question) => questions.push(question),
            None => log::debug!("{:?} had too little data for a question", generator),
        }
    }

    Ok(Some(questions))
}

/// Builds a full quiz: every section in random order. Any section falling
/// short of its quota fails the whole build.
pub async fn build_questions<R: Rng + ?Sized>(
    data: &mut UserData<'_>,
    rng: &mut R,
) -> AppResult<Option<Vec<Question>>> {
    let mut sections = Section::ALL;
    sections.shuffle(rng);

    let mut questions = Vec::new();
    for section in sections {
        match section.pick(data, rng).await? {
            Some(picked) => questions.extend(picked),
            None => return Ok(None),
        }
    }

    Ok(Some(questions))
}
