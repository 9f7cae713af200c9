//! Typed views of the Spotify Web API payloads the quiz needs.
//!
//! Spotify sends `null` for several fields that are normally present
//! (local tracks have no id, some playlists have no images), so those
//! fields fall back to their default instead of failing the whole page.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Longest first, the order music taste is merged in.
    pub const ALL: [TimeRange; 3] = [TimeRange::LongTerm, TimeRange::MediumTerm, TimeRange::ShortTerm];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    /// Phrase used in question text.
    pub fn describe(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "in the last 4 weeks",
            TimeRange::MediumTerm => "in the last 6 months",
            TimeRange::LongTerm => "of all time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Followers {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArtistRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default)]
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimpleAlbum {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
}

/// Full album object, as returned in the saved albums library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u32,
}

impl From<Album> for SimpleAlbum {
    fn from(album: Album) -> Self {
        SimpleAlbum {
            id: album.id,
            name: album.name,
            artists: album.artists,
            images: album.images,
            release_date: album.release_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistRef>,
    pub album: SimpleAlbum,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: u32,
}

impl Track {
    /// Year prefix of the album release date (`1999`, `1999-05` or `1999-05-01`).
    pub fn release_year(&self) -> Option<i64> {
        self.album.release_date.get(0..4)?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AudioFeatures {
    pub id: String,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub acousticness: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    pub tracks: PlaylistTracksRef,
}

impl Playlist {
    pub fn is_public(&self) -> bool {
        self.public == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: Followers,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

/// One page of a paginated endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    pub track: Track,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedAlbum {
    pub album: Album,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowedArtistsPage {
    pub artists: Paging<Artist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesPage {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistFollowers {
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: Followers,
}
