use std::collections::{HashMap, HashSet};

use crate::{
    errors::AppResult,
    spotify::{
        client::{collect_pages, from_payload, get_json, SpotifyApi},
        models::{
            Album, Artist, AudioFeatures, AudioFeaturesPage, FollowedArtistsPage, Paging,
            PlayHistory, Playlist, PlaylistFollowers, PlaylistItem, SavedAlbum, SavedTrack,
            TimeRange, Track, UserProfile,
        },
    },
};

/// Spotify caps `/v1/audio-features` at this many ids per request.
const AUDIO_FEATURES_CHUNK: usize = 100;

/// Lazily fetched, memoized view of one user's Spotify data.
///
/// Each accessor hits the API the first time it is called and returns the
/// cached value afterwards, so one quiz build fetches every endpoint at most
/// once no matter how many generators ask for it.
pub struct UserData<'a> {
    api: &'a dyn SpotifyApi,
    personal: Option<UserProfile>,
    top_tracks: HashMap<TimeRange, Vec<Track>>,
    top_artists: HashMap<TimeRange, Vec<Artist>>,
    music_taste: Option<Vec<Track>>,
    audio_features: Option<Vec<AudioFeatures>>,
    playlists: Option<Vec<Playlist>>,
    playlist_followers: Option<HashMap<String, u64>>,
    playlist_tracks: HashMap<String, Vec<Track>>,
    saved_tracks: Option<Vec<Track>>,
    saved_albums: Option<Vec<Album>>,
    followed_artists: Option<Vec<Artist>>,
    recently_played: Option<Vec<Track>>,
}

impl<'a> UserData<'a> {
    pub fn new(api: &'a dyn SpotifyApi) -> Self {
        Self {
            api,
            personal: None,
            top_tracks: HashMap::new(),
            top_artists: HashMap::new(),
            music_taste: None,
            audio_features: None,
            playlists: None,
            playlist_followers: None,
            playlist_tracks: HashMap::new(),
            saved_tracks: None,
            saved_albums: None,
            followed_artists: None,
            recently_played: None,
        }
    }

    pub async fn personal_data(&mut self) -> AppResult<&UserProfile> {
        let profile = match self.personal.take() {
            Some(profile) => profile,
            None => get_json(self.api, "/v1/me", &[]).await?,
        };
        Ok(&*self.personal.insert(profile))
    }

    pub async fn top_tracks(&mut self, range: TimeRange) -> AppResult<&[Track]> {
        if !self.top_tracks.contains_key(&range) {
            let page: Paging<Track> = get_json(
                self.api,
                "/v1/me/top/tracks",
                &[("limit", "50"), ("time_range", range.as_str())],
            )
            .await?;
            self.top_tracks.insert(range, page.items);
        }
        Ok(self.top_tracks.get(&range).map(Vec::as_slice).unwrap_or_default())
    }

    pub async fn top_artists(&mut self, range: TimeRange) -> AppResult<&[Artist]> {
        if !self.top_artists.contains_key(&range) {
            let page: Paging<Artist> = get_json(
                self.api,
                "/v1/me/top/artists",
                &[("limit", "50"), ("time_range", range.as_str())],
            )
            .await?;
            self.top_artists.insert(range, page.items);
        }
        Ok(self.top_artists.get(&range).map(Vec::as_slice).unwrap_or_default())
    }

    /// Genre list of each top artist, in artist rank order.
    pub async fn top_genres(&mut self, range: TimeRange) -> AppResult<Vec<Vec<String>>> {
        let artists = self.top_artists(range).await?;
        Ok(artists.iter().map(|a| a.genres.clone()).collect())
    }

    /// Top tracks of every time range, longest range first, without repeats.
    pub async fn music_taste(&mut self) -> AppResult<&[Track]> {
        let taste = match self.music_taste.take() {
            Some(taste) => taste,
            None => {
                let mut seen = HashSet::new();
                let mut taste = Vec::new();
                for range in TimeRange::ALL {
                    for track in self.top_tracks(range).await? {
                        if seen.insert(track.id.clone()) {
                            taste.push(track.clone());
                        }
                    }
                }
                taste
            }
        };
        Ok(self.music_taste.insert(taste).as_slice())
    }

    /// Audio features of the music taste. Tracks Spotify has no analysis for are left out.
    pub async fn audio_features(&mut self) -> AppResult<&[AudioFeatures]> {
        let features = match self.audio_features.take() {
            Some(features) => features,
            None => {
                let ids: Vec<String> = self
                    .music_taste()
                    .await?
                    .iter()
                    .filter(|t| !t.id.is_empty())
                    .map(|t| t.id.clone())
                    .collect();

                let mut features = Vec::with_capacity(ids.len());
                for chunk in ids.chunks(AUDIO_FEATURES_CHUNK) {
                    let joined = chunk.join(",");
                    let page: AudioFeaturesPage =
                        get_json(self.api, "/v1/audio-features", &[("ids", joined.as_str())]).await?;
                    features.extend(page.audio_features.into_iter().flatten());
                }
                features
            }
        };
        Ok(self.audio_features.insert(features).as_slice())
    }

    pub async fn playlists(&mut self) -> AppResult<&[Playlist]> {
        let playlists = match self.playlists.take() {
            Some(playlists) => playlists,
            None => {
                let first: Paging<Playlist> =
                    get_json(self.api, "/v1/me/playlists", &[("limit", "50")]).await?;
                collect_pages(self.api, first).await?
            }
        };
        Ok(self.playlists.insert(playlists).as_slice())
    }

    /// Follower count of each of the user's playlists, by playlist id.
    pub async fn playlist_followers(&mut self) -> AppResult<&HashMap<String, u64>> {
        let followers = match self.playlist_followers.take() {
            Some(followers) => followers,
            None => {
                let ids: Vec<String> = self.playlists().await?.iter().map(|p| p.id.clone()).collect();
                let mut followers = HashMap::with_capacity(ids.len());
                for id in ids {
                    let detail: PlaylistFollowers = get_json(
                        self.api,
                        &format!("/v1/playlists/{}", id),
                        &[("fields", "followers")],
                    )
                    .await?;
                    followers.insert(id, detail.followers.total);
                }
                followers
            }
        };
        Ok(&*self.playlist_followers.insert(followers))
    }

    /// Tracks of one of the user's playlists, or `None` if the user has no
    /// playlist with that id.
    pub async fn playlist_tracks(&mut self, playlist_id: &str) -> AppResult<Option<&[Track]>> {
        if !self.playlist_tracks.contains_key(playlist_id) {
            if !self.playlists().await?.iter().any(|p| p.id == playlist_id) {
                return Ok(None);
            }

            let first: Paging<PlaylistItem> = get_json(
                self.api,
                &format!("/v1/playlists/{}/tracks", playlist_id),
                &[("limit", "100")],
            )
            .await?;
            let tracks = collect_pages(self.api, first)
                .await?
                .into_iter()
                .filter_map(|item| item.track)
                .filter(|track| !track.id.is_empty())
                .collect();
            self.playlist_tracks.insert(playlist_id.to_string(), tracks);
        }
        Ok(self.playlist_tracks.get(playlist_id).map(Vec::as_slice))
    }

    pub async fn saved_tracks(&mut self) -> AppResult<&[Track]> {
        let tracks = match self.saved_tracks.take() {
            Some(tracks) => tracks,
            None => {
                let first: Paging<SavedTrack> =
                    get_json(self.api, "/v1/me/tracks", &[("limit", "50")]).await?;
                collect_pages(self.api, first)
                    .await?
                    .into_iter()
                    .map(|saved| saved.track)
                    .collect()
            }
        };
        Ok(self.saved_tracks.insert(tracks).as_slice())
    }

    pub async fn saved_albums(&mut self) -> AppResult<&[Album]> {
        let albums = match self.saved_albums.take() {
            Some(albums) => albums,
            None => {
                let first: Paging<SavedAlbum> =
                    get_json(self.api, "/v1/me/albums", &[("limit", "50")]).await?;
                collect_pages(self.api, first)
                    .await?
                    .into_iter()
                    .map(|saved| saved.album)
                    .collect()
            }
        };
        Ok(self.saved_albums.insert(albums).as_slice())
    }

    /// Followed artists. This endpoint nests its page (and `next`) under `artists`.
    pub async fn followed_artists(&mut self) -> AppResult<&[Artist]> {
        let artists = match self.followed_artists.take() {
            Some(artists) => artists,
            None => {
                let first: FollowedArtistsPage = get_json(
                    self.api,
                    "/v1/me/following",
                    &[("type", "artist"), ("limit", "50")],
                )
                .await?;

                let mut artists = first.artists.items;
                let mut next = first.artists.next;
                while let Some(url) = next {
                    let page: FollowedArtistsPage = from_payload(self.api.get_url(&url).await?)?;
                    artists.extend(page.artists.items);
                    next = page.artists.next;
                }
                artists
            }
        };
        Ok(self.followed_artists.insert(artists).as_slice())
    }

    pub async fn recently_played(&mut self) -> AppResult<&[Track]> {
        let tracks = match self.recently_played.take() {
            Some(tracks) => tracks,
            None => {
                let page: Paging<PlayHistory> =
                    get_json(self.api, "/v1/me/player/recently-played", &[("limit", "50")]).await?;
                page.items.into_iter().map(|played| played.track).collect()
            }
        };
        Ok(self.recently_played.insert(tracks).as_slice())
    }
}
