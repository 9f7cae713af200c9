pub mod accounts;
pub mod client;
pub mod models;

pub use accounts::{SpotifyAccounts, SpotifyAccountsClient, TokenGrant};
pub use client::{
    collect_pages, get_json, HttpSpotifyConnector, SpotifyApi, SpotifyClient, SpotifyConnector,
};

/// Permissions requested at login.
pub const SCOPES: &str = "user-read-private user-top-read user-library-read \
playlist-read-collaborative playlist-read-private user-follow-read user-read-recently-played";
