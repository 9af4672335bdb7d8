//! Musixmatch desktop API client library.
//!
//! Finds the logged-in user's credentials in the Musixmatch desktop app's
//! cache files and uses them to query the desktop API for synchronized
//! lyrics.
//!
//! # Usage
//!
//! Install the Musixmatch app, connect it to a player and let it find at
//! least one set of lyrics; its cache then holds a signed request URL.
//!
//! ```no_run
//! use musixmatch_api::auth::{default_cache_dirs, locate_credentials};
//! use musixmatch_api::types::SearchQuery;
//! use musixmatch_api::MusixmatchClient;
//!
//! let credentials = locate_credentials(&default_cache_dirs()).unwrap();
//! let client = MusixmatchClient::new(credentials).unwrap();
//!
//! let query = SearchQuery::new().artist("Finntroll").title("Trollhammaren").richsync(true);
//! let (track, _full) = client.fetch_lyrics(&query).unwrap();
//! println!("{}", track.lyrics);
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                              | Endpoint               | Description                     |
//! |-------------------------------------|------------------------|---------------------------------|
//! | [`MusixmatchClient::fetch_lyrics`]  | `macro.subtitles.get`  | Match + lyrics + subtitles      |
//! | [`MusixmatchClient::fetch_richsync`]| `track.richsync.get`   | Word-level timed lyrics         |
//!
//! # Signing
//!
//! Requests carry the six credential parameters as an ordered query string
//! with the pre-computed signature passed through untouched. See
//! [`query`](crate::query) (internal).

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
mod lyrics;
mod query;
mod richsync;
pub mod types;

pub use auth::{Credentials, locate_credentials};
pub use client::MusixmatchClient;
pub use error::{MusixmatchError, Result};
