//! Request and result types.
//!
//! [`TrackResult`] is a simplified projection of the `macro.subtitles.get`
//! response; the untouched JSON is returned next to it for anything the
//! projection leaves out.

use serde::{Deserialize, Serialize};

/// Track-identifying inputs for a lyrics search.
///
/// Every field is optional. Absent (or empty) fields are left out of the
/// request entirely.
///
/// ```
/// use musixmatch_api::types::{LengthFilter, SearchQuery};
///
/// let query = SearchQuery::new()
///     .title("Another Brick in the Wall Part 1")
///     .artist("Pink Floyd")
///     .length(LengthFilter::new(201.55, 5));
/// assert!(query.album.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Spotify track id or URI, e.g. `spotify:track:4dfKz7RAHpo6ZCoCL8Rlrb`.
    pub spotify_id: Option<String>,
    pub length: Option<LengthFilter>,
    /// Also fetch word-level timed lyrics when the track has them.
    pub richsync: bool,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    #[must_use]
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn spotify_id(mut self, id: impl Into<String>) -> Self {
        self.spotify_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn length(mut self, length: LengthFilter) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn richsync(mut self, richsync: bool) -> Self {
        self.richsync = richsync;
        self
    }
}

/// Song length with an allowed deviation window, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthFilter {
    pub seconds: f64,
    pub max_deviation: u32,
}

impl LengthFilter {
    pub fn new(seconds: f64, max_deviation: u32) -> Self {
        Self {
            seconds,
            max_deviation,
        }
    }
}

/// Availability flags reported by the track matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStatus {
    pub lyrics: bool,
    pub crowd_lyrics: bool,
    pub richsync: bool,
    pub subtitles: bool,
    pub instrumental: bool,
}

/// Simplified lyrics search result.
///
/// Missing backend fields become `0`, `""` or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackResult {
    /// Musixmatch track id (used by richsync lookups).
    pub track_id: u64,
    pub spotify_id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    /// Track length in seconds.
    pub length: u64,
    /// Largest available album cover URL.
    pub cover: String,
    /// `YYYY-MM-DD`.
    pub first_release: String,
    pub status: TrackStatus,
    pub lyrics: String,
    pub language: String,
    pub copyright: String,
    /// Bodies of user-submitted lyric transcriptions.
    pub crowd_lyrics: Vec<String>,
    /// Line-synchronized lyrics, one LRC document per subtitle track.
    pub subtitles: Vec<String>,
    /// Word-level timing; empty unless requested and available.
    pub richsync: Vec<RichsyncLine>,
}

/// One richsync line: the whole line plus its timed fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichsyncLine {
    /// Line start, seconds from the beginning of the track.
    pub start: f64,
    /// Line end, seconds from the beginning of the track.
    pub end: f64,
    pub text: String,
    /// Fragments in the order the backend sent them. Offsets are relative
    /// to `start` and may repeat.
    pub fragments: Vec<Fragment>,
}

impl RichsyncLine {
    /// Text of the first fragment at exactly `offset`.
    #[allow(clippy::float_cmp)]
    pub fn text_at(&self, offset: f64) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.offset == offset)
            .map(|f| f.text.as_str())
    }
}

/// A word or syllable and its offset within the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub offset: f64,
    pub text: String,
}
