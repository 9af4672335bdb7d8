//! Word-level timed lyrics.
//!
//! # Endpoint
//!
//! `GET /ws/1.1/track.richsync.get`
//!
//! Query: `format=json, track_id, tags=nowplaying, userblob_id,
//! user_language, app_id, usertoken, guid, signature, signature_protocol=sha1`
//!
//! Response:
//! ```json
//! {
//!   "message": {
//!     "header": { "status_code": 200 },
//!     "body": { "richsync": { "richsync_body": "[{\"ts\":1.2,\"te\":3.4,\"l\":[...],\"x\":\"...\"}]" } }
//!   }
//! }
//! ```
//!
//! `richsync_body` is itself JSON, encoded as a string. Each line:
//!
//! ```json
//! { "ts": 1.2, "te": 3.4, "x": "Hello world",
//!   "l": [ { "c": "Hello", "o": 0 }, { "c": " ", "o": 0.05 }, { "c": "world", "o": 0.083 } ] }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::client::MusixmatchClient;
use crate::error::{MusixmatchError, Result};
use crate::query::Query;
use crate::types::{Fragment, RichsyncLine};

#[derive(Deserialize)]
struct RawLine {
    #[serde(default)]
    ts: f64,
    #[serde(default)]
    te: f64,
    #[serde(default)]
    x: String,
    l: Vec<RawFragment>,
}

#[derive(Deserialize)]
struct RawFragment {
    c: String,
    o: f64,
}

impl From<RawLine> for RichsyncLine {
    fn from(line: RawLine) -> Self {
        Self {
            start: line.ts,
            end: line.te,
            text: line.x,
            fragments: line
                .l
                .into_iter()
                .map(|f| Fragment {
                    offset: f.o,
                    text: f.c,
                })
                .collect(),
        }
    }
}

impl MusixmatchClient {
    /// Get word-level timed lyrics for a Musixmatch track id.
    ///
    /// Called by [`fetch_lyrics`](Self::fetch_lyrics) when richsync is
    /// requested and available, but usable on its own with a known id.
    ///
    /// # Errors
    ///
    /// - [`MusixmatchError::Transport`] — HTTP status other than 200
    /// - [`MusixmatchError::Api`] — envelope error (`404` when the track has
    ///   no richsync)
    pub fn fetch_richsync(&self, track_id: u64) -> Result<Vec<RichsyncLine>> {
        let credentials = self.credentials();
        let mut q = Query::new();
        q.push("track_id", track_id)
            .push("tags", "nowplaying")
            .push_user(credentials)
            .push_signature(credentials);

        let url = self.url("track.richsync.get", &q);
        let full = self.get(&url)?;
        parse_richsync(&full, &url)
    }
}

fn parse_richsync(full: &Value, url: &str) -> Result<Vec<RichsyncLine>> {
    let body = full["message"]["body"]["richsync"]["richsync_body"]
        .as_str()
        .ok_or_else(|| MusixmatchError::Other(format!("missing richsync_body, url: {url}")))?;
    let lines: Vec<RawLine> = serde_json::from_str(body)?;
    Ok(lines.into_iter().map(RichsyncLine::from).collect())
}
