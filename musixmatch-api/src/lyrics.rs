//! Combined track match + lyrics + subtitles lookup.
//!
//! # Endpoint
//!
//! `GET /ws/1.1/macro.subtitles.get`
//!
//! Query (in this exact order, `?` = only when supplied):
//!
//! ```text
//! format=json, f_subtitle_length?, namespace=lyrics_synched,
//! part=lyrics_crowd,user,lyrics_verified_by, q_album?, q_artist?, q_artists?,
//! q_duration?, q_track?, tags=nowplaying, userblob_id, user_language,
//! track_spotify_id?, f_subtitle_length_max_deviation?, subtitle_format=lrc,
//! app_id, usertoken, guid, signature, signature_protocol=sha1
//! ```
//!
//! Response:
//! ```json
//! {
//!   "message": {
//!     "header": { "status_code": 200 },
//!     "body": { "macro_calls": {
//!       "matcher.track.get": { "message": { "body": { "track": {
//!         "track_id": 40720152, "track_name": "...", "has_richsync": 1, ...
//!       } } } },
//!       "track.lyrics.get": { "message": { "body": {
//!         "lyrics": { "lyrics_body": "...", "lyrics_language": "en", "lyrics_copyright": "..." },
//!         "crowd_lyrics_list": [ { "lyrics": { "lyrics_body": "..." } } ]
//!       } } },
//!       "track.subtitles.get": { "message": { "body": {
//!         "subtitle_list": [ { "subtitle": { "subtitle_body": "[00:12.34] ..." } } ]
//!       } } }
//!     } }
//!   }
//! }
//! ```
//!
//! When nothing matches, the matcher's `body` is a string instead of an
//! object.

use log::info;
use serde_json::Value;

use crate::auth::Credentials;
use crate::client::MusixmatchClient;
use crate::error::{MusixmatchError, Result};
use crate::query::Query;
use crate::types::{SearchQuery, TrackResult, TrackStatus};

impl MusixmatchClient {
    /// Search for a track and fetch its lyrics and subtitles.
    ///
    /// Returns the simplified [`TrackResult`] and the full JSON response.
    /// When `query.richsync` is set and the track has richsync lyrics, they
    /// are fetched with a second request.
    ///
    /// # Errors
    ///
    /// - [`MusixmatchError::Transport`] — HTTP status other than 200
    /// - [`MusixmatchError::CaptchaRequired`] — the backend wants a captcha
    /// - [`MusixmatchError::Api`] — other envelope error
    /// - [`MusixmatchError::NoResults`] — nothing matched the query
    pub fn fetch_lyrics(&self, query: &SearchQuery) -> Result<(TrackResult, Value)> {
        let url = self.url("macro.subtitles.get", &lyrics_query(self.credentials(), query));
        let full = self.get(&url)?;
        let mut track = parse_macro_response(&full, &url)?;

        if query.richsync && track.status.richsync {
            track.richsync = self.fetch_richsync(track.track_id)?;
        }

        info!("found \"{}\" by {} (track_id={})", track.name, track.artist, track.track_id);
        Ok((track, full))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lyrics_query(credentials: &Credentials, query: &SearchQuery) -> Query {
    let artist = query.artist.as_deref();
    let mut q = Query::new();

    if let Some(length) = query.length {
        q.push("f_subtitle_length", length.seconds.floor() as u64);
    }
    q.push("namespace", "lyrics_synched")
        .push("part", "lyrics_crowd,user,lyrics_verified_by")
        .push_opt("q_album", query.album.as_deref())
        .push_opt("q_artist", artist)
        .push_opt("q_artists", artist);
    if let Some(length) = query.length {
        q.push("q_duration", duration(length.seconds));
    }
    q.push_opt("q_track", query.title.as_deref())
        .push("tags", "nowplaying")
        .push_user(credentials)
        .push_opt("track_spotify_id", query.spotify_id.as_deref());
    if let Some(length) = query.length {
        q.push("f_subtitle_length_max_deviation", length.max_deviation);
    }
    q.push("subtitle_format", "lrc").push_signature(credentials);
    q
}

/// Seconds as the desktop app writes them: whole values keep a `.0`.
#[allow(clippy::float_cmp)]
fn duration(seconds: f64) -> String {
    if seconds.is_finite() && seconds.fract() == 0.0 {
        format!("{seconds:.1}")
    } else {
        seconds.to_string()
    }
}

fn parse_macro_response(full: &Value, url: &str) -> Result<TrackResult> {
    let calls = &full["message"]["body"]["macro_calls"];
    let matcher = &calls["matcher.track.get"]["message"]["body"];
    if matcher.is_string() {
        return Err(MusixmatchError::NoResults {
            url: url.to_owned(),
        });
    }
    let track = &matcher["track"];
    if !track.is_object() {
        return Err(MusixmatchError::Other(format!(
            "unexpected matcher response, url: {url}"
        )));
    }

    let lyrics_data = &calls["track.lyrics.get"]["message"]["body"];
    let lyrics = &lyrics_data["lyrics"];
    let subtitles_data = &calls["track.subtitles.get"]["message"]["body"];

    Ok(TrackResult {
        track_id: track["track_id"].as_u64().unwrap_or(0),
        spotify_id: str_field(&track["track_spotify_id"]),
        name: str_field(&track["track_name"]),
        artist: str_field(&track["artist_name"]),
        album: str_field(&track["album_name"]),
        length: track["track_length"].as_u64().unwrap_or(0),
        cover: cover_url(track),
        first_release: track["first_release_date"]
            .as_str()
            .unwrap_or("")
            .chars()
            .take(10)
            .collect(),
        status: TrackStatus {
            lyrics: flag(&track["has_lyrics"]),
            crowd_lyrics: flag(&track["has_lyrics_crowd"]),
            richsync: flag(&track["has_richsync"]),
            subtitles: flag(&track["has_subtitles"]),
            instrumental: flag(&track["instrumental"]),
        },
        lyrics: str_field(&lyrics["lyrics_body"]),
        language: str_field(&lyrics["lyrics_language"]),
        copyright: lyrics["lyrics_copyright"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_owned(),
        crowd_lyrics: bodies(&lyrics_data["crowd_lyrics_list"], "lyrics", "lyrics_body"),
        subtitles: bodies(&subtitles_data["subtitle_list"], "subtitle", "subtitle_body"),
        richsync: Vec::new(),
    })
}

fn str_field(v: &Value) -> String {
    v.as_str().unwrap_or("").to_owned()
}

/// Backend booleans are `0`/`1` integers; accept real booleans too.
fn flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// The last non-empty `album_coverart*` field. The backend lists cover
/// sizes smallest first.
fn cover_url(track: &Value) -> String {
    let Some(fields) = track.as_object() else {
        return String::new();
    };
    fields
        .iter()
        .rev()
        .filter(|(k, _)| k.contains("album_coverart"))
        .filter_map(|(_, v)| v.as_str())
        .find(|v| !v.is_empty())
        .unwrap_or("")
        .to_owned()
}

/// Collect `item[outer][inner]` strings from a list; anything that is not a
/// list gives an empty result.
fn bodies(list: &Value, outer: &str, inner: &str) -> Vec<String> {
    let Some(items) = list.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item[outer][inner].as_str())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{credentials, local_client, serve};
    use crate::types::LengthFilter;
    use serde_json::json;

    fn macro_response() -> Value {
        json!({
            "message": {
                "header": { "status_code": 200 },
                "body": { "macro_calls": {
                    "matcher.track.get": { "message": {
                        "header": { "status_code": 200 },
                        "body": { "track": {
                            "track_id": 40_720_152,
                            "track_spotify_id": "5nDdMBmBO3Cnqq8EGP0ybx",
                            "track_name": "Trollhammaren",
                            "track_length": 208,
                            "artist_name": "Finntroll",
                            "album_name": "Nattfödd",
                            "album_coverart_100x100": "http://img/100.jpg",
                            "album_coverart_350x350": "http://img/350.jpg",
                            "album_coverart_500x500": "http://img/500.jpg",
                            "album_coverart_800x800": "",
                            "first_release_date": "2004-01-01T00:00:00Z",
                            "has_lyrics": 1,
                            "has_lyrics_crowd": 0,
                            "has_richsync": 1,
                            "has_subtitles": 1,
                            "instrumental": 0
                        } }
                    } },
                    "track.lyrics.get": { "message": {
                        "header": { "status_code": 200 },
                        "body": {
                            "lyrics": {
                                "lyrics_body": "Ylitse vuorten...",
                                "lyrics_language": "fi",
                                "lyrics_copyright": "  Lyrics powered by www.musixmatch.com\n"
                            },
                            "crowd_lyrics_list": [
                                { "lyrics": { "lyrics_body": "crowd one" } },
                                { "lyrics": {} }
                            ]
                        }
                    } },
                    "track.subtitles.get": { "message": {
                        "header": { "status_code": 200 },
                        "body": { "subtitle_list": [
                            { "subtitle": { "subtitle_body": "[00:01.00] Ylitse" } }
                        ] }
                    } }
                } }
            }
        })
    }

    #[test]
    fn title_and_artist_query_order() {
        let q = SearchQuery::new().title("Nemo").artist("Nightwish");
        assert_eq!(
            lyrics_query(&credentials(), &q).to_query_string(),
            "?format=json&namespace=lyrics_synched&part=lyrics_crowd%2Cuser%2Clyrics_verified_by\
             &q_artist=Nightwish&q_artists=Nightwish&q_track=Nemo&tags=nowplaying\
             &userblob_id=blob&user_language=en&subtitle_format=lrc\
             &app_id=web-desktop-app-v1.0&usertoken=token&guid=guid&signature=sig%3D\
             &signature_protocol=sha1"
        );
    }

    #[test]
    fn full_query_order() {
        let q = SearchQuery::new()
            .title("Another Brick in the Wall Part 1")
            .artist("Pink Floyd")
            .album("The Wall")
            .spotify_id("spotify:track:4dfKz7RAHpo6ZCoCL8Rlrb")
            .length(LengthFilter::new(201.55, 5));
        let s = lyrics_query(&credentials(), &q).to_query_string();
        let keys: Vec<&str> = s
            .trim_start_matches('?')
            .split('&')
            .map(|kv| kv.split('=').next().unwrap())
            .collect();
        assert_eq!(
            keys,
            [
                "format",
                "f_subtitle_length",
                "namespace",
                "part",
                "q_album",
                "q_artist",
                "q_artists",
                "q_duration",
                "q_track",
                "tags",
                "userblob_id",
                "user_language",
                "track_spotify_id",
                "f_subtitle_length_max_deviation",
                "subtitle_format",
                "app_id",
                "usertoken",
                "guid",
                "signature",
                "signature_protocol",
            ]
        );
        assert!(s.contains("&f_subtitle_length=201&"));
        assert!(s.contains("&q_duration=201.55&"));
        assert!(s.contains("&f_subtitle_length_max_deviation=5&"));
        assert!(s.contains("&q_track=Another%20Brick%20in%20the%20Wall%20Part%201&"));
        assert!(s.contains("&track_spotify_id=spotify%3Atrack%3A4dfKz7RAHpo6ZCoCL8Rlrb&"));
    }

    #[test]
    fn whole_second_duration_keeps_decimal_point() {
        let q = SearchQuery::new().length(LengthFilter::new(200.0, 3));
        let s = lyrics_query(&credentials(), &q).to_query_string();
        assert!(s.starts_with("?format=json&f_subtitle_length=200&"));
        assert!(s.contains("&q_duration=200.0&"));
        assert_eq!(duration(169.88), "169.88");
    }

    #[test]
    fn projects_macro_response() {
        let track = parse_macro_response(&macro_response(), "u").unwrap();
        assert_eq!(track.track_id, 40_720_152);
        assert_eq!(track.spotify_id, "5nDdMBmBO3Cnqq8EGP0ybx");
        assert_eq!(track.name, "Trollhammaren");
        assert_eq!(track.artist, "Finntroll");
        assert_eq!(track.album, "Nattfödd");
        assert_eq!(track.length, 208);
        assert_eq!(track.cover, "http://img/500.jpg");
        assert_eq!(track.first_release, "2004-01-01");
        assert_eq!(
            track.status,
            TrackStatus {
                lyrics: true,
                crowd_lyrics: false,
                richsync: true,
                subtitles: true,
                instrumental: false,
            }
        );
        assert_eq!(track.lyrics, "Ylitse vuorten...");
        assert_eq!(track.language, "fi");
        assert_eq!(track.copyright, "Lyrics powered by www.musixmatch.com");
        assert_eq!(track.crowd_lyrics, vec!["crowd one"]);
        assert_eq!(track.subtitles, vec!["[00:01.00] Ylitse"]);
        assert!(track.richsync.is_empty());
    }

    #[test]
    fn missing_optional_sections_default_to_empty() {
        let mut full = macro_response();
        let calls = &mut full["message"]["body"]["macro_calls"];
        calls["track.lyrics.get"]["message"]["body"] = json!("");
        calls["track.subtitles.get"]["message"]["body"] = json!({ "subtitle_list": "oops" });

        let track = parse_macro_response(&full, "u").unwrap();
        assert_eq!(track.lyrics, "");
        assert_eq!(track.language, "");
        assert_eq!(track.copyright, "");
        assert!(track.crowd_lyrics.is_empty());
        assert!(track.subtitles.is_empty());
    }

    #[test]
    fn string_matcher_body_means_no_results() {
        for body in [json!("No results"), json!("")] {
            let mut full = macro_response();
            full["message"]["body"]["macro_calls"]["matcher.track.get"]["message"]["body"] = body;
            assert!(matches!(
                parse_macro_response(&full, "u"),
                Err(MusixmatchError::NoResults { .. })
            ));
        }
    }

    #[test]
    fn fetch_is_repeatable() {
        let body = macro_response().to_string();
        let (base, server) = serve(vec![("200 OK", body.clone()), ("200 OK", body)]);
        let client = local_client(&base);
        let q = SearchQuery::new().title("Trollhammaren").artist("Finntroll");

        let (first, raw) = client.fetch_lyrics(&q).unwrap();
        let (second, _) = client.fetch_lyrics(&q).unwrap();
        assert_eq!(first, second);
        assert_eq!(raw, macro_response());

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET /ws/1.1/macro.subtitles.get?format=json&"));
    }

    #[test]
    fn fetches_richsync_when_requested_and_available() {
        let richsync = json!({
            "message": {
                "header": { "status_code": 200 },
                "body": { "richsync": {
                    "richsync_body": r#"[{"ts":1.0,"te":2.0,"l":[{"c":"Hi","o":0}],"x":"Hi"}]"#
                } }
            }
        });
        let (base, server) = serve(vec![
            ("200 OK", macro_response().to_string()),
            ("200 OK", richsync.to_string()),
        ]);
        let client = local_client(&base);

        let (track, _) = client
            .fetch_lyrics(&SearchQuery::new().title("Trollhammaren").richsync(true))
            .unwrap();
        assert_eq!(track.richsync.len(), 1);
        assert_eq!(track.richsync[0].text_at(0.0), Some("Hi"));

        let requests = server.join().unwrap();
        assert!(
            requests[1]
                .starts_with("GET /ws/1.1/track.richsync.get?format=json&track_id=40720152&")
        );
    }

    #[test]
    fn captcha_envelope_is_reported() {
        let body = json!({
            "message": { "header": { "status_code": 401, "hint": "captcha" }, "body": "" }
        });
        let (base, server) = serve(vec![("200 OK", body.to_string())]);
        let client = local_client(&base);

        let err = client.fetch_lyrics(&SearchQuery::new().title("x")).unwrap_err();
        assert!(matches!(err, MusixmatchError::CaptchaRequired { .. }));
        server.join().unwrap();
    }
}
