//! Error types for the Musixmatch desktop API client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating credentials or talking to the API.
#[derive(Debug, Error)]
pub enum MusixmatchError {
    /// No cache file in any search path contained a complete set of
    /// credentials. Run the Musixmatch app and let it display some lyrics,
    /// then try again.
    #[error("unable to load credentials from {searched:?}")]
    CredentialsNotFound {
        /// Directories that were scanned.
        searched: Vec<PathBuf>,
    },

    /// A cache file could not be opened. The scan skips such files; this
    /// variant is what gets logged for them.
    #[error("unable to open {}: {source}", path.display())]
    FileAccessDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with an HTTP status other than 200.
    #[error("HTTP GET returned with status {status}, url: {url}")]
    Transport {
        status: u16,
        url: String,
        /// Response body, kept for diagnosis.
        body: String,
    },

    /// The envelope status is not 200 and the hint asks for a captcha.
    ///
    /// There is no automated way out: complete the captcha in a browser and
    /// let the app write fresh cache files by playing a few songs.
    #[error(
        "complete the captcha at https://apic.musixmatch.com/captcha.html and then let \
         Musixmatch store some fresh cache files by playing a few songs (url: {url})"
    )]
    CaptchaRequired { url: String },

    /// The JSON envelope carries a non-200 `status_code`.
    ///
    /// Common codes:
    /// - `401` — signature rejected or expired
    /// - `404` — resource not found (e.g. no richsync for this track)
    #[error("JSON returned with status {code}, url: {url}")]
    Api {
        /// Envelope status code (not HTTP status).
        code: i64,
        /// Envelope `hint`, empty when absent.
        hint: String,
        url: String,
    },

    /// The track matcher found nothing for the given query.
    #[error("no results, url: {url}")]
    NoResults { url: String },

    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// File I/O error while listing or reading cache files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON document (response body or richsync body).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors (e.g. unexpected payload shape).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for `Result<T, MusixmatchError>`.
pub type Result<T> = std::result::Result<T, MusixmatchError>;
