//! HTTP client for the Musixmatch desktop API.
//!
//! Every request is a plain `GET` to `{base_url}/{endpoint}?format=json&...`
//! carrying the signed query built in [`query`](crate::query). The backend
//! also fingerprints the caller by user-agent, so the desktop app's own
//! Electron user-agent is always sent.
//!
//! # Response format
//!
//! All API responses share this envelope:
//!
//! ```json
//! {
//!   "message": {
//!     "header": { "status_code": 200, "hint": "..." },
//!     "body": { ...endpoint-specific fields... }
//!   }
//! }
//! ```
//!
//! A non-200 HTTP status maps to [`MusixmatchError::Transport`]; a non-200
//! envelope `status_code` maps to [`MusixmatchError::CaptchaRequired`] when
//! the hint is `captcha` and to [`MusixmatchError::Api`] otherwise.

use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder as HttpBuilder};
use serde_json::Value;

use crate::auth::Credentials;
use crate::error::{MusixmatchError, Result};
use crate::query::Query;

/// Production endpoint root.
pub const BASE_URL: &str = "https://apic-desktop.musixmatch.com/ws/1.1";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Musixmatch/3.10.4043-master.20200211001 Chrome/83.0.4103.122 \
    Electron/9.4.4 Safari/537.36";

/// Blocking HTTP client for the Musixmatch desktop API.
///
/// Holds a [`reqwest::blocking::Client`] and the caller's [`Credentials`].
/// API methods live in separate modules (`lyrics`, `richsync`) as
/// `impl MusixmatchClient` blocks.
pub struct MusixmatchClient {
    http: Client,
    credentials: Credentials,
    base_url: String,
}

/// Configures a [`MusixmatchClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Point the client at another endpoint root (no trailing slash).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Total per-request timeout. Defaults to 30 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<MusixmatchClient> {
        self.build_with(Client::builder())
    }

    pub(crate) fn build_with(self, http: HttpBuilder) -> Result<MusixmatchClient> {
        let http = http
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;
        Ok(MusixmatchClient {
            http,
            credentials: self.credentials,
            base_url: self.base_url,
        })
    }
}

impl MusixmatchClient {
    /// Create a client for the production API.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            credentials,
            base_url: BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Return the credentials requests are signed with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn url(&self, endpoint: &str, query: &Query) -> String {
        format!("{}/{endpoint}{}", self.base_url, query.to_query_string())
    }

    /// Send a `GET` to `url` and return the parsed envelope.
    ///
    /// Returns the full JSON response when both the HTTP status and the
    /// envelope `status_code` are 200.
    pub(crate) fn get(&self, url: &str) -> Result<Value> {
        debug!("URL: {url}");
        let resp = self.http.get(url).send()?;
        let status = resp.status();

        if status != StatusCode::OK {
            return Err(MusixmatchError::Transport {
                status: status.as_u16(),
                url: url.to_owned(),
                body: resp.text()?,
            });
        }

        let json: Value = resp.json()?;
        check_envelope(&json, url)?;
        debug!("full result: {json:#}");
        Ok(json)
    }
}

/// Map a non-200 envelope `status_code` to an error.
pub(crate) fn check_envelope(json: &Value, url: &str) -> Result<()> {
    let header = &json["message"]["header"];
    let code = header["status_code"]
        .as_i64()
        .ok_or_else(|| MusixmatchError::Other(format!("missing envelope status, url: {url}")))?;
    if code == 200 {
        return Ok(());
    }

    let hint = header["hint"].as_str().unwrap_or("").to_owned();
    debug!("error response: {json:#}");
    if hint == "captcha" {
        return Err(MusixmatchError::CaptchaRequired {
            url: url.to_owned(),
        });
    }
    Err(MusixmatchError::Api {
        code,
        hint,
        url: url.to_owned(),
    })
}
