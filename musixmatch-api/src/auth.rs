//! Credentials extracted from the Musixmatch desktop app's cache.
//!
//! The desktop app signs every API request with six query parameters tied to
//! the logged-in user. They are never generated here: the app's own cached
//! request URLs are scanned (see [`cache`](crate::cache)) and the parameters
//! are copied out of the most recent one.
//!
//! ```no_run
//! use musixmatch_api::auth::{default_cache_dirs, locate_credentials};
//!
//! let credentials = locate_credentials(&default_cache_dirs()).unwrap();
//! println!("{}", credentials.user_language);
//! ```
//!
//! Default search locations (relative to the home directory):
//!
//! | Platform      | Directory                                          |
//! |---------------|----------------------------------------------------|
//! | macOS         | `Library/Application Support/Musixmatch/Cache`     |
//! | Linux         | `.config/Musixmatch/Cache`                         |
//! | Linux (snap)  | `snap/musixmatch/current/.config/Musixmatch/Cache` |
//! | Windows       | `AppData/Roaming/Musixmatch/Cache`                 |

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::cache;
use crate::error::{MusixmatchError, Result};

const CACHE_DIRS: [&str; 4] = [
    "Library/Application Support/Musixmatch/Cache",
    ".config/Musixmatch/Cache",
    "snap/musixmatch/current/.config/Musixmatch/Cache",
    "AppData/Roaming/Musixmatch/Cache",
];

/// The six signing parameters of an authenticated desktop-app request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub userblob_id: String,
    pub user_language: String,
    pub app_id: String,
    pub usertoken: String,
    pub guid: String,
    /// Pre-computed request signature. Sent verbatim, never re-encoded.
    pub signature: String,
}

impl Credentials {
    /// Read the six parameters from a cached request URL.
    ///
    /// Values are percent-decoded. A parameter that is missing or empty makes
    /// the whole URL unusable and yields `None`.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, v)| k == name && !v.is_empty())
                .map(|(_, v)| v.into_owned())
        };
        Some(Self {
            userblob_id: param("userblob_id")?,
            user_language: param("user_language")?,
            app_id: param("app_id")?,
            usertoken: param("usertoken")?,
            guid: param("guid")?,
            signature: param("signature")?,
        })
    }
}

/// The platform-conventional cache directories, resolved against the home
/// directory. Empty if the home directory cannot be determined.
pub fn default_cache_dirs() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    CACHE_DIRS.iter().map(|d| home.join(d)).collect()
}

/// Find credentials in the most recently modified cache file that holds a
/// complete set.
///
/// Directories that cannot be listed and files that cannot be opened are
/// logged and skipped, as are files whose cached URLs lack any of the six
/// parameters.
///
/// # Errors
///
/// - [`MusixmatchError::CredentialsNotFound`] — no file yielded credentials
/// - [`MusixmatchError::Io`] — a cache file failed to read for a reason
///   other than permissions
pub fn locate_credentials(search_paths: &[PathBuf]) -> Result<Credentials> {
    let dirs: Vec<PathBuf> = search_paths.iter().map(|p| cache::expand_home(p)).collect();
    debug!("looking for cache files in {dirs:?}");

    for file in cache::cache_files(&dirs) {
        debug!("looking for credentials in {}", file.display());
        let data = match read_cache_file(file.clone()) {
            Ok(data) => data,
            Err(MusixmatchError::FileAccessDenied { path, source }) => {
                warn!("unable to open {}: {source}", path.display());
                if cfg!(windows) {
                    warn!("make sure Musixmatch is not running");
                }
                continue;
            }
            Err(e) => return Err(e),
        };

        let found = cache::find_urls(&data)
            .find_map(|raw| Credentials::from_url(&String::from_utf8_lossy(raw)));
        if let Some(credentials) = found {
            info!("found credentials in {}", file.display());
            return Ok(credentials);
        }
    }

    Err(MusixmatchError::CredentialsNotFound { searched: dirs })
}

fn read_cache_file(path: PathBuf) -> Result<Vec<u8>> {
    match fs::read(&path) {
        Ok(data) => Ok(data),
        Err(source) if source.kind() == io::ErrorKind::PermissionDenied => {
            Err(MusixmatchError::FileAccessDenied { path, source })
        }
        // Deleted by the app between listing and reading.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}
