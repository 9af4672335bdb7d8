//! Low-level scanning of the desktop app's cache directories.
//!
//! The Musixmatch desktop app is an Electron application. Its HTTP cache
//! stores every request it made, so the signed `macro.subtitles.get` URL
//! (including the user's credentials) ends up embedded in binary cache
//! entries, surrounded by unrelated bytes:
//!
//! ```text
//! ..\x00\x01https://apic-desktop.musixmatch.com/ws/1.1/macro.subtitles.get?format=json&...&signature=abc%3D\x00..
//! ```
//!
//! A URL starts at the literal [`URL_PREFIX`] and runs until the first byte
//! that [`is_url_byte`] rejects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, warn};

/// Literal start of the cached, signed request URL.
pub const URL_PREFIX: &[u8] = b"https://apic-desktop.musixmatch.com/ws/1.1/macro.subtitles.get";

/// Whether `b` may appear inside a cached URL.
///
/// Letters, digits and `/ # ? _ = & % . - ~`. Anything else ends the URL.
pub fn is_url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'/' | b'#' | b'?' | b'_' | b'=' | b'&' | b'%' | b'.' | b'-' | b'~'
        )
}

/// Iterate over every cached URL embedded in `data`, in file order.
///
/// Each item is the raw byte run from the prefix up to (excluding) the first
/// disallowed byte, or the end of the buffer.
pub fn find_urls(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        let start = pos + find_prefix(&data[pos..])?;
        let mut end = start + URL_PREFIX.len();
        while end < data.len() && is_url_byte(data[end]) {
            end += 1;
        }
        pos = end;
        Some(&data[start..end])
    })
}

fn find_prefix(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(URL_PREFIX.len())
        .position(|w| w == URL_PREFIX)
}

/// List the regular files directly inside each directory, newest first.
///
/// Directories that do not exist or cannot be listed are skipped, as are
/// entries that cannot be read. Subdirectories and other non-file entries
/// are ignored (no recursion).
pub fn cache_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("cache directory {} does not exist", dir.display());
                continue;
            }
            Err(e) => {
                warn!("unable to list {}: {e}", dir.display());
                continue;
            }
        };
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("unable to read an entry of {}: {e}", dir.display());
                    continue;
                }
            };
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, path));
        }
    }
    files.sort_by(|a, b| b.0.cmp(&a.0));
    files.into_iter().map(|(_, p)| p).collect()
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without `~` are returned unchanged, as is `~` itself when the home
/// directory cannot be determined.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
