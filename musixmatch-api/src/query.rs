//! Ordered, signed query strings.
//!
//! The backend checks requests against the signature the desktop app
//! computed, so parameters go out in exactly the order the app uses.
//! Every value is percent-encoded except `signature`, which is already in
//! its final form.

use crate::auth::Credentials;

/// Builder for an ordered query string that always starts with
/// `format=json`.
#[derive(Debug, Default)]
pub(crate) struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`, percent-encoding the value.
    pub(crate) fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.params.push((key, encode(&value.to_string())));
        self
    }

    /// Append `key=value` if `value` is present and non-empty.
    pub(crate) fn push_opt(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.push(key, v);
        }
        self
    }

    /// Append `userblob_id` and `user_language`.
    pub(crate) fn push_user(&mut self, credentials: &Credentials) -> &mut Self {
        self.push("userblob_id", &credentials.userblob_id)
            .push("user_language", &credentials.user_language)
    }

    /// Append the trailing signing block: `app_id`, `usertoken`, `guid`,
    /// `signature` (verbatim) and `signature_protocol`.
    pub(crate) fn push_signature(&mut self, credentials: &Credentials) -> &mut Self {
        self.push("app_id", &credentials.app_id)
            .push("usertoken", &credentials.usertoken)
            .push("guid", &credentials.guid);
        self.params.push(("signature", credentials.signature.clone()));
        self.push("signature_protocol", "sha1")
    }

    /// Render as `?format=json&k=v&...`.
    pub(crate) fn to_query_string(&self) -> String {
        let mut out = String::from("?format=json");
        for (k, v) in &self.params {
            out.push('&');
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out
    }
}

/// Percent-encode everything except unreserved characters and `/`.
fn encode(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}
