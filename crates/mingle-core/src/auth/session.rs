//! Browser auth session plumbing for the GitHub flow.
//!
//! The OAuth dance is backend-driven: the client opens the system browser
//! at the backend's authorize endpoint and waits for the redirect on a
//! loopback return URL. The redirect carries the token pair in its
//! trailing path segments (see [`crate::auth::tokens::TokenPair`]).

use std::net::TcpListener;

/// Path component of the generated loopback return URL.
pub const RETURN_PATH: &str = "/auth/done";

/// Environment override for the return URL.
/// Set to an empty value to disable the browser hand-back entirely.
pub const CALLBACK_URL_ENV: &str = "MINGLE_CALLBACK_URL";

/// Outcome of a browser auth session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSessionResult {
    /// The browser came back to the return URL; `url` is the full redirect.
    Success { url: String },
    /// The user backed out before the browser came back.
    Canceled,
    /// The session ended without a redirect (timeout, closed browser).
    Dismissed,
}

/// Generates a random high loopback port for the return URL.
pub fn random_callback_port() -> u16 {
    let id = uuid::Uuid::new_v4();
    let bytes = id.as_bytes();
    let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
    49152 + (raw % 16384)
}

/// Resolves the auth session return URL, once at startup.
///
/// A non-empty `MINGLE_CALLBACK_URL` wins verbatim; set-but-empty means no
/// return URL (the GitHub flow aborts silently). Otherwise a loopback URL
/// on a random high port is produced, provided loopback binding works at
/// all on this host.
pub fn resolve_return_url() -> Option<String> {
    resolve_return_url_with(std::env::var(CALLBACK_URL_ENV).ok().as_deref())
}

fn resolve_return_url_with(override_value: Option<&str>) -> Option<String> {
    match override_value {
        Some(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        None => {
            let probe = TcpListener::bind("127.0.0.1:0").ok()?;
            drop(probe);
            Some(format!(
                "http://127.0.0.1:{}{RETURN_PATH}",
                random_callback_port()
            ))
        }
    }
}

/// Builds the browser entry URL for the GitHub flow.
///
/// The backend completes the OAuth dance and redirects to
/// `{return_url}/<accessToken>/<refreshToken>`.
pub fn github_authorize_url(api_base_url: &str, return_url: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect_uri", return_url)
        .finish();

    format!("{api_base_url}/auth/github/rn?{query}")
}
