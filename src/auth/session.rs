//! The session cookie.
//!
//! A session is an http-only cookie whose value is the percent-encoded JSON
//! object `{id, username}`. It carries no integrity protection: validity
//! comes from re-reading the user row on every privileged request, not from
//! the cookie itself.

use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "session";

const SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
}

impl Session {
    /// Renders the Set-Cookie value establishing this session for 24 hours.
    #[must_use]
    pub fn to_cookie(&self) -> String {
        let payload = serde_json::to_string(self).expect("session payload serializes");
        format!(
            "{SESSION_COOKIE}={}; Max-Age={SESSION_TTL_SECONDS}; Path=/; HttpOnly; Secure; SameSite=None",
            urlencoding::encode(&payload)
        )
    }

    /// Parses a raw cookie value back into a session.
    #[must_use]
    pub fn parse(value: &str) -> Option<Session> {
        let decoded = urlencoding::decode(value).ok()?;
        serde_json::from_str(&decoded).ok()
    }

    /// Extracts and parses the session from a Cookie header.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Option<Session> {
        cookie_value(header).and_then(Session::parse)
    }
}

/// Extracts the raw session cookie value from a Cookie header, if present.
#[must_use]
pub fn cookie_value(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

/// Renders the Set-Cookie value that expires the session immediately.
#[must_use]
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=None")
}
