//! Plain entity types returned by the client.
//!
//! Each entity is built from a decoded REST payload and keeps a handle to
//! the [`HttpClient`] it came from. Guild and channel types live in their
//! own modules since they carry more behaviour.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

use crate::http::HttpClient;

// ---------------------------------------------------------------------------
// Snowflake
// ---------------------------------------------------------------------------

/// Discord IDs. Sent as strings in JSON, accepted as numbers too.
pub type Snowflake = u64;

/// Deserialize a [`Snowflake`] from either `"123"` or `123`.
pub(crate) fn snowflake<'de, D>(deserializer: D) -> Result<Snowflake, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Num(u64),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        Repr::Num(n) => Ok(n),
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    username: String,
    #[serde(default)]
    global_name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl UserPayload {
    pub(crate) fn into_user(self, http: &HttpClient) -> User {
        User {
            id: self.id,
            username: self.username,
            global_name: self.global_name,
            avatar: self.avatar,
            http: http.clone(),
        }
    }
}

/// `GET users/{id}/profile` nests the user one level down.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfilePayload {
    pub(crate) user: UserPayload,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    /// Display name, if the user set one.
    pub global_name: Option<String>,
    /// Avatar hash.
    pub avatar: Option<String>,
    #[allow(dead_code)]
    http: HttpClient,
}

impl User {
    /// CDN URL for the user's avatar, or `None` if no avatar is set.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("https://cdn.discordapp.com/avatars/{}/{}.png", self.id, hash))
    }

    /// Global name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User(id={}, username={}, global_name={}, avatar={})",
            self.id,
            self.username,
            self.global_name.as_deref().unwrap_or("None"),
            self.avatar.as_deref().unwrap_or("None"),
        )
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SessionsPayload {
    pub(crate) user_sessions: Vec<SessionPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionPayload {
    id_hash: String,
    approx_last_used_time: String,
    #[serde(default)]
    client_info: HashMap<String, String>,
}

impl SessionPayload {
    pub(crate) fn into_session(self, http: &HttpClient) -> Session {
        Session {
            id_hash: self.id_hash,
            approx_last_used_time: self.approx_last_used_time,
            client_info: self.client_info,
            http: http.clone(),
        }
    }
}

/// One logged-in device of the current account.
#[derive(Debug, Clone)]
pub struct Session {
    pub id_hash: String,
    /// As reported by Discord, e.g. `2024-05-01T12:00:00+00:00`.
    pub approx_last_used_time: String,
    /// `os`, `platform`, `location` and friends.
    pub client_info: HashMap<String, String>,
    #[allow(dead_code)]
    http: HttpClient,
}

impl Session {
    /// Parsed [`approx_last_used_time`](Self::approx_last_used_time), if it
    /// is valid RFC 3339.
    pub fn last_used(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.approx_last_used_time).ok()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut info: Vec<_> = self.client_info.iter().collect();
        info.sort();
        write!(
            f,
            "Session(id_hash={}, approx_last_used_time={}, client_info={:?})",
            self.id_hash, self.approx_last_used_time, info
        )
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct MessagePayload {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    #[serde(default)]
    content: String,
}

impl MessagePayload {
    pub(crate) fn into_message(self, http: &HttpClient) -> Message {
        Message {
            id: self.id,
            content: self.content,
            http: http.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Snowflake,
    pub content: String,
    #[allow(dead_code)]
    http: HttpClient,
}

impl Message {
    /// Unix-millis timestamp derived from the message snowflake.
    pub fn snowflake_timestamp_ms(&self) -> u64 {
        (self.id >> 22) + 1_420_070_400_000
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message(id={}, content={})", self.id, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn http() -> HttpClient {
        HttpClient::new(Config::new("t")).unwrap()
    }

    #[test]
    fn snowflake_accepts_string_and_number() {
        let a: MessagePayload = serde_json::from_value(json!({ "id": "42", "content": "" })).unwrap();
        let b: MessagePayload = serde_json::from_value(json!({ "id": 42, "content": "" })).unwrap();
        assert_eq!(a.id, 42);
        assert_eq!(b.id, 42);
    }

    #[test]
    fn snowflake_rejects_garbage() {
        let res: Result<MessagePayload, _> =
            serde_json::from_value(json!({ "id": "not-a-number", "content": "" }));
        assert!(res.is_err());
    }

    #[test]
    fn user_display_and_helpers() {
        let payload: UserPayload = serde_json::from_value(json!({
            "id": "80351110224678912",
            "username": "nelly",
            "global_name": null,
            "avatar": "8342729096ea3675442027381ff50dfe"
        }))
        .unwrap();
        let user = payload.into_user(&http());

        assert_eq!(user.display_name(), "nelly");
        assert_eq!(
            user.avatar_url().unwrap(),
            "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png"
        );
        assert_eq!(
            user.to_string(),
            "User(id=80351110224678912, username=nelly, global_name=None, avatar=8342729096ea3675442027381ff50dfe)"
        );
    }

    #[test]
    fn session_parses_last_used() {
        let payload: SessionPayload = serde_json::from_value(json!({
            "id_hash": "abc",
            "approx_last_used_time": "2024-05-01T12:00:00+00:00",
            "client_info": { "os": "Linux", "platform": "Chrome" }
        }))
        .unwrap();
        let session = payload.into_session(&http());

        assert_eq!(session.last_used().unwrap().timestamp(), 1_714_564_800);
        assert_eq!(session.client_info["os"], "Linux");
        assert!(session.to_string().starts_with("Session(id_hash=abc,"));
    }

    #[test]
    fn session_with_odd_timestamp_has_no_last_used() {
        let payload: SessionPayload = serde_json::from_value(json!({
            "id_hash": "abc",
            "approx_last_used_time": "yesterday",
        }))
        .unwrap();
        assert!(payload.into_session(&http()).last_used().is_none());
    }

    #[test]
    fn message_display_and_timestamp() {
        let payload: MessagePayload =
            serde_json::from_value(json!({ "id": "175928847299117063", "content": "hi" })).unwrap();
        let msg = payload.into_message(&http());

        assert_eq!(msg.to_string(), "Message(id=175928847299117063, content=hi)");
        assert_eq!(msg.snowflake_timestamp_ms(), 1_462_015_105_796);
    }
}
