//! The top-level entry point.
//!
//! [`Client`] turns each call into one REST request, decodes the JSON reply
//! and hands back a typed entity, or the error body Discord sent.

use std::cell::OnceCell;

use serde_json::json;
use tracing::debug;

use crate::channel::{Channel, ChannelPayload};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::guild::{Guild, GuildPayload};
use crate::http::{decode, HttpClient, Method};
use crate::types::{
    Message, MessagePayload, ProfilePayload, Session, SessionsPayload, Snowflake, User, UserPayload,
};

pub const MIN_GUILD_NAME_LEN: usize = 2;
pub const MAX_GUILD_NAME_LEN: usize = 100;

/// A logged-in account.
///
/// `current_user` and `current_sessions` are fetched once and then served
/// from memory for the lifetime of the client. They are never refreshed, so
/// a rename or a new login elsewhere will not show up until a new `Client`
/// is built.
#[derive(Debug)]
pub struct Client {
    http: HttpClient,
    user: OnceCell<User>,
    sessions: OnceCell<Vec<Session>>,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::new(token))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            user: OnceCell::new(),
            sessions: OnceCell::new(),
        })
    }

    /// Build a client from `DISCORD_TOKEN` (a `.env` file is honoured).
    pub fn from_env() -> Result<Self> {
        Self::with_config(Config::from_env()?)
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The account the token belongs to. Memoized.
    pub fn current_user(&self) -> Result<&User> {
        if let Some(user) = self.user.get() {
            debug!("serving cached current user");
            return Ok(user);
        }
        let resp = self.http.request(Method::GET, "users/@me", None, None)?;
        let payload: UserPayload = decode(resp.expect_status(200)?)?;
        Ok(self.user.get_or_init(|| payload.into_user(&self.http)))
    }

    /// Every device logged into the account. Memoized.
    pub fn current_sessions(&self) -> Result<&[Session]> {
        if let Some(sessions) = self.sessions.get() {
            debug!("serving cached sessions");
            return Ok(sessions.as_slice());
        }
        let resp = self.http.request(Method::GET, "auth/sessions", None, None)?;
        let payload: SessionsPayload = decode(resp.expect_status(200)?)?;
        let sessions: Vec<Session> = payload
            .user_sessions
            .into_iter()
            .map(|s| s.into_session(&self.http))
            .collect();
        Ok(self.sessions.get_or_init(|| sessions).as_slice())
    }

    pub fn get_guild(&self, guild_id: Snowflake) -> Result<Guild> {
        let resp = self
            .http
            .request(Method::GET, &format!("guilds/{}", guild_id), None, None)?;
        let payload: GuildPayload = decode(resp.expect_status(200)?)?;
        Ok(payload.into_guild(&self.http))
    }

    pub fn get_user(&self, user_id: Snowflake) -> Result<User> {
        let resp = self.http.request(
            Method::GET,
            &format!("users/{}/profile", user_id),
            None,
            None,
        )?;
        let payload: ProfilePayload = decode(resp.expect_status(200)?)?;
        Ok(payload.user.into_user(&self.http))
    }

    /// Fetch a channel and build the variant matching its `type`.
    pub fn get_channel(&self, channel_id: Snowflake) -> Result<Channel> {
        let resp = self
            .http
            .request(Method::GET, &format!("channels/{}", channel_id), None, None)?;
        let payload: ChannelPayload = decode(resp.expect_status(200)?)?;
        Channel::from_payload(payload)
    }

    /// Fetch one message by asking for the single message around its id.
    pub fn get_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<Message> {
        let query = [
            ("limit".to_string(), "1".to_string()),
            ("around".to_string(), message_id.to_string()),
        ];
        let resp = self.http.request(
            Method::GET,
            &format!("channels/{}/messages", channel_id),
            None,
            Some(&query[..]),
        )?;
        let payload: Vec<MessagePayload> = decode(resp.expect_status(200)?)?;
        payload
            .into_iter()
            .next()
            .map(|m| m.into_message(&self.http))
            .ok_or_else(|| Error::Api {
                status: 404,
                body: json!({ "message": "Unknown Message", "code": 10008 }),
            })
    }

    /// Create a guild owned by the current user.
    ///
    /// `icon` is a data URI (`data:image/png;base64,...`). The name is checked
    /// locally before anything is sent.
    pub fn create_guild(&self, name: &str, icon: Option<&str>) -> Result<Guild> {
        let length = name.chars().count();
        if !(MIN_GUILD_NAME_LEN..=MAX_GUILD_NAME_LEN).contains(&length) {
            return Err(Error::InvalidGuildName { length });
        }

        let body = json!({ "name": name, "icon": icon });
        let resp = self.http.request(Method::POST, "guilds", Some(&body), None)?;
        let payload: GuildPayload = decode(resp.expect_status(201)?)?;
        Ok(payload.into_guild(&self.http))
    }
}
