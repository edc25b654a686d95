//! Connection settings for [`HttpClient`](crate::http::HttpClient).

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_USER_AGENT: &str = "selfcord (https://github.com/selfcord/selfcord, 0.1)";

/// Token plus the endpoint it is sent to.
#[derive(Clone)]
pub struct Config {
    /// Account token, sent verbatim as the `Authorization` header.
    pub token: String,
    /// Everything up to and including the API version segment.
    pub base_url: String,
    pub user_agent: String,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Read the token from `DISCORD_TOKEN`, loading a `.env` file first if
    /// one is present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let token = std::env::var("DISCORD_TOKEN").map_err(|_| Error::MissingToken)?;
        Ok(Self::new(token))
    }

    /// Point the client somewhere other than discord.com (a proxy, a mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
