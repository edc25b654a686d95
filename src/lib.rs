//! A thin, blocking client for the Discord REST API.
//!
//! [`Client`] is the entry point: each method issues one request against
//! `https://discord.com/api/v10`, decodes the reply and returns a typed
//! entity. Failures come back as [`Error`], with Discord's own error body
//! attached when there is one. There is no retrying, no rate-limit handling
//! and no gateway connection.
//!
//! ```no_run
//! use selfcord::{Client, SearchQuery};
//!
//! let client = Client::from_env()?;
//! println!("logged in as {}", client.current_user()?);
//!
//! let guild = client.get_guild(197038439483310086)?;
//! for message in guild.search_messages(SearchQuery::new().content("rust").limit(10)) {
//!     println!("{}", message?);
//! }
//! # Ok::<(), selfcord::Error>(())
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod guild;
pub mod http;
pub mod types;

pub use channel::{Channel, ChannelType, TextChannel, VoiceChannel};
pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use guild::{Guild, MessageSearch, SearchQuery};
pub use http::{HttpClient, RawResponse};
pub use types::{Message, Session, Snowflake, User};
