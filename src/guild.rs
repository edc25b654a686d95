//! Guilds and the paginated message search.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{decode, HttpClient, Method, Query};
use crate::types::{snowflake, Message, MessagePayload, Snowflake};

/// Hits per page returned by the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 25;

/// Default cap on messages yielded by a single search.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

// ---------------------------------------------------------------------------
// Guild
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GuildPayload {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    name: String,
}

impl GuildPayload {
    pub(crate) fn into_guild(self, http: &HttpClient) -> Guild {
        Guild {
            id: self.id,
            name: self.name,
            http: http.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    http: HttpClient,
}

impl Guild {
    /// Delete the guild. The current user must own it.
    pub fn delete(&self) -> Result<()> {
        let resp = self
            .http
            .request(Method::DELETE, &format!("guilds/{}", self.id), None, None)?;
        if resp.status == 204 {
            debug!(guild_id = self.id, "guild deleted");
            return Ok(());
        }
        let body = resp.json()?;
        Err(Error::Api {
            status: resp.status,
            body,
        })
    }

    /// Lazily search the guild's messages.
    ///
    /// Nothing is sent until the returned iterator is first polled. Pages are
    /// fetched one at a time and the sequence stops at `query.limit` messages
    /// or at the first empty page, whichever comes first. A failed request
    /// yields one `Err` and ends the sequence.
    pub fn search_messages(&self, query: SearchQuery) -> MessageSearch {
        MessageSearch {
            http: self.http.clone(),
            endpoint: format!("guilds/{}/messages/search", self.id),
            offset: query.offset,
            remaining: query.limit,
            query,
            buffer: VecDeque::new(),
            finished: false,
        }
    }
}

impl fmt::Display for Guild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guild(id={}, name={})", self.id, self.name)
    }
}

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// Filters for [`Guild::search_messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub content: Option<String>,
    pub author_ids: Vec<Snowflake>,
    pub channel_ids: Vec<Snowflake>,
    pub include_nsfw: bool,
    /// Hit index of the first page.
    pub offset: u32,
    /// Maximum number of messages to yield.
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            content: None,
            author_ids: Vec::new(),
            channel_ids: Vec::new(),
            include_nsfw: false,
            offset: 0,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author_id: Snowflake) -> Self {
        self.author_ids.push(author_id);
        self
    }

    pub fn channel(mut self, channel_id: Snowflake) -> Self {
        self.channel_ids.push(channel_id);
        self
    }

    pub fn include_nsfw(mut self, include: bool) -> Self {
        self.include_nsfw = include;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn to_query(&self, offset: u32) -> Query {
        let mut query = Query::new();
        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            query.push(("content".to_string(), content.to_string()));
        }
        for id in &self.author_ids {
            query.push(("author_id".to_string(), id.to_string()));
        }
        for id in &self.channel_ids {
            query.push(("channel_id".to_string(), id.to_string()));
        }
        if self.include_nsfw {
            query.push(("include_nsfw".to_string(), "true".to_string()));
        }
        query.push(("offset".to_string(), offset.to_string()));
        query
    }
}

// ---------------------------------------------------------------------------
// MessageSearch
// ---------------------------------------------------------------------------

/// `{"messages": [[hit, ...context], ...], "total_results": n}`
#[derive(Debug, Deserialize)]
struct SearchPayload {
    messages: Vec<Vec<MessagePayload>>,
}

/// Iterator returned by [`Guild::search_messages`].
#[derive(Debug)]
pub struct MessageSearch {
    http: HttpClient,
    endpoint: String,
    query: SearchQuery,
    offset: u32,
    /// Messages still allowed before `limit` is reached.
    remaining: usize,
    buffer: VecDeque<Message>,
    finished: bool,
}

impl MessageSearch {
    fn fetch_page(&self) -> Result<Vec<Message>> {
        let query = self.query.to_query(self.offset);
        let resp = self
            .http
            .request(Method::GET, &self.endpoint, None, Some(query.as_slice()))?;
        let page: SearchPayload = decode(resp.expect_status(200)?)?;
        debug!(
            endpoint = %self.endpoint,
            offset = self.offset,
            hits = page.messages.len(),
            "fetched search page"
        );

        // The first entry of each group is the hit itself. Empty groups are
        // dropped, so a page of only `[]` groups counts as an empty page.
        Ok(page
            .messages
            .into_iter()
            .filter_map(|group| group.into_iter().next())
            .map(|m| m.into_message(&self.http))
            .collect())
    }
}

impl Iterator for MessageSearch {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == 0 {
                return None;
            }
            if let Some(message) = self.buffer.pop_front() {
                self.remaining -= 1;
                return Some(Ok(message));
            }
            if self.finished {
                return None;
            }

            match self.fetch_page() {
                Ok(batch) if batch.is_empty() => {
                    self.finished = true;
                    return None;
                }
                Ok(batch) => {
                    self.buffer.extend(batch.into_iter().take(self.remaining));
                    match self.offset.checked_add(SEARCH_PAGE_SIZE) {
                        Some(next) => self.offset = next,
                        // No offset left to ask for; drain what we have.
                        None => self.finished = true,
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl FusedIterator for MessageSearch {}
