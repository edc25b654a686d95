//! Blocking HTTP transport for the Discord REST API.
//!
//! Every outbound call goes through [`HttpClient::request`], which attaches
//! the auth header and JSON content type and hands back the status and body
//! untouched. Interpreting the response is the caller's job; the helpers on
//! [`RawResponse`] cover the common "decode, check status" path.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

pub use reqwest::Method;

/// Query string as ordered pairs. Keys may repeat (`author_id=1&author_id=2`).
pub type Query = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// RawResponse
// ---------------------------------------------------------------------------

/// Status code and body of a response, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).map_err(|_| Error::InvalidResponse)
    }

    /// Parse the body as JSON and require `expected` as the status.
    ///
    /// Any other status becomes [`Error::Api`] carrying the decoded body.
    pub fn expect_status(&self, expected: u16) -> Result<serde_json::Value> {
        let body = self.json()?;
        if self.status == expected {
            Ok(body)
        } else {
            warn!(status = self.status, expected, "Discord API returned an error");
            Err(Error::Api {
                status: self.status,
                body,
            })
        }
    }
}

/// Deserialize a decoded success body into a typed payload.
pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(Error::Decode)
}

// ---------------------------------------------------------------------------
// HttpClient
// ---------------------------------------------------------------------------

/// Shared handle to the REST API.
///
/// Cheap to clone: the connection pool and settings are reference counted,
/// so every entity can keep its own copy for follow-up calls.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
    token: Arc<str>,
    base_url: Arc<str>,
}

impl HttpClient {
    pub fn new(config: Config) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            inner,
            token: config.token.into(),
            base_url: config.base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `{base_url}/{endpoint}`.
    ///
    /// Only network failures are errors here; every status code, including
    /// 4xx and 5xx, comes back as a [`RawResponse`].
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        query: Option<&[(String, String)]>,
    ) -> Result<RawResponse> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let mut req = self
            .inner
            .request(method.clone(), &url)
            .header(AUTHORIZATION, &*self.token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(json) = body {
            req = req.json(json);
        }

        debug!(%method, endpoint, "sending request");
        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        debug!(%method, endpoint, status, "received response");

        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> HttpClient {
        HttpClient::new(Config::new("token-123").with_base_url(server.url())).unwrap()
    }

    #[test]
    fn attaches_auth_and_content_type() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/users/@me")
            .match_header("authorization", "token-123")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body("{}")
            .create();

        let resp = client(&server)
            .request(Method::GET, "users/@me", None, None)
            .unwrap();
        assert_eq!(resp.status, 200);
        mock.assert();
    }

    #[test]
    fn passes_error_statuses_through() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/guilds/1")
            .with_status(404)
            .with_body(r#"{"message": "Unknown Guild", "code": 10004}"#)
            .create();

        let resp = client(&server)
            .request(Method::GET, "guilds/1", None, None)
            .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, r#"{"message": "Unknown Guild", "code": 10004}"#);
    }

    #[test]
    fn sends_json_body_and_repeated_query_keys() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/things")
            .match_query(Matcher::Regex("a=1&a=2".into()))
            .match_body(Matcher::Json(json!({ "name": "x" })))
            .with_status(201)
            .with_body("{}")
            .create();

        let query = vec![
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        let resp = client(&server)
            .request(
                Method::POST,
                "things",
                Some(&json!({ "name": "x" })),
                Some(query.as_slice()),
            )
            .unwrap();
        assert_eq!(resp.status, 201);
        mock.assert();
    }

    #[test]
    fn expect_status_wraps_body_in_api_error() {
        let resp = RawResponse {
            status: 401,
            body: r#"{"message": "401: Unauthorized", "code": 0}"#.to_string(),
        };
        match resp.expect_status(200) {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, json!({ "message": "401: Unauthorized", "code": 0 }));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        let resp = RawResponse {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert!(matches!(resp.expect_status(200), Err(Error::InvalidResponse)));
    }

    #[test]
    fn base_url_is_kept_from_config() {
        let http = HttpClient::new(Config::new("t").with_base_url("http://localhost:9000/api/")).unwrap();
        assert_eq!(http.base_url(), "http://localhost:9000/api");
        assert_eq!(
            HttpClient::new(Config::new("t")).unwrap().base_url(),
            "https://discord.com/api/v10"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let http = HttpClient::new(Config::new("super-secret")).unwrap();
        assert!(!format!("{:?}", http).contains("super-secret"));
    }
}
