//! HTTP client wrapper
//!
//! Every outbound request goes through [`HttpClient::send`], which reads the
//! session token at that moment and attaches it as a bearer credential. The
//! token is never cached on the client, so a login between two calls is seen
//! by the second one.

use crate::auth::session::Session;
use crate::core::config::ApiConfig;
use crate::core::error::{RaterError, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

/// HTTP header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: Url,
    trailing_slash: bool,
    session: Session,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RaterError::ConfigError(format!("Invalid base_url {}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(RaterError::ConfigError(format!(
                "base_url cannot be used as a base: {}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .user_agent(concat!("movie-rater/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RaterError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            trailing_slash: config.trailing_slash,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments below the base URL, e.g. `["movies", "3"]`
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            // cannot_be_a_base was rejected in new()
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty();
                path.extend(segments);
                if self.trailing_slash {
                    path.push("");
                }
            }
        }
        url
    }

    /// Fail fast with `Unauthorized` when no token is stored
    pub fn require_token(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(RaterError::Unauthorized(
                "Authentication required: log in first".to_string(),
            ))
        }
    }

    /// GET returning the raw JSON body
    pub async fn get_value(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint(segments);
        let builder = self.http.get(url.clone()).query(query);
        self.send(Method::GET, url, builder).await
    }

    /// GET decoding the body into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let value = self.get_value(segments, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a JSON body and return the raw JSON response
    pub async fn post_value<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value> {
        let url = self.endpoint(segments);
        let builder = self.http.post(url.clone()).json(body);
        self.send(Method::POST, url, builder).await
    }

    /// POST a JSON body decoding the response into `T`
    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.post_value(segments, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// DELETE, discarding any response body
    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments);
        let builder = self.http.delete(url.clone());
        self.send(Method::DELETE, url, builder).await.map(|_| ())
    }

    async fn send(&self, method: Method, url: Url, builder: RequestBuilder) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = builder.header(REQUEST_ID_HEADER, &request_id);

        // Read at send time, not at construction
        let authenticated = match self.session.token() {
            Some(token) => {
                builder = builder.bearer_auth(token);
                true
            }
            None => false,
        };

        let span = tracing::debug_span!(
            "api_request",
            request_id = %request_id,
            method = %method,
            url = %url,
        );

        async move {
            tracing::debug!(authenticated, "Sending request");
            let started = Instant::now();

            let response = builder.send().await.map_err(|e| {
                tracing::warn!(error = %e, "Request failed before a response arrived");
                RaterError::from(e)
            })?;

            let status = response.status();
            let bytes = response.bytes().await?;

            tracing::debug!(
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Response received"
            );

            let body = parse_body(&bytes);

            if !status.is_success() {
                let body = body.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
                let err = RaterError::from_response(status, &body);
                tracing::warn!(status = status.as_u16(), error_type = err.error_type(), "Request rejected: {}", err);
                return Err(err);
            }

            body
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("trailing_slash", &self.trailing_slash)
            .field("session", &self.session)
            .finish()
    }
}

/// Empty bodies (204, bare 200) decode to `Value::Null`
fn parse_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| RaterError::DeserializationError(format!("Response is not valid JSON: {}", e)))
}
