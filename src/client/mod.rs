// src/client/mod.rs

//! HTTP client for the newsroom REST API.
//!
//! [`ApiClient::request`] is the single place where requests are built,
//! credentials attached, and responses classified:
//!
//! - transport failure: [`AppError::Network`]
//! - 401: credential cleared, [`SessionEvent::Expired`] signalled, then
//!   [`AppError::SessionExpired`]
//! - 403: [`SessionEvent::AccessDenied`] signalled, then
//!   [`AppError::AccessDenied`]
//! - other non-2xx: [`AppError::Http`]
//! - 2xx: JSON when the body parses, plain text otherwise
//!
//! Typed endpoint wrappers live in [`endpoints`].

pub mod endpoints;
mod listener;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;
use crate::session::Session;
use crate::utils::url::api_url;

pub use listener::{NoopListener, SessionEvent, SessionListener};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Credential handling for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Auth {
    /// Never attach a token
    None,
    /// Attach the token when the session holds one
    #[default]
    Optional,
    /// Fail with [`AppError::Unauthenticated`] before sending when logged out
    Required,
}

/// Request payload.
#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    Multipart(Form),
}

/// Per-request options for [`ApiClient::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    query: Vec<(&'static str, String)>,
    body: Option<RequestBody>,
    auth: Auth,
    /// When false, 401/403 are reported as plain HTTP errors
    skip_session_signals: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Treat 401/403 as ordinary HTTP errors (used by the login call).
    pub fn without_session_signals(mut self) -> Self {
        self.skip_session_signals = true;
        self
    }
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Classify a raw body. Empty bodies are an empty JSON object.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Json(Value::Object(Default::default()));
        }
        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_string()),
        }
    }

    /// Decode into an endpoint schema.
    pub fn decode<T: DeserializeOwned>(self, endpoint: &str) -> Result<T> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|e| AppError::decode(endpoint, e))
            }
            Self::Text(text) => Err(AppError::decode(
                endpoint,
                format!("expected JSON, got text: {}", truncate(&text, 120)),
            )),
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Client for the newsroom REST API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    listener: Arc<dyn SessionListener>,
}

impl ApiClient {
    /// Create a client for `config.base_url` sharing `session`.
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self> {
        url::Url::parse(&config.base_url)?;
        Ok(Self {
            http: create_async_client(config)?,
            base_url: config.base_url.clone(),
            session,
            listener: Arc::new(NoopListener),
        })
    }

    /// Deliver 401/403 signals to `listener`.
    pub fn with_listener(mut self, listener: impl SessionListener + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request against `path` (e.g. `/api/tags/`).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody> {
        let url = api_url(&self.base_url, path);
        let mut builder = self.http.request(method.clone(), &url);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }

        let sent_token = match options.auth {
            Auth::None => None,
            Auth::Optional => self.session.token().await,
            Auth::Required => {
                let Some(token) = self.session.token().await else {
                    log::warn!("{} {} requires login; request not sent", method, path);
                    return Err(AppError::Unauthenticated);
                };
                Some(token)
            }
        };
        if let Some(token) = &sent_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        builder = match options.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        log::debug!("{} {}", method, url);
        let response = builder.send().await.map_err(|e| {
            log::warn!("{} {} failed: {}", method, path, e);
            AppError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !options.skip_session_signals {
            match status {
                StatusCode::UNAUTHORIZED => {
                    return Err(self.expire_session(sent_token.as_deref()).await);
                }
                StatusCode::FORBIDDEN => {
                    log::warn!("{} {}: access denied", method, path);
                    self.listener.on_session_event(SessionEvent::AccessDenied);
                    return Err(AppError::AccessDenied);
                }
                _ => {}
            }
        }

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                text
            };
            log::warn!("{} {} returned {}", method, path, status);
            return Err(AppError::http(status, body));
        }

        Ok(ResponseBody::parse(&text))
    }

    /// Clear the credential the request was sent with and signal expiry.
    ///
    /// A token stored after the request went out is kept and no signal is
    /// raised for it.
    async fn expire_session(&self, sent_token: Option<&str>) -> AppError {
        match self.session.clear_if(sent_token).await {
            Ok(true) => {
                log::warn!("Session expired (401); credential cleared");
                self.listener.on_session_event(SessionEvent::Expired);
            }
            Ok(false) => {
                log::debug!("401 for a replaced credential; keeping the current session");
            }
            Err(e) => {
                log::warn!("Failed to remove persisted token: {}", e);
                self.listener.on_session_event(SessionEvent::Expired);
            }
        }
        AppError::SessionExpired
    }

    /// GET and decode.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&'static str, String)>,
        auth: Auth,
    ) -> Result<T> {
        self.request(Method::GET, path, RequestOptions::new().query(query).auth(auth))
            .await?
            .decode(path)
    }

    /// Authenticated request with a JSON body, decoded.
    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let options = RequestOptions::new().auth(Auth::Required).json(body)?;
        self.request(method, path, options).await?.decode(path)
    }

    /// Authenticated DELETE; the body is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            path,
            RequestOptions::new().auth(Auth::Required),
        )
        .await
        .map(|_| ())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
