use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use feedgrab_core::{MediaItem, Message};
use feedgrab_logging::grab_debug;

use crate::{FailureKind, ProgressObserver, Transport, TransportError};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Credentials collected from the operator for a fresh login.
#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub phone: String,
    pub code: String,
    /// Second-factor password; empty when the account has none.
    pub password: String,
}

#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    phone: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: String,
}

/// JSON message-feed client.
///
/// Routes, relative to `base_url`:
/// - `POST auth/send_code` and `POST auth/sign_in` for login,
/// - `GET channels/{channel}/messages?limit=N` for the feed (newest first),
/// - `GET media/{reference}` for raw media bytes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    client: reqwest::Client,
    session: Option<String>,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            session: None,
        })
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Ask the service to deliver a login code to `phone`.
    pub async fn send_code(&self, phone: &str) -> Result<(), TransportError> {
        let url = self.endpoint(&["auth", "send_code"])?;
        self.post_json(url, &CodeRequest { phone }).await?;
        Ok(())
    }

    /// Exchange login credentials for a session token.
    pub async fn sign_in(&self, credentials: &SignIn) -> Result<String, TransportError> {
        let url = self.endpoint(&["auth", "sign_in"])?;
        let body = self.post_json(url, credentials).await?;
        let response: SessionResponse = serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))?;
        Ok(response.session)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TransportError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn post_json<T: Serialize>(&self, url: Url, body: &T) -> Result<Vec<u8>, TransportError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn fetch_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TransportError> {
        let mut url = self.endpoint(&["channels", channel, "messages"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        grab_debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))
    }

    async fn fetch_media(
        &self,
        media: &MediaItem,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint(&["media", media.reference.as_str()])?;
        grab_debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;

        let total = response.content_length().unwrap_or(0);
        let mut bytes = Vec::with_capacity(total.min(64 * 1024 * 1024) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            bytes.extend_from_slice(&chunk);
            observer.on_progress(bytes.len() as u64, total);
        }
        Ok(bytes)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let kind = match status.as_u16() {
        401 | 403 => FailureKind::Unauthorized,
        code => FailureKind::HttpStatus(code),
    };
    Err(TransportError::new(kind, status.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
