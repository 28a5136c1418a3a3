use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::{
    domain::user::UserProfile,
    infra::config::BackendConfig,
    usecases::send_message::SendMessageCommand,
};

use super::dto::{ChatReply, ChatRequest, ChatSummary, RegisterUserRequest};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("url {url} cannot carry a path")]
    CannotBeBase { url: String },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} rejected the access token")]
    Unauthorized { endpoint: &'static str },
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("{endpoint} returned an unreadable payload: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl BackendError {
    /// Stable code for logs and user-facing notices.
    pub fn code(&self) -> String {
        match self {
            Self::InvalidUrl { .. } | Self::CannotBeBase { .. } => "BACKEND_INVALID_URL".to_owned(),
            Self::ClientBuild(_) => "BACKEND_CLIENT_UNAVAILABLE".to_owned(),
            Self::Request { source, .. } if source.is_timeout() => "BACKEND_TIMEOUT".to_owned(),
            Self::Request { .. } => "BACKEND_UNREACHABLE".to_owned(),
            Self::Unauthorized { .. } => "AUTH_TOKEN_REJECTED".to_owned(),
            Self::Status { status, .. } => format!("BACKEND_STATUS_{}", status.as_u16()),
            Self::Decode { .. } => "BACKEND_BAD_PAYLOAD".to_owned(),
        }
    }
}

pub(super) fn build_client(timeout: Duration) -> Result<Client, BackendError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(BackendError::ClientBuild)
}

pub(super) fn parse_url(raw: &str) -> Result<Url, BackendError> {
    let url = Url::parse(raw).map_err(|source| BackendError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(BackendError::CannotBeBase {
            url: raw.to_owned(),
        });
    }

    Ok(url)
}

/// Sends a request and maps transport and status failures per endpoint.
pub(super) async fn send_checked(
    endpoint: &'static str,
    request: RequestBuilder,
) -> Result<Response, BackendError> {
    let response = request
        .send()
        .await
        .map_err(|source| BackendError::Request { endpoint, source })?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackendError::Unauthorized { endpoint });
    }
    if !status.is_success() {
        return Err(BackendError::Status { endpoint, status });
    }

    Ok(response)
}

pub(super) async fn fetch_json<T: DeserializeOwned>(
    endpoint: &'static str,
    request: RequestBuilder,
) -> Result<T, BackendError> {
    send_checked(endpoint, request)
        .await?
        .json::<T>()
        .await
        .map_err(|source| BackendError::Decode { endpoint, source })
}

/// Client for the chat backend's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: Url,
}

impl HttpChatBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(Duration::from_millis(config.request_timeout_ms))?,
            base_url: parse_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base url, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::CannotBeBase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn register_user(&self, user: &UserProfile) -> Result<(), BackendError> {
        let url = self.endpoint(&["users"])?;
        send_checked(
            "register user",
            self.client.post(url).json(&RegisterUserRequest::from(user)),
        )
        .await?;
        Ok(())
    }

    pub async fn list_chats(&self, sub: &str) -> Result<Vec<ChatSummary>, BackendError> {
        let url = self.endpoint(&["chats", sub])?;
        fetch_json("list chats", self.client.get(url)).await
    }

    pub async fn send_message(
        &self,
        command: &SendMessageCommand,
    ) -> Result<ChatReply, BackendError> {
        let url = self.endpoint(&["chat"])?;
        let body = ChatRequest {
            user: &command.user,
            message: &command.message,
            chat_id: command.chat_id.as_deref(),
        };
        fetch_json("send message", self.client.post(url).json(&body)).await
    }

    /// Raw thread payload; its shape varies between backend versions.
    pub async fn load_thread(&self, chat_id: &str) -> Result<Value, BackendError> {
        let url = self.endpoint(&["chat", chat_id])?;
        fetch_json("load thread", self.client.get(url)).await
    }
}
