//! Reqwest-backed users endpoint adapter.
//!
//! This adapter owns transport details only: URL construction, JSON
//! serialisation, status mapping and decoding into domain users.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorBodyDto;
use crate::domain::ports::{UsersRemote, UsersRemoteError};
use crate::domain::{User, UserDraft, UserFields, UserId};

const DEFAULT_USER_AGENT: &str = "users-dashboard/0.1";
const USERS_SEGMENT: &str = "users";

/// Users remote that talks to `{base_url}/users`.
#[derive(Debug, Clone)]
pub struct HttpUsersRemote {
    client: Client,
    base_url: Url,
}

impl HttpUsersRemote {
    /// Build an adapter for `base_url` with an optional request timeout.
    ///
    /// Without a timeout the transport defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn endpoint(&self, id: Option<&UserId>) -> Result<Url, UsersRemoteError> {
        users_endpoint(&self.base_url, id)
    }

    async fn execute<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Vec<u8>, UsersRemoteError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let path = url.path().to_owned();
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            warn!(%method, %path, error = %error, "users request failed");
            map_transport_error(error)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%method, %path, status = status.as_u16(), "users request completed");

        if !status.is_success() {
            warn!(
                %method,
                %path,
                status = status.as_u16(),
                body = %body_preview(body.as_ref()),
                "users request rejected"
            );
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn users_endpoint(base_url: &Url, id: Option<&UserId>) -> Result<Url, UsersRemoteError> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            UsersRemoteError::network(format!("base URL {base_url} cannot carry a path"))
        })?;
        segments.pop_if_empty().push(USERS_SEGMENT);
        if let Some(id) = id {
            segments.push(&id.to_string());
        }
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, UsersRemoteError> {
    serde_json::from_slice(body).map_err(|error| {
        UsersRemoteError::decode(format!("invalid users JSON payload: {error}"))
    })
}

#[async_trait]
impl UsersRemote for HttpUsersRemote {
    async fn list(&self) -> Result<Vec<User>, UsersRemoteError> {
        let url = self.endpoint(None)?;
        let body = self.execute::<()>(Method::GET, url, None).await?;
        decode(&body)
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, UsersRemoteError> {
        let url = self.endpoint(None)?;
        let body = self.execute(Method::POST, url, Some(draft)).await?;
        decode(&body)
    }

    async fn update(&self, id: &UserId, fields: &UserFields) -> Result<User, UsersRemoteError> {
        let url = self.endpoint(Some(id))?;
        let body = self.execute(Method::PUT, url, Some(fields)).await?;
        decode(&body)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UsersRemoteError> {
        let url = self.endpoint(Some(id))?;
        self.execute::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> UsersRemoteError {
    if error.is_timeout() {
        UsersRemoteError::network(format!("request timed out: {error}"))
    } else {
        UsersRemoteError::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UsersRemoteError {
    UsersRemoteError::remote(status.as_u16(), ErrorBodyDto::message_from(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
