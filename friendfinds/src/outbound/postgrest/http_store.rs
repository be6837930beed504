//! Reqwest-backed store adapter for a PostgREST row API.
//!
//! This adapter owns transport details only: URL and header construction,
//! timeout and HTTP error mapping, and JSON decoding into domain records.
//! Row-level authorisation is the server's job; the bearer token identifies
//! the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::dto::{NewRecommendationRowDto, RecommendationRowDto};
use crate::config::{SettingsError, StoreSettings};
use crate::domain::ports::{RecommendationPatch, RecommendationStore, RecommendationStoreError};
use crate::domain::{AccessToken, NewRecommendation, Recommendation, RecommendationId, UserId};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Reasons the HTTP adapter cannot be constructed.
#[derive(Debug, Error)]
pub enum StoreSetupError {
    /// Settings are incomplete or malformed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A credential contains bytes that are not valid in a header.
    #[error("credential is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    /// The reqwest client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Store adapter talking to `{store_url}/rest/v1/{table}`.
pub struct PostgrestRecommendationStore {
    client: Client,
    endpoint: Url,
}

impl PostgrestRecommendationStore {
    /// Build an adapter for `endpoint` that authenticates every request.
    ///
    /// # Errors
    ///
    /// Returns an error when a credential is not a valid header value or the
    /// reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: &str,
        access_token: &AccessToken,
        timeout: Duration,
    ) -> Result<Self, StoreSetupError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(auth_headers(api_key, access_token)?)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Build an adapter from loaded settings and the session's token.
    ///
    /// # Errors
    ///
    /// Returns an error when settings are incomplete or the client cannot be
    /// constructed.
    pub fn from_settings(
        settings: &StoreSettings,
        access_token: &AccessToken,
    ) -> Result<Self, StoreSetupError> {
        Self::new(
            settings.endpoint()?,
            settings.api_key()?,
            access_token,
            settings.timeout(),
        )
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, RecommendationStoreError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| operation.transport_error(&error))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| operation.transport_error(&error))?;
        if !status.is_success() {
            return Err(operation.status_error(status, body.as_ref()));
        }
        debug!(operation = operation.as_str(), status = status.as_u16(), "store request completed");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RecommendationStore for PostgrestRecommendationStore {
    async fn list(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Recommendation>, RecommendationStoreError> {
        let body = self
            .send(
                Operation::List,
                self.client.get(list_url(&self.endpoint, user_id)),
            )
            .await?;
        parse_rows(&body).map_err(RecommendationStoreError::fetch)
    }

    async fn insert(
        &self,
        record: &NewRecommendation,
    ) -> Result<Recommendation, RecommendationStoreError> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&NewRecommendationRowDto::from(record));
        let body = self.send(Operation::Insert, request).await?;
        parse_rows(&body)
            .map_err(RecommendationStoreError::write)?
            .into_iter()
            .next()
            .ok_or_else(|| RecommendationStoreError::write("store returned no row for insert"))
    }

    async fn update(
        &self,
        id: &RecommendationId,
        patch: &RecommendationPatch,
    ) -> Result<(), RecommendationStoreError> {
        let request = self
            .client
            .patch(row_url(&self.endpoint, id))
            .header(PREFER, RETURN_REPRESENTATION)
            .json(patch);
        let body = self.send(Operation::Update, request).await?;
        let rows = parse_rows(&body).map_err(RecommendationStoreError::write)?;
        if rows.is_empty() {
            return Err(RecommendationStoreError::not_found(id.as_str()));
        }
        Ok(())
    }

    async fn delete(&self, id: &RecommendationId) -> Result<(), RecommendationStoreError> {
        self.send(Operation::Delete, self.client.delete(row_url(&self.endpoint, id)))
            .await
            .map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Insert,
    Update,
    Delete,
}

impl Operation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn transport_error(self, error: &reqwest::Error) -> RecommendationStoreError {
        let message = if error.is_timeout() {
            format!("{} timed out: {error}", self.as_str())
        } else {
            format!("{} failed: {error}", self.as_str())
        };
        match self {
            Self::List => RecommendationStoreError::fetch(message),
            Self::Insert | Self::Update | Self::Delete => RecommendationStoreError::write(message),
        }
    }

    fn status_error(self, status: StatusCode, body: &[u8]) -> RecommendationStoreError {
        let body_preview = body_preview(body);
        let message = if body_preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {}", status.as_u16(), body_preview)
        };

        match self {
            Self::List => RecommendationStoreError::fetch(message),
            Self::Insert if status.is_client_error() && status != StatusCode::UNAUTHORIZED => {
                RecommendationStoreError::validation(message)
            }
            Self::Insert | Self::Update | Self::Delete => RecommendationStoreError::write(message),
        }
    }
}

fn auth_headers(api_key: &str, access_token: &AccessToken) -> Result<HeaderMap, StoreSetupError> {
    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(api_key)?;
    key.set_sensitive(true);
    headers.insert("apikey", key);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access_token.expose()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

fn list_url(endpoint: &Url, user_id: &UserId) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("user_id", &format!("eq.{user_id}"))
        .append_pair("order", "date.desc");
    url
}

fn row_url(endpoint: &Url, id: &RecommendationId) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
    url
}

fn parse_rows(body: &[u8]) -> Result<Vec<Recommendation>, String> {
    let rows: Vec<RecommendationRowDto> = serde_json::from_slice(body)
        .map_err(|error| format!("invalid recommendation payload: {error}"))?;
    rows.into_iter().map(RecommendationRowDto::into_domain).collect()
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
