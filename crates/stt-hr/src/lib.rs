//! HR time-tracking API integration for the simple time tracker.
//!
//! Talks to the HeavenHR wrapper service:
//! - Exchanging client credentials for an access token
//! - Listing employees, their projects and the company's categories
//! - Booking a tracked day for an employee

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use stt_core::TimeTrackingCreateRequest;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL of the hosted wrapper service.
pub const DEFAULT_BASE_URL: &str = "https://heavenhr-api-wrapper.vercel.app";

/// HR client errors.
#[derive(Debug, Error)]
pub enum HrError {
    /// A required credential or identifier is not configured.
    #[error("no {name} set")]
    MissingSetting { name: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A call needing authorization was made before obtaining a token.
    #[error("no access token; refresh the token first")]
    MissingToken,
}

/// An employee that time can be booked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Employee {
    /// First and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A project an employee can book time on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A company-wide time-tracking category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// HR wrapper API client.
///
/// Holds the client credentials and, once obtained, the access token used as
/// a bearer token on every other call.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    access_token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the hosted wrapper service.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is empty or whitespace-only, or
    /// if the HTTP client fails to build.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, HrError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(HrError::MissingSetting { name: "client_id" });
        }
        if client_secret.trim().is_empty() {
            return Err(HrError::MissingSetting {
                name: "client_secret",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(HrError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id,
            client_secret,
            access_token: None,
        })
    }

    /// Points the client at another deployment of the wrapper.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Uses an already issued access token. Blank tokens are ignored.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.trim().is_empty() {
            self.access_token = Some(token);
        }
        self
    }

    /// The current access token, if one was set or refreshed.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Exchanges the client credentials for a fresh access token.
    pub async fn refresh_token(&mut self) -> Result<String, HrError> {
        let url = format!("{}/api/auth/refresh-token", self.base_url);
        tracing::debug!(%url, "refreshing HR access token");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await?;
        let payload: TokenResponse = parse_response(response).await?;
        let token = payload
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| HrError::InvalidResponse("missing access_token".to_string()))?;

        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Lists the company's employees.
    pub async fn employees(&self) -> Result<Vec<Employee>, HrError> {
        self.get_list("/api/employee/list").await
    }

    /// Lists the projects an employee can book on.
    pub async fn projects(&self, user_id: &str) -> Result<Vec<Project>, HrError> {
        let user_id = require(user_id, "user_id")?;
        self.get_list(&format!("/api/employee/{user_id}/projects"))
            .await
    }

    /// Lists the company's time-tracking categories.
    pub async fn categories(&self) -> Result<Vec<Category>, HrError> {
        self.get_list("/api/company/categories").await
    }

    /// Books a tracked day for an employee and returns the service's reply.
    pub async fn track_time(
        &self,
        user_id: &str,
        request: &TimeTrackingCreateRequest,
    ) -> Result<serde_json::Value, HrError> {
        let user_id = require(user_id, "user_id")?;
        let token = self.token()?;
        let url = format!("{}/api/employee/{user_id}/track", self.base_url);
        tracing::info!(%url, start = %request.start_date, "submitting tracked time");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, HrError> {
        let token = self.token()?;
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "fetching HR list");

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let payload: ListResponse<T> = parse_response(response).await?;
        Ok(payload.data)
    }

    fn token(&self) -> Result<&str, HrError> {
        self.access_token.as_deref().ok_or(HrError::MissingToken)
    }
}

fn require<'a>(value: &'a str, name: &'static str) -> Result<&'a str, HrError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HrError::MissingSetting { name });
    }
    Ok(value)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HrError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(HrError::Api {
            status: status.as_u16(),
            message: parse_api_error(&body).unwrap_or(body),
        });
    }
    serde_json::from_str(&body).map_err(|err| HrError::InvalidResponse(err.to_string()))
}

fn parse_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        #[serde(alias = "error")]
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
}

/// Identifiers arrive as strings or numbers depending on the endpoint.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
