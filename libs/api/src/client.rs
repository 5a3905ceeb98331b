//! JiraClient implementation
//!
//! Authenticated access to the Jira endpoints involved in re-indexing.

use crate::error::ApiError;
use crate::models::{ReindexProgress, ReindexRequest, ReindexType};
use crate::tls_client::create_tls_client;
use crate::ReindexApi;
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// ScriptRunner endpoint reporting whether someone requested a re-index.
pub const JIRA_ENDPOINT_CHECK: &str = "/rest/scriptrunner/latest/custom/reindexRequired";
/// Endpoint starting a re-index task.
pub const JIRA_ENDPOINT_REINDEX: &str = "/rest/api/2/reindex";
/// Endpoint reporting the progress of the current re-index task.
pub const JIRA_ENDPOINT_PROGRESS: &str = "/rest/api/2/reindex/progress";

const REDACTED: &str = "[REDACTED]";

/// Connection settings for [`JiraClient`].
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Client for the Jira REST API using HTTP basic authentication
#[derive(Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

impl JiraClient {
    /// Create a new JiraClient
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        if config.url.is_empty() {
            return Err(ApiError::Client("Jira URL is required".to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!(
                "jira-reindex-runner/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .map_err(|e| ApiError::Client(e.to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = create_tls_client(headers)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Send a single authenticated request to `endpoint`.
    ///
    /// Only transport failures are reported as errors here; the status code is
    /// left for the caller to judge.
    pub async fn send_request(
        &self,
        endpoint: &str,
        method: Method,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password));

        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;

        debug!(
            method = %method,
            endpoint = endpoint,
            status = response.status().as_u16(),
            "Jira request completed"
        );

        Ok(response)
    }

    /// GET `endpoint`, require `expected` status and decode the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        expected: StatusCode,
    ) -> Result<T, ApiError> {
        let response = self.send_request(endpoint, Method::GET, None).await?;
        let response = Self::check_status(endpoint, response, expected)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|source| ApiError::Body {
            endpoint: endpoint.to_string(),
            status,
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Send a request whose response body is irrelevant, requiring `expected` status.
    pub async fn send_without_body(
        &self,
        endpoint: &str,
        method: Method,
        query: Option<&[(&str, &str)]>,
        expected: StatusCode,
    ) -> Result<(), ApiError> {
        let response = self.send_request(endpoint, method, query).await?;
        Self::check_status(endpoint, response, expected)?;
        Ok(())
    }

    fn check_status(
        endpoint: &str,
        response: Response,
        expected: StatusCode,
    ) -> Result<Response, ApiError> {
        if response.status() != expected {
            return Err(ApiError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ReindexApi for JiraClient {
    async fn reindex_request(&self) -> Result<ReindexRequest, ApiError> {
        self.fetch_json(JIRA_ENDPOINT_CHECK, StatusCode::OK).await
    }

    async fn reindex_progress(&self) -> Result<ReindexProgress, ApiError> {
        self.fetch_json(JIRA_ENDPOINT_PROGRESS, StatusCode::OK).await
    }

    async fn start_reindex(&self, reindex_type: ReindexType) -> Result<(), ApiError> {
        self.send_without_body(
            JIRA_ENDPOINT_REINDEX,
            Method::POST,
            Some(&[("type", reindex_type.as_str())][..]),
            StatusCode::ACCEPTED,
        )
        .await
    }
}
