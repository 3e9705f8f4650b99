//! HTTP client for the backend's calendar endpoints.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};

use jjprep_core::protocol::{
    ConnectionStatus, ErrorBody, NEEDS_SCOPES_CODE, OAuthUrlResponse, PushRequest, PushResponse,
};

use crate::session::TokenSource;

const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Outcome of a push attempt.
///
/// A scope shortfall is not a hard failure: it asks the caller to run a
/// step-up authorization and resubmit.
#[derive(Debug)]
pub enum PushOutcome {
    Created { created_count: u64 },
    NeedsScopes { auth_url: String },
}

pub struct ApiClient {
    http: reqwest::Client,
    api_root: String,
    token: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(api_root: impl Into<String>, token: Arc<dyn TokenSource>) -> Result<Self> {
        // The cookie store keeps the web session fallback working
        // alongside the bearer token.
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ApiClient {
            http,
            api_root: api_root.into(),
            token,
        })
    }

    /// Join `path` onto the API root, collapsing duplicate slashes at the seam.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_root.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Whether a calendar account is linked.
    ///
    /// Never fails: any network or server problem reads as "not
    /// connected", so callers always have something to render.
    pub async fn connection_status(&self) -> ConnectionStatus {
        let request = self.authorized(self.http.get(self.url("/calendar/status")));

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                response.json().await.unwrap_or_default()
            }
            _ => ConnectionStatus::default(),
        }
    }

    /// Authorization URL to open in the browser.
    ///
    /// `redirect_uri` tells the completion page where the local callback
    /// listener is.
    pub async fn oauth_url(&self, redirect_uri: &str) -> Result<String> {
        let request = self
            .authorized(self.http.get(self.url("/calendar/oauth/url")))
            .query(&[("redirect_uri", redirect_uri)]);

        let response = request
            .send()
            .await
            .context("Failed to reach the calendar API")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        let body: OAuthUrlResponse = response
            .json()
            .await
            .context("Failed to parse authorization URL response")?;

        Ok(body.url)
    }

    /// Submit a push.
    ///
    /// A 403 carrying the `NEEDS_SCOPES` code and an authorization URL
    /// maps to [`PushOutcome::NeedsScopes`]; every other failure is an
    /// error with the backend's message.
    pub async fn push(&self, body: &PushRequest) -> Result<PushOutcome> {
        let request = self
            .authorized(self.http.post(self.url("/calendar/push")))
            .json(body);

        let response = request
            .send()
            .await
            .context("Failed to reach the calendar API")?;
        let status = response.status();

        if status.is_success() {
            let parsed: PushResponse = response.json().await.unwrap_or_default();
            return Ok(PushOutcome::Created {
                created_count: parsed.created_count,
            });
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();

        if status == StatusCode::FORBIDDEN && body.error.code.as_deref() == Some(NEEDS_SCOPES_CODE)
        {
            if let Some(auth_url) = body.error.auth_url {
                return Ok(PushOutcome::NeedsScopes { auth_url });
            }
        }

        anyhow::bail!(
            "{}",
            body.error.message.unwrap_or_else(|| GENERIC_ERROR.to_string())
        )
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let body: ErrorBody = response.json().await.unwrap_or_default();
    body.error.message.unwrap_or_else(|| GENERIC_ERROR.to_string())
}
