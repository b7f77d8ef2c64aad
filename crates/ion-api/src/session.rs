//! Authenticated API session.
//!
//! Owns the token state and applies the retry policy: on any HTTP-status
//! failure, reauthenticate once (refresh first, credential login if the
//! refresh is rejected) and retry once. A failure on the retry propagates.

use std::time::Duration;

use ion_sso::{SsoClient, TokenSet};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BASE_URL: &str = "https://nb.portal.arubainstanton.com/api";
pub const DEFAULT_API_VERSION: u32 = 10;

const API_VERSION_HEADER: &str = "x-ion-api-version";

/// Instant On account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// One-time password for accounts with MFA enabled.
    pub otp: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("otp", &self.otp.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_version: u32,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A logged-in (or about to log in) client of the Instant On API.
pub struct ApiSession {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
    sso: SsoClient,
    credentials: Credentials,
    tokens: Option<TokenSet>,
}

impl ApiSession {
    /// Create a session. No request is made until the first fetch.
    pub fn new(config: ApiConfig, sso: SsoClient, credentials: Credentials) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.to_string(),
            sso,
            credentials,
            tokens: None,
        })
    }

    /// Seed the session with previously obtained tokens.
    pub fn with_tokens(mut self, tokens: TokenSet) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Full credential login; replaces both tokens.
    pub async fn login(&mut self) -> ApiResult<()> {
        let Credentials {
            username,
            password,
            otp,
        } = &self.credentials;
        let tokens = self
            .sso
            .fetch_tokens(username, password, otp.as_deref())
            .await?;
        self.tokens = Some(tokens);
        info!(username = %self.credentials.username, "logged in to instant on");
        Ok(())
    }

    /// Refresh the access token, falling back to a credential login when
    /// the refresh is rejected or no refresh token is held.
    pub async fn reauthenticate(&mut self) -> ApiResult<()> {
        let refresh = self
            .tokens
            .as_ref()
            .and_then(|t| t.refresh_token.clone());

        if let Some(refresh) = refresh {
            match self.sso.refresh_token(&refresh).await {
                Ok(mut tokens) => {
                    if tokens.refresh_token.is_none() {
                        tokens.refresh_token = Some(refresh);
                    }
                    self.tokens = Some(tokens);
                    debug!("reauthenticated via refresh token");
                    return Ok(());
                }
                Err(e) if e.is_status() => {
                    warn!(error = %e, "token refresh rejected, falling back to credential login");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.login().await
    }

    /// Authenticated GET of `path`, decoded as JSON.
    pub async fn fetch_json(&mut self, path: &str) -> ApiResult<Value> {
        if self.tokens.is_none() {
            self.login().await?;
        }

        match self.get(path).await {
            Err(ApiError::Status { status, .. }) => {
                warn!(%path, %status, "request rejected, reauthenticating");
                self.reauthenticate().await?;
                self.get(path).await
            }
            other => other,
        }
    }

    /// The `elements` array of a collection endpoint; empty when absent.
    pub async fn fetch_elements(&mut self, path: &str) -> ApiResult<Vec<Value>> {
        match self.fetch_json(path).await? {
            Value::Object(mut body) => match body.remove("elements") {
                Some(Value::Array(elements)) => Ok(elements),
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(_) => Err(ApiError::decode(path, "`elements` is not an array")),
            },
            _ => Err(ApiError::decode(path, "expected a JSON object")),
        }
    }

    async fn get(&self, path: &str) -> ApiResult<Value> {
        let token = self
            .tokens
            .as_ref()
            .map(|t| t.access_token.as_str())
            .unwrap_or_default();
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .header(API_VERSION_HEADER, &self.api_version)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                path: path.to_string(),
            });
        }
        let body = resp.bytes().await?;
        debug!(%path, bytes = body.len(), "api response");
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(path, e.to_string()))
    }
}
