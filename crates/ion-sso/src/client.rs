//! SSO client for the Instant On identity provider.
//!
//! Login is a three-request dance:
//!
//! ```text
//! POST /aio/api/v1/mfa/validate/full   credentials  → session token
//! GET  /as{authz}?…&sessionToken=…     302 Location → authorization code
//! POST /as{tokens}  grant_type=authorization_code   → access + refresh token
//! ```
//!
//! Refreshing is a single `grant_type=refresh_token` POST against the same
//! token endpoint.

use std::time::Duration;

use reqwest::header::LOCATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{SsoError, SsoResult};
use crate::pkce::{PkcePair, random_token};

pub const DEFAULT_BASE_URL: &str = "https://sso.arubainstanton.com";
pub const DEFAULT_SETTINGS_URL: &str = "https://portal.arubainstanton.com/settings.json";

const VALIDATE_PATH: &str = "/aio/api/v1/mfa/validate/full";
const USER_AGENT: &str = concat!("ion-exporter/", env!("CARGO_PKG_VERSION"));

/// Provider-specific OAuth parameters, published by the portal's
/// `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SsoSettings {
    #[serde(rename = "ssoClientIdAuthZ", alias = "client_id")]
    pub client_id: String,
    #[serde(rename = "ssoRedirectUrl", alias = "redirect_url")]
    pub redirect_url: String,
    #[serde(rename = "ssoEndpointAuthZ", alias = "authz_endpoint")]
    pub authz_endpoint: String,
    #[serde(rename = "ssoEndpointTokens", alias = "tokens_endpoint")]
    pub tokens_endpoint: String,
}

/// Bearer token plus the refresh token that renews it.
#[derive(Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Deserialize)]
struct SessionToken {
    access_token: String,
}

/// Construction parameters for [`SsoClient`].
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub base_url: String,
    pub settings_url: String,
    /// When `None`, settings are fetched from `settings_url` on first use.
    pub settings: Option<SsoSettings>,
    pub timeout: Duration,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            settings_url: DEFAULT_SETTINGS_URL.to_string(),
            settings: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the SSO endpoints. Never follows redirects: the
/// authorization code is read from the 302 itself.
pub struct SsoClient {
    http: reqwest::Client,
    base_url: String,
    settings_url: String,
    settings: Option<SsoSettings>,
}

impl SsoClient {
    pub fn new(config: SsoConfig) -> SsoResult<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            settings_url: config.settings_url,
            settings: config.settings,
        })
    }

    /// Provider settings, fetched and cached on first call when not
    /// configured up front.
    pub async fn settings(&mut self) -> SsoResult<SsoSettings> {
        if let Some(settings) = &self.settings {
            return Ok(settings.clone());
        }
        debug!(url = %self.settings_url, "fetching sso settings");
        let resp = self.http.get(&self.settings_url).send().await?;
        let settings: SsoSettings = read_json(resp).await?;
        self.settings = Some(settings.clone());
        Ok(settings)
    }

    /// Exchange credentials for a short-lived session token.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        otp: Option<&str>,
    ) -> SsoResult<String> {
        let mut form = vec![("username", username), ("password", password)];
        if let Some(otp) = otp.filter(|o| !o.is_empty()) {
            form.push(("otp", otp));
        }
        let resp = self
            .http
            .post(format!("{}{VALIDATE_PATH}", self.base_url))
            .form(&form)
            .send()
            .await?;
        let token: SessionToken = read_json(resp).await?;
        debug!("credentials accepted");
        Ok(token.access_token)
    }

    /// Trade a session token for an authorization code.
    ///
    /// Returns `(code, code_verifier)`; the verifier must accompany the code
    /// in the token exchange.
    pub async fn authorize(&mut self, session_token: &str) -> SsoResult<(String, String)> {
        let settings = self.settings().await?;
        let state = random_token();
        let pkce = PkcePair::generate();
        let params = [
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", settings.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", "profile openid"),
            ("state", state.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", pkce.challenge.as_str()),
            ("sessionToken", session_token),
        ];
        let resp = self
            .http
            .get(format!("{}/as{}", self.base_url, settings.authz_endpoint))
            .query(&params)
            .send()
            .await?;

        let Some(location) = resp.headers().get(LOCATION) else {
            if !resp.status().is_success() {
                return Err(SsoError::Status {
                    status: resp.status(),
                    url: resp.url().to_string(),
                });
            }
            return Err(SsoError::MissingRedirect);
        };
        let location = location
            .to_str()
            .map_err(|e| SsoError::Decode(format!("redirect location: {e}")))?;
        let redirect = resp.url().join(location)?;
        let code = authorization_code(&redirect)?;
        debug!("authorization code received");
        Ok((code, pkce.verifier))
    }

    /// Full credential login: authenticate, authorize, exchange the code.
    pub async fn fetch_tokens(
        &mut self,
        username: &str,
        password: &str,
        otp: Option<&str>,
    ) -> SsoResult<TokenSet> {
        let session_token = self.authenticate(username, password, otp).await?;
        let (code, code_verifier) = self.authorize(&session_token).await?;
        let settings = self.settings().await?;
        let form = [
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", settings.redirect_url.as_str()),
            ("code", code.as_str()),
            ("code_verifier", code_verifier.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let resp = self
            .http
            .post(format!("{}/as{}", self.base_url, settings.tokens_endpoint))
            .form(&form)
            .send()
            .await?;
        let tokens: TokenSet = read_json(resp).await?;
        info!(%username, "sso login complete");
        Ok(tokens)
    }

    /// Renew the access token. Fails on any non-2xx; the caller decides
    /// whether to fall back to a full login.
    pub async fn refresh_token(&mut self, refresh_token: &str) -> SsoResult<TokenSet> {
        let settings = self.settings().await?;
        let form = [
            ("client_id", settings.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let resp = self
            .http
            .post(format!("{}/as{}", self.base_url, settings.tokens_endpoint))
            .form(&form)
            .send()
            .await?;
        let tokens: TokenSet = read_json(resp).await?;
        debug!("access token refreshed");
        Ok(tokens)
    }
}

fn authorization_code(redirect: &Url) -> SsoResult<String> {
    redirect
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| SsoError::MissingCode(redirect.path().to_string()))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> SsoResult<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(SsoError::Status {
            status,
            url: resp.url().to_string(),
        });
    }
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| SsoError::Decode(e.to_string()))
}
