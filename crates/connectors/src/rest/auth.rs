use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Client-credential settings for the identity provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub account_id: String,
}

impl AuthConfig {
    /// Reads credentials from the environment: `CULL_TOKEN_URL`,
    /// `CULL_CLIENT_ID`, `CULL_CLIENT_SECRET`, `CULL_ACCOUNT_ID`.
    pub fn from_env() -> Result<Self, ProviderError> {
        Ok(AuthConfig {
            token_url: require_env("CULL_TOKEN_URL")?,
            client_id: require_env("CULL_CLIENT_ID")?,
            client_secret: require_env("CULL_CLIENT_SECRET")?,
            account_id: require_env("CULL_ACCOUNT_ID")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, ProviderError> {
    std::env::var(name).map_err(|_| {
        warn!("{name} environment variable not set");
        ProviderError::Auth(format!("{name} is not set"))
    })
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    account_id: &'a str,
}

/// Raw token endpoint payload. Both fields must be present before any
/// subsequent call is attempted.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub rest_instance_url: Option<String>,
}

/// A validated token plus the instance base URL for subsequent calls.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: String,
    rest_instance_url: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, rest_instance_url: impl Into<String>) -> Self {
        AccessToken {
            token: token.into(),
            rest_instance_url: rest_instance_url.into(),
        }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }

    pub fn rest_instance_url(&self) -> &str {
        &self.rest_instance_url
    }
}

impl TryFrom<TokenResponse> for AccessToken {
    type Error = ProviderError;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Auth("token endpoint returned no access_token".into()))?;
        let rest_instance_url = response.rest_instance_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            ProviderError::Auth("token endpoint returned no rest_instance_url".into())
        })?;
        Ok(AccessToken {
            token,
            rest_instance_url,
        })
    }
}

/// Issues an access token for the provider's REST surface.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn request_token(&self) -> Result<AccessToken, ProviderError>;
}

/// Client-credentials grant against the identity provider.
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Self {
        AuthClient {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TokenProvider for AuthClient {
    async fn request_token(&self) -> Result<AccessToken, ProviderError> {
        let request = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            account_id: &self.config.account_id,
        };

        let response = self
            .http
            .post(&self.config.token_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;
        let token = AccessToken::try_from(payload)?;
        info!("acquired provider access token");
        Ok(token)
    }
}
