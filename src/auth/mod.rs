//! Credential providers for Microsoft Graph
//!
//! The facade only ever asks for a bearer token for a given scope. Where the
//! token comes from (client secret grant, pre-issued token) is decided here.

pub mod oauth;
pub mod tokens;

use thiserror::Error;

use crate::config::Config;

pub use oauth::ClientSecretCredential;
pub use tokens::StoredToken;

/// Scope presented for every Graph request.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Errors raised while acquiring an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login/token endpoint URL could not be built.
    #[error("invalid authority URL: {0}")]
    Authority(#[from] url::ParseError),

    /// Token endpoint rejected the request or could not be reached.
    #[error("token request failed: {0}")]
    TokenRequest(String),

    /// No usable credentials were configured.
    #[error("no credentials configured: {0}")]
    Missing(&'static str),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Something that can hand out bearer tokens.
///
/// Implementations may cache tokens internally. Callers must treat the
/// provider as read-only shared data.
pub trait Credentials {
    async fn get_token(&self, scope: &str) -> AuthResult<String>;
}

/// Pre-issued bearer token, e.g. from `az account get-access-token`.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Credentials for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> AuthResult<String> {
        Ok(self.token.clone())
    }
}

/// Credential provider selected from configuration.
#[derive(Debug)]
pub enum CredentialSource {
    Static(StaticTokenCredential),
    ClientSecret(ClientSecretCredential),
}

impl CredentialSource {
    /// Pick a provider: an explicit access token wins over a client secret.
    pub fn from_config(config: &Config) -> AuthResult<Self> {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
            tracing::debug!("Using pre-issued access token");
            return Ok(Self::Static(StaticTokenCredential::new(token)));
        }

        let tenant = config
            .tenant_id
            .as_deref()
            .ok_or(AuthError::Missing("tenant_id is not set"))?;
        let client_id = config
            .client_id
            .as_deref()
            .ok_or(AuthError::Missing("client_id is not set"))?;
        let secret = config
            .client_secret
            .as_deref()
            .ok_or(AuthError::Missing("client_secret is not set"))?;

        tracing::debug!("Using client secret credential for tenant {}", tenant);
        let credential =
            ClientSecretCredential::new(config.login_endpoint(), tenant, client_id, secret)?;
        Ok(Self::ClientSecret(credential))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static(_) => "access token",
            Self::ClientSecret(_) => "client secret",
        }
    }
}

impl Credentials for CredentialSource {
    async fn get_token(&self, scope: &str) -> AuthResult<String> {
        match self {
            Self::Static(c) => c.get_token(scope).await,
            Self::ClientSecret(c) => c.get_token(scope).await,
        }
    }
}
