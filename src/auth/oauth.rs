//! OAuth2 client credentials flow for Azure AD app registrations

use std::collections::HashMap;

use oauth2::{
    basic::{BasicClient, BasicErrorResponse},
    AuthType, AuthUrl, ClientId, ClientSecret, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use tokio::sync::RwLock;

use super::{AuthError, AuthResult, Credentials, StoredToken};

/// Build the OAuth2 client for a tenant
fn build_client(
    login_endpoint: &str,
    tenant: &str,
    client_id: &str,
    client_secret: &str,
) -> AuthResult<BasicClient> {
    let login_endpoint = login_endpoint.trim_end_matches('/');
    let auth_url = AuthUrl::new(format!(
        "{}/{}/oauth2/v2.0/authorize",
        login_endpoint, tenant
    ))?;
    let token_url = TokenUrl::new(format!("{}/{}/oauth2/v2.0/token", login_endpoint, tenant))?;

    // Azure AD expects client_id/client_secret in the form body
    Ok(BasicClient::new(
        ClientId::new(client_id.to_string()),
        Some(ClientSecret::new(client_secret.to_string())),
        auth_url,
        Some(token_url),
    )
    .set_auth_type(AuthType::RequestBody))
}

fn describe<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> String
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(resp) => resp.to_string(),
        other => other.to_string(),
    }
}

/// App-only credential using a client secret.
///
/// Tokens are kept per scope until shortly before they expire.
#[derive(Debug)]
pub struct ClientSecretCredential {
    client: BasicClient,
    tenant: String,
    cached: RwLock<HashMap<String, StoredToken>>,
}

impl ClientSecretCredential {
    pub fn new(
        login_endpoint: &str,
        tenant: &str,
        client_id: &str,
        client_secret: &str,
    ) -> AuthResult<Self> {
        Ok(Self {
            client: build_client(login_endpoint, tenant, client_id, client_secret)?,
            tenant: tenant.to_string(),
            cached: RwLock::new(HashMap::new()),
        })
    }

    async fn acquire(&self, scope: &str) -> AuthResult<StoredToken> {
        tracing::debug!("Requesting token for {} (tenant {})", scope, self.tenant);

        let response = self
            .client
            .exchange_client_credentials()
            .add_scope(Scope::new(scope.to_string()))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| AuthError::TokenRequest(describe(e)))?;

        Ok(StoredToken::new(
            response.access_token().secret().to_string(),
            response.expires_in(),
        ))
    }
}

impl Credentials for ClientSecretCredential {
    async fn get_token(&self, scope: &str) -> AuthResult<String> {
        {
            let cache = self.cached.read().await;
            if let Some(token) = cache.get(scope) {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let token = self.acquire(scope).await?;
        let secret = token.token.clone();
        self.cached.write().await.insert(scope.to_string(), token);
        Ok(secret)
    }
}
