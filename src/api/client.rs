//! Authenticated HTTP client for Microsoft Graph
//!
//! Wraps reqwest::Client with bearer token injection from a [`Credentials`]
//! provider.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use super::{ApiVersion, DirectoryQuery, GraphError, GraphResult, QueryFailure};
use crate::auth::{Credentials, GRAPH_SCOPE};

/// Graph transport: one GET per query, no retries.
pub struct GraphRequest<C> {
    http: reqwest::Client,
    credentials: C,
    base: Url,
}

impl<C: Credentials> GraphRequest<C> {
    /// Build a client whose transport enforces `timeout` on every request.
    pub fn new(credentials: C, base: Url, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, credentials, base))
    }

    pub fn with_client(http: reqwest::Client, credentials: C, base: Url) -> Self {
        Self {
            http,
            credentials,
            base,
        }
    }

    /// Full URL for a resource, e.g. `https://graph.microsoft.com/beta/users`.
    pub fn endpoint(&self, resource: &str, version: ApiVersion) -> String {
        format!(
            "{}/{}/{}",
            self.base.as_str().trim_end_matches('/'),
            version,
            resource
        )
    }
}

impl<C: Credentials> DirectoryQuery for GraphRequest<C> {
    async fn query(&self, resource: &str, version: ApiVersion) -> GraphResult<Value> {
        let token = self
            .credentials
            .get_token(GRAPH_SCOPE)
            .await
            .map_err(|e| GraphError::new(resource, e))?;

        let url = self.endpoint(resource, version);
        tracing::debug!("Graph GET {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| GraphError::new(resource, e))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(GraphError::new(
                resource,
                QueryFailure::Status(status.as_u16()),
            ));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| GraphError::new(resource, e))
    }
}
