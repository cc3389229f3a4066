//! Microsoft Graph request layer
//!
//! Everything above this module talks to Graph through [`DirectoryQuery`],
//! which keeps the directory operations testable without a network.

pub mod client;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthError;

pub use client::GraphRequest;

/// Graph endpoint version namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// `v1.0`
    #[default]
    Stable,
    /// `beta`, exposes fields that are missing from v1.0
    Preview,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "v1.0",
            Self::Preview => "beta",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single Graph query failed.
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("status code {0}")]
    Status(u16),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Credentials(#[from] AuthError),
}

/// Failed Graph query, tagged with the resource that was requested.
#[derive(Debug, Error)]
#[error("Failed to query endpoint \"{resource}\": {kind}")]
pub struct GraphError {
    pub resource: String,
    #[source]
    pub kind: QueryFailure,
}

impl GraphError {
    pub fn new(resource: &str, kind: impl Into<QueryFailure>) -> Self {
        Self {
            resource: resource.to_string(),
            kind: kind.into(),
        }
    }

    /// HTTP status for non-success responses.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            QueryFailure::Status(code) => Some(code),
            _ => None,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// One authenticated GET against `{version}/{resource}`, returning the JSON body.
///
/// A single attempt; implementations must not retry.
pub trait DirectoryQuery {
    async fn query(&self, resource: &str, version: ApiVersion) -> GraphResult<Value>;
}

impl<T: DirectoryQuery> DirectoryQuery for &T {
    async fn query(&self, resource: &str, version: ApiVersion) -> GraphResult<Value> {
        (**self).query(resource, version).await
    }
}
