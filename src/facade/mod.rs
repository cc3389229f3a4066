//! Azure AD directory operations
//!
//! [`DirectoryFacade`] maps each directory listing onto one Graph query and
//! shapes the response. Every operation returns a [`DirectoryResult`]; the
//! [`Lenient`] adapter turns failures into reported, empty results for
//! callers that must keep going with partial data.

#[cfg(test)]
pub(crate) mod fake;
mod lenient;
mod report;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiVersion, DirectoryQuery, GraphError};
use crate::models::{collection, contained_in, DirectoryObject, ShapeError};

pub use lenient::Lenient;
pub use report::{Reporter, TracingReporter};

/// Guest accounts only; full user enumeration is unbounded on large tenants.
pub const GUEST_USERS: &str = "users?$filter=userType+eq+%27Guest%27";
pub const USERS: &str = "users";
pub const GROUPS: &str = "groups";
pub const SERVICE_PRINCIPALS: &str = "servicePrincipals";
pub const APPLICATIONS: &str = "applications";

/// Which directory operation a failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Users,
    User(String),
    Groups,
    UserGroups,
    ServicePrincipals,
    Applications,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Users => f.write_str("users"),
            Self::User(id) => write!(f, "user {}", id),
            Self::Groups => f.write_str("groups"),
            Self::UserGroups => f.write_str("user's groups"),
            Self::ServicePrincipals => f.write_str("service principals"),
            Self::Applications => f.write_str("applications"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The Graph query itself failed.
    #[error(transparent)]
    Query(#[from] GraphError),

    /// The query succeeded but the response could not be shaped.
    #[error("Failed to retrieve {operation}: {reason}")]
    Shape {
        operation: Operation,
        reason: ShapeError,
    },
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// The four directory listings taken together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    pub users: Vec<DirectoryObject>,
    pub groups: Vec<DirectoryObject>,
    pub service_principals: Vec<DirectoryObject>,
    pub applications: Vec<DirectoryObject>,
}

/// Directory reads for one tenant.
///
/// Holds nothing but the query capability: no results are cached and calls
/// may run concurrently.
pub struct DirectoryFacade<Q> {
    query: Q,
}

impl<Q: DirectoryQuery> DirectoryFacade<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    /// Wrap this facade so that failures are reported and replaced by defaults.
    pub fn lenient<R: Reporter>(&self, reporter: R) -> Lenient<'_, Q, R> {
        Lenient::new(self, reporter)
    }

    async fn fetch(
        &self,
        operation: Operation,
        resource: &str,
        version: ApiVersion,
    ) -> DirectoryResult<Vec<DirectoryObject>> {
        let response = self.query.query(resource, version).await?;
        collection(response).map_err(|reason| DirectoryError::Shape { operation, reason })
    }

    /// Guest users (beta).
    pub async fn list_users(&self) -> DirectoryResult<Vec<DirectoryObject>> {
        self.fetch(Operation::Users, GUEST_USERS, ApiVersion::Preview)
            .await
    }

    /// First user whose id occurs in `user_id` (beta, unfiltered user list).
    pub async fn get_user(&self, user_id: &str) -> DirectoryResult<DirectoryObject> {
        let operation = || Operation::User(user_id.to_string());
        let users = self.fetch(operation(), USERS, ApiVersion::Preview).await?;

        contained_in(users, user_id)
            .and_then(|matches| matches.into_iter().next().ok_or(ShapeError::NoMatch))
            .map_err(|reason| DirectoryError::Shape {
                operation: operation(),
                reason,
            })
    }

    pub async fn list_groups(&self) -> DirectoryResult<Vec<DirectoryObject>> {
        self.fetch(Operation::Groups, GROUPS, ApiVersion::Stable)
            .await
    }

    /// Groups whose id occurs in `group_id`, in directory order.
    pub async fn get_user_groups(&self, group_id: &str) -> DirectoryResult<Vec<DirectoryObject>> {
        let groups = self
            .fetch(Operation::UserGroups, GROUPS, ApiVersion::Stable)
            .await?;

        contained_in(groups, group_id).map_err(|reason| DirectoryError::Shape {
            operation: Operation::UserGroups,
            reason,
        })
    }

    /// Service principals (beta, which carries `publisherName`).
    pub async fn list_service_principals(&self) -> DirectoryResult<Vec<DirectoryObject>> {
        self.fetch(
            Operation::ServicePrincipals,
            SERVICE_PRINCIPALS,
            ApiVersion::Preview,
        )
        .await
    }

    pub async fn list_applications(&self) -> DirectoryResult<Vec<DirectoryObject>> {
        self.fetch(Operation::Applications, APPLICATIONS, ApiVersion::Stable)
            .await
    }

    /// All four listings, issued concurrently. Fails on the first error.
    pub async fn snapshot(&self) -> DirectoryResult<DirectorySnapshot> {
        let (users, groups, service_principals, applications) = futures::try_join!(
            self.list_users(),
            self.list_groups(),
            self.list_service_principals(),
            self.list_applications(),
        )?;

        Ok(DirectorySnapshot {
            users,
            groups,
            service_principals,
            applications,
        })
    }
}
