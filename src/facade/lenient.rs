//! Never-failing view over [`DirectoryFacade`]

use crate::api::DirectoryQuery;
use crate::models::DirectoryObject;

use super::{DirectoryFacade, DirectoryResult, DirectorySnapshot, Reporter};

/// Reports each failure once and substitutes the operation's default:
/// an empty list, or `None` for a single user.
pub struct Lenient<'a, Q, R> {
    facade: &'a DirectoryFacade<Q>,
    reporter: R,
}

impl<'a, Q: DirectoryQuery, R: Reporter> Lenient<'a, Q, R> {
    pub fn new(facade: &'a DirectoryFacade<Q>, reporter: R) -> Self {
        Self { facade, reporter }
    }

    fn settle<T>(&self, outcome: DirectoryResult<T>, fallback: T) -> T {
        match outcome {
            Ok(value) => value,
            Err(e) => {
                self.reporter.report(&e.to_string());
                fallback
            }
        }
    }

    pub async fn list_users(&self) -> Vec<DirectoryObject> {
        self.settle(self.facade.list_users().await, Vec::new())
    }

    pub async fn get_user(&self, user_id: &str) -> Option<DirectoryObject> {
        self.settle(self.facade.get_user(user_id).await.map(Some), None)
    }

    pub async fn list_groups(&self) -> Vec<DirectoryObject> {
        self.settle(self.facade.list_groups().await, Vec::new())
    }

    pub async fn get_user_groups(&self, group_id: &str) -> Vec<DirectoryObject> {
        self.settle(self.facade.get_user_groups(group_id).await, Vec::new())
    }

    pub async fn list_service_principals(&self) -> Vec<DirectoryObject> {
        self.settle(self.facade.list_service_principals().await, Vec::new())
    }

    pub async fn list_applications(&self) -> Vec<DirectoryObject> {
        self.settle(self.facade.list_applications().await, Vec::new())
    }

    /// All four listings, issued concurrently; each one degrades on its own.
    pub async fn snapshot(&self) -> DirectorySnapshot {
        let (users, groups, service_principals, applications) = futures::join!(
            self.list_users(),
            self.list_groups(),
            self.list_service_principals(),
            self.list_applications(),
        );

        DirectorySnapshot {
            users,
            groups,
            service_principals,
            applications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiVersion;
    use crate::facade::fake::{FakeGraph, RecordingReporter};
    use crate::facade::{APPLICATIONS, GROUPS, GUEST_USERS, SERVICE_PRINCIPALS, USERS};
    use serde_json::json;
    use tokio_test::block_on;

    #[test]
    fn test_403_applications_falls_back_with_one_report() {
        let graph = FakeGraph::new().status(APPLICATIONS, ApiVersion::Stable, 403);
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();

        let apps = block_on(facade.lenient(&reporter).list_applications());

        assert!(apps.is_empty());
        let messages = reporter.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("applications"));
        assert!(messages[0].contains("403"));
    }

    #[test]
    fn test_every_listing_falls_back_to_empty() {
        // Nothing canned: every query answers 404
        let graph = FakeGraph::new();
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();
        let lenient = facade.lenient(&reporter);

        assert!(block_on(lenient.list_users()).is_empty());
        assert!(block_on(lenient.list_groups()).is_empty());
        assert!(block_on(lenient.get_user_groups("abc")).is_empty());
        assert!(block_on(lenient.list_service_principals()).is_empty());
        assert!(block_on(lenient.list_applications()).is_empty());
        assert!(block_on(lenient.get_user("abc")).is_none());

        let messages = reporter.messages();
        assert_eq!(messages.len(), 6);
        assert_eq!(
            messages[0],
            "Failed to query endpoint \"users?$filter=userType+eq+%27Guest%27\": status code 404"
        );
        assert!(messages.iter().all(|m| m.contains("status code 404")));
    }

    #[test]
    fn test_get_user_absent_returns_none() {
        let graph = FakeGraph::new().respond(
            USERS,
            ApiVersion::Preview,
            json!({"value": [{"id": "u1"}, {"id": "u2"}]}),
        );
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();
        let lenient = facade.lenient(&reporter);

        let found = block_on(lenient.get_user("u2")).unwrap();
        assert_eq!(found.id(), Some("u2"));
        assert!(reporter.messages().is_empty());

        assert!(block_on(lenient.get_user("missing")).is_none());
        assert_eq!(
            reporter.messages(),
            vec!["Failed to retrieve user missing: no record matches the given id"]
        );
    }

    #[test]
    fn test_user_groups_shape_failure_uses_operation_context() {
        let graph = FakeGraph::new().respond(
            GROUPS,
            ApiVersion::Stable,
            json!({"value": [{"displayName": "no id"}]}),
        );
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();

        let groups = block_on(facade.lenient(&reporter).get_user_groups("abc"));

        assert!(groups.is_empty());
        assert_eq!(
            reporter.messages(),
            vec!["Failed to retrieve user's groups: record 0 has no string \"id\""]
        );
    }

    #[test]
    fn test_success_is_not_reported() {
        let graph = FakeGraph::new().respond(
            GROUPS,
            ApiVersion::Stable,
            json!({"value": [{"id": "abc"}, {"id": "xyz"}]}),
        );
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();

        let groups = block_on(facade.lenient(&reporter).get_user_groups("abc"));

        assert_eq!(serde_json::to_value(&groups).unwrap(), json!([{"id": "abc"}]));
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn test_snapshot_degrades_per_listing() {
        let graph = FakeGraph::new()
            .respond(GUEST_USERS, ApiVersion::Preview, json!({"value": [{"id": "u"}]}))
            .status(GROUPS, ApiVersion::Stable, 429)
            .respond(SERVICE_PRINCIPALS, ApiVersion::Preview, json!({"value": [{"id": "s"}]}))
            .respond(APPLICATIONS, ApiVersion::Stable, json!({}));
        let facade = DirectoryFacade::new(&graph);
        let reporter = RecordingReporter::default();

        let snapshot = block_on(facade.lenient(&reporter).snapshot());

        assert_eq!(snapshot.users.len(), 1);
        assert!(snapshot.groups.is_empty());
        assert_eq!(snapshot.service_principals.len(), 1);
        assert!(snapshot.applications.is_empty());
        assert_eq!(
            reporter.messages(),
            vec!["Failed to query endpoint \"groups\": status code 429"]
        );
    }
}
