//! In-memory Graph and reporter doubles for facade tests

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::api::{ApiVersion, DirectoryQuery, GraphError, GraphResult, QueryFailure};

use super::Reporter;

enum Canned {
    Body(Value),
    Status(u16),
}

/// Answers queries from canned responses and records every call.
///
/// Unknown resources answer 404.
#[derive(Default)]
pub struct FakeGraph {
    responses: HashMap<(String, ApiVersion), Canned>,
    calls: RefCell<Vec<(String, ApiVersion)>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, resource: &str, version: ApiVersion, body: Value) -> Self {
        self.responses
            .insert((resource.to_string(), version), Canned::Body(body));
        self
    }

    pub fn status(mut self, resource: &str, version: ApiVersion, code: u16) -> Self {
        self.responses
            .insert((resource.to_string(), version), Canned::Status(code));
        self
    }

    pub fn calls(&self) -> Vec<(String, ApiVersion)> {
        self.calls.borrow().clone()
    }
}

impl DirectoryQuery for FakeGraph {
    async fn query(&self, resource: &str, version: ApiVersion) -> GraphResult<Value> {
        self.calls
            .borrow_mut()
            .push((resource.to_string(), version));

        match self.responses.get(&(resource.to_string(), version)) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(code)) => {
                Err(GraphError::new(resource, QueryFailure::Status(*code)))
            }
            None => Err(GraphError::new(resource, QueryFailure::Status(404))),
        }
    }
}

/// Keeps every reported message.
#[derive(Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
