//! Directory object records and Graph response shaping

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A user, group, service principal or application record.
///
/// Attributes are passed through untouched; only `id` is ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryObject(Map<String, Value>);

impl DirectoryObject {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for DirectoryObject {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A Graph response that doesn't have the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("\"value\" is not an array")]
    ValueNotArray,

    #[error("record {0} is not a JSON object")]
    RecordNotObject(usize),

    #[error("record {0} has no string \"id\"")]
    MissingId(usize),

    #[error("no record matches the given id")]
    NoMatch,
}

/// Extract the `value` collection from a Graph response.
///
/// A response without `value` (or with `null`) is an empty collection.
pub fn collection(response: Value) -> Result<Vec<DirectoryObject>, ShapeError> {
    let Value::Object(mut body) = response else {
        return Err(ShapeError::NotAnObject);
    };

    match body.remove("value") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(DirectoryObject(map)),
                _ => Err(ShapeError::RecordNotObject(i)),
            })
            .collect(),
        Some(_) => Err(ShapeError::ValueNotArray),
    }
}

/// Keep the records whose `id` occurs as a substring of `needle`, in order.
///
/// Every record must carry a string `id`; one that doesn't fails the whole
/// filter rather than being skipped.
pub fn contained_in(
    records: Vec<DirectoryObject>,
    needle: &str,
) -> Result<Vec<DirectoryObject>, ShapeError> {
    let mut matches = Vec::new();
    for (i, record) in records.into_iter().enumerate() {
        let id = record.id().ok_or(ShapeError::MissingId(i))?;
        if needle.contains(id) {
            matches.push(record);
        }
    }
    Ok(matches)
}
