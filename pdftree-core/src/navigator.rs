//! Dotted-path navigation through a serialized tree
//!
//! A path such as `Pages.Kids.0` is applied one step at a time. Each step is
//! interpreted by the node it lands on: dictionary steps are keys (tried
//! with the leading slash first, then verbatim), array steps are indices.
//! References met along the way are dereferenced from the session's store,
//! or fetched and serialized on demand when the store does not have them.

use crate::graph::{ObjectGraph, ObjectId};
use crate::node::SerializedNode;
use crate::serializer::serialize;
use crate::session::Session;
use std::fmt;

/// Why a single navigation step failed.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationFailure {
    KeyNotFound { key: String, available: Vec<String> },
    InvalidIndex { step: String },
    IndexOutOfRange { index: i64, length: usize },
    NotNavigable { node_type: &'static str },
    UnresolvableReference { id: ObjectId, detail: String },
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationFailure::KeyNotFound { key, available } => write!(
                f,
                "Key '{key}' not found in dictionary. Available keys: [{}]",
                available.join(", ")
            ),
            NavigationFailure::InvalidIndex { step } => write!(f, "Invalid array index: '{step}'"),
            NavigationFailure::IndexOutOfRange { index, length } => write!(
                f,
                "Array index {index} out of range. Array length: {length}"
            ),
            NavigationFailure::NotNavigable { node_type } => {
                write!(f, "Cannot navigate into object of type: {node_type}")
            }
            NavigationFailure::UnresolvableReference { id, detail } => {
                write!(f, "Cannot resolve indirect reference {id}: {detail}")
            }
        }
    }
}

impl std::error::Error for NavigationFailure {}

/// A path that could not be followed to the end.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to navigate path '{path}' at step '{step}'")]
pub struct NavigationError {
    /// The full requested path
    pub path: String,
    /// The step that failed
    pub step: String,
    /// Zero-based position of the failing step
    pub index: usize,
    /// Steps successfully taken before the failure, joined by `.`
    pub consumed: String,
    #[source]
    pub reason: NavigationFailure,
}

impl NavigationError {
    /// Path up to and including the failing step
    pub fn reached(&self) -> String {
        if self.consumed.is_empty() {
            self.step.clone()
        } else {
            format!("{}.{}", self.consumed, self.step)
        }
    }

    pub fn details(&self) -> String {
        format!("Error at '{}': {}", self.reached(), self.reason)
    }
}

/// Follow `path` from `start`, dereferencing pointers through `session`.
pub fn navigate<G: ObjectGraph + ?Sized>(
    graph: &G,
    start: SerializedNode,
    path: &str,
    session: &mut Session,
) -> Result<SerializedNode, NavigationError> {
    let steps: Vec<&str> = path.split('.').collect();
    let mut current = start;

    for (index, step) in steps.iter().enumerate() {
        current = step_into(graph, current, step, session).map_err(|reason| NavigationError {
            path: path.to_string(),
            step: step.to_string(),
            index,
            consumed: steps[..index].join("."),
            reason,
        })?;
    }

    Ok(current)
}

fn step_into<G: ObjectGraph + ?Sized>(
    graph: &G,
    node: SerializedNode,
    step: &str,
    session: &mut Session,
) -> Result<SerializedNode, NavigationFailure> {
    let node = match node {
        SerializedNode::IndirectRef { id } => dereference(graph, id, session)?,
        other => other,
    };

    match node {
        SerializedNode::Dict { mut value } => {
            if let Some(found) = value.remove(&format!("/{step}")) {
                return Ok(found);
            }
            value
                .remove(step)
                .ok_or_else(|| NavigationFailure::KeyNotFound {
                    key: step.to_string(),
                    available: value.into_keys().collect(),
                })
        }
        SerializedNode::Array { mut value } => {
            let index: i64 = step
                .trim()
                .parse()
                .map_err(|_| NavigationFailure::InvalidIndex {
                    step: step.to_string(),
                })?;
            let length = value.len();
            match usize::try_from(index) {
                Ok(position) if position < length => Ok(value.swap_remove(position)),
                _ => Err(NavigationFailure::IndexOutOfRange { index, length }),
            }
        }
        other => Err(NavigationFailure::NotNavigable {
            node_type: other.tag(),
        }),
    }
}

fn dereference<G: ObjectGraph + ?Sized>(
    graph: &G,
    id: ObjectId,
    session: &mut Session,
) -> Result<SerializedNode, NavigationFailure> {
    match session.store().get(&id) {
        // Dangling targets are stored as null; let the graph say why
        Some(SerializedNode::Null) | None => {}
        Some(node) => return Ok(node.clone()),
    }

    let unresolvable = |detail: String| NavigationFailure::UnresolvableReference { id, detail };
    let object = graph.object(id).map_err(|e| unresolvable(e.to_string()))?;
    serialize(graph, &object, session).map_err(|e| unresolvable(e.to_string()))
}
