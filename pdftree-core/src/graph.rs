//! Document object graph access
//!
//! The serializer only ever talks to a document through [`ObjectGraph`]:
//! fetch an object by id, fetch the catalog, and ask for a stream's decoded
//! length. [`PdfFile`](crate::document::PdfFile) implements it over a real
//! file; [`MemoryGraph`] implements it over objects built by hand.

use crate::error::{TreeError, TreeResult};
use crate::objects::{PdfObject, PdfStream};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canonical identity of an indirect object: `(number, generation)`.
///
/// Renders as `"<number>-<generation>"`; the same string is used as the
/// key of reference stores in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub number: u32,
    pub generation: u16,
}

impl ObjectId {
    pub const fn new(number: u32, generation: u16) -> Self {
        ObjectId { number, generation }
    }

    /// Parse the hyphenated form used by object resolution, e.g. `"12-0"`.
    pub fn parse_canonical(input: &str) -> TreeResult<Self> {
        let parts: Vec<&str> = input.split('-').collect();
        Self::from_parts(&parts).ok_or_else(|| TreeError::InvalidObjectId {
            id: input.to_string(),
            expected: "1-0",
        })
    }

    /// Parse the space-separated form used by tree fetches, e.g. `"12 0"`.
    pub fn parse_spaced(input: &str) -> TreeResult<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        Self::from_parts(&parts).ok_or_else(|| TreeError::InvalidObjectId {
            id: input.to_string(),
            expected: "1 0",
        })
    }

    fn from_parts(parts: &[&str]) -> Option<Self> {
        match parts {
            [number, generation] => Some(ObjectId::new(
                number.trim().parse().ok()?,
                generation.trim().parse().ok()?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.generation)
    }
}

impl From<(u32, u16)> for ObjectId {
    fn from((number, generation): (u32, u16)) -> Self {
        ObjectId::new(number, generation)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_canonical(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_canonical(&raw).map_err(serde::de::Error::custom)
    }
}

/// Failures reported by an [`ObjectGraph`].
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Object {id} not found: {reason}")]
    ObjectNotFound { id: ObjectId, reason: String },

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Graph internal error: {0}")]
    Internal(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Read-only access to a parsed document's objects.
///
/// Implementations must be safe to share between concurrent operations;
/// the serializer never mutates the graph.
pub trait ObjectGraph {
    /// Fetch the indirect object with the given id.
    fn object(&self, id: ObjectId) -> GraphResult<Cow<'_, PdfObject>>;

    /// Fetch the document catalog (the trailer's `/Root`).
    fn catalog(&self) -> GraphResult<Cow<'_, PdfObject>>;

    /// Length of the stream's data after applying its filters, when it can
    /// be determined.
    fn decoded_length(&self, stream: &PdfStream) -> Option<usize> {
        stream.decode().ok().map(|data| data.len())
    }
}

impl<G: ObjectGraph + ?Sized> ObjectGraph for &G {
    fn object(&self, id: ObjectId) -> GraphResult<Cow<'_, PdfObject>> {
        (**self).object(id)
    }

    fn catalog(&self) -> GraphResult<Cow<'_, PdfObject>> {
        (**self).catalog()
    }

    fn decoded_length(&self, stream: &PdfStream) -> Option<usize> {
        (**self).decoded_length(stream)
    }
}

/// An object graph held entirely in memory.
///
/// Counts every object lookup, which makes it convenient for checking how
/// much of a graph an operation actually touched.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    objects: HashMap<ObjectId, PdfObject>,
    root: Option<ObjectId>,
    lookups: AtomicUsize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an indirect object
    pub fn insert(&mut self, id: impl Into<ObjectId>, object: impl Into<PdfObject>) {
        self.objects.insert(id.into(), object.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_object(mut self, id: impl Into<ObjectId>, object: impl Into<PdfObject>) -> Self {
        self.insert(id, object);
        self
    }

    /// Designate the catalog object
    pub fn with_root(mut self, id: impl Into<ObjectId>) -> Self {
        self.root = Some(id.into());
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of object lookups served so far (catalog lookups included).
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl ObjectGraph for MemoryGraph {
    fn object(&self, id: ObjectId) -> GraphResult<Cow<'_, PdfObject>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.objects
            .get(&id)
            .map(Cow::Borrowed)
            .ok_or_else(|| GraphError::ObjectNotFound {
                id,
                reason: format!("no object {} {} in document", id.number, id.generation),
            })
    }

    fn catalog(&self) -> GraphResult<Cow<'_, PdfObject>> {
        let root = self
            .root
            .ok_or_else(|| GraphError::InvalidStructure("trailer has no /Root entry".to_string()))?;
        self.object(root).map_err(|err| match err {
            GraphError::ObjectNotFound { id, .. } => {
                GraphError::InvalidStructure(format!("catalog object {id} is missing"))
            }
            other => other,
        })
    }
}
