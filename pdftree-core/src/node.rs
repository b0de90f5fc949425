//! JSON-shaped tree produced by the serializer

use crate::graph::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric value, keeping integers and reals apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// Whether a string decoded as text or is carried as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringEncoding {
    Text,
    Bytes,
}

/// One node of the serialized object tree.
///
/// Serializes with a `"type"` tag, e.g. `{"type": "indirect_ref", "id": "3-0"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SerializedNode {
    Name {
        value: String,
    },
    String {
        value: String,
        encoding: StringEncoding,
    },
    Number {
        value: Number,
    },
    Boolean {
        value: bool,
    },
    Null,
    IndirectRef {
        id: ObjectId,
    },
    Array {
        value: Vec<SerializedNode>,
    },
    Dict {
        value: BTreeMap<String, SerializedNode>,
    },
    Stream {
        /// Always a [`SerializedNode::Dict`]
        dictionary: Box<SerializedNode>,
        has_data: bool,
        data_length: Option<usize>,
    },
    Unknown {
        object_type: String,
        value: String,
    },
}

impl SerializedNode {
    /// The `"type"` tag this node serializes with.
    pub fn tag(&self) -> &'static str {
        match self {
            SerializedNode::Name { .. } => "name",
            SerializedNode::String { .. } => "string",
            SerializedNode::Number { .. } => "number",
            SerializedNode::Boolean { .. } => "boolean",
            SerializedNode::Null => "null",
            SerializedNode::IndirectRef { .. } => "indirect_ref",
            SerializedNode::Array { .. } => "array",
            SerializedNode::Dict { .. } => "dict",
            SerializedNode::Stream { .. } => "stream",
            SerializedNode::Unknown { .. } => "unknown",
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        SerializedNode::Name {
            value: value.into(),
        }
    }

    pub fn integer(value: i64) -> Self {
        SerializedNode::Number {
            value: Number::Integer(value),
        }
    }

    pub fn real(value: f64) -> Self {
        SerializedNode::Number {
            value: Number::Real(value),
        }
    }

    pub fn reference(id: impl Into<ObjectId>) -> Self {
        SerializedNode::IndirectRef { id: id.into() }
    }

    /// Referenced id when this node is an `indirect_ref`.
    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            SerializedNode::IndirectRef { id } => Some(*id),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, SerializedNode>> {
        match self {
            SerializedNode::Dict { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SerializedNode]> {
        match self {
            SerializedNode::Array { value } => Some(value),
            _ => None,
        }
    }

    /// Ids of every `indirect_ref` directly or inline-nested in this node.
    pub fn references(&self) -> Vec<ObjectId> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                SerializedNode::IndirectRef { id } => found.push(*id),
                SerializedNode::Array { value } => stack.extend(value.iter()),
                SerializedNode::Dict { value } => stack.extend(value.values()),
                SerializedNode::Stream { dictionary, .. } => stack.push(dictionary),
                _ => {}
            }
        }
        found
    }
}

/// Expanded objects of a full or deep operation, keyed by canonical id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceStore(BTreeMap<ObjectId, SerializedNode>);

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SerializedNode> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.0.contains_key(id)
    }

    pub fn insert(&mut self, id: ObjectId, node: SerializedNode) {
        self.0.insert(id, node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &SerializedNode)> {
        self.0.iter()
    }
}
