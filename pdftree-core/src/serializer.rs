//! Object graph to tree serialization
//!
//! Converts a [`PdfObject`] into a [`SerializedNode`]. Inline containers are
//! walked recursively under the session's nesting guard. Indirect references
//! always serialize as thin `indirect_ref` pointers; in full mode each
//! distinct id is additionally claimed once and expanded into the session's
//! reference store from a work queue, so reference chains of any length or
//! shape never deepen the call stack and cycles terminate.

use crate::error::TreeResult;
use crate::graph::{GraphError, ObjectGraph, ObjectId};
use crate::node::{Number, SerializedNode, StringEncoding};
use crate::objects::{PdfDictionary, PdfObject, PdfString};
use crate::session::Session;
use std::collections::BTreeMap;
use tracing::debug;

/// Serialize `object` and, in full mode, every object reachable from it.
pub fn serialize<G: ObjectGraph + ?Sized>(
    graph: &G,
    object: &PdfObject,
    session: &mut Session,
) -> TreeResult<SerializedNode> {
    let node = serialize_inline(graph, object, session)?;
    expand_pending(graph, session)?;
    Ok(node)
}

fn expand_pending<G: ObjectGraph + ?Sized>(graph: &G, session: &mut Session) -> TreeResult<()> {
    while let Some(id) = session.next_pending() {
        let node = match graph.object(id) {
            Ok(object) => serialize_inline(graph, &object, session)?,
            Err(GraphError::ObjectNotFound { reason, .. }) => {
                debug!(%id, %reason, "dangling reference serialized as null");
                SerializedNode::Null
            }
            Err(err) => return Err(err.into()),
        };
        session.record(id, node);
    }
    Ok(())
}

fn serialize_inline<G: ObjectGraph + ?Sized>(
    graph: &G,
    object: &PdfObject,
    session: &mut Session,
) -> TreeResult<SerializedNode> {
    session.enter()?;
    let result = serialize_value(graph, object, session);
    session.exit();
    result
}

fn serialize_value<G: ObjectGraph + ?Sized>(
    graph: &G,
    object: &PdfObject,
    session: &mut Session,
) -> TreeResult<SerializedNode> {
    let node = match object {
        PdfObject::Null => SerializedNode::Null,
        PdfObject::Boolean(value) => SerializedNode::Boolean { value: *value },
        PdfObject::Integer(value) => SerializedNode::Number {
            value: Number::Integer(*value),
        },
        PdfObject::Real(value) => SerializedNode::Number {
            value: Number::Real(*value),
        },
        PdfObject::String(string) => serialize_string(string),
        PdfObject::Name(name) => SerializedNode::Name {
            value: name.to_symbol(),
        },
        PdfObject::Array(array) => SerializedNode::Array {
            value: array
                .iter()
                .map(|item| serialize_inline(graph, item, session))
                .collect::<TreeResult<_>>()?,
        },
        PdfObject::Dictionary(dict) => serialize_dict(graph, dict, session)?,
        PdfObject::Stream(stream) => SerializedNode::Stream {
            dictionary: Box::new(serialize_dict(graph, &stream.dict, session)?),
            has_data: true,
            data_length: graph.decoded_length(stream),
        },
        PdfObject::Reference(number, generation) => {
            let id = ObjectId::new(*number, *generation);
            if !session.is_lazy() {
                session.claim(id);
            }
            SerializedNode::IndirectRef { id }
        }
        PdfObject::Other { kind, repr } => SerializedNode::Unknown {
            object_type: kind.clone(),
            value: repr.clone(),
        },
    };
    Ok(node)
}

fn serialize_dict<G: ObjectGraph + ?Sized>(
    graph: &G,
    dict: &PdfDictionary,
    session: &mut Session,
) -> TreeResult<SerializedNode> {
    let mut value = BTreeMap::new();
    for (key, item) in dict.iter() {
        value.insert(key.to_symbol(), serialize_inline(graph, item, session)?);
    }
    Ok(SerializedNode::Dict { value })
}

fn serialize_string(string: &PdfString) -> SerializedNode {
    match string.to_text() {
        Some(value) => SerializedNode::String {
            value,
            encoding: StringEncoding::Text,
        },
        None => SerializedNode::String {
            value: string.to_hex(),
            encoding: StringEncoding::Bytes,
        },
    }
}
