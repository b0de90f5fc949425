//! Top-level tree operations
//!
//! Each call creates its own [`Session`], runs to completion and returns a
//! self-contained response. Nothing is cached between calls, so concurrent
//! calls against the same graph never observe each other's state.

use crate::document::PdfFile;
use crate::error::{TreeError, TreeResult};
use crate::graph::{ObjectGraph, ObjectId};
use crate::navigator::navigate;
use crate::node::{ReferenceStore, SerializedNode};
use crate::serializer::serialize;
use crate::session::{ResolutionMode, Session, MAX_NESTING_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Resolution depth of a single-object resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveDepth {
    /// Direct properties only; references stay pointers
    #[default]
    Shallow,
    /// Every reachable reference expanded into `indirect_objects`
    Deep,
}

impl ResolveDepth {
    pub fn mode(self) -> ResolutionMode {
        match self {
            ResolveDepth::Shallow => ResolutionMode::Lazy,
            ResolveDepth::Deep => ResolutionMode::Full,
        }
    }
}

/// Limits applied to every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Maximum inline nesting depth before serialization fails
    pub max_depth: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl InspectOptions {
    fn session(&self, mode: ResolutionMode) -> Session {
        Session::with_max_depth(mode, self.max_depth)
    }
}

/// Arguments of a tree fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRequest {
    /// Start at this object (`"<num> <gen>"`) instead of the catalog
    #[serde(default)]
    pub object_id: Option<String>,
    /// Dotted path to follow from the starting object
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub mode: ResolutionMode,
}

impl TreeRequest {
    pub fn new(mode: ResolutionMode) -> Self {
        TreeRequest {
            mode,
            ..Default::default()
        }
    }

    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Result of a tree fetch. `indirect_objects` is present in full mode only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeResponse {
    pub result: SerializedNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indirect_objects: Option<ReferenceStore>,
}

/// Result of resolving one object. `indirect_objects` is present for deep
/// resolution only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub object_id: String,
    pub content: SerializedNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indirect_objects: Option<ReferenceStore>,
}

/// Serialize the catalog, or the object named in the request, and follow
/// the request's path if it has one.
pub fn fetch_tree<G: ObjectGraph + ?Sized>(
    graph: &G,
    request: &TreeRequest,
    options: &InspectOptions,
) -> TreeResult<TreeResponse> {
    let target = request
        .object_id
        .as_deref()
        .map(ObjectId::parse_spaced)
        .transpose()?;

    debug!(mode = ?request.mode, object_id = ?target, path = ?request.path, "fetching object tree");

    let start = match (target, request.object_id.as_deref()) {
        (Some(id), Some(raw)) => graph
            .object(id)
            .map_err(|err| TreeError::from_graph(raw, err))?,
        _ => graph.catalog()?,
    };

    let mut session = options.session(request.mode);
    let mut result = serialize(graph, &start, &mut session)?;

    if let Some(path) = request.path.as_deref().filter(|p| !p.is_empty()) {
        result = navigate(graph, result, path, &mut session)?;
    }

    let indirect_objects = match request.mode {
        ResolutionMode::Lazy => None,
        ResolutionMode::Full => Some(session.into_store()),
    };

    Ok(TreeResponse {
        result,
        indirect_objects,
    })
}

/// Resolve one object by its canonical id (`"<num>-<gen>"`).
pub fn resolve_object<G: ObjectGraph + ?Sized>(
    graph: &G,
    object_id: &str,
    depth: ResolveDepth,
    options: &InspectOptions,
) -> TreeResult<ResolveResponse> {
    let id = ObjectId::parse_canonical(object_id)?;
    debug!(%id, ?depth, "resolving object");

    let object = graph
        .object(id)
        .map_err(|err| TreeError::from_graph(object_id, err))?;

    let mut session = options.session(depth.mode());
    let content = serialize(graph, &object, &mut session)?;

    let indirect_objects = match depth {
        ResolveDepth::Shallow => None,
        ResolveDepth::Deep => Some(session.into_store()),
    };

    Ok(ResolveResponse {
        object_id: object_id.to_string(),
        content,
        indirect_objects,
    })
}

/// [`fetch_tree`] over the PDF file at `path`.
pub fn fetch_tree_file<P: AsRef<Path>>(
    path: P,
    request: &TreeRequest,
    options: &InspectOptions,
) -> TreeResult<TreeResponse> {
    let file = PdfFile::open(path)?;
    fetch_tree(&file, request, options)
}

/// [`resolve_object`] over the PDF file at `path`.
///
/// The id is validated before the file is opened.
pub fn resolve_object_file<P: AsRef<Path>>(
    path: P,
    object_id: &str,
    depth: ResolveDepth,
    options: &InspectOptions,
) -> TreeResult<ResolveResponse> {
    let path = path.as_ref();
    ObjectId::parse_canonical(object_id)?;
    if !path.exists() {
        return Err(TreeError::DocumentAccess {
            path: path.display().to_string(),
            details: None,
        });
    }
    let file = PdfFile::open(path)?;
    resolve_object(&file, object_id, depth, options)
}
