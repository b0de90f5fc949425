//! PDF files as object graphs
//!
//! [`PdfFile`] loads a document with `lopdf` and exposes it through
//! [`ObjectGraph`]. Objects are converted into the crate's own model on each
//! fetch; nested references stay unresolved.

use crate::error::{TreeError, TreeResult};
use crate::graph::{GraphError, GraphResult, ObjectGraph, ObjectId};
use crate::objects::{PdfDictionary, PdfName, PdfObject, PdfStream, PdfString};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A PDF document loaded from disk.
pub struct PdfFile {
    path: PathBuf,
    document: lopdf::Document,
}

impl std::fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("path", &self.path)
            .field("objects", &self.document.objects.len())
            .finish()
    }
}

impl PdfFile {
    /// Open and parse the document at `path`.
    ///
    /// A missing or unreadable file is a document-access failure; bytes that
    /// do not form a usable document are a parsing failure.
    pub fn open<P: AsRef<Path>>(path: P) -> TreeResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(TreeError::DocumentAccess {
                path: shown,
                details: None,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| TreeError::DocumentAccess {
            path: shown.clone(),
            details: Some(e.to_string()),
        })?;

        let document =
            lopdf::Document::load_mem(&bytes).map_err(|e| TreeError::Parsing(e.to_string()))?;
        debug!(path = %shown, objects = document.objects.len(), "loaded PDF");

        Ok(PdfFile {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PDF version from the file header
    pub fn version(&self) -> &str {
        &self.document.version
    }
}

impl ObjectGraph for PdfFile {
    fn object(&self, id: ObjectId) -> GraphResult<Cow<'_, PdfObject>> {
        self.document
            .get_object((id.number, id.generation))
            .map(|object| Cow::Owned(convert(object)))
            .map_err(|e| GraphError::ObjectNotFound {
                id,
                reason: e.to_string(),
            })
    }

    fn catalog(&self) -> GraphResult<Cow<'_, PdfObject>> {
        let root = self
            .document
            .trailer
            .get(b"Root")
            .map_err(|_| GraphError::InvalidStructure("trailer has no /Root entry".to_string()))?;

        match root {
            lopdf::Object::Reference((number, generation)) => {
                let id = ObjectId::new(*number, *generation);
                self.object(id).map_err(|err| match err {
                    GraphError::ObjectNotFound { reason, .. } => GraphError::InvalidStructure(
                        format!("catalog object {id} cannot be loaded: {reason}"),
                    ),
                    other => other,
                })
            }
            lopdf::Object::Dictionary(_) => Ok(Cow::Owned(convert(root))),
            other => Err(GraphError::InvalidStructure(format!(
                "trailer /Root is a {}, expected a dictionary",
                convert(other).type_name()
            ))),
        }
    }
}

fn convert(object: &lopdf::Object) -> PdfObject {
    match object {
        lopdf::Object::Null => PdfObject::Null,
        lopdf::Object::Boolean(value) => PdfObject::Boolean(*value),
        lopdf::Object::Integer(value) => PdfObject::Integer(*value),
        lopdf::Object::Real(value) => PdfObject::Real(real_value(*value)),
        lopdf::Object::Name(name) => {
            PdfObject::Name(PdfName(String::from_utf8_lossy(name).into_owned()))
        }
        lopdf::Object::String(bytes, _) => PdfObject::String(PdfString::new(bytes.clone())),
        lopdf::Object::Array(items) => PdfObject::Array(items.iter().map(convert).collect()),
        lopdf::Object::Dictionary(dict) => PdfObject::Dictionary(convert_dict(dict)),
        lopdf::Object::Stream(stream) => PdfObject::Stream(PdfStream::new(
            convert_dict(&stream.dict),
            stream.content.clone(),
        )),
        lopdf::Object::Reference((number, generation)) => {
            PdfObject::Reference(*number, *generation)
        }
        #[allow(unreachable_patterns)]
        other => PdfObject::Other {
            kind: "lopdf::Object".to_string(),
            repr: format!("{other:?}"),
        },
    }
}

/// Widen a stored real through its shortest decimal form, so `595.28`
/// stays `595.28` instead of exposing single-precision noise.
fn real_value(value: f32) -> f64 {
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}

fn convert_dict(dict: &lopdf::Dictionary) -> PdfDictionary {
    let mut converted = PdfDictionary::new();
    for (key, value) in dict.iter() {
        converted.insert(String::from_utf8_lossy(key).into_owned(), convert(value));
    }
    converted
}
