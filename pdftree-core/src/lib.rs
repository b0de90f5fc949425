//! # pdftree
//!
//! Inspect the internal object graph of a PDF document as a JSON-shaped tree.
//!
//! The crate walks an already-parsed object graph, converts every object into
//! a tagged [`SerializedNode`], and answers dotted-path queries such as
//! `Pages.Kids.0` against the result. Two resolution strategies are offered:
//!
//! - **lazy**: indirect references stay `indirect_ref` pointers;
//! - **full**: every distinct reachable reference is expanded exactly once
//!   into a side table of `indirect_objects`, which also breaks cycles.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftree::{fetch_tree_file, InspectOptions, ResolutionMode, TreeRequest};
//!
//! # fn main() -> pdftree::TreeResult<()> {
//! let request = TreeRequest::new(ResolutionMode::Lazy).with_path("Pages.Kids.0");
//! let response = fetch_tree_file("document.pdf", &request, &InspectOptions::default())?;
//! println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! Graphs other than files on disk plug in through [`ObjectGraph`];
//! [`MemoryGraph`] is an in-memory implementation.

pub mod document;
pub mod encoding;
pub mod error;
pub mod filters;
pub mod graph;
pub mod inspect;
pub mod navigator;
pub mod node;
pub mod objects;
pub mod serializer;
pub mod session;

pub use document::PdfFile;
pub use error::{ErrorEnvelope, TreeError, TreeResult};
pub use graph::{GraphError, GraphResult, MemoryGraph, ObjectGraph, ObjectId};
pub use inspect::{
    fetch_tree, fetch_tree_file, resolve_object, resolve_object_file, InspectOptions,
    ResolveDepth, ResolveResponse, TreeRequest, TreeResponse,
};
pub use navigator::{navigate, NavigationError, NavigationFailure};
pub use node::{Number, ReferenceStore, SerializedNode, StringEncoding};
pub use objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream, PdfString};
pub use serializer::serialize;
pub use session::{ResolutionMode, Session, MAX_NESTING_DEPTH};

/// Current version of pdftree
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
