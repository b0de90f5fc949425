//! Per-operation serialization state
//!
//! A [`Session`] bundles the resolution mode, the set of references already
//! claimed for expansion, the store of expanded objects and the nesting
//! guard. Every top-level operation builds a fresh one and drops it when the
//! operation completes; sessions are never shared or reused.

use crate::error::{TreeError, TreeResult};
use crate::graph::ObjectId;
use crate::node::{ReferenceStore, SerializedNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Maximum inline nesting depth of a serialized object
pub const MAX_NESTING_DEPTH: usize = 1000;

/// How indirect references are treated while serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Leave every reference as a pointer
    #[default]
    Lazy,
    /// Expand every distinct reference once into the reference store
    Full,
}

#[derive(Debug)]
pub struct Session {
    mode: ResolutionMode,
    visited: HashSet<ObjectId>,
    store: ReferenceStore,
    pending: VecDeque<ObjectId>,
    depth: usize,
    max_depth: usize,
}

impl Session {
    pub fn new(mode: ResolutionMode) -> Self {
        Self::with_max_depth(mode, MAX_NESTING_DEPTH)
    }

    /// Create a session with a custom nesting limit
    pub fn with_max_depth(mode: ResolutionMode, max_depth: usize) -> Self {
        Session {
            mode,
            visited: HashSet::new(),
            store: ReferenceStore::new(),
            pending: VecDeque::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn is_lazy(&self) -> bool {
        self.mode == ResolutionMode::Lazy
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    pub fn into_store(self) -> ReferenceStore {
        self.store
    }

    pub fn is_visited(&self, id: &ObjectId) -> bool {
        self.visited.contains(id)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Claim `id` for expansion. Returns `false` if it was already claimed
    /// in this session, in which case it must not be expanded again.
    pub(crate) fn claim(&mut self, id: ObjectId) -> bool {
        if !self.visited.insert(id) {
            return false;
        }
        self.pending.push_back(id);
        true
    }

    pub(crate) fn next_pending(&mut self) -> Option<ObjectId> {
        self.pending.pop_front()
    }

    pub(crate) fn record(&mut self, id: ObjectId, node: SerializedNode) {
        self.store.insert(id, node);
    }

    /// Enter one level of inline nesting
    pub(crate) fn enter(&mut self) -> TreeResult<()> {
        if self.depth + 1 > self.max_depth {
            return Err(TreeError::RecursionLimit {
                depth: self.depth + 1,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of inline nesting
    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
