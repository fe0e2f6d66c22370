// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use decl_model::ast::{AnnotationUseId, TreeId};

use crate::resolved::ResolvedAnnotation;

/// Resolved annotations keyed by the identity of their annotation-use node: the tree that issued
/// the id, and the id itself.
///
/// Entries are written once and never evicted. The lock is only held for the map operation
/// itself, never while an annotation is being resolved.
type NodeKey = (TreeId, AnnotationUseId);

#[derive(Debug, Default)]
pub struct AnnotationCache {
    entries: Mutex<HashMap<NodeKey, Arc<ResolvedAnnotation>>>,
}

impl AnnotationCache {
    pub fn get(&self, tree: TreeId, id: AnnotationUseId) -> Option<Arc<ResolvedAnnotation>> {
        self.entries().get(&(tree, id)).cloned()
    }

    /// Store `resolved` unless the node already has an entry. Returns whichever instance is
    /// cached afterwards.
    pub fn insert(
        &self,
        tree: TreeId,
        id: AnnotationUseId,
        resolved: Arc<ResolvedAnnotation>,
    ) -> Arc<ResolvedAnnotation> {
        self.entries().entry((tree, id)).or_insert(resolved).clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<NodeKey, Arc<ResolvedAnnotation>>> {
        // a panic while holding the lock cannot leave a half-written entry behind
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
