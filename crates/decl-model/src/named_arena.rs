// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A slab of declarations that can also be looked up by qualified name.
//!
//! Type declarations are referred to in two ways: by their stable arena index (from annotation-use
//! parents and method owners) and by their qualified name (when a provider is asked for
//! `com.example.Foo`). Keeping both in one structure avoids a linear scan for the latter.

use std::{collections::HashMap, ops};

use serde::{Deserialize, Serialize};
use typed_generational_arena::{Arena, IgnoreGeneration, Index};

pub type SerializableSlab<T> = Arena<T, usize, IgnoreGeneration>;
pub type SerializableSlabIndex<T> = Index<T, usize, IgnoreGeneration>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedArena<V> {
    values: SerializableSlab<V>,
    by_name: HashMap<String, SerializableSlabIndex<V>>,
}

impl<V> NamedArena<V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<SerializableSlabIndex<V>> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: SerializableSlabIndex<V>) -> Option<&V> {
        self.values.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&V> {
        self.id_of(name).and_then(|id| self.values.get(id))
    }

    /// Insert `value` under `name`. A name is only ever bound once: inserting an already known
    /// name leaves the arena untouched and returns the existing index.
    pub fn insert(&mut self, name: &str, value: V) -> SerializableSlabIndex<V> {
        if let Some(existing) = self.id_of(name) {
            return existing;
        }

        let id = self.values.insert(value);
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn iter(&self) -> typed_generational_arena::Iter<'_, V, usize, IgnoreGeneration> {
        self.values.iter()
    }
}

impl<V> Default for NamedArena<V> {
    fn default() -> Self {
        NamedArena {
            values: SerializableSlab::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<V> ops::Index<SerializableSlabIndex<V>> for NamedArena<V> {
    type Output = V;

    #[inline]
    fn index(&self, id: SerializableSlabIndex<V>) -> &V {
        &self.values[id]
    }
}

impl<V> ops::IndexMut<SerializableSlabIndex<V>> for NamedArena<V> {
    #[inline]
    fn index_mut(&mut self, id: SerializableSlabIndex<V>) -> &mut V {
        &mut self.values[id]
    }
}
