// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::value::TypeDescriptor;

/// Identifies the binding context (class path universe) a declaration was modelled in.
///
/// Two references with the same qualified name but different factories may resolve to different
/// compiled artifacts, so a reference is only meaningful together with its factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactoryId(pub u32);

impl Display for FactoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "factory#{}", self.0)
    }
}

/// A reference to a type by qualified name, bound to the factory that should resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    qualified_name: String,
    factory: FactoryId,
}

impl TypeReference {
    pub fn new(qualified_name: impl Into<String>, factory: FactoryId) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            factory,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn factory(&self) -> FactoryId {
        self.factory
    }

    /// The same reference, bound to `factory` instead.
    pub fn rebind(&self, factory: FactoryId) -> Self {
        Self {
            qualified_name: self.qualified_name.clone(),
            factory,
        }
    }

    /// The compiled-artifact class this reference names (for signature matching).
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.qualified_name.as_str())
    }
}

impl Display for TypeReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified_name)
    }
}
