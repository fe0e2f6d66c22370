// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use decl_model::{
    artifact::ClassDescriptor,
    ast::DeclarationTree,
    factory::{FactoryId, TypeReference},
};

use super::{LoaderError, MetadataProvider};

/// Consults providers in order of precedence (first is highest); the first one that knows the
/// class wins.
#[derive(Clone)]
pub struct LayeredProvider {
    layers: Vec<Arc<dyn MetadataProvider>>,
}

impl LayeredProvider {
    pub fn new(layers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self { layers }
    }
}

impl MetadataProvider for LayeredProvider {
    fn serves(&self, factory: FactoryId) -> bool {
        self.layers.iter().any(|layer| layer.serves(factory))
    }

    fn load_class(
        &self,
        tree: &DeclarationTree,
        reference: &TypeReference,
    ) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        let factory = reference.factory();
        let mut served = false;

        for layer in self.layers.iter().filter(|layer| layer.serves(factory)) {
            served = true;
            if let Some(class) = layer.load_class(tree, reference)? {
                return Ok(Some(class));
            }
        }

        if served {
            Ok(None)
        } else {
            Err(LoaderError::UnboundFactory(factory))
        }
    }
}
