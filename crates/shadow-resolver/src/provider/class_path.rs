// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::HashMap, sync::Arc};

use decl_model::{
    artifact::ClassDescriptor,
    ast::DeclarationTree,
    factory::{FactoryId, TypeReference},
};

use super::{ArtifactLoader, LoaderError, MetadataProvider};

/// An in-memory class path: every compiled class it knows, by qualified name.
#[derive(Debug, Default, Clone)]
pub struct ClassUniverse {
    classes: HashMap<String, Arc<ClassDescriptor>>,
}

impl ClassUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.insert(class);
        self
    }

    pub fn insert(&mut self, class: ClassDescriptor) {
        self.classes.insert(class.name.clone(), Arc::new(class));
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassDescriptor> for ClassUniverse {
    fn from_iter<T: IntoIterator<Item = ClassDescriptor>>(iter: T) -> Self {
        let mut universe = ClassUniverse::new();
        iter.into_iter().for_each(|class| universe.insert(class));
        universe
    }
}

impl ArtifactLoader for ClassUniverse {
    fn load(&self, qualified_name: &str) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        Ok(self.classes.get(qualified_name).cloned())
    }
}

/// Binary-backed metadata: routes each reference to the loader of its factory's class path.
#[derive(Default, Clone)]
pub struct ClassPathProvider {
    class_paths: HashMap<FactoryId, Arc<dyn ArtifactLoader>>,
}

impl ClassPathProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_path(mut self, factory: FactoryId, loader: Arc<dyn ArtifactLoader>) -> Self {
        self.bind(factory, loader);
        self
    }

    /// Bind `factory` to `loader`, replacing any previous binding.
    pub fn bind(&mut self, factory: FactoryId, loader: Arc<dyn ArtifactLoader>) {
        self.class_paths.insert(factory, loader);
    }
}

impl MetadataProvider for ClassPathProvider {
    fn serves(&self, factory: FactoryId) -> bool {
        self.class_paths.contains_key(&factory)
    }

    fn load_class(
        &self,
        _tree: &DeclarationTree,
        reference: &TypeReference,
    ) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        let loader = self
            .class_paths
            .get(&reference.factory())
            .ok_or(LoaderError::UnboundFactory(reference.factory()))?;

        tracing::trace!(
            "Loading {} from the class path of {}",
            reference,
            reference.factory()
        );
        loader.load(reference.qualified_name())
    }
}
