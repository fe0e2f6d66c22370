// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Sources of compiled metadata.
//!
//! The resolver never inspects artifacts itself. It asks a [`MetadataProvider`] for the
//! [`ClassDescriptor`] a (factory-bound) type reference names and reads members, signatures and
//! annotation instances off that. Providers exist for binary artifacts ([`ClassPathProvider`]),
//! for declarations parsed from source ([`SourceProvider`]), and for stacking the two
//! ([`LayeredProvider`]).

mod class_path;
mod layered;
mod source;

use std::sync::Arc;

use decl_model::{
    artifact::ClassDescriptor,
    ast::DeclarationTree,
    factory::{FactoryId, TypeReference},
};
use thiserror::Error;

pub use class_path::{ClassPathProvider, ClassUniverse};
pub use layered::LayeredProvider;
pub use source::SourceProvider;

pub trait MetadataProvider: Send + Sync {
    /// Can references bound to `factory` be resolved by this provider at all?
    fn serves(&self, factory: FactoryId) -> bool;

    /// Load the class `reference` names in the universe of its factory.
    ///
    /// `Ok(None)` means the universe was searched and has no such class.
    fn load_class(
        &self,
        tree: &DeclarationTree,
        reference: &TypeReference,
    ) -> Result<Option<Arc<ClassDescriptor>>, LoaderError>;
}

/// Loads compiled artifacts by qualified name within a single class path universe.
pub trait ArtifactLoader: Send + Sync {
    fn load(&self, qualified_name: &str) -> Result<Option<Arc<ClassDescriptor>>, LoaderError>;
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No class path is bound to {0}")]
    UnboundFactory(FactoryId),

    #[error("Class `{name}` could not be defined: {message}")]
    Linkage { name: String, message: String },

    #[error("{0}")]
    BoxedError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}
