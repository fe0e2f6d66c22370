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
    artifact::{AnnotationInstance, ClassDescriptor, MethodDescriptor},
    ast::{AnnotationUseId, DeclarationOrigin, DeclarationTree, TypeDeclaration},
    factory::{FactoryId, TypeReference},
};

use super::{LoaderError, MetadataProvider};

/// Source-backed metadata: describes declarations the AST builder parsed from source, in the
/// same shape a compiled artifact would have.
///
/// Only annotation uses whose values the builder evaluated (`source_values`) are visible; shadow
/// declarations are never described, so a layered provider falls through to the class path.
#[derive(Debug, Clone, Copy)]
pub struct SourceProvider {
    factory: FactoryId,
}

impl SourceProvider {
    /// A provider for the declarations parsed under `factory`.
    pub fn new(factory: FactoryId) -> Self {
        Self { factory }
    }
}

impl MetadataProvider for SourceProvider {
    fn serves(&self, factory: FactoryId) -> bool {
        factory == self.factory
    }

    fn load_class(
        &self,
        tree: &DeclarationTree,
        reference: &TypeReference,
    ) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        if reference.factory() != self.factory {
            return Err(LoaderError::UnboundFactory(reference.factory()));
        }

        Ok(tree
            .type_by_name(reference.qualified_name())
            .filter(|decl| decl.origin == DeclarationOrigin::Source && decl.factory == self.factory)
            .map(|decl| Arc::new(describe(tree, decl))))
    }
}

fn describe(tree: &DeclarationTree, decl: &TypeDeclaration) -> ClassDescriptor {
    let methods = decl
        .methods
        .iter()
        .filter_map(|id| tree.method(*id))
        .map(|method| MethodDescriptor {
            name: method.name.clone(),
            parameter_types: method.parameters.iter().map(|p| p.typ.descriptor()).collect(),
            annotations: evaluated_annotations(tree, &method.annotations),
            default_value: method.default_value.clone(),
        })
        .collect();

    ClassDescriptor {
        name: decl.qualified_name.clone(),
        kind: decl.kind,
        annotations: evaluated_annotations(tree, &decl.annotations),
        methods,
    }
}

fn evaluated_annotations(
    tree: &DeclarationTree,
    ids: &[AnnotationUseId],
) -> Vec<AnnotationInstance> {
    ids.iter()
        .filter_map(|id| tree.annotation_use(*id))
        .filter_map(|annotation_use| {
            annotation_use.source_values.as_ref().map(|values| {
                AnnotationInstance::from_values(
                    annotation_use.annotation_type.qualified_name(),
                    values.clone(),
                )
            })
        })
        .collect()
}
