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
    artifact::{AnnotationInstance, ClassDescriptor, MethodDescriptor, signature_of},
    ast::{AnnotatedElement, AnnotationUseId, DeclarationTree, MethodDeclaration},
    factory::{FactoryId, TypeReference},
    value::{AnnotationValue, TypeDescriptor, ValueConversionError},
};

use crate::{
    cache::AnnotationCache,
    config::ResolverConfig,
    error::{ResolutionErrorKind, ResolutionFailure},
    provider::{LoaderError, MetadataProvider},
    resolved::ResolvedAnnotation,
};

/// Resolves annotation parameter values for declarations that may only exist as compiled
/// artifacts.
///
/// Each annotation use is resolved at most once; the result is kept in a cache owned by the
/// resolver (not by the tree) and keyed by the node's id together with the tree's id, so one
/// resolver can serve several trees. Failures are not cached.
pub struct ShadowResolver {
    provider: Arc<dyn MetadataProvider>,
    config: ResolverConfig,
    cache: AnnotationCache,
}

/// The member an annotation was read from. Anything else cannot carry a resolvable annotation.
enum AnnotatedMember<'t> {
    Method {
        owner: TypeReference,
        method: &'t MethodDeclaration,
    },
    Type(TypeReference),
}

impl ShadowResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::with_config(provider, ResolverConfig::default())
    }

    pub fn with_config(provider: Arc<dyn MetadataProvider>, config: ResolverConfig) -> Self {
        Self {
            provider,
            config,
            cache: AnnotationCache::default(),
        }
    }

    /// The value bound to `key` on the annotation applied by `annotation_use`.
    pub fn get_annotation_value(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
        key: &str,
    ) -> Result<AnnotationValue, ResolutionFailure> {
        self.resolved(tree, annotation_use)
            .and_then(|resolved| resolved.value(key).cloned())
            .map_err(|kind| ResolutionFailure::new(annotation_use, key, kind))
    }

    /// Like [`Self::get_annotation_value`], converted to the type the caller expects.
    pub fn get_annotation_value_as<T>(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
        key: &str,
    ) -> Result<T, ResolutionFailure>
    where
        T: TryFrom<AnnotationValue, Error = ValueConversionError>,
    {
        let value = self.get_annotation_value(tree, annotation_use, key)?;
        T::try_from(value).map_err(|e| ResolutionFailure::new(annotation_use, key, e.into()))
    }

    /// The class value of `key`, as a type reference bound to the factory of the annotated
    /// declaration.
    pub fn get_annotation_type_reference(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
        key: &str,
    ) -> Result<TypeReference, ResolutionFailure> {
        let descriptor: TypeDescriptor = self.get_annotation_value_as(tree, annotation_use, key)?;
        let factory = enclosing_factory(tree, annotation_use)
            .map_err(|kind| ResolutionFailure::new(annotation_use, key, kind))?;

        Ok(TypeReference::new(descriptor.name(), factory))
    }

    /// The class-array value of `key`, each element bound like
    /// [`Self::get_annotation_type_reference`].
    pub fn get_annotation_type_references(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
        key: &str,
    ) -> Result<Vec<TypeReference>, ResolutionFailure> {
        let values: Vec<AnnotationValue> =
            self.get_annotation_value_as(tree, annotation_use, key)?;
        let wrap = |kind| ResolutionFailure::new(annotation_use, key, kind);
        let factory = enclosing_factory(tree, annotation_use).map_err(wrap)?;

        values
            .into_iter()
            .map(|value| {
                TypeDescriptor::try_from(value)
                    .map(|descriptor| TypeReference::new(descriptor.name(), factory))
                    .map_err(|e| wrap(e.into()))
            })
            .collect()
    }

    /// The resolved annotation for `annotation_use`, if an earlier lookup has resolved it.
    pub fn cached(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
    ) -> Option<Arc<ResolvedAnnotation>> {
        self.cache.get(tree.id(), annotation_use)
    }

    fn resolved(
        &self,
        tree: &DeclarationTree,
        annotation_use: AnnotationUseId,
    ) -> Result<Arc<ResolvedAnnotation>, ResolutionErrorKind> {
        if let Some(resolved) = self.cache.get(tree.id(), annotation_use) {
            tracing::trace!(
                "Annotation use #{} already resolved",
                annotation_use.arr_idx()
            );
            return Ok(resolved);
        }

        let resolved = Arc::new(self.resolve(tree, annotation_use)?);
        Ok(self.cache.insert(tree.id(), annotation_use, resolved))
    }

    fn resolve(
        &self,
        tree: &DeclarationTree,
        id: AnnotationUseId,
    ) -> Result<ResolvedAnnotation, ResolutionErrorKind> {
        let annotation_use = tree
            .annotation_use(id)
            .ok_or_else(|| dangling(format!("annotation use #{}", id.arr_idx())))?;

        // Must fail before anything is loaded
        let member = annotated_member(tree, annotation_use.parent)?;

        let factory = enclosing_factory(tree, id)?;
        let annotation_type = self.repair_factory(&annotation_use.annotation_type, factory)?;
        let annotation_class = self.load(tree, &annotation_type)?;

        tracing::debug!(
            "Resolving @{} on a {} declaration",
            annotation_type,
            annotation_use.parent.kind_name()
        );

        let instance = match member {
            AnnotatedMember::Method { owner, method } => {
                let class = self.load(tree, &owner)?;
                let parameter_types = self.parameter_types(tree, method, factory)?;
                let compiled = exact_method(&class, &method.name, &parameter_types)?;
                annotation_on_method(&class, compiled, &annotation_type)?
            }
            AnnotatedMember::Type(reference) => {
                let class = self.load(tree, &reference)?;
                annotation_on_class(&class, &annotation_type)?
            }
        };

        Ok(ResolvedAnnotation::materialize(&annotation_class, &instance))
    }

    /// Bind the annotation type to the factory of the declaration it is applied to. The AST
    /// builder may have attached a default factory to references it synthesized for shadow
    /// elements, which would resolve the annotation against the wrong class path.
    fn repair_factory(
        &self,
        reference: &TypeReference,
        factory: FactoryId,
    ) -> Result<TypeReference, ResolutionErrorKind> {
        if !self.provider.serves(factory) {
            return Err(ResolutionErrorKind::FactoryMismatch { factory });
        }

        if reference.factory() != factory {
            if self.config.warn_on_factory_repair {
                tracing::warn!(
                    "Rebinding @{} from {} to {}",
                    reference,
                    reference.factory(),
                    factory
                );
            } else {
                tracing::debug!(
                    "Rebinding @{} from {} to {}",
                    reference,
                    reference.factory(),
                    factory
                );
            }
        }

        Ok(reference.rebind(factory))
    }

    /// The compiled classes of `method`'s parameter types, each loaded through the enclosing
    /// factory. Primitives (and arrays of them) need no loading.
    fn parameter_types(
        &self,
        tree: &DeclarationTree,
        method: &MethodDeclaration,
        factory: FactoryId,
    ) -> Result<Vec<TypeDescriptor>, ResolutionErrorKind> {
        method
            .parameters
            .iter()
            .map(|parameter| {
                let (element, dimensions) = parameter.typ.descriptor().split_array();
                if element.is_primitive() {
                    return Ok(element.array_of(dimensions));
                }

                let reference = TypeReference::new(element.name(), factory);
                let class = self.load(tree, &reference)?;
                Ok(class.descriptor().array_of(dimensions))
            })
            .collect()
    }

    fn load(
        &self,
        tree: &DeclarationTree,
        reference: &TypeReference,
    ) -> Result<Arc<ClassDescriptor>, ResolutionErrorKind> {
        match self.provider.load_class(tree, reference) {
            Ok(Some(class)) => Ok(class),
            Ok(None) => Err(ResolutionErrorKind::ArtifactNotFound(
                reference.qualified_name().to_string(),
            )),
            Err(LoaderError::UnboundFactory(factory)) => {
                Err(ResolutionErrorKind::FactoryMismatch { factory })
            }
            Err(e) => Err(ResolutionErrorKind::Loader(e)),
        }
    }
}

fn annotated_member(
    tree: &DeclarationTree,
    parent: AnnotatedElement,
) -> Result<AnnotatedMember<'_>, ResolutionErrorKind> {
    match parent {
        AnnotatedElement::Method(method_id) => {
            let method = tree
                .method(method_id)
                .ok_or_else(|| dangling(format!("method #{}", method_id.arr_idx())))?;
            let owner = tree.reference_to(method.declaring_type).ok_or_else(|| {
                dangling(format!("type #{}", method.declaring_type.arr_idx()))
            })?;

            Ok(AnnotatedMember::Method { owner, method })
        }
        AnnotatedElement::Type(type_id) => tree
            .reference_to(type_id)
            .map(AnnotatedMember::Type)
            .ok_or_else(|| dangling(format!("type #{}", type_id.arr_idx()))),
        AnnotatedElement::Field(_) | AnnotatedElement::Parameter(_, _) => Err(
            ResolutionErrorKind::UnsupportedDeclarationKind(parent.kind_name()),
        ),
    }
}

fn enclosing_factory(
    tree: &DeclarationTree,
    annotation_use: AnnotationUseId,
) -> Result<FactoryId, ResolutionErrorKind> {
    tree.annotation_use(annotation_use)
        .and_then(|u| tree.factory_of(u.parent))
        .ok_or_else(|| {
            dangling(format!(
                "parent of annotation use #{}",
                annotation_use.arr_idx()
            ))
        })
}

/// The one compiled method with exactly `name` and the ordered `parameter_types`.
fn exact_method<'c>(
    class: &'c ClassDescriptor,
    name: &str,
    parameter_types: &[TypeDescriptor],
) -> Result<&'c MethodDescriptor, ResolutionErrorKind> {
    let candidates = class.methods_matching(name, parameter_types);

    match candidates.as_slice() {
        [compiled] => Ok(*compiled),
        _ => Err(ResolutionErrorKind::MemberNotFound {
            owner: class.name.clone(),
            method: name.to_string(),
            signature: signature_of(parameter_types),
            matches: candidates.len(),
        }),
    }
}

fn annotation_on_method(
    class: &ClassDescriptor,
    method: &MethodDescriptor,
    annotation_type: &TypeReference,
) -> Result<AnnotationInstance, ResolutionErrorKind> {
    method
        .annotation(annotation_type.qualified_name())
        .cloned()
        .ok_or_else(|| ResolutionErrorKind::AnnotationAbsent {
            element: format!("{}.{}({})", class.name, method.name, method.signature()),
            annotation_type: annotation_type.qualified_name().to_string(),
        })
}

fn annotation_on_class(
    class: &ClassDescriptor,
    annotation_type: &TypeReference,
) -> Result<AnnotationInstance, ResolutionErrorKind> {
    class
        .annotation(annotation_type.qualified_name())
        .cloned()
        .ok_or_else(|| ResolutionErrorKind::AnnotationAbsent {
            element: class.name.clone(),
            annotation_type: annotation_type.qualified_name().to_string(),
        })
}

fn dangling(what: String) -> ResolutionErrorKind {
    ResolutionErrorKind::DanglingNode(what)
}
