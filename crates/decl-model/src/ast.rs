// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    artifact::ClassKind,
    factory::{FactoryId, TypeReference},
    named_arena::{NamedArena, SerializableSlab, SerializableSlabIndex},
    value::AnnotationValue,
};

pub type TypeId = SerializableSlabIndex<TypeDeclaration>;
pub type MethodId = SerializableSlabIndex<MethodDeclaration>;
pub type FieldId = SerializableSlabIndex<FieldDeclaration>;
pub type AnnotationUseId = SerializableSlabIndex<AnnotationUse>;

/// Where a declaration's model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationOrigin {
    /// Parsed from source text; bodies and literal annotation values are known.
    Source,
    /// Known only by name and signature, modelled from a compiled artifact.
    Shadow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub qualified_name: String,
    pub kind: ClassKind,
    pub origin: DeclarationOrigin,
    pub factory: FactoryId,
    pub methods: Vec<MethodId>,
    pub fields: Vec<FieldId>,
    pub annotations: Vec<AnnotationUseId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub declaring_type: TypeId,
    pub parameters: Vec<ParameterDeclaration>,
    /// Default value, when the method is an element of an annotation type.
    pub default_value: Option<AnnotationValue>,
    pub annotations: Vec<AnnotationUseId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    pub typ: TypeReference,
    pub annotations: Vec<AnnotationUseId>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, typ: TypeReference) -> Self {
        Self {
            name: name.into(),
            typ,
            annotations: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub declaring_type: TypeId,
    pub typ: TypeReference,
    pub annotations: Vec<AnnotationUseId>,
}

/// The declaration an annotation is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotatedElement {
    Type(TypeId),
    Method(MethodId),
    Field(FieldId),
    /// A method parameter, by position.
    Parameter(MethodId, usize),
}

impl AnnotatedElement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnnotatedElement::Type(_) => "type",
            AnnotatedElement::Method(_) => "method",
            AnnotatedElement::Field(_) => "field",
            AnnotatedElement::Parameter(_, _) => "parameter",
        }
    }
}

/// One application of an annotation type to a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationUse {
    pub annotation_type: TypeReference,
    pub parent: AnnotatedElement,
    /// Literal parameter values, when the AST builder could evaluate them from source.
    pub source_values: Option<BTreeMap<String, AnnotationValue>>,
}

/// Identity of a [`DeclarationTree`]. Node ids are plain slab indices, so they only name a node
/// together with the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TreeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The (possibly partial) declaration model handed to the resolver by the AST builder.
///
/// The tree owns every node; callers refer to nodes through the returned ids, which stay valid
/// for the lifetime of the tree. Every tree (including a clone or a deserialized copy) gets its
/// own [`TreeId`].
#[derive(Debug, Serialize, Deserialize)]
pub struct DeclarationTree {
    #[serde(skip, default = "TreeId::fresh")]
    id: TreeId,
    types: NamedArena<TypeDeclaration>,
    methods: SerializableSlab<MethodDeclaration>,
    fields: SerializableSlab<FieldDeclaration>,
    annotation_uses: SerializableSlab<AnnotationUse>,
}

impl Default for DeclarationTree {
    fn default() -> Self {
        Self {
            id: TreeId::fresh(),
            types: NamedArena::default(),
            methods: SerializableSlab::new(),
            fields: SerializableSlab::new(),
            annotation_uses: SerializableSlab::new(),
        }
    }
}

impl Clone for DeclarationTree {
    fn clone(&self) -> Self {
        Self {
            id: TreeId::fresh(),
            types: self.types.clone(),
            methods: self.methods.clone(),
            fields: self.fields.clone(),
            annotation_uses: self.annotation_uses.clone(),
        }
    }
}

impl DeclarationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn add_type(
        &mut self,
        qualified_name: &str,
        kind: ClassKind,
        origin: DeclarationOrigin,
        factory: FactoryId,
    ) -> TypeId {
        self.types.insert(
            qualified_name,
            TypeDeclaration {
                qualified_name: qualified_name.to_string(),
                kind,
                origin,
                factory,
                methods: vec![],
                fields: vec![],
                annotations: vec![],
            },
        )
    }

    /// # Panics
    ///
    /// If `declaring_type` was not issued by this tree.
    pub fn add_method(
        &mut self,
        declaring_type: TypeId,
        name: &str,
        parameters: Vec<ParameterDeclaration>,
    ) -> MethodId {
        let id = self.methods.insert(MethodDeclaration {
            name: name.to_string(),
            declaring_type,
            parameters,
            default_value: None,
            annotations: vec![],
        });
        self.types[declaring_type].methods.push(id);
        id
    }

    /// Add an element (a parameterless method) to an annotation type. Panics like
    /// [`Self::add_method`].
    pub fn add_element(
        &mut self,
        annotation_type: TypeId,
        name: &str,
        default_value: Option<AnnotationValue>,
    ) -> MethodId {
        let id = self.add_method(annotation_type, name, vec![]);
        self.methods[id].default_value = default_value;
        id
    }

    /// # Panics
    ///
    /// If `declaring_type` was not issued by this tree.
    pub fn add_field(&mut self, declaring_type: TypeId, name: &str, typ: TypeReference) -> FieldId {
        let id = self.fields.insert(FieldDeclaration {
            name: name.to_string(),
            declaring_type,
            typ,
            annotations: vec![],
        });
        self.types[declaring_type].fields.push(id);
        id
    }

    /// Attach an annotation whose values are only available from a compiled artifact.
    ///
    /// # Panics
    ///
    /// If `parent` names a node this tree did not issue, or a parameter position past the end
    /// of the method's parameter list. The tree is left unchanged in that case.
    pub fn annotate(
        &mut self,
        parent: AnnotatedElement,
        annotation_type: TypeReference,
    ) -> AnnotationUseId {
        self.attach(parent, annotation_type, None)
    }

    /// Attach an annotation together with the literal values evaluated from source. Panics like
    /// [`Self::annotate`].
    pub fn annotate_with_values(
        &mut self,
        parent: AnnotatedElement,
        annotation_type: TypeReference,
        values: BTreeMap<String, AnnotationValue>,
    ) -> AnnotationUseId {
        self.attach(parent, annotation_type, Some(values))
    }

    fn attach(
        &mut self,
        parent: AnnotatedElement,
        annotation_type: TypeReference,
        source_values: Option<BTreeMap<String, AnnotationValue>>,
    ) -> AnnotationUseId {
        let annotations = match parent {
            AnnotatedElement::Type(type_id) => &mut self.types[type_id].annotations,
            AnnotatedElement::Method(method_id) => &mut self.methods[method_id].annotations,
            AnnotatedElement::Field(field_id) => &mut self.fields[field_id].annotations,
            AnnotatedElement::Parameter(method_id, position) => {
                let method = &mut self.methods[method_id];
                let arity = method.parameters.len();
                match method.parameters.get_mut(position) {
                    Some(parameter) => &mut parameter.annotations,
                    None => panic!(
                        "parameter {position} is out of range for `{}` with {arity} parameters",
                        method.name
                    ),
                }
            }
        };

        let id = self.annotation_uses.insert(AnnotationUse {
            annotation_type,
            parent,
            source_values,
        });
        annotations.push(id);
        id
    }

    pub fn type_declaration(&self, id: TypeId) -> Option<&TypeDeclaration> {
        self.types.get(id)
    }

    pub fn type_by_name(&self, qualified_name: &str) -> Option<&TypeDeclaration> {
        self.types.get_by_name(qualified_name)
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodDeclaration> {
        self.methods.get(id)
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDeclaration> {
        self.fields.get(id)
    }

    pub fn annotation_use(&self, id: AnnotationUseId) -> Option<&AnnotationUse> {
        self.annotation_uses.get(id)
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDeclaration)> {
        self.types.iter()
    }

    /// The factory an element was modelled with. Members share the factory of their declaring
    /// type.
    pub fn factory_of(&self, element: AnnotatedElement) -> Option<FactoryId> {
        let declaring_type = match element {
            AnnotatedElement::Type(type_id) => type_id,
            AnnotatedElement::Method(method_id) | AnnotatedElement::Parameter(method_id, _) => {
                self.method(method_id)?.declaring_type
            }
            AnnotatedElement::Field(field_id) => self.field(field_id)?.declaring_type,
        };

        self.type_declaration(declaring_type).map(|t| t.factory)
    }

    /// A reference to the declared type, bound to the factory it was modelled with.
    pub fn reference_to(&self, id: TypeId) -> Option<TypeReference> {
        self.type_declaration(id)
            .map(|t| TypeReference::new(t.qualified_name.as_str(), t.factory))
    }
}
