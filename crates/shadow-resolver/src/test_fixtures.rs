// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use decl_model::{
    artifact::{AnnotationInstance, ClassDescriptor, ClassKind, MethodDescriptor},
    ast::{
        AnnotatedElement, AnnotationUseId, DeclarationOrigin, DeclarationTree, MethodId,
        ParameterDeclaration, TypeId,
    },
    factory::{FactoryId, TypeReference},
    value::{AnnotationValue, TypeDescriptor},
};

use crate::provider::{ArtifactLoader, ClassUniverse, LoaderError};

pub const APP: FactoryId = FactoryId(1);
pub const GENERATE_FACTORY_METHOD: &str = "com.example.GenerateFactoryMethod";
pub const FOO: &str = "com.example.Foo";

/// Counts every load it serves.
pub struct CountingLoader {
    universe: ClassUniverse,
    loads: AtomicUsize,
}

impl CountingLoader {
    pub fn new(universe: ClassUniverse) -> Self {
        Self {
            universe,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ArtifactLoader for CountingLoader {
    fn load(&self, qualified_name: &str) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.universe.load(qualified_name)
    }
}

/// Fails the first `failures` loads, then behaves like the wrapped universe.
pub struct FlakyLoader {
    universe: ClassUniverse,
    failures: AtomicUsize,
}

impl FlakyLoader {
    pub fn new(universe: ClassUniverse, failures: usize) -> Self {
        Self {
            universe,
            failures: AtomicUsize::new(failures),
        }
    }
}

impl ArtifactLoader for FlakyLoader {
    fn load(&self, qualified_name: &str) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(LoaderError::Linkage {
                name: qualified_name.to_string(),
                message: "class file truncated".to_string(),
            });
        }
        self.universe.load(qualified_name)
    }
}

pub fn int() -> TypeDescriptor {
    TypeDescriptor::new("int")
}

pub fn string() -> TypeDescriptor {
    TypeDescriptor::new("java.lang.String")
}

fn class(name: &str) -> AnnotationValue {
    AnnotationValue::Class(TypeDescriptor::new(name))
}

fn generate_factory_method(name: &str) -> AnnotationInstance {
    AnnotationInstance::new(GENERATE_FACTORY_METHOD).with_value("name", name)
}

/// The compiled class path the generator runs against.
pub fn app_universe() -> ClassUniverse {
    let annotation_type = ClassDescriptor::new(GENERATE_FACTORY_METHOD, ClassKind::Annotation)
        .with_method(MethodDescriptor::element("name", None))
        .with_method(MethodDescriptor::element(
            "inline",
            Some(AnnotationValue::Boolean(false)),
        ))
        .with_method(MethodDescriptor::element(
            "target",
            Some(class("java.lang.Object")),
        ))
        .with_method(MethodDescriptor::element(
            "interfaces",
            Some(AnnotationValue::Array(vec![])),
        ));

    let foo = ClassDescriptor::new(FOO, ClassKind::Interface)
        .with_annotation(
            generate_factory_method("typeLevel").with_value(
                "interfaces",
                AnnotationValue::Array(vec![class("com.example.Bar"), class("com.example.Baz")]),
            ),
        )
        .with_method(
            MethodDescriptor::new("bar", vec![]).with_annotation(generate_factory_method("create")),
        )
        .with_method(
            MethodDescriptor::new("bar", vec![int(), string()]).with_annotation(
                generate_factory_method("createWithArgs")
                    .with_value("target", class("com.example.FooImpl")),
            ),
        )
        .with_method(
            MethodDescriptor::new("bar", vec![string(), int()])
                .with_annotation(generate_factory_method("wrongOverload")),
        )
        .with_method(MethodDescriptor::new("plain", vec![]));

    [
        annotation_type,
        foo,
        ClassDescriptor::new("com.example.FooImpl", ClassKind::Class),
        ClassDescriptor::new("java.lang.String", ClassKind::Class),
        ClassDescriptor::new("com.example.Bar", ClassKind::Interface),
        ClassDescriptor::new("com.example.Baz", ClassKind::Interface),
    ]
    .into_iter()
    .collect()
}

/// Shadow declarations for `com.example.Foo`, as the AST builder models them from the
/// compiled class.
pub struct Scenario {
    pub tree: DeclarationTree,
    pub foo: TypeId,
    pub bar_int_string: MethodId,
    /// `@GenerateFactoryMethod` on `bar()`
    pub on_bar: AnnotationUseId,
    /// `@GenerateFactoryMethod` on `bar(int, String)`
    pub on_bar_int_string: AnnotationUseId,
    /// `@GenerateFactoryMethod` on `Foo`
    pub on_foo: AnnotationUseId,
    /// `@GenerateFactoryMethod` on `plain()`, which carries none
    pub on_plain: AnnotationUseId,
    pub on_field: AnnotationUseId,
    pub on_parameter: AnnotationUseId,
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_annotation_factory(APP)
    }

    /// Like [`Scenario::new`], but with every annotation type reference bound to
    /// `annotation_factory` instead of the factory of the declarations.
    pub fn with_annotation_factory(annotation_factory: FactoryId) -> Self {
        let mut tree = DeclarationTree::new();
        let annotation = TypeReference::new(GENERATE_FACTORY_METHOD, annotation_factory);

        let foo = tree.add_type(FOO, ClassKind::Interface, DeclarationOrigin::Shadow, APP);
        let bar = tree.add_method(foo, "bar", vec![]);
        let bar_int_string = tree.add_method(
            foo,
            "bar",
            vec![
                ParameterDeclaration::new("count", TypeReference::new("int", APP)),
                ParameterDeclaration::new("label", TypeReference::new("java.lang.String", APP)),
            ],
        );
        let plain = tree.add_method(foo, "plain", vec![]);
        let field = tree.add_field(foo, "ID", TypeReference::new("int", APP));

        let on_bar = tree.annotate(AnnotatedElement::Method(bar), annotation.clone());
        let on_bar_int_string =
            tree.annotate(AnnotatedElement::Method(bar_int_string), annotation.clone());
        let on_foo = tree.annotate(AnnotatedElement::Type(foo), annotation.clone());
        let on_plain = tree.annotate(AnnotatedElement::Method(plain), annotation.clone());
        let on_field = tree.annotate(AnnotatedElement::Field(field), annotation.clone());
        let on_parameter =
            tree.annotate(AnnotatedElement::Parameter(bar_int_string, 0), annotation);

        Self {
            tree,
            foo,
            bar_int_string,
            on_bar,
            on_bar_int_string,
            on_foo,
            on_plain,
            on_field,
            on_parameter,
        }
    }
}
