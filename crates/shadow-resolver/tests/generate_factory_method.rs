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
    ast::{AnnotatedElement, DeclarationOrigin, DeclarationTree},
    factory::{FactoryId, TypeReference},
};
use shadow_resolver::{
    ResolverConfig, ShadowResolver,
    provider::{ArtifactLoader, ClassPathProvider, ClassUniverse, LoaderError},
};
use test_log::test;

const GENERATE_FACTORY_METHOD: &str = "com.example.GenerateFactoryMethod";

/// The build tool's view of a class path, recording what it was asked for.
struct RecordingLoader {
    universe: ClassUniverse,
    loads: AtomicUsize,
}

impl ArtifactLoader for RecordingLoader {
    fn load(&self, qualified_name: &str) -> Result<Option<Arc<ClassDescriptor>>, LoaderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.universe.load(qualified_name)
    }
}

// `com.example.Foo` comes from a dependency jar: the generator sees it only as a shadow
// declaration, but its compiled `bar()` carries `@GenerateFactoryMethod(name = "create")`.
#[test]
fn factory_method_name_of_a_precompiled_interface() {
    let factory = FactoryId(1);

    let loader = Arc::new(RecordingLoader {
        universe: ClassUniverse::new()
            .with_class(
                ClassDescriptor::new(GENERATE_FACTORY_METHOD, ClassKind::Annotation)
                    .with_method(MethodDescriptor::element("name", None)),
            )
            .with_class(
                ClassDescriptor::new("com.example.Foo", ClassKind::Interface).with_method(
                    MethodDescriptor::new("bar", vec![]).with_annotation(
                        AnnotationInstance::new(GENERATE_FACTORY_METHOD)
                            .with_value("name", "create"),
                    ),
                ),
            ),
        loads: AtomicUsize::new(0),
    });

    let mut tree = DeclarationTree::new();
    let foo = tree.add_type(
        "com.example.Foo",
        ClassKind::Interface,
        DeclarationOrigin::Shadow,
        factory,
    );
    let bar = tree.add_method(foo, "bar", vec![]);
    let annotation = tree.annotate(
        AnnotatedElement::Method(bar),
        TypeReference::new(GENERATE_FACTORY_METHOD, factory),
    );

    let config = ResolverConfig::from_system().unwrap();
    let provider = ClassPathProvider::new().with_class_path(factory, loader.clone());
    let resolver = ShadowResolver::with_config(Arc::new(provider), config);

    let name: String = resolver
        .get_annotation_value_as(&tree, annotation, "name")
        .unwrap();
    assert_eq!(name, "create");
    let loads = loader.loads.load(Ordering::SeqCst);

    let name: String = resolver
        .get_annotation_value_as(&tree, annotation, "name")
        .unwrap();
    assert_eq!(name, "create");
    assert_eq!(loader.loads.load(Ordering::SeqCst), loads);
}
