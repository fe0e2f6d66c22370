// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use decl_model::{
    artifact::{AnnotationInstance, ClassDescriptor},
    value::{AnnotationValue, TypeDescriptor},
};

use crate::error::ResolutionErrorKind;

/// An annotation with every declared element populated: explicit values from the annotated
/// member, and the annotation type's defaults for the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnnotation {
    annotation_type: TypeDescriptor,
    elements: Vec<String>,
    values: BTreeMap<String, AnnotationValue>,
}

impl ResolvedAnnotation {
    pub(crate) fn materialize(
        annotation_type: &ClassDescriptor,
        instance: &AnnotationInstance,
    ) -> Self {
        let mut elements = vec![];
        let mut values = BTreeMap::new();

        for element in annotation_type.elements() {
            elements.push(element.name.clone());

            let value = instance
                .values()
                .get(&element.name)
                .or(element.default_value.as_ref());
            if let Some(value) = value {
                values.insert(element.name.clone(), value.clone());
            }
        }

        for key in instance.values().keys() {
            if !elements.contains(key) {
                tracing::warn!(
                    "Ignoring value for `{}`, which `{}` does not declare",
                    key,
                    annotation_type.name
                );
            }
        }

        Self {
            annotation_type: annotation_type.descriptor(),
            elements,
            values,
        }
    }

    pub fn annotation_type(&self) -> &TypeDescriptor {
        &self.annotation_type
    }

    pub fn declares(&self, key: &str) -> bool {
        self.elements.iter().any(|e| e == key)
    }

    pub fn values(&self) -> &BTreeMap<String, AnnotationValue> {
        &self.values
    }

    /// The value of element `key`, as the element's accessor would return it.
    pub fn value(&self, key: &str) -> Result<&AnnotationValue, ResolutionErrorKind> {
        if !self.declares(key) {
            return Err(ResolutionErrorKind::UnknownParameter {
                annotation_type: self.annotation_type.name().to_string(),
                key: key.to_string(),
            });
        }

        self.values
            .get(key)
            .ok_or_else(|| ResolutionErrorKind::IncompleteAnnotation {
                annotation_type: self.annotation_type.name().to_string(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use decl_model::artifact::{ClassKind, MethodDescriptor};

    use super::*;

    fn annotation_type() -> ClassDescriptor {
        ClassDescriptor::new("com.example.GenerateFactoryMethod", ClassKind::Annotation)
            .with_method(MethodDescriptor::element("name", None))
            .with_method(MethodDescriptor::element(
                "inline",
                Some(AnnotationValue::Boolean(false)),
            ))
            .with_method(MethodDescriptor::element("order", None))
    }

    #[test]
    fn explicit_values_override_defaults() {
        let instance = AnnotationInstance::new("com.example.GenerateFactoryMethod")
            .with_value("name", "create")
            .with_value("undeclared", 1);

        let resolved = ResolvedAnnotation::materialize(&annotation_type(), &instance);

        assert_eq!(resolved.value("name").unwrap(), &AnnotationValue::from("create"));
        assert_eq!(resolved.value("inline").unwrap(), &AnnotationValue::Boolean(false));
        assert!(!resolved.declares("undeclared"));
        assert!(matches!(
            resolved.value("undeclared"),
            Err(ResolutionErrorKind::UnknownParameter { .. })
        ));
        assert!(matches!(
            resolved.value("order"),
            Err(ResolutionErrorKind::IncompleteAnnotation { .. })
        ));
    }
}
