// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Introspectable descriptions of compiled artifacts.
//!
//! A [`ClassDescriptor`] is what a loader hands back for a qualified name: the members of the
//! compiled class, their exact signatures and the annotation instances attached to them. This is
//! the only place annotation values live for declarations that have no parsed source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{AnnotationValue, TypeDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotations: vec![],
            methods: vec![],
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.name.as_str())
    }

    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationInstance> {
        find_annotation(&self.annotations, annotation_type)
    }

    /// Methods whose name and ordered parameter types are exactly `name` and `parameter_types`.
    pub fn methods_matching(
        &self,
        name: &str,
        parameter_types: &[TypeDescriptor],
    ) -> Vec<&MethodDescriptor> {
        self.methods
            .iter()
            .filter(|m| m.name == name && m.parameter_types == parameter_types)
            .collect()
    }

    /// For annotation types, the declared elements: every method without parameters.
    pub fn elements(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.parameter_types.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<TypeDescriptor>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    /// Default value of an annotation element.
    #[serde(default)]
    pub default_value: Option<AnnotationValue>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
            annotations: vec![],
            default_value: None,
        }
    }

    /// An annotation element, optionally with a default.
    pub fn element(name: impl Into<String>, default_value: Option<AnnotationValue>) -> Self {
        Self {
            name: name.into(),
            parameter_types: vec![],
            annotations: vec![],
            default_value,
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationInstance> {
        find_annotation(&self.annotations, annotation_type)
    }

    pub fn signature(&self) -> String {
        signature_of(&self.parameter_types)
    }
}

/// Parameter types as they appear between the parentheses of a method signature.
pub fn signature_of(parameter_types: &[TypeDescriptor]) -> String {
    parameter_types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// An annotation as recorded on a compiled member: only the explicitly given values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInstance {
    annotation_type: String,
    #[serde(default)]
    values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationInstance {
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: &str, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn from_values(
        annotation_type: impl Into<String>,
        values: BTreeMap<String, AnnotationValue>,
    ) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            values,
        }
    }

    pub fn annotation_type(&self) -> &str {
        &self.annotation_type
    }

    pub fn values(&self) -> &BTreeMap<String, AnnotationValue> {
        &self.values
    }
}

fn find_annotation<'a>(
    annotations: &'a [AnnotationInstance],
    annotation_type: &str,
) -> Option<&'a AnnotationInstance> {
    annotations
        .iter()
        .find(|a| a.annotation_type == annotation_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeDescriptor {
        TypeDescriptor::new("int")
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::new("java.lang.String")
    }

    #[test]
    fn signature_matching_is_exact_and_ordered() {
        let class = ClassDescriptor::new("com.example.Foo", ClassKind::Interface)
            .with_method(MethodDescriptor::new("bar", vec![int(), string()]))
            .with_method(MethodDescriptor::new("bar", vec![string(), int()]))
            .with_method(MethodDescriptor::new("bar", vec![int()]));

        let params = [int(), string()];
        let matching = class.methods_matching("bar", &params);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].signature(), "int, java.lang.String");

        assert_eq!(class.methods_matching("bar", &[]).len(), 0);
        assert_eq!(class.methods_matching("baz", &params).len(), 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let class: ClassDescriptor = serde_json::from_str(
            r#"{
                "name": "com.example.GenerateFactoryMethod",
                "kind": "Annotation",
                "methods": [
                    { "name": "name" },
                    { "name": "inline", "default_value": { "Boolean": false } }
                ]
            }"#,
        )
        .unwrap();

        let elements: Vec<_> = class.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(elements, vec!["name", "inline"]);
        assert!(class.annotations.is_empty());
    }
}
