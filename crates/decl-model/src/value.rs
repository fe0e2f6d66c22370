// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::AnnotationInstance;

/// The identity of a compiled class, such as `int`, `java.lang.String` or `com.example.Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor {
    name: String,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `int`, `boolean` and the other primitives, which no class path needs to provide.
    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.name.as_str())
    }

    /// The element type and number of dimensions of an array type such as `java.lang.String[][]`.
    /// Other types are their own element, with no dimensions.
    pub fn split_array(&self) -> (TypeDescriptor, usize) {
        let mut name = self.name.as_str();
        let mut dimensions = 0;
        while let Some(element) = name.strip_suffix("[]") {
            name = element;
            dimensions += 1;
        }
        (TypeDescriptor::new(name), dimensions)
    }

    pub fn array_of(&self, dimensions: usize) -> TypeDescriptor {
        TypeDescriptor::new(format!("{}{}", self.name, "[]".repeat(dimensions)))
    }
}

const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(name: &str) -> Self {
        TypeDescriptor::new(name)
    }
}

/// The runtime value of one annotation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Boolean(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    Class(TypeDescriptor),
    Enum { type_name: String, constant: String },
    Annotation(Box<AnnotationInstance>),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnnotationValue::Boolean(_) => "boolean",
            AnnotationValue::Int(_) => "int",
            AnnotationValue::Float(_) => "float",
            AnnotationValue::Char(_) => "char",
            AnnotationValue::String(_) => "string",
            AnnotationValue::Class(_) => "class",
            AnnotationValue::Enum { .. } => "enum",
            AnnotationValue::Annotation(_) => "annotation",
            AnnotationValue::Array(_) => "array",
        }
    }

    pub fn as_class(&self) -> Option<&TypeDescriptor> {
        match self {
            AnnotationValue::Class(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for AnnotationValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationValue::Boolean(b) => write!(f, "{b}"),
            AnnotationValue::Int(n) => write!(f, "{n}"),
            AnnotationValue::Float(n) => write!(f, "{n}"),
            AnnotationValue::Char(c) => write!(f, "'{c}'"),
            AnnotationValue::String(s) => write!(f, "\"{s}\""),
            AnnotationValue::Class(descriptor) => write!(f, "{descriptor}.class"),
            AnnotationValue::Enum {
                type_name,
                constant,
            } => write!(f, "{type_name}.{constant}"),
            AnnotationValue::Annotation(instance) => write!(f, "@{}", instance.annotation_type()),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A value did not have the shape the caller asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a {expected} value, found {found}")]
pub struct ValueConversionError {
    pub expected: &'static str,
    pub found: &'static str,
}

macro_rules! value_conversions {
    ($($variant:ident => $typ:ty, $expected:literal;)*) => {
        $(
            impl From<$typ> for AnnotationValue {
                fn from(value: $typ) -> Self {
                    AnnotationValue::$variant(value)
                }
            }

            impl TryFrom<AnnotationValue> for $typ {
                type Error = ValueConversionError;

                fn try_from(value: AnnotationValue) -> Result<Self, Self::Error> {
                    match value {
                        AnnotationValue::$variant(inner) => Ok(inner),
                        other => Err(ValueConversionError {
                            expected: $expected,
                            found: other.kind_name(),
                        }),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    Boolean => bool, "boolean";
    Int => i64, "int";
    Float => f64, "float";
    Char => char, "char";
    String => String, "string";
    Class => TypeDescriptor, "class";
    Array => Vec<AnnotationValue>, "array";
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<i32> for AnnotationValue {
    fn from(value: i32) -> Self {
        AnnotationValue::Int(value as i64)
    }
}

impl TryFrom<AnnotationValue> for i32 {
    type Error = ValueConversionError;

    fn try_from(value: AnnotationValue) -> Result<Self, Self::Error> {
        let wide = i64::try_from(value)?;
        i32::try_from(wide).map_err(|_| ValueConversionError {
            expected: "32-bit int",
            found: "int",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_extraction() {
        assert_eq!(String::try_from(AnnotationValue::from("create")), Ok("create".to_string()));
        assert_eq!(i32::try_from(AnnotationValue::Int(42)), Ok(42));
        assert_eq!(
            i32::try_from(AnnotationValue::Int(i64::MAX)),
            Err(ValueConversionError {
                expected: "32-bit int",
                found: "int"
            })
        );
        assert_eq!(
            bool::try_from(AnnotationValue::from("true")),
            Err(ValueConversionError {
                expected: "boolean",
                found: "string"
            })
        );
    }

    #[test]
    fn display() {
        let value = AnnotationValue::Array(vec![
            AnnotationValue::Class(TypeDescriptor::new("com.example.Foo")),
            AnnotationValue::Enum {
                type_name: "com.example.Mode".to_string(),
                constant: "FAST".to_string(),
            },
        ]);

        assert_eq!(value.to_string(), "{com.example.Foo.class, com.example.Mode.FAST}");
    }

    #[test]
    fn array_descriptors() {
        let (element, dimensions) = TypeDescriptor::new("java.lang.String[][]").split_array();
        assert_eq!(element, TypeDescriptor::new("java.lang.String"));
        assert_eq!(dimensions, 2);
        assert_eq!(element.array_of(dimensions).name(), "java.lang.String[][]");

        let (element, dimensions) = TypeDescriptor::new("int").split_array();
        assert!(element.is_primitive());
        assert_eq!(dimensions, 0);
        assert!(!TypeDescriptor::new("java.lang.Integer").is_primitive());
    }

    #[test]
    fn descriptors_serialize_as_plain_names() {
        let value: AnnotationValue = serde_json::from_str(r#"{"Class": "int"}"#).unwrap();
        assert_eq!(value, AnnotationValue::Class(TypeDescriptor::new("int")));
    }
}
