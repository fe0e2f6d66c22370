// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use decl_model::{ast::AnnotationUseId, factory::FactoryId, value::ValueConversionError};
use thiserror::Error;

use crate::provider::LoaderError;

/// A parameter value could not be produced. Carries the annotation use and the requested key
/// along with the root cause.
#[derive(Error, Debug)]
#[error("Could not resolve `{key}` of annotation use #{}: {kind}", .annotation.arr_idx())]
pub struct ResolutionFailure {
    pub annotation: AnnotationUseId,
    pub key: String,
    #[source]
    pub kind: ResolutionErrorKind,
}

impl ResolutionFailure {
    pub(crate) fn new(annotation: AnnotationUseId, key: &str, kind: ResolutionErrorKind) -> Self {
        Self {
            annotation,
            key: key.to_string(),
            kind,
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolutionErrorKind {
    #[error("compiled artifact for `{0}` could not be located")]
    ArtifactNotFound(String),

    #[error("expected exactly one compiled method `{owner}.{method}({signature})`, found {matches}")]
    MemberNotFound {
        owner: String,
        method: String,
        signature: String,
        matches: usize,
    },

    #[error("`{element}` does not carry annotation `{annotation_type}`")]
    AnnotationAbsent {
        element: String,
        annotation_type: String,
    },

    #[error("annotation `{annotation_type}` declares no parameter `{key}`")]
    UnknownParameter { annotation_type: String, key: String },

    #[error("annotation `{annotation_type}` has no value for `{key}` and no default")]
    IncompleteAnnotation { annotation_type: String, key: String },

    #[error("annotations on a {0} declaration cannot be resolved")]
    UnsupportedDeclarationKind(&'static str),

    #[error("{factory} of the enclosing declaration is not bound to any class path")]
    FactoryMismatch { factory: FactoryId },

    #[error("introspection failed: {0}")]
    Loader(#[source] LoaderError),

    #[error("{0} is not part of the declaration tree")]
    DanglingNode(String),

    #[error(transparent)]
    UnexpectedValue(#[from] ValueConversionError),
}
