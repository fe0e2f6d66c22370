// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolve annotation parameter values for declarations known only through compiled artifacts.
//!
//! The AST builder models such "shadow" declarations by name and signature, but cannot evaluate
//! the annotations applied to them. [`ShadowResolver`] finds the compiled counterpart of the
//! annotated member through a [`provider::MetadataProvider`], reads the annotation instance off
//! it, and answers parameter lookups from that instance. Each annotation use is resolved at most
//! once.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod resolved;
pub mod resolver;

#[cfg(test)]
mod test_fixtures;

pub use config::ResolverConfig;
pub use error::{ResolutionErrorKind, ResolutionFailure};
pub use resolved::ResolvedAnnotation;
pub use resolver::ShadowResolver;
