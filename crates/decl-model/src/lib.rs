// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The declaration model the generator works against.
//!
//! Declarations may be fully parsed from source or known only through a compiled artifact
//! ("shadow" declarations). Both kinds live in the same [`ast::DeclarationTree`]; what the
//! compiled artifacts themselves expose is described by the [`artifact`] types.

pub mod artifact;
pub mod ast;
pub mod factory;
pub mod named_arena;
pub mod value;
