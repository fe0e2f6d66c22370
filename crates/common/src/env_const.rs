// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gen_env::{EnvError, Environment};

/// Tracing filter directives, following the `RUST_LOG` conventions.
pub const IMPLGEN_LOG: &str = "IMPLGEN_LOG";

/// Report repaired annotation factories at `WARN` instead of `DEBUG`.
pub const IMPLGEN_WARN_ON_FACTORY_REPAIR: &str = "IMPLGEN_WARN_ON_FACTORY_REPAIR";

pub fn warn_on_factory_repair(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(IMPLGEN_WARN_ON_FACTORY_REPAIR, false)
}
