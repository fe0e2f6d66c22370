// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::env_const;
use gen_env::{CompositeEnvironment, EnvError, Environment, SystemEnvironment};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Log repaired annotation factories at `WARN` (default: `DEBUG`).
    pub warn_on_factory_repair: bool,
}

impl ResolverConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            warn_on_factory_repair: env_const::warn_on_factory_repair(env)?,
        })
    }

    /// Read from the process environment.
    pub fn from_system() -> Result<Self, EnvError> {
        Self::from_env(&SystemEnvironment)
    }

    /// Read from the process environment, with the settings of the embedding build tool taking
    /// precedence.
    pub fn from_system_with(overrides: Arc<dyn Environment>) -> Result<Self, EnvError> {
        Self::from_env(&CompositeEnvironment::new(vec![
            overrides,
            Arc::new(SystemEnvironment),
        ]))
    }
}
