// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The resolver is instrumented with Rust's `tracing` framework. Build tools embedding the
//! generator call [`init`] once to install a console subscriber whose filter comes from the
//! `IMPLGEN_LOG` variable (same syntax as `RUST_LOG`, defaulting to `warn`).
//!
//! ```shell
//! $ IMPLGEN_LOG=shadow_resolver=debug,warn <build command>
//! ```

use gen_env::Environment;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*, util::TryInitError};

use crate::env_const::IMPLGEN_LOG;

/// Initialize the global tracing subscriber.
pub fn init(env: &dyn Environment) -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();

    tracing_subscriber::registry()
        .with(env_filter(env))
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// The filter `init` installs. Invalid directives are skipped rather than rejected.
pub fn env_filter(env: &dyn Environment) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(env.get(IMPLGEN_LOG).unwrap_or_default())
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Could not install the tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

#[cfg(test)]
mod tests {
    use gen_env::MapEnvironment;

    use super::*;

    #[test]
    fn filter_reads_directives_from_the_environment() {
        let env = MapEnvironment::from([(IMPLGEN_LOG, "shadow_resolver=debug")]);

        assert!(env_filter(&env).to_string().contains("shadow_resolver=debug"));
    }

    #[test]
    fn subscriber_is_installed_once() {
        let env = MapEnvironment::new();
        let _ = init(&env);

        assert!(matches!(init(&env), Err(LoggingError::Init(_))));
    }
}
