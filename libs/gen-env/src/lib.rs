// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Configuration lookup for the generator.
//!
//! All tunables are read through [`Environment`] so that tests (and build tools embedding the
//! generator) can supply values without touching the process environment.

mod composite;
mod map;

pub use composite::CompositeEnvironment;
pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => parse_bool(key, value),
            None => Ok(default_value),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value}. Expected one of true, 1, yes, on OR false, 0, no, off")]
    InvalidBoolean { key: String, value: String },
}

fn parse_bool(key: &str, value: String) -> Result<bool, EnvError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EnvError::InvalidBoolean {
            key: key.to_string(),
            value,
        }),
    }
}

/// The process environment.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans() {
        let env = MapEnvironment::from([("A", "Yes"), ("B", "off"), ("C", "maybe")]);

        assert!(env.enabled("A", false).unwrap());
        assert!(!env.enabled("B", true).unwrap());
        assert!(env.enabled("MISSING", true).unwrap());
        assert!(matches!(
            env.enabled("C", false),
            Err(EnvError::InvalidBoolean { key, value }) if key == "C" && value == "maybe"
        ));
    }
}
