// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::Environment;

/// Stacks environments, so a build tool can override process variables with its own settings.
pub struct CompositeEnvironment {
    // first is highest precedence
    envs: Vec<Arc<dyn Environment>>,
}

impl Environment for CompositeEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.envs.iter().find_map(|e| e.get(key))
    }
}

impl CompositeEnvironment {
    pub fn new(envs: Vec<Arc<dyn Environment>>) -> Self {
        Self { envs }
    }
}

#[cfg(test)]
mod tests {
    use crate::MapEnvironment;

    use super::*;

    #[test]
    fn earlier_environments_take_precedence() {
        let overrides = MapEnvironment::from([("IMPLGEN_LOG", "debug")]);
        let defaults = MapEnvironment::from([("IMPLGEN_LOG", "warn"), ("OTHER", "1")]);
        let env = CompositeEnvironment::new(vec![Arc::new(overrides), Arc::new(defaults)]);

        assert_eq!(env.get("IMPLGEN_LOG").as_deref(), Some("debug"));
        assert_eq!(env.get("OTHER").as_deref(), Some("1"));
        assert_eq!(env.get("MISSING"), None);
    }
}
