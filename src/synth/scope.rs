// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Synthesis scope
//!
//! An append-only registry of named resource descriptors. Logical ids must
//! be unique within the scope; registering a duplicate aborts the run.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::errors::{ForgeError, ForgeResult};
use crate::synth::Resource;

/// A resource together with its logical id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedResource {
    pub logical_id: String,
    #[serde(flatten)]
    pub resource: Resource,
}

/// The provisioning scope resources are synthesized into
///
/// Registration order is the compiler's walk order and is preserved in the
/// serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthScope {
    /// The deploying account; cross-account detection compares against this
    pub account: String,
    pub resources: Vec<NamedResource>,
    #[serde(skip)]
    ids: HashSet<String>,
}

impl SynthScope {
    /// Create an empty scope for the given deploying account
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            resources: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Register a resource under a logical id
    pub fn register(&mut self, logical_id: impl Into<String>, resource: Resource) -> ForgeResult<()> {
        let logical_id = logical_id.into();

        if !self.ids.insert(logical_id.clone()) {
            return Err(ForgeError::DuplicateLogicalId { logical_id });
        }

        debug!(logical_id = %logical_id, "registered resource");
        self.resources.push(NamedResource { logical_id, resource });
        Ok(())
    }

    /// Look up a registered resource by logical id
    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.logical_id == logical_id)
            .map(|r| &r.resource)
    }

    /// Whether a logical id is already taken
    pub fn contains(&self, logical_id: &str) -> bool {
        self.ids.contains(logical_id)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{BucketResource, RemovalPolicy};

    fn bucket() -> Resource {
        Resource::Bucket(BucketResource {
            block_public_access: true,
            removal_policy: RemovalPolicy::Destroy,
            resource_policy: vec![],
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut scope = SynthScope::new("111111111111");
        scope.register("DemoBucket", bucket()).unwrap();

        assert!(scope.contains("DemoBucket"));
        assert!(scope.get("DemoBucket").is_some());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut scope = SynthScope::new("111111111111");
        scope.register("DemoBucket", bucket()).unwrap();

        let err = scope.register("DemoBucket", bucket()).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::DuplicateLogicalId { logical_id } if logical_id == "DemoBucket"
        ));
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut scope = SynthScope::new("111111111111");
        scope.register("B", bucket()).unwrap();
        scope.register("A", bucket()).unwrap();

        let ids: Vec<&str> = scope.resources.iter().map(|r| r.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }
}
