// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Resource descriptors
//!
//! Everything the compiler emits is one of these descriptors. They are plain
//! data: fully determined by the manifest, serializable, and comparable, so
//! that compiling the same document twice yields structurally identical
//! graphs.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::schema::ComputeType;

/// A provisioned resource descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Pipeline(PipelineResource),
    Role(RoleResource),
    BuildProject(BuildProjectResource),
    Bucket(BucketResource),
    StackOutput(StackOutputResource),
}

/// One delivery pipeline: ordered stages of ordered actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResource {
    pub pipeline_name: String,
    /// Restart any in-flight execution when the definition itself changes
    pub restart_execution_on_update: bool,
    /// Logical id of the pipeline's shared artifact store bucket
    pub artifact_store: String,
    pub stages: Vec<StageResource>,
}

/// One stage container; action order is execution order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResource {
    pub name: String,
    pub actions: Vec<ActionResource>,
}

/// One provisioned action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResource {
    pub name: String,
    pub run_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_namespace: Option<String>,
    /// Execution identity; absent means the ambient/default identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleBinding>,
    pub config: ActionConfig,
}

/// Variant-specific action configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionConfig {
    SourceRepo {
        repository: String,
        branch: String,
        output: String,
    },
    SourceObjectStorage {
        bucket: BucketBinding,
        key: String,
        output: String,
    },
    Build {
        /// Logical id of the action's dedicated build project
        project: String,
        input: String,
        extra_inputs: Vec<String>,
        outputs: Vec<String>,
        /// Run-time-supplied variables, resolved fresh per pipeline run
        environment_variables: BTreeMap<String, String>,
    },
    DeployStack {
        stack_name: String,
        template: ArtifactPath,
        capabilities: Vec<Capability>,
        parameter_overrides: BTreeMap<String, serde_json::Value>,
        /// Same identity as the action's execution role
        #[serde(skip_serializing_if = "Option::is_none")]
        deployment_role: Option<RoleBinding>,
    },
    Approval {
        #[serde(skip_serializing_if = "Option::is_none")]
        additional_information: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        external_entity_link: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notification_target: Option<String>,
    },
    InvokeFunction {
        function_identifier: String,
        user_parameters: serde_json::Value,
    },
}

/// A role used by an action: either an existing role resolved by its
/// identifier, or a role created within the scope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RoleBinding {
    External { identifier: String },
    Managed { logical_id: String },
}

/// A bucket used by an action: existing (by name) or created in the scope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BucketBinding {
    External { bucket_name: String },
    Managed { logical_id: String },
}

/// A path inside a named artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactPath {
    pub artifact: String,
    pub path: String,
}

/// Stack capability acknowledgements understood by the provisioning engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Iam,
    NamedIam,
    AutoExpand,
}

/// A created role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleResource {
    pub assumed_by: Principal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub policy: Vec<PolicyStatement>,
}

/// Trust principal for a created role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "principal", rename_all = "snake_case")]
pub enum Principal {
    /// The deploying account's root principal
    AccountRoot,
    /// A service principal
    Service { service: String },
}

/// One policy statement, attached to a role or a bucket resource policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<PolicyTarget>,
    /// Principals the statement applies to; empty for identity policies
    pub principals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Allow,
    Deny,
}

/// What a policy statement targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum PolicyTarget {
    /// A literal identifier, possibly a wildcard
    Identifier { identifier: String },
    /// The object namespace of a bucket created in this scope
    BucketObjects { bucket: String, pattern: String },
}

/// A dedicated build-execution project, one per BUILD action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildProjectResource {
    pub project_name: String,
    pub build_spec: String,
    pub timeout_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_type: Option<ComputeType>,
    pub build_image: String,
    pub privileged: bool,
    /// Variables baked into the project at provisioning time
    pub environment_variables: BTreeMap<String, String>,
    /// Logical id of the project's execution role
    pub role: String,
}

/// A created bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketResource {
    pub block_public_access: bool,
    pub removal_policy: RemovalPolicy,
    /// Resource policy statements attached to the bucket
    pub resource_policy: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

/// An observable output value surfaced by the synthesized stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackOutputResource {
    pub value: AttrRef,
}

/// A deferred reference to an attribute of another resource, resolved by the
/// provisioning engine at apply time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttrRef {
    pub resource: String,
    pub attr: String,
}

impl AttrRef {
    pub fn new(resource: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            attr: attr.into(),
        }
    }
}
