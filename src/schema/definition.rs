// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Pipeline definition structures
//!
//! Defines the schema for pipeline manifests. Parsing is strict: unknown
//! keys, unknown action variants, and missing required fields are rejected
//! at this layer, before any resource is built.

use serde::de::Error as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;

/// Top-level manifest: the ordered list of pipeline definitions
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub pipelines: Vec<PipelineDef>,
}

impl Manifest {
    /// Load a manifest from a YAML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::ForgeError> {
        if !path.exists() {
            return Err(crate::ForgeError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::ForgeError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a manifest from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, crate::ForgeError> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Get a pipeline definition by name
    pub fn get_pipeline(&self, name: &str) -> Option<&PipelineDef> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}

/// One pipeline definition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineDef {
    /// Pipeline name, used as display name and identifier seed
    pub name: String,

    /// Stages in execution order
    pub stages: Vec<StageDef>,

    /// Externally trusted roles granted read access to build artifacts
    #[serde(default)]
    pub artifact_access: Option<ArtifactAccess>,
}

/// Explicitly declared trusted role identifiers
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactAccess {
    pub role_identifiers: Vec<String>,
}

/// One stage: an ordered group of actions
///
/// Stage order within the pipeline and action order within the stage are
/// execution order, not display order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDef {
    pub name: String,
    pub actions: Vec<ActionDef>,
}

/// The closed action union, dispatched on the `type` field
///
/// Adding or removing a variant is a compile-time-checked change: every
/// `match` over this enum is exhaustive.
#[derive(Debug, Clone)]
pub enum ActionDef {
    SourceRepo(SourceRepoAction),
    SourceObjectStorage(SourceObjectStorageAction),
    Build(BuildAction),
    DeployStack(DeployStackAction),
    Approval(ApprovalAction),
    InvokeFunction(InvokeFunctionAction),
}

/// Variant tags accepted in the `type` field
pub const ACTION_TYPES: &[&str] = &[
    "SOURCE_REPO",
    "SOURCE_OBJECT_STORAGE",
    "BUILD",
    "DEPLOY_STACK",
    "APPROVAL",
    "INVOKE_FUNCTION",
];

impl<'de> Deserialize<'de> for ActionDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut map = serde_yaml::Mapping::deserialize(deserializer)?;

        let tag_key = serde_yaml::Value::String("type".to_string());
        let tag = map
            .remove(&tag_key)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        let tag = tag
            .as_str()
            .ok_or_else(|| D::Error::custom("action `type` must be a string"))?
            .to_string();

        // Remaining keys deserialize strictly against the variant's fields.
        let rest = serde_yaml::Value::Mapping(map);
        let in_variant = |e: serde_yaml::Error| D::Error::custom(format!("{tag} action: {e}"));

        match tag.as_str() {
            "SOURCE_REPO" => Ok(Self::SourceRepo(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            "SOURCE_OBJECT_STORAGE" => Ok(Self::SourceObjectStorage(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            "BUILD" => Ok(Self::Build(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            "DEPLOY_STACK" => Ok(Self::DeployStack(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            "APPROVAL" => Ok(Self::Approval(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            "INVOKE_FUNCTION" => Ok(Self::InvokeFunction(
                serde_yaml::from_value(rest).map_err(in_variant)?,
            )),
            other => Err(D::Error::unknown_variant(other, ACTION_TYPES)),
        }
    }
}

impl ActionDef {
    /// The action's display name, unique within its stage
    pub fn name(&self) -> &str {
        match self {
            Self::SourceRepo(a) => &a.name,
            Self::SourceObjectStorage(a) => &a.name,
            Self::Build(a) => &a.name,
            Self::DeployStack(a) => &a.name,
            Self::Approval(a) => &a.name,
            Self::InvokeFunction(a) => &a.name,
        }
    }

    /// Execution order within the stage
    pub fn run_order(&self) -> NonZeroU32 {
        match self {
            Self::SourceRepo(a) => a.run_order,
            Self::SourceObjectStorage(a) => a.run_order,
            Self::Build(a) => a.run_order,
            Self::DeployStack(a) => a.run_order,
            Self::Approval(a) => a.run_order,
            Self::InvokeFunction(a) => a.run_order,
        }
    }

    /// Namespace under which the action publishes its runtime variables
    pub fn variables_namespace(&self) -> Option<&str> {
        match self {
            Self::SourceRepo(a) => a.variables_namespace.as_deref(),
            Self::SourceObjectStorage(a) => a.variables_namespace.as_deref(),
            Self::Build(a) => a.variables_namespace.as_deref(),
            Self::DeployStack(a) => a.variables_namespace.as_deref(),
            Self::Approval(a) => a.variables_namespace.as_deref(),
            Self::InvokeFunction(a) => a.variables_namespace.as_deref(),
        }
    }

    /// Execution identity, if the action runs under an existing role
    pub fn role_identifier(&self) -> Option<&str> {
        match self {
            Self::SourceRepo(a) => a.role_identifier.as_deref(),
            Self::SourceObjectStorage(a) => a.role_identifier.as_deref(),
            Self::Build(a) => a.role_identifier.as_deref(),
            Self::DeployStack(a) => a.role_identifier.as_deref(),
            Self::Approval(a) => a.role_identifier.as_deref(),
            Self::InvokeFunction(a) => a.role_identifier.as_deref(),
        }
    }

    /// The variant tag, for display
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SourceRepo(_) => "SOURCE_REPO",
            Self::SourceObjectStorage(_) => "SOURCE_OBJECT_STORAGE",
            Self::Build(_) => "BUILD",
            Self::DeployStack(_) => "DEPLOY_STACK",
            Self::Approval(_) => "APPROVAL",
            Self::InvokeFunction(_) => "INVOKE_FUNCTION",
        }
    }

    /// Artifact names this action produces
    pub fn output_artifacts(&self) -> Vec<&str> {
        match self {
            Self::SourceRepo(a) => vec![a.output.as_str()],
            Self::SourceObjectStorage(a) => vec![a.output.as_str()],
            Self::Build(a) => a.outputs.iter().map(String::as_str).collect(),
            _ => vec![],
        }
    }

    /// Artifact names this action consumes
    pub fn input_artifacts(&self) -> Vec<&str> {
        match self {
            Self::Build(a) => std::iter::once(a.input.as_str())
                .chain(a.extra_inputs.iter().map(String::as_str))
                .collect(),
            Self::DeployStack(a) => vec![a.input.as_str()],
            _ => vec![],
        }
    }
}

/// Source from an upstream repository, resolved by name
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceRepoAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Name of an existing repository to pull from
    pub repository: String,
    /// Branch to track
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Output artifact name
    pub output: String,
}

/// Source from object storage, keyed by an object key
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceObjectStorageAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Object key within the bucket
    pub key: String,
    /// Output artifact name
    pub output: String,
    /// Existing bucket to read from; when absent a private bucket is created
    #[serde(default)]
    pub bucket: Option<String>,
    /// Decryption key identifier; when present a dedicated access role is
    /// created and granted decrypt rights on it
    #[serde(default)]
    pub kms_key_identifier: Option<String>,
}

/// Build step backed by a dedicated build-execution project
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Primary input artifact name
    pub input: String,
    /// Build-specification file path within the input artifact
    #[serde(default = "default_build_spec")]
    pub build_spec: String,
    /// Execution environment selectors
    #[serde(default)]
    pub environment: BuildEnvironment,
    /// Compute-size selector
    #[serde(default)]
    pub compute_type: Option<ComputeType>,
    /// Environment variables; values containing `#` are supplied per
    /// pipeline run, all others are baked into the project
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    /// Output artifact names
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Additional input artifact names
    #[serde(default)]
    pub extra_inputs: Vec<String>,
    /// Build timeout in minutes
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u32,
}

/// Execution environment selectors for a build project
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildEnvironment {
    /// Execution image selector
    #[serde(default)]
    pub build_image: Option<String>,
    /// Run the build container in privileged mode
    #[serde(default)]
    pub privileged: Option<bool>,
}

/// Compute-size selector for build projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputeType {
    Small,
    Medium,
    Large,
    X2Large,
}

/// Deploy a stack from a template carried inside an artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployStackAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Deployment mode
    pub mode: DeployMode,
    /// Name of the stack to create or update
    pub stack_name: String,
    /// Input artifact carrying the template
    pub input: String,
    /// Template path within the input artifact
    #[serde(default = "default_template_path")]
    pub template_path: String,
    /// Capability declarations, `CAPABILITY_`-prefixed
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Parameter overrides, passed through opaquely
    #[serde(default)]
    pub parameter_overrides: BTreeMap<String, serde_json::Value>,
}

/// Supported deployment modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DeployMode {
    #[serde(rename = "CREATE_UPDATE")]
    CreateUpdate,
}

/// Manual approval gate
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovalAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Free-text note shown to the approver
    #[serde(default)]
    pub additional_information: Option<String>,
    /// Link to review material
    #[serde(default)]
    pub external_entity_link: Option<String>,
    /// Notification target to alert when the gate is reached
    #[serde(default)]
    pub notification_target: Option<String>,
}

/// Invoke an existing function, resolved by its fully-qualified identifier
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokeFunctionAction {
    pub name: String,
    #[serde(default = "default_run_order")]
    pub run_order: NonZeroU32,
    #[serde(default)]
    pub variables_namespace: Option<String>,
    #[serde(default)]
    pub role_identifier: Option<String>,

    /// Fully-qualified identifier of the function to invoke
    pub function_identifier: String,
    /// Payload handed to the function, passed through opaquely
    #[serde(default)]
    pub user_parameters: serde_json::Value,
}

fn default_run_order() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_build_spec() -> String {
    "buildspec.yaml".to_string()
}

fn default_template_path() -> String {
    "template.yaml".to_string()
}

fn default_timeout_minutes() -> u32 {
    60
}
