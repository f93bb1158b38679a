// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Error types for manifest parsing and synthesis
//!
//! Every error is fatal to the current compilation run and carries enough
//! context (pipeline/stage/action path) to locate the offending definition.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Main error type for pipeforge
#[derive(Error, Debug, Diagnostic)]
pub enum ForgeError {
    // ─────────────────────────────────────────────────────────────────────────
    // Manifest Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Manifest file not found: {path}")]
    #[diagnostic(
        code(pipeforge::manifest_not_found),
        help("Create a pipelines.yaml manifest or pass the path explicitly")
    )]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(pipeforge::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(pipeforge::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Definition Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid pipeline definition '{pipeline}': {reason}")]
    #[diagnostic(code(pipeforge::invalid_pipeline))]
    InvalidPipeline { pipeline: String, reason: String },

    #[error("Action '{action}' declares a role identifier that is not ARN-shaped: {identifier}")]
    #[diagnostic(
        code(pipeforge::invalid_role_identifier),
        help("Expected 'arn:<partition>:<service>:<region>:<account>:<resource>'")
    )]
    InvalidRoleIdentifier { action: String, identifier: String },

    #[error("Action '{action}' declares an unknown capability: {capability}")]
    #[diagnostic(
        code(pipeforge::unknown_capability),
        help("Known capabilities: CAPABILITY_IAM, CAPABILITY_NAMED_IAM, CAPABILITY_AUTO_EXPAND")
    )]
    UnknownCapability { action: String, capability: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Synthesis Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Duplicate logical identifier '{logical_id}' in provisioning scope")]
    #[diagnostic(
        code(pipeforge::duplicate_logical_id),
        help("Two definitions generate the same resource identifier; rename one of them")
    )]
    DuplicateLogicalId { logical_id: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/Format Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(pipeforge::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(pipeforge::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(pipeforge::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for ForgeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for ForgeError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for ForgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl ForgeError {
    /// Invalid-role error for an action addressed by its
    /// `pipeline/stage/action` path
    pub fn invalid_role(path: &str, identifier: &str) -> Self {
        Self::InvalidRoleIdentifier {
            action: path.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Unknown-capability error for an action addressed by its
    /// `pipeline/stage/action` path
    pub fn unknown_capability(path: &str, capability: &str) -> Self {
        Self::UnknownCapability {
            action: path.to_string(),
            capability: capability.to_string(),
        }
    }
}
