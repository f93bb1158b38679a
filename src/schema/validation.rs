// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Manifest lint pass
//!
//! Pre-flight checks over a parsed manifest. This pass accumulates findings
//! instead of failing fast, and is deliberately separate from compilation:
//! the compiler trusts its input and aborts on the first hard error, while
//! this validator reports everything it can find in one sweep.

use std::collections::HashSet;

use crate::compiler::Arn;
use crate::schema::{FlowGraph, Manifest, PipelineDef};

/// Manifest validator
pub struct DefinitionValidator;

impl DefinitionValidator {
    /// Validate every pipeline in a manifest
    pub fn validate(manifest: &Manifest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if manifest.pipelines.is_empty() {
            result.add_error("Manifest defines no pipelines");
        }

        let mut seen_pipelines = HashSet::new();
        for pipeline in &manifest.pipelines {
            if !seen_pipelines.insert(&pipeline.name) {
                result.add_error(&format!("Duplicate pipeline name: '{}'", pipeline.name));
            }
            Self::validate_pipeline(pipeline, &mut result);
        }

        result
    }

    fn validate_pipeline(pipeline: &PipelineDef, result: &mut ValidationResult) {
        if pipeline.name.is_empty() {
            result.add_error("Pipeline has an empty name");
        }

        if pipeline.stages.is_empty() {
            result.add_error(&format!("Pipeline '{}' has no stages", pipeline.name));
        }

        let mut seen_stages = HashSet::new();
        for stage in &pipeline.stages {
            if !seen_stages.insert(&stage.name) {
                result.add_error(&format!(
                    "Pipeline '{}': duplicate stage name '{}'",
                    pipeline.name, stage.name
                ));
            }

            if stage.actions.is_empty() {
                result.add_error(&format!(
                    "Stage '{}/{}' has no actions",
                    pipeline.name, stage.name
                ));
            }

            let mut seen_actions = HashSet::new();
            for action in &stage.actions {
                if !seen_actions.insert(action.name()) {
                    result.add_error(&format!(
                        "Stage '{}/{}': duplicate action name '{}'",
                        pipeline.name,
                        stage.name,
                        action.name()
                    ));
                }

                if let Some(role) = action.role_identifier() {
                    if Arn::parse(role).is_err() {
                        result.add_error(&format!(
                            "Action '{}/{}/{}': role identifier is not ARN-shaped: {}",
                            pipeline.name,
                            stage.name,
                            action.name(),
                            role
                        ));
                    }
                }
            }
        }

        // Artifact wiring: consumers must have an upstream producer. The
        // compiler does not police this; it is caught here or at apply time.
        let flow = FlowGraph::build(pipeline);
        for missing in flow.unproduced_inputs() {
            result.add_error(&format!(
                "Pipeline '{}': action '{}' consumes artifact '{}' that no upstream action produces",
                pipeline.name, missing.action, missing.artifact
            ));
        }

        Self::check_redundant_access(pipeline, result);
    }

    /// Roles listed in `artifact_access` that an action also references get
    /// their grant from the union either way; flag the overlap.
    fn check_redundant_access(pipeline: &PipelineDef, result: &mut ValidationResult) {
        let Some(access) = &pipeline.artifact_access else {
            return;
        };

        let referenced: HashSet<&str> = pipeline
            .stages
            .iter()
            .flat_map(|s| s.actions.iter())
            .filter_map(|a| a.role_identifier())
            .collect();

        for role in &access.role_identifiers {
            if referenced.contains(role.as_str()) {
                result.add_warning(&format!(
                    "Pipeline '{}': role '{}' is listed in artifact_access and also referenced \
                     by an action; a single grant is emitted",
                    pipeline.name, role
                ));
            }
        }
    }
}

/// Result of manifest validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(yaml: &str) -> Manifest {
        Manifest::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_valid_manifest() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Source
        actions:
          - name: pull
            type: SOURCE_REPO
            repository: app
            output: src
      - name: Build
        actions:
          - name: compile
            type: BUILD
            input: src
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_empty_manifest() {
        let m = manifest("pipelines: []");
        let result = DefinitionValidator::validate(&m);
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("no pipelines"));
    }

    #[test]
    fn test_duplicate_stage_names() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Gate
        actions:
          - name: approve
            type: APPROVAL
      - name: Gate
        actions:
          - name: approve-again
            type: APPROVAL
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("duplicate stage")));
    }

    #[test]
    fn test_duplicate_action_names_within_stage() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Gate
        actions:
          - name: approve
            type: APPROVAL
          - name: approve
            type: APPROVAL
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("duplicate action")));
    }

    #[test]
    fn test_unproduced_artifact_is_error() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Build
        actions:
          - name: compile
            type: BUILD
            input: ghost
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("ghost")));
    }

    #[test]
    fn test_malformed_role_identifier_is_error() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Gate
        actions:
          - name: approve
            type: APPROVAL
            role_identifier: not-an-arn
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("not-an-arn")));
    }

    #[test]
    fn test_redundant_artifact_access_warns() {
        let m = manifest(
            r#"
pipelines:
  - name: demo
    artifact_access:
      role_identifiers:
        - arn:aws:iam::222222222222:role/deployer
    stages:
      - name: Gate
        actions:
          - name: approve
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#,
        );

        let result = DefinitionValidator::validate(&m);
        assert!(result.is_valid());
        assert!(result.has_warnings());
        assert!(result.warnings[0].contains("single grant"));
    }
}
