// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Binary-level tests for the pipeforge CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

const MANIFEST: &str = r#"
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
            outputs: [built]
      - name: Ship
        actions:
          - name: release
            type: DEPLOY_STACK
            mode: CREATE_UPDATE
            stack_name: app-prod
            input: built
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#;

fn write_manifest(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("pipelines.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_accepts_well_formed_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);

    Command::cargo_bin("pipeforge")
        .unwrap()
        .arg("validate")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifest is valid"));
}

#[test]
fn validate_reports_unproduced_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        &dir,
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

    Command::cargo_bin("pipeforge")
        .unwrap()
        .arg("validate")
        .arg(&manifest)
        .assert()
        .failure()
        .stdout(predicate::str::contains("ghost"));
}

#[test]
fn validate_rejects_unknown_action_type() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        &dir,
        r#"
pipelines:
  - name: demo
    stages:
      - name: Build
        actions:
          - name: warp
            type: TELEPORT
"#,
    );

    Command::cargo_bin("pipeforge")
        .unwrap()
        .arg("validate")
        .arg(&manifest)
        .assert()
        .failure();
}

#[test]
fn synth_emits_resource_graph() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);

    Command::cargo_bin("pipeforge")
        .unwrap()
        .args(["synth", "--account", "111111111111", "--manifest"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("DemoArtifacts")
                .and(predicate::str::contains("DemoBuildCompileProject"))
                .and(predicate::str::contains("arn:aws:iam::222222222222:role/deployer")),
        );
}

#[test]
fn synth_writes_json_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);
    let out = dir.path().join("graph.json");

    Command::cargo_bin("pipeforge")
        .unwrap()
        .args(["synth", "--account", "111111111111", "--format", "json", "--manifest"])
        .arg(&manifest)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let graph: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(graph["account"], "111111111111");
    assert!(graph["resources"].as_array().unwrap().iter().any(|r| {
        r["logical_id"] == "Demo" && r["kind"] == "pipeline"
    }));
}

#[test]
fn graph_renders_mermaid() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, MANIFEST);

    Command::cargo_bin("pipeforge")
        .unwrap()
        .args(["graph", "--format", "mermaid", "--manifest"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("graph TD").and(predicate::str::contains("-->|src|")),
        );
}

#[test]
fn missing_manifest_fails() {
    Command::cargo_bin("pipeforge")
        .unwrap()
        .args(["validate", "/nonexistent/pipelines.yaml"])
        .assert()
        .failure();
}
