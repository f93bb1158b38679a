// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Cross-account artifact access
//!
//! After a pipeline's action graph is built, a second pass over the same
//! definition derives which roles need read access to the pipeline's shared
//! artifact store: the explicitly declared trusted roles, union every action
//! role belonging to another account. One grant statement per role, in
//! deterministic order.

use std::collections::BTreeSet;
use tracing::debug;

use crate::compiler::Arn;
use crate::errors::{ForgeError, ForgeResult};
use crate::schema::PipelineDef;
use crate::synth::{Effect, PolicyStatement, PolicyTarget};

/// Compute the artifact read grants for one pipeline
pub fn artifact_access_grants(
    account: &str,
    pipeline: &PipelineDef,
    artifact_store: &str,
) -> ForgeResult<Vec<PolicyStatement>> {
    let mut role_identifiers = BTreeSet::new();

    if let Some(access) = &pipeline.artifact_access {
        for role in &access.role_identifiers {
            role_identifiers.insert(role.clone());
        }
    }

    for stage in &pipeline.stages {
        for action in &stage.actions {
            let Some(role) = action.role_identifier() else {
                continue;
            };

            let arn = Arn::parse(role).map_err(|_| {
                ForgeError::invalid_role(
                    &format!("{}/{}/{}", pipeline.name, stage.name, action.name()),
                    role,
                )
            })?;

            if arn.account() != account {
                role_identifiers.insert(role.to_string());
            }
        }
    }

    debug!(
        pipeline = %pipeline.name,
        grants = role_identifiers.len(),
        "derived artifact access grants"
    );

    Ok(role_identifiers
        .into_iter()
        .map(|role| PolicyStatement {
            effect: Effect::Allow,
            actions: vec!["s3:Get*".to_string()],
            resources: vec![PolicyTarget::BucketObjects {
                bucket: artifact_store.to_string(),
                pattern: "*".to_string(),
            }],
            principals: vec![role],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Manifest;

    const ACCOUNT: &str = "111111111111";

    fn pipeline(yaml: &str) -> PipelineDef {
        Manifest::from_yaml(yaml).unwrap().pipelines.remove(0)
    }

    #[test]
    fn test_same_account_roles_excluded() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Gate
        actions:
          - name: approve
            type: APPROVAL
            role_identifier: arn:aws:iam::111111111111:role/internal
"#,
        );

        let grants = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        assert!(grants.is_empty());
    }

    #[test]
    fn test_cross_account_role_granted_once() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Deploy
        actions:
          - name: deploy-east
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
          - name: deploy-west
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#,
        );

        let grants = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].principals, vec!["arn:aws:iam::222222222222:role/deployer"]);
        assert_eq!(grants[0].actions, vec!["s3:Get*"]);
        assert_eq!(
            grants[0].resources,
            vec![PolicyTarget::BucketObjects {
                bucket: "DemoArtifacts".into(),
                pattern: "*".into(),
            }]
        );
    }

    #[test]
    fn test_explicit_access_unioned_with_detected() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    artifact_access:
      role_identifiers:
        - arn:aws:iam::333333333333:role/reader
    stages:
      - name: Deploy
        actions:
          - name: deploy
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#,
        );

        let grants = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        let principals: Vec<&str> = grants
            .iter()
            .flat_map(|g| g.principals.iter().map(String::as_str))
            .collect();

        assert_eq!(
            principals,
            vec![
                "arn:aws:iam::222222222222:role/deployer",
                "arn:aws:iam::333333333333:role/reader",
            ]
        );
    }

    #[test]
    fn test_explicit_overlap_deduplicated() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    artifact_access:
      role_identifiers:
        - arn:aws:iam::222222222222:role/deployer
    stages:
      - name: Deploy
        actions:
          - name: deploy
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#,
        );

        let grants = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        assert_eq!(grants.len(), 1);
    }

    #[test]
    fn test_malformed_role_carries_action_path() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Deploy
        actions:
          - name: deploy
            type: APPROVAL
            role_identifier: bogus
"#,
        );

        let err = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap_err();
        match err {
            ForgeError::InvalidRoleIdentifier { action, identifier } => {
                assert_eq!(action, "demo/Deploy/deploy");
                assert_eq!(identifier, "bogus");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let def = pipeline(
            r#"
pipelines:
  - name: demo
    artifact_access:
      role_identifiers:
        - arn:aws:iam::333333333333:role/reader
    stages:
      - name: Deploy
        actions:
          - name: deploy
            type: APPROVAL
            role_identifier: arn:aws:iam::222222222222:role/deployer
"#,
        );

        let a = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        let b = artifact_access_grants(ACCOUNT, &def, "DemoArtifacts").unwrap();
        assert_eq!(a, b);
    }
}
