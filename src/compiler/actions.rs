// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Action builders
//!
//! One provisioned action descriptor per definition, dispatched exhaustively
//! on the variant. Builders register any auxiliary resources they need
//! (execution roles, build projects, backing buckets) into the scope as they
//! go.

use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::{ForgeError, ForgeResult};
use crate::schema::{
    ActionDef, ApprovalAction, BuildAction, DeployStackAction, InvokeFunctionAction,
    SourceObjectStorageAction, SourceRepoAction,
};
use crate::synth::{
    ActionConfig, ActionResource, ArtifactPath, AttrRef, BucketBinding, BucketResource,
    BuildProjectResource, Capability, Effect, PolicyStatement, PolicyTarget, Principal,
    RemovalPolicy, Resource, RoleBinding, RoleResource, StackOutputResource, SynthScope,
};

/// Execution image used when the definition does not select one
pub const DEFAULT_BUILD_IMAGE: &str = "AMAZON_LINUX_2_3";

/// Builds provisioned action descriptors for one stage
pub struct ActionBuilder<'a> {
    scope: &'a mut SynthScope,
    pipeline: &'a str,
    stage: &'a str,
}

impl<'a> ActionBuilder<'a> {
    pub fn new(scope: &'a mut SynthScope, pipeline: &'a str, stage: &'a str) -> Self {
        Self { scope, pipeline, stage }
    }

    /// Build one action under the given logical id
    pub fn build(&mut self, id: &str, def: &ActionDef) -> ForgeResult<ActionResource> {
        debug!(
            action = %self.path(def.name()),
            variant = def.type_name(),
            logical_id = id,
            "building action"
        );

        match def {
            ActionDef::SourceRepo(a) => self.source_repo(a),
            ActionDef::SourceObjectStorage(a) => self.source_object_storage(id, a),
            ActionDef::Build(a) => self.build_project(id, a),
            ActionDef::DeployStack(a) => self.deploy_stack(a),
            ActionDef::Approval(a) => Ok(Self::approval(a)),
            ActionDef::InvokeFunction(a) => Ok(Self::invoke_function(a)),
        }
    }

    fn path(&self, action: &str) -> String {
        format!("{}/{}/{}", self.pipeline, self.stage, action)
    }

    fn source_repo(&mut self, a: &SourceRepoAction) -> ForgeResult<ActionResource> {
        // The repository is resolved by name, never created here.
        Ok(ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role: external_role(a.role_identifier.as_deref()),
            config: ActionConfig::SourceRepo {
                repository: a.repository.clone(),
                branch: a.branch.clone(),
                output: a.output.clone(),
            },
        })
    }

    fn source_object_storage(
        &mut self,
        id: &str,
        a: &SourceObjectStorageAction,
    ) -> ForgeResult<ActionResource> {
        let mut role = external_role(a.role_identifier.as_deref());

        // A decryption key requires a dedicated role with decrypt rights on
        // it; that role takes over as the action's execution identity.
        if let Some(key) = &a.kms_key_identifier {
            let role_id = format!("{id}Role");
            self.scope.register(
                role_id.clone(),
                Resource::Role(RoleResource {
                    assumed_by: Principal::AccountRoot,
                    path: None,
                    policy: vec![PolicyStatement {
                        effect: Effect::Allow,
                        actions: vec!["kms:Decrypt".to_string()],
                        resources: vec![PolicyTarget::Identifier {
                            identifier: key.clone(),
                        }],
                        principals: vec![],
                    }],
                }),
            )?;
            role = Some(RoleBinding::Managed { logical_id: role_id });
        }

        let bucket = match &a.bucket {
            Some(name) => BucketBinding::External {
                bucket_name: name.clone(),
            },
            None => {
                let bucket_id = format!("{id}SourceBucket");
                self.scope.register(
                    bucket_id.clone(),
                    Resource::Bucket(BucketResource {
                        block_public_access: true,
                        removal_policy: RemovalPolicy::Destroy,
                        resource_policy: vec![],
                    }),
                )?;

                // The engine assigns the physical name at apply time; the
                // generated name is surfaced as a stack output.
                self.scope.register(
                    format!("{id}SourceBucketName"),
                    Resource::StackOutput(StackOutputResource {
                        value: AttrRef::new(bucket_id.clone(), "name"),
                    }),
                )?;

                BucketBinding::Managed { logical_id: bucket_id }
            }
        };

        Ok(ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role,
            config: ActionConfig::SourceObjectStorage {
                bucket,
                key: a.key.clone(),
                output: a.output.clone(),
            },
        })
    }

    fn build_project(&mut self, id: &str, a: &BuildAction) -> ForgeResult<ActionResource> {
        let role_id = format!("{id}CodeBuildRole");
        self.scope.register(
            role_id.clone(),
            Resource::Role(RoleResource {
                assumed_by: Principal::Service {
                    service: "codebuild.amazonaws.com".to_string(),
                },
                path: Some("/codebuild/".to_string()),
                // The execution role grant is unrestricted.
                policy: vec![PolicyStatement {
                    effect: Effect::Allow,
                    actions: vec!["*".to_string()],
                    resources: vec![PolicyTarget::Identifier {
                        identifier: "*".to_string(),
                    }],
                    principals: vec![],
                }],
            }),
        )?;

        let (project_env, pipeline_env) = split_environment(&a.environment_variables);

        // One build project per action, never shared.
        let project_id = format!("{id}Project");
        self.scope.register(
            project_id.clone(),
            Resource::BuildProject(BuildProjectResource {
                project_name: id.to_string(),
                build_spec: a.build_spec.clone(),
                timeout_minutes: a.timeout_minutes,
                compute_type: a.compute_type,
                build_image: a
                    .environment
                    .build_image
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BUILD_IMAGE.to_string()),
                privileged: a.environment.privileged.unwrap_or(false),
                environment_variables: project_env,
                role: role_id,
            }),
        )?;

        Ok(ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role: external_role(a.role_identifier.as_deref()),
            config: ActionConfig::Build {
                project: project_id,
                input: a.input.clone(),
                extra_inputs: a.extra_inputs.clone(),
                outputs: a.outputs.clone(),
                environment_variables: pipeline_env,
            },
        })
    }

    fn deploy_stack(&mut self, a: &DeployStackAction) -> ForgeResult<ActionResource> {
        let path = self.path(&a.name);
        let capabilities = a
            .capabilities
            .iter()
            .map(|c| parse_capability(&path, c))
            .collect::<ForgeResult<Vec<_>>>()?;

        // One role serves as both deployment identity and action identity.
        let role = external_role(a.role_identifier.as_deref());

        Ok(ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role: role.clone(),
            config: ActionConfig::DeployStack {
                stack_name: a.stack_name.clone(),
                template: ArtifactPath {
                    artifact: a.input.clone(),
                    path: a.template_path.clone(),
                },
                capabilities,
                parameter_overrides: a.parameter_overrides.clone(),
                deployment_role: role,
            },
        })
    }

    fn approval(a: &ApprovalAction) -> ActionResource {
        ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role: external_role(a.role_identifier.as_deref()),
            config: ActionConfig::Approval {
                additional_information: a.additional_information.clone(),
                external_entity_link: a.external_entity_link.clone(),
                notification_target: a.notification_target.clone(),
            },
        }
    }

    fn invoke_function(a: &InvokeFunctionAction) -> ActionResource {
        ActionResource {
            name: a.name.clone(),
            run_order: a.run_order.get(),
            variables_namespace: a.variables_namespace.clone(),
            role: external_role(a.role_identifier.as_deref()),
            config: ActionConfig::InvokeFunction {
                function_identifier: a.function_identifier.clone(),
                user_parameters: a.user_parameters.clone(),
            },
        }
    }
}

fn external_role(identifier: Option<&str>) -> Option<RoleBinding> {
    identifier.map(|identifier| RoleBinding::External {
        identifier: identifier.to_string(),
    })
}

/// Split declared environment variables into project-level and
/// pipeline-run-level maps
///
/// Values containing `#` are supplied fresh per pipeline run; all others are
/// baked into the build project at provisioning time.
pub fn split_environment(
    vars: &BTreeMap<String, String>,
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut project = BTreeMap::new();
    let mut pipeline = BTreeMap::new();

    for (key, value) in vars {
        if value.contains('#') {
            pipeline.insert(key.clone(), value.clone());
        } else {
            project.insert(key.clone(), value.clone());
        }
    }

    (project, pipeline)
}

/// Translate one declared capability string
///
/// Strips the literal `CAPABILITY_` prefix and maps the remainder. This does
/// not cover every capability naming convention.
fn parse_capability(path: &str, declared: &str) -> ForgeResult<Capability> {
    let Some(rest) = declared.strip_prefix("CAPABILITY_") else {
        return Err(ForgeError::unknown_capability(path, declared));
    };

    match rest {
        "IAM" => Ok(Capability::Iam),
        "NAMED_IAM" => Ok(Capability::NamedIam),
        "AUTO_EXPAND" => Ok(Capability::AutoExpand),
        _ => Err(ForgeError::unknown_capability(path, declared)),
    }
}
