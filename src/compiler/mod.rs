// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Pipeline definition compiler
//!
//! Walks each pipeline definition once, depth-first, pipeline to stage to
//! action, building provisioned resource descriptors in document order. The
//! whole pass either completes or aborts on the first error; there is no
//! partial or resumable compilation.

mod access;
mod actions;
mod arn;
mod logical_id;

pub use access::artifact_access_grants;
pub use actions::{split_environment, ActionBuilder, DEFAULT_BUILD_IMAGE};
pub use arn::Arn;
pub use logical_id::generate_logical_id;

use tracing::info;

use crate::errors::{ForgeError, ForgeResult};
use crate::schema::{Manifest, PipelineDef};
use crate::synth::{
    BucketResource, PipelineResource, RemovalPolicy, Resource, StageResource, SynthScope,
};

/// Compile a whole manifest into a fresh scope
pub fn synthesize(account: &str, manifest: &Manifest) -> ForgeResult<SynthScope> {
    let mut scope = SynthScope::new(account);
    compile_manifest(&mut scope, manifest)?;
    Ok(scope)
}

/// Compile every pipeline definition in the manifest, in order
pub fn compile_manifest(scope: &mut SynthScope, manifest: &Manifest) -> ForgeResult<()> {
    for pipeline in &manifest.pipelines {
        compile_pipeline(scope, pipeline)?;
    }
    Ok(())
}

/// Compile one pipeline definition
///
/// Registers the pipeline's auxiliary resources as actions are built, then
/// the artifact store carrying the derived access grants, then the pipeline
/// container itself.
pub fn compile_pipeline(scope: &mut SynthScope, pipeline: &PipelineDef) -> ForgeResult<()> {
    if pipeline.name.is_empty() {
        return Err(ForgeError::InvalidPipeline {
            pipeline: String::new(),
            reason: "pipeline name must not be empty".to_string(),
        });
    }

    let pipeline_id = generate_logical_id([pipeline.name.as_str()]);
    let artifact_store = format!("{pipeline_id}Artifacts");

    let mut stages = Vec::new();
    for stage_def in &pipeline.stages {
        let mut builder = ActionBuilder::new(scope, &pipeline.name, &stage_def.name);

        let mut actions = Vec::new();
        for action_def in &stage_def.actions {
            let action_id = generate_logical_id([
                pipeline.name.as_str(),
                stage_def.name.as_str(),
                action_def.name(),
            ]);
            actions.push(builder.build(&action_id, action_def)?);
        }

        stages.push(StageResource {
            name: stage_def.name.clone(),
            actions,
        });
    }

    let account = scope.account.clone();
    let grants = artifact_access_grants(&account, pipeline, &artifact_store)?;
    scope.register(
        artifact_store.clone(),
        Resource::Bucket(BucketResource {
            block_public_access: true,
            removal_policy: RemovalPolicy::Retain,
            resource_policy: grants,
        }),
    )?;

    scope.register(
        pipeline_id,
        Resource::Pipeline(PipelineResource {
            pipeline_name: pipeline.name.clone(),
            restart_execution_on_update: true,
            artifact_store,
            stages,
        }),
    )?;

    info!(pipeline = %pipeline.name, "compiled pipeline definition");
    Ok(())
}
