// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! # pipeforge - Pipeline Definition Compiler
//!
//! `pipeforge` translates declarative delivery-pipeline manifests into a
//! fully wired provisioning resource graph, plus a derived cross-account
//! artifact-access policy.
//!
//! ## How it works
//!
//! - **Schema** - manifests parse strictly into a `Pipeline → Stage → Action`
//!   tree with a closed action union
//! - **Compiler** - one depth-first walk builds a resource descriptor per
//!   action and wires stages/actions in declaration order
//! - **Access pass** - roles from other accounts get exactly one read grant
//!   each on the pipeline's artifact store
//!
//! Compilation is a pure function of the manifest: the same document always
//! synthesizes the same graph.
//!
//! ## Quick Start
//!
//! ```bash
//! # Lint a manifest
//! pipeforge validate pipelines.yaml
//!
//! # Compile it into a resource graph
//! pipeforge synth --account 111111111111
//!
//! # Render the artifact flow
//! pipeforge graph --format mermaid
//! ```

pub mod cli;
pub mod compiler;
pub mod errors;
pub mod schema;
pub mod synth;

// Re-export commonly used types
pub use compiler::{compile_manifest, compile_pipeline, generate_logical_id, synthesize};
pub use errors::{ForgeError, ForgeResult};
pub use schema::{ActionDef, Manifest, PipelineDef, StageDef};
pub use synth::SynthScope;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
