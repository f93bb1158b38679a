// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for pipeforge. The CLI is a thin
//! consumer of the library; compilation itself never reads flags.

pub mod graph;
pub mod synth;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pipeline definition compiler
///
/// Translate declarative delivery-pipeline manifests into a provisioning
/// resource graph.
#[derive(Parser, Debug)]
#[clap(
    name = "pipeforge",
    version,
    about = "Compile declarative pipeline manifests into a provisioning resource graph",
    long_about = None,
    after_help = "Examples:\n\
        pipeforge validate                      Lint the manifest\n\
        pipeforge synth --account 111111111111  Emit the resource graph\n\
        pipeforge graph --format mermaid        Render the artifact flow\n\n\
        See 'pipeforge <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline manifest
    Validate {
        /// Manifest file to validate
        #[clap(default_value = "pipelines.yaml")]
        manifest: PathBuf,
    },

    /// Compile the manifest and emit the resource graph
    Synth {
        /// Manifest file
        #[clap(short, long, default_value = "pipelines.yaml")]
        manifest: PathBuf,

        /// Deploying account, used for cross-account detection
        #[clap(short, long)]
        account: String,

        /// Output format
        #[clap(short, long, value_enum, default_value = "yaml")]
        format: EmitFormat,

        /// Output file (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a pipeline's artifact flow as a graph
    Graph {
        /// Manifest file
        #[clap(short, long, default_value = "pipelines.yaml")]
        manifest: PathBuf,

        /// Pipeline to render (default: every pipeline in the manifest)
        #[clap(short, long)]
        pipeline: Option<String>,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },
}

/// Output format for the synth command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    Yaml,
    Json,
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}
