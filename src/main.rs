// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! pipeforge - Pipeline Definition Compiler
//!
//! Translate declarative delivery-pipeline manifests into a provisioning
//! resource graph.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipeforge::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipeforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Validate { manifest } => pipeforge::cli::validate::run(manifest, cli.verbose),
        Commands::Synth {
            manifest,
            account,
            format,
            output,
        } => pipeforge::cli::synth::run(manifest, account, format, output, cli.verbose),
        Commands::Graph {
            manifest,
            pipeline,
            format,
        } => pipeforge::cli::graph::run(manifest, pipeline, format, cli.verbose),
    }
}
