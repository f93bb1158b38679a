// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Graph command - render a pipeline's artifact flow

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GraphFormat;
use crate::schema::{FlowGraph, Manifest, PipelineDef};

/// Run the graph command
pub fn run(
    manifest_path: PathBuf,
    pipeline: Option<String>,
    format: GraphFormat,
    _verbose: bool,
) -> Result<()> {
    let manifest = Manifest::from_file(&manifest_path)?;

    let selected: Vec<&PipelineDef> = match &pipeline {
        Some(name) => match manifest.get_pipeline(name) {
            Some(p) => vec![p],
            None => {
                return Err(miette::miette!(
                    "Pipeline '{}' not found in {}",
                    name,
                    manifest_path.display()
                ))
            }
        },
        None => manifest.pipelines.iter().collect(),
    };

    for (i, def) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }

        if matches!(format, GraphFormat::Text) {
            println!("{}", def.name.bold());
        }

        let flow = FlowGraph::build(def);
        match format {
            GraphFormat::Text => print!("{}", flow.to_text()),
            GraphFormat::Dot => print!("{}", flow.to_dot()),
            GraphFormat::Mermaid => print!("{}", flow.to_mermaid()),
        }

        for missing in flow.unproduced_inputs() {
            eprintln!(
                "  {} '{}' consumes artifact '{}' that nothing upstream produces",
                "⚠".yellow(),
                missing.action,
                missing.artifact
            );
        }
    }

    Ok(())
}
