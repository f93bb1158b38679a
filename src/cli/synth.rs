// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Synth command - compile the manifest and emit the resource graph

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::cli::EmitFormat;
use crate::compiler::synthesize;
use crate::errors::ForgeError;
use crate::schema::Manifest;

/// Run the synth command
pub fn run(
    manifest_path: PathBuf,
    account: String,
    format: EmitFormat,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let manifest = Manifest::from_file(&manifest_path)?;
    let scope = synthesize(&account, &manifest)?;

    if verbose {
        eprintln!(
            "{}",
            format!(
                "Compiled {} pipeline(s) into {} resource(s)",
                manifest.pipelines.len(),
                scope.len()
            )
            .dimmed()
        );
    }

    let document = match format {
        EmitFormat::Yaml => serde_yaml::to_string(&scope).map_err(ForgeError::from)?,
        EmitFormat::Json => serde_json::to_string_pretty(&scope).map_err(ForgeError::from)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &document).map_err(|e| ForgeError::FileWriteError {
                path: path.clone(),
                error: e.to_string(),
            })?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => print!("{document}"),
    }

    Ok(())
}
