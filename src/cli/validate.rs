// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Validate command - lint a pipeline manifest

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::schema::{DefinitionValidator, Manifest};

/// Run the validate command
pub fn run(manifest_path: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating manifest...".bold());
    println!();

    let manifest = match Manifest::from_file(&manifest_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("  {} Failed to parse manifest", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    println!("  {} Manifest parses against the schema", "✓".green());

    let validation = DefinitionValidator::validate(&manifest);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.warnings.is_empty() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if verbose {
        println!();
        println!("{}:", "Manifest summary".bold());
        println!("  Pipelines: {}", manifest.pipelines.len());
        for pipeline in &manifest.pipelines {
            println!("  - {} ({} stages)", pipeline.name, pipeline.stages.len());
            for stage in &pipeline.stages {
                let actions: Vec<&str> =
                    stage.actions.iter().map(|a| a.type_name()).collect();
                println!(
                    "      {} [{}]",
                    stage.name,
                    actions.join(", ").dimmed()
                );
            }
        }
    }

    println!();

    if !validation.is_valid() {
        Err(miette::miette!("Manifest validation failed"))
    } else if validation.has_warnings() {
        println!("{}", "Manifest is valid but has warnings.".yellow().bold());
        Ok(())
    } else {
        println!("{}", "Manifest is valid!".green().bold());
        Ok(())
    }
}
