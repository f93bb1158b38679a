// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Manifest schema and pre-flight checks
//!
//! This module defines the declarative data model for delivery pipelines:
//! manifests, pipeline/stage definitions, and the closed action union,
//! together with the standalone lint pass and the artifact flow graph.

mod definition;
mod flow;
mod validation;

pub use definition::*;
pub use flow::{FlowGraph, UnproducedInput};
pub use validation::{DefinitionValidator, ValidationResult};
