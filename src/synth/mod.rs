// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Provisioning resource model
//!
//! The external provisioning engine is consumed only through its contract:
//! it accepts structured resource descriptors and produces runnable
//! resources. This module is that contract as data: typed, serializable
//! descriptors plus the synthesis scope they are registered into.

mod resources;
mod scope;

pub use resources::*;
pub use scope::SynthScope;
