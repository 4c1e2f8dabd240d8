// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Builderer: the workspace analysis and build-graph engine at the core of
//! a meta-build-system generator.
//!
//! This crate owns configuration/conditional evaluation, the target type
//! system, the package/target registry, dependency-graph construction with
//! cycle detection, glob-based source enumeration, the sandboxing
//! substrate, and cross-package path reference expansion. It has no
//! command-line surface and no back-end emitters of its own: those are
//! collaborators built on top of the [`facade::Workspace`] facade, the
//! single supported entry point into everything above.

pub mod config;
pub mod error;
pub mod facade;
pub mod glob;
pub mod graph;
pub mod label;
pub mod pathref;
pub mod registry;
pub mod sandbox;
pub mod target;

#[cfg(test)]
pub(crate) mod testutils;

pub use error::BuildererError;
pub use facade::{EffectiveFlags, Workspace};
pub use label::Label;
