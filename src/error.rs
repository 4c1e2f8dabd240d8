// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Error taxonomy for the Builderer core.
//
// Every kind here is fatal: a collaborator (CLI, back-end) that observes one
// aborts the generate pass. See spec.md section 7.

use crate::label::Label;

/// A single error kind from the taxonomy, always carrying the label or path
/// it was raised against plus a human-readable message.
#[derive(thiserror::Error, Debug)]
pub enum BuildererError {
    #[error("duplicate target {label}: {message}")]
    DuplicateTarget { label: Label, message: String },

    #[error("duplicate package {name}: {message}")]
    DuplicatePackage { name: String, message: String },

    #[error("duplicate config {name}: {message}")]
    DuplicateConfig { name: String, message: String },

    #[error("duplicate buildtool {name}: {message}")]
    DuplicateBuildtool { name: String, message: String },

    #[error("unknown dependency {label}: {message}")]
    UnknownDependency { label: Label, message: String },

    #[error("dependency cycle: {}", format_cycle(.cycle))]
    DependencyCycle { cycle: Vec<Label> },

    #[error("unknown config key {key:?} (referenced resolving {label}): {message}")]
    UnknownConfigKey {
        key: String,
        label: Label,
        message: String,
    },

    #[error("matrix leakage resolving {label}: {message}")]
    MatrixLeakage { label: Label, message: String },

    #[error("{label} references unreferenced path target {target}: {message}")]
    UnreferencedPathTarget {
        label: Label,
        target: Label,
        message: String,
    },

    #[error("malformed path reference in {label}: {message}")]
    MalformedPathReference { label: Label, message: String },

    #[error("missing generator {name:?}: {message}")]
    MissingGenerator { name: String, message: String },

    #[error("unsupported platform {platform:?}: {message}")]
    UnsupportedPlatform { platform: String, message: String },

    #[error("sandbox I/O failure at {path:?}: {message}")]
    SandboxIOFailure { path: std::path::PathBuf, message: String },
}

fn format_cycle(cycle: &[Label]) -> String {
    cycle
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl BuildererError {
    /// A short, stable tag identifying the error kind, suitable for a CLI's
    /// exit-code/error-taxonomy reporting (spec.md section 6).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateTarget { .. } => "DuplicateTarget",
            Self::DuplicatePackage { .. } => "DuplicatePackage",
            Self::DuplicateConfig { .. } => "DuplicateConfig",
            Self::DuplicateBuildtool { .. } => "DuplicateBuildtool",
            Self::UnknownDependency { .. } => "UnknownDependency",
            Self::DependencyCycle { .. } => "DependencyCycle",
            Self::UnknownConfigKey { .. } => "UnknownConfigKey",
            Self::MatrixLeakage { .. } => "MatrixLeakage",
            Self::UnreferencedPathTarget { .. } => "UnreferencedPathTarget",
            Self::MalformedPathReference { .. } => "MalformedPathReference",
            Self::MissingGenerator { .. } => "MissingGenerator",
            Self::UnsupportedPlatform { .. } => "UnsupportedPlatform",
            Self::SandboxIOFailure { .. } => "SandboxIOFailure",
        }
    }
}
