// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Target kinds: a tagged union replacing the source's permissive attribute
// dictionaries with explicit per-kind records (spec.md section 9, "Dynamic
// attribute bags -> tagged variants").
//
// Grounded on `config/mod.rs`'s `ConfigNodeValue` tagged-union pattern and
// `dependency/package/mod.rs`'s `PackageRef`-style plain data records in the
// teacher crate: a target is a flat struct of already-typed fields, not a
// dynamic map.

use crate::config::expr::{Condition, Expr};

/// `CppLibrary{name, condition, hdrs, srcs, public_includes,
/// private_includes, public_defines, private_defines, c_flags, cxx_flags,
/// link_flags, deps, sandbox?}` (spec.md section 3).
#[derive(Clone, Debug)]
pub struct CppLibrary {
    pub name: String,
    pub condition: Condition,
    pub hdrs: Expr,
    pub srcs: Expr,
    pub public_includes: Expr,
    pub private_includes: Expr,
    pub public_defines: Expr,
    pub private_defines: Expr,
    pub c_flags: Expr,
    pub cxx_flags: Expr,
    pub link_flags: Expr,
    pub deps: Vec<String>,
    pub sandbox: bool,
}

impl CppLibrary {
    /// Builds a library with empty attribute expressions; callers chain
    /// `.with_*` or mutate fields directly (this crate has no ingestion
    /// script layer, so there is no need for a kwargs-style constructor).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: Condition::new(),
            hdrs: Expr::Seq(Vec::new()),
            srcs: Expr::Seq(Vec::new()),
            public_includes: Expr::Seq(Vec::new()),
            private_includes: Expr::Seq(Vec::new()),
            public_defines: Expr::Seq(Vec::new()),
            private_defines: Expr::Seq(Vec::new()),
            c_flags: Expr::Seq(Vec::new()),
            cxx_flags: Expr::Seq(Vec::new()),
            link_flags: Expr::Seq(Vec::new()),
            deps: Vec::new(),
            sandbox: false,
        }
    }
}

/// `CppBinary{name, condition, srcs, private_includes, private_defines,
/// c_flags, cxx_flags, link_flags, deps, output_path?, sandbox?}`.
#[derive(Clone, Debug)]
pub struct CppBinary {
    pub name: String,
    pub condition: Condition,
    pub srcs: Expr,
    pub private_includes: Expr,
    pub private_defines: Expr,
    pub c_flags: Expr,
    pub cxx_flags: Expr,
    pub link_flags: Expr,
    pub deps: Vec<String>,
    pub output_path: Option<String>,
    pub sandbox: bool,
}

impl CppBinary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: Condition::new(),
            srcs: Expr::Seq(Vec::new()),
            private_includes: Expr::Seq(Vec::new()),
            private_defines: Expr::Seq(Vec::new()),
            c_flags: Expr::Seq(Vec::new()),
            cxx_flags: Expr::Seq(Vec::new()),
            link_flags: Expr::Seq(Vec::new()),
            deps: Vec::new(),
            output_path: None,
            sandbox: false,
        }
    }
}

/// `GitRepository{name, condition, remote, sha}` — non-buildable; its
/// "output" is the checked-out source root consumed by path expansion.
#[derive(Clone, Debug)]
pub struct GitRepository {
    pub name: String,
    pub condition: Condition,
    pub remote: String,
    pub sha: String,
}

/// `GenerateFiles{name, condition, generator, inputs, outputs}`.
#[derive(Clone, Debug)]
pub struct GenerateFiles {
    pub name: String,
    pub condition: Condition,
    pub generator: String,
    pub inputs: Expr,
    pub outputs: Expr,
}

/// The target kind tagged union (spec.md section 3, "Target kinds"). Alias
/// and user-defined rule wrappers are an ingestion-collaborator concern
/// (spec.md section 9) and have no representation here: they always reduce
/// to one of these four builtin kinds before reaching the core.
#[derive(Clone, Debug)]
pub enum Target {
    CppLibrary(CppLibrary),
    CppBinary(CppBinary),
    GitRepository(GitRepository),
    GenerateFiles(GenerateFiles),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Self::CppLibrary(t) => &t.name,
            Self::CppBinary(t) => &t.name,
            Self::GitRepository(t) => &t.name,
            Self::GenerateFiles(t) => &t.name,
        }
    }

    pub fn condition(&self) -> &Condition {
        match self {
            Self::CppLibrary(t) => &t.condition,
            Self::CppBinary(t) => &t.condition,
            Self::GitRepository(t) => &t.condition,
            Self::GenerateFiles(t) => &t.condition,
        }
    }

    /// The unresolved `deps` label strings; empty for kinds that do not
    /// declare dependencies (`GitRepository`, `GenerateFiles`).
    pub fn deps(&self) -> &[String] {
        match self {
            Self::CppLibrary(t) => &t.deps,
            Self::CppBinary(t) => &t.deps,
            Self::GitRepository(_) | Self::GenerateFiles(_) => &[],
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, Self::CppLibrary(_))
    }

    /// Whether a sandbox is requested for this target's hdrs/srcs
    /// (`CppLibrary`/`CppBinary` only; other kinds are never sandboxed).
    pub fn wants_sandbox(&self) -> bool {
        match self {
            Self::CppLibrary(t) => t.sandbox,
            Self::CppBinary(t) => t.sandbox,
            Self::GitRepository(_) | Self::GenerateFiles(_) => false,
        }
    }
}
