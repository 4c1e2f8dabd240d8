// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Workspace facade: the stable, language-neutral API a back-end generator
// sees (spec.md section 4.8).
//
// Grounded on `resolver.rs`'s `PackageResolver`: a facade struct holding
// its collaborators (here, a `Registry` and the resolved dependency edges)
// and exposing query methods that compose them, downgrading internal
// `anyhow::Result` plumbing to a concrete `BuildererError` at every public
// method per spec.md section 7's crate-boundary contract.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::info_span;

use crate::config::expr::Expr;
use crate::config::matrix;
use crate::config::record::{ConfigRecord, Scalar};
use crate::error::BuildererError;
use crate::glob;
use crate::graph;
use crate::label::Label;
use crate::pathref::{self, PathContext};
use crate::registry::Registry;
use crate::sandbox::{self, DesiredFile};
use crate::target::Target;

/// The collected include/define/flag set for a target under a baked
/// config, in transitive-dependency order (spec.md section 4.5).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EffectiveFlags {
    pub includes: Vec<String>,
    pub defines: Vec<String>,
    pub c_flags: Vec<String>,
    pub cxx_flags: Vec<String>,
    pub link_flags: Vec<String>,
}

/// A fully-assembled workspace: a frozen `Registry` plus the resolved,
/// acyclic dependency graph built from it. Constructing a `Workspace` is
/// the "ingestion populates C2 ... C5 builds the graph" step of spec.md
/// section 2's control flow; everything after that is read-only queries.
pub struct Workspace {
    registry: Registry,
    workspace_root: PathBuf,
    edges: HashMap<Label, Vec<Label>>,
}

impl Workspace {
    /// Builds the dependency graph from `registry` and checks it is
    /// acyclic. Fatal `UnknownDependency`/`DependencyCycle` surface here,
    /// exactly at the ingestion-to-graph boundary spec.md section 4.5
    /// describes.
    pub fn new(registry: Registry, workspace_root: impl Into<PathBuf>) -> Result<Self, BuildererError> {
        let _span = info_span!("build_graph").entered();
        let edges = graph::build_edges(&registry)?;
        graph::check_acyclic(&edges)?;
        Ok(Self {
            registry,
            workspace_root: workspace_root.into(),
            edges,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Yields `(package_name, target)` in a stable order: packages sorted,
    /// targets in declaration order (spec.md section 4.8).
    pub fn iter_targets(&self) -> Vec<(&str, &Target)> {
        self.registry
            .packages()
            .into_iter()
            .flat_map(|pkg| pkg.targets().map(move |t| (pkg.name(), t)))
            .collect_vec()
    }

    /// Bakes the named matrix config (spec.md section 4.6), returning each
    /// baked config paired with its slug.
    pub fn baked_configs(&self, matrix_name: &str) -> Result<Vec<(ConfigRecord, String)>, BuildererError> {
        let _span = info_span!("bake_matrix", matrix = matrix_name).entered();
        let matrix_record = self.registry.config(matrix_name).ok_or_else(|| BuildererError::MissingGenerator {
            name: matrix_name.to_owned(),
            message: format!("config {matrix_name:?} is not registered"),
        })?;
        Ok(matrix::bake(matrix_record)
            .into_iter()
            .map(|baked| {
                let slug = matrix::slug(matrix_record, &baked);
                (baked, slug)
            })
            .collect())
    }

    pub fn direct_dependencies(&self, label: &Label) -> Vec<Label> {
        graph::direct_dependencies(&self.edges, label)
    }

    pub fn all_dependencies(&self, label: &Label) -> Vec<Label> {
        graph::all_dependencies(&self.edges, label)
    }

    /// Whether `target`'s top-level condition holds under `config`
    /// (spec.md section 3: a false condition elides the target).
    pub fn is_elided(&self, config: &ConfigRecord, label: &Label) -> Result<bool, BuildererError> {
        let target = self.lookup(label)?;
        Ok(!target.condition().eval(config, label)?)
    }

    /// Resolves a conditional expression against a baked config (spec.md
    /// section 4.1).
    pub fn resolve(&self, config: &ConfigRecord, label: &Label, expr: &Expr) -> Result<Vec<Scalar>, BuildererError> {
        expr.resolve(config, label)
    }

    fn lookup(&self, label: &Label) -> Result<&Target, BuildererError> {
        self.registry.get_target(label).ok_or_else(|| BuildererError::UnknownDependency {
            label: label.clone(),
            message: format!("target {label} not found in registry"),
        })
    }

    fn config_path(&self, config: &ConfigRecord, key: &str, label: &Label) -> Result<PathBuf, BuildererError> {
        let value = config.get(key).ok_or_else(|| BuildererError::UnknownConfigKey {
            key: key.to_owned(),
            label: label.clone(),
            message: format!("{key} is not set in the active config"),
        })?;
        let scalar = value.as_scalar().ok_or_else(|| BuildererError::MatrixLeakage {
            label: label.clone(),
            message: format!("{key} resolved against a matrix (non-baked) config"),
        })?;
        Ok(PathBuf::from(scalar.to_string()))
    }

    fn sandbox_root(&self, config: &ConfigRecord, label: &Label) -> Result<PathBuf, BuildererError> {
        self.config_path(config, "sandbox_root", label)
    }

    /// Expands every `{P:T}` placeholder embedded in a resolved scalar,
    /// enforcing `UnreferencedPathTarget` against `label`'s transitive
    /// deps (spec.md section 4.3). Used for include/define/flag values;
    /// hdrs/srcs patterns use `resolve_glob_base` instead, since there the
    /// placeholder determines the pattern's *base*, not a substring.
    fn expand_refs(&self, config: &ConfigRecord, label: &Label, text: &str) -> Result<String, BuildererError> {
        let transitive = self.all_dependencies(label);
        let sandbox_root = self.sandbox_root(config, label)?;
        pathref::expand(
            text,
            label,
            label.package_path(),
            |dep| transitive.contains(dep),
            |dep| {
                let target = self.registry.get_target(dep)?;
                Some(pathref::target_root(
                    &self.workspace_root,
                    &sandbox_root,
                    dep.package_path(),
                    target,
                    PathContext::Hdrs,
                ))
            },
        )
    }

    /// Resolves `expr`, expanding `{P:T}` references in every resulting
    /// scalar string.
    fn resolve_and_expand(&self, config: &ConfigRecord, label: &Label, expr: &Expr) -> Result<Vec<String>, BuildererError> {
        expr.resolve(config, label)?
            .into_iter()
            .map(|scalar| self.expand_refs(config, label, &scalar.to_string()))
            .collect()
    }

    /// Determines the glob base for one `hdrs`/`srcs` pattern: the package
    /// directory by default, or the expanded root when the pattern begins
    /// with `{P:T}` (spec.md section 4.4).
    fn resolve_glob_base<'a>(
        &self,
        config: &ConfigRecord,
        label: &Label,
        which: PathContext,
        pattern: &'a str,
    ) -> Result<(PathBuf, &'a str), BuildererError> {
        if let Some(rest) = pattern.strip_prefix('{') {
            let close = rest.find('}').ok_or_else(|| BuildererError::MalformedPathReference {
                label: label.clone(),
                message: format!("unbalanced '{{' in glob pattern {pattern:?}"),
            })?;
            let inner = &rest[..close];
            let dep_label = Label::parse(inner, label.package_path()).map_err(|e| BuildererError::MalformedPathReference {
                label: label.clone(),
                message: format!("invalid path reference {{{inner}}} in glob pattern: {e}"),
            })?;
            let transitive = self.all_dependencies(label);
            if !transitive.contains(&dep_label) {
                return Err(BuildererError::UnreferencedPathTarget {
                    label: label.clone(),
                    target: dep_label,
                    message: format!("glob pattern {pattern:?} references a target outside transitive deps"),
                });
            }
            let dep_target = self.lookup(&dep_label)?;
            let sandbox_root = self.sandbox_root(config, label)?;
            let root = pathref::target_root(&self.workspace_root, &sandbox_root, dep_label.package_path(), dep_target, which);
            let remainder = rest[close + 1..].trim_start_matches('/');
            Ok((root, remainder))
        } else {
            Ok((self.workspace_root.join(label.package_path()), pattern))
        }
    }

    /// Resolves `expr` (a target's `hdrs`/`srcs` attribute) to its pattern
    /// strings and groups them by resolved glob base: the package directory
    /// by default, or the expanded root of a leading `{P:T}` placeholder
    /// (spec.md section 4.4). Shared by `enumerate_sources` and
    /// `sandbox_commit`, which must treat a `hdrs`/`srcs` pattern
    /// identically regardless of which one is asking.
    fn group_patterns_by_base(
        &self,
        config: &ConfigRecord,
        label: &Label,
        which: PathContext,
        expr: &Expr,
    ) -> Result<Vec<(PathBuf, Vec<String>)>, BuildererError> {
        let patterns: Vec<String> = expr.resolve(config, label)?.into_iter().map(|s| s.to_string()).collect();

        // Group patterns by resolved base, preserving per-base include/exclude
        // text (with leading `!` restored after the base prefix is stripped).
        let mut by_base: Vec<(PathBuf, Vec<String>)> = Vec::new();
        for raw in &patterns {
            let (exclude, text) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, raw.as_str()),
            };
            let (base, remainder) = self.resolve_glob_base(config, label, which, text)?;
            let entry = if exclude { format!("!{remainder}") } else { remainder.to_owned() };
            match by_base.iter_mut().find(|(b, _)| b == &base) {
                Some((_, list)) => list.push(entry),
                None => by_base.push((base, vec![entry])),
            }
        }
        Ok(by_base)
    }

    /// Applies spec.md sections 4.3/4.4 to a target's `hdrs` or `srcs`
    /// attribute, returning workspace-absolute paths (or sandbox-absolute
    /// if the target requests a sandbox).
    pub fn enumerate_sources(&self, config: &ConfigRecord, label: &Label, which: PathContext) -> Result<Vec<PathBuf>, BuildererError> {
        let _span = info_span!("enumerate_sources", label = %label, which = ?which).entered();
        let target = self.lookup(label)?;
        if self.is_elided(config, label)? {
            return Ok(Vec::new());
        }

        let expr = match (target, which) {
            (Target::CppLibrary(t), PathContext::Hdrs) => &t.hdrs,
            (Target::CppLibrary(t), PathContext::Srcs) => &t.srcs,
            (Target::CppBinary(_), PathContext::Hdrs) => return Ok(Vec::new()),
            (Target::CppBinary(t), PathContext::Srcs) => &t.srcs,
            (Target::GitRepository(_), _) | (Target::GenerateFiles(_), _) => return Ok(Vec::new()),
        };

        let by_base = self.group_patterns_by_base(config, label, which, expr)?;

        let sandbox_root = if target.wants_sandbox() { Some(self.sandbox_root(config, label)?) } else { None };
        let own_root = sandbox_root.as_ref().map(|root| {
            pathref::target_root(&self.workspace_root, root, label.package_path(), target, which)
        });

        let mut results: BTreeSet<PathBuf> = BTreeSet::new();
        for (base, patterns) in &by_base {
            let matched = glob::enumerate(base, patterns).map_err(|e| BuildererError::SandboxIOFailure {
                path: base.clone(),
                message: e.to_string(),
            })?;
            for path in matched {
                let final_path = match &own_root {
                    Some(root) => {
                        let relpath = path.strip_prefix(base).unwrap_or(&path);
                        root.join(relpath)
                    }
                    None => path,
                };
                results.insert(final_path);
            }
        }

        Ok(results.into_iter().collect())
    }

    /// Collects the effective include path / define set / flags for a
    /// target, following spec.md section 4.5's propagation rule: its own
    /// private (and, for libraries, public) attributes first, then the
    /// resolved `public_includes`/`public_defines` of every `CppLibrary`
    /// dependency in `all_dependencies` order.
    pub fn effective_flags(&self, config: &ConfigRecord, label: &Label) -> Result<EffectiveFlags, BuildererError> {
        let _span = info_span!("effective_flags", label = %label).entered();
        let target = self.lookup(label)?;
        if self.is_elided(config, label)? {
            return Ok(EffectiveFlags::default());
        }

        let mut out = EffectiveFlags::default();
        match target {
            Target::CppLibrary(t) => {
                out.includes.extend(self.resolve_and_expand(config, label, &t.private_includes)?);
                out.includes.extend(self.resolve_and_expand(config, label, &t.public_includes)?);
                out.defines.extend(self.resolve_and_expand(config, label, &t.private_defines)?);
                out.defines.extend(self.resolve_and_expand(config, label, &t.public_defines)?);
                out.c_flags.extend(self.resolve_and_expand(config, label, &t.c_flags)?);
                out.cxx_flags.extend(self.resolve_and_expand(config, label, &t.cxx_flags)?);
                out.link_flags.extend(self.resolve_and_expand(config, label, &t.link_flags)?);
            }
            Target::CppBinary(t) => {
                out.includes.extend(self.resolve_and_expand(config, label, &t.private_includes)?);
                out.defines.extend(self.resolve_and_expand(config, label, &t.private_defines)?);
                out.c_flags.extend(self.resolve_and_expand(config, label, &t.c_flags)?);
                out.cxx_flags.extend(self.resolve_and_expand(config, label, &t.cxx_flags)?);
                out.link_flags.extend(self.resolve_and_expand(config, label, &t.link_flags)?);
            }
            Target::GitRepository(_) | Target::GenerateFiles(_) => {}
        }

        for dep in self.all_dependencies(label) {
            let Some(Target::CppLibrary(lib)) = self.registry.get_target(&dep) else {
                continue;
            };
            if !lib.condition.eval(config, &dep)? {
                continue;
            }
            out.includes.extend(self.resolve_and_expand(config, &dep, &lib.public_includes)?);
            out.defines.extend(self.resolve_and_expand(config, &dep, &lib.public_defines)?);
            out.link_flags.extend(self.resolve_and_expand(config, &dep, &lib.link_flags)?);
        }

        Ok(out)
    }

    /// Materializes every sandboxed target's hdrs/srcs mirror (spec.md
    /// section 4.7), called once per generate pass before back-end
    /// emission.
    pub fn sandbox_commit(&self, config: &ConfigRecord) -> Result<(), BuildererError> {
        let _span = info_span!("sandbox_commit").entered();
        for (pkg_name, target) in self.iter_targets() {
            let label = Label::new(pkg_name, target.name());
            if !target.wants_sandbox() || self.is_elided(config, &label)? {
                continue;
            }

            let sandbox_root = self.sandbox_root(config, &label)?;
            for which in [PathContext::Hdrs, PathContext::Srcs] {
                if matches!(target, Target::CppBinary(_)) && which == PathContext::Hdrs {
                    continue;
                }
                let own_root = pathref::target_root(&self.workspace_root, &sandbox_root, pkg_name, target, which);

                let expr = match (target, which) {
                    (Target::CppLibrary(t), PathContext::Hdrs) => Some(&t.hdrs),
                    (Target::CppLibrary(t), PathContext::Srcs) => Some(&t.srcs),
                    (Target::CppBinary(t), PathContext::Srcs) => Some(&t.srcs),
                    _ => None,
                };
                let Some(expr) = expr else { continue };

                // Group by resolved base exactly as `enumerate_sources` does,
                // so a `{P:T}`-prefixed hdrs/srcs pattern globs against the
                // referenced target's expanded root rather than this
                // package's own directory.
                let by_base = self.group_patterns_by_base(config, &label, which, expr)?;

                let mut desired: Vec<DesiredFile> = Vec::new();
                for (base, patterns) in &by_base {
                    let matched = glob::enumerate(base, patterns).map_err(|e| BuildererError::SandboxIOFailure {
                        path: base.clone(),
                        message: e.to_string(),
                    })?;
                    for path in matched {
                        let relpath = path.strip_prefix(base).unwrap_or(&path).to_path_buf();
                        desired.push(DesiredFile { relpath, source: path });
                    }
                }

                sandbox::commit(&own_root, &desired).map_err(|e| BuildererError::SandboxIOFailure {
                    path: own_root.clone(),
                    message: e.to_string(),
                })?;
            }

            if let Target::GenerateFiles(gen) = target {
                let out_dir = sandbox_root.join(pkg_name).join(&gen.name).join("out");
                let outputs: Vec<PathBuf> = gen
                    .outputs
                    .resolve(config, &label)?
                    .into_iter()
                    .map(|s| PathBuf::from(s.to_string()))
                    .collect();
                sandbox::prepare_output_dirs(&out_dir, &outputs).map_err(|e| BuildererError::SandboxIOFailure {
                    path: out_dir.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;
    use crate::config::expr::{Condition, Expr};
    use crate::target::{CppBinary, CppLibrary};
    use crate::testutils::write_files;

    fn linux_config(workspace: &Path, sandbox: &Path) -> ConfigRecord {
        ConfigRecord::new()
            .with("platform", "linux")
            .with("toolchain", "gcc")
            .with("architecture", "x86-64")
            .with("build_config", "debug")
            .with("build_root", workspace.join("build").to_string_lossy().to_string())
            .with("sandbox_root", sandbox.to_string_lossy().to_string())
    }

    /// Scenario S1 from spec.md section 8.
    #[test]
    fn effective_flags_include_transitive_public_includes() -> Result<()> {
        crate::testutils::init_test_tracing();
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(
            workspace.path(),
            [("App/main.cpp", ""), ("App/include/u.h", ""), ("App/src/u.cpp", "")],
        )?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("App").unwrap();
            let mut lib = CppLibrary::new("util");
            lib.hdrs = Expr::from_scalars(["include/u.h"]);
            lib.srcs = Expr::from_scalars(["src/u.cpp"]);
            lib.public_includes = Expr::from_scalars(["include"]);
            pkg.add_target(Target::CppLibrary(lib)).unwrap();

            let mut bin = CppBinary::new("hello");
            bin.srcs = Expr::from_scalars(["main.cpp"]);
            bin.deps = vec![":util".to_owned()];
            pkg.add_target(Target::CppBinary(bin)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let hello = Label::new("App", "hello");

        assert_eq!(ws.all_dependencies(&hello), vec![Label::new("App", "util")]);

        let config = linux_config(workspace.path(), sandbox.path());
        let flags = ws.effective_flags(&config, &hello)?;
        assert!(flags.includes.iter().any(|p| p.ends_with("App/include")));
        Ok(())
    }

    #[test]
    fn enumerate_sources_respects_switch_conditions() -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("App/win.cpp", ""), ("App/posix.cpp", "")])?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("App").unwrap();
            let mut bin = CppBinary::new("hello");
            bin.srcs = Expr::Switch(vec![
                crate::config::expr::Case::new(
                    Condition::new().with("platform", "windows"),
                    vec![Expr::scalar("win.cpp")],
                ),
                crate::config::expr::Case::new(Condition::new(), vec![Expr::scalar("posix.cpp")]),
            ]);
            pkg.add_target(Target::CppBinary(bin)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());
        let sources = ws.enumerate_sources(&config, &Label::new("App", "hello"), PathContext::Srcs)?;
        assert_eq!(sources.len(), 1);
        assert!(sources[0].ends_with("App/posix.cpp"));
        Ok(())
    }

    #[test]
    fn elided_target_enumerates_no_sources() -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("App/a.cpp", "")])?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("App").unwrap();
            let mut bin = CppBinary::new("hello");
            bin.condition = Condition::new().with("platform", "windows");
            bin.srcs = Expr::from_scalars(["a.cpp"]);
            pkg.add_target(Target::CppBinary(bin)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());
        let sources = ws.enumerate_sources(&config, &Label::new("App", "hello"), PathContext::Srcs)?;
        assert!(sources.is_empty());
        Ok(())
    }

    /// Scenario S5 from spec.md section 8.
    #[test]
    fn sandbox_commit_materializes_library_hdrs() -> Result<()> {
        crate::testutils::init_test_tracing();
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("Pkg/include/a.h", "int a();")])?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("Pkg").unwrap();
            let mut lib = CppLibrary::new("L1");
            lib.hdrs = Expr::from_scalars(["include/**/*.h"]);
            lib.sandbox = true;
            pkg.add_target(Target::CppLibrary(lib)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());

        ws.sandbox_commit(&config)?;
        let expected = sandbox.path().join("Pkg/L1/hdrs/include/a.h");
        assert!(expected.exists());

        // Second pass with no changes must not fail and must leave the
        // tree as-is (idempotence, spec.md section 8).
        ws.sandbox_commit(&config)?;
        assert!(expected.exists());
        Ok(())
    }

    /// A `hdrs` pattern prefixed with `{P:T}` must glob against the
    /// referenced target's expanded root during sandbox materialization,
    /// exactly as it does for `enumerate_sources`.
    #[test]
    fn sandbox_commit_resolves_cross_package_glob_base() -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("Third/include/vendor.h", "int vendor();")])?;

        let mut registry = Registry::new();
        {
            let third = registry.add_package("Third").unwrap();
            third.add_target(Target::GitRepository(crate::target::GitRepository {
                name: "repo".to_owned(),
                condition: Condition::new(),
                remote: "https://example.invalid/repo.git".to_owned(),
                sha: "deadbeef".to_owned(),
            })).unwrap();
        }
        {
            let pkg = registry.add_package("Pkg").unwrap();
            let mut lib = CppLibrary::new("L1");
            lib.hdrs = Expr::from_scalars(["{Third:repo}/include/*.h"]);
            lib.deps = vec!["Third:repo".to_owned()];
            lib.sandbox = true;
            pkg.add_target(Target::CppLibrary(lib)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());

        // The referenced target's root is the `.vcs` checkout root
        // (spec.md section 4.3); stand in a fixture file there directly,
        // since this test does not exercise the VCS fetcher collaborator.
        let vcs_root = sandbox.path().join(".vcs/repo");
        write_files(&vcs_root, [("include/vendor.h", "int vendor();")])?;

        ws.sandbox_commit(&config)?;
        let expected = sandbox.path().join("Pkg/L1/hdrs/include/vendor.h");
        assert!(expected.exists(), "expected {expected:?} to exist");
        Ok(())
    }

    #[test]
    fn effective_flags_of_elided_target_is_empty() -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("App/win.cpp", "")])?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("App").unwrap();
            let mut bin = CppBinary::new("hello");
            bin.condition = Condition::new().with("platform", "windows");
            bin.private_includes = Expr::from_scalars(["win_include"]);
            bin.private_defines = Expr::from_scalars(["WIN32"]);
            pkg.add_target(Target::CppBinary(bin)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());
        let flags = ws.effective_flags(&config, &Label::new("App", "hello"))?;
        assert_eq!(flags, EffectiveFlags::default());
        Ok(())
    }

    #[test]
    fn path_reference_outside_transitive_deps_is_rejected() -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let sandbox = tempfile::tempdir()?;
        write_files(workspace.path(), [("App/main.cpp", "")])?;

        let mut registry = Registry::new();
        {
            let pkg = registry.add_package("App").unwrap();
            pkg.add_target(Target::CppLibrary(CppLibrary::new("util"))).unwrap();
            let mut bin = CppBinary::new("hello");
            bin.srcs = Expr::from_scalars(["main.cpp"]);
            bin.c_flags = Expr::from_scalars(["-I{App:util}"]);
            pkg.add_target(Target::CppBinary(bin)).unwrap();
        }

        let ws = Workspace::new(registry, workspace.path())?;
        let config = linux_config(workspace.path(), sandbox.path());
        let err = ws.effective_flags(&config, &Label::new("App", "hello")).unwrap_err();
        assert_eq!(err.kind(), "UnreferencedPathTarget");
        Ok(())
    }
}
