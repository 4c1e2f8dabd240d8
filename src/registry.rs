// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Package/target registry: packages, target kinds, attribute storage,
// uniqueness (spec.md section 4.2).
//
// Grounded on `repository.rs`'s `RepositorySet`/`Repository` in the teacher
// crate: an ordered map of named entries keyed by a unique name, backed by a
// `HashMap` plus an insertion-order `Vec`, with `get_repo_by_name`-style
// lookups returning a `Result` instead of an `Option`.

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::BuildererError;
use crate::label::Label;
use crate::target::Target;

/// `{name, dir, targets: ordered map<name, Target>}` (spec.md section 3).
/// `name` equals the package's workspace-relative directory path.
#[derive(Clone, Debug)]
pub struct Package {
    name: String,
    targets: HashMap<String, Target>,
    // Keeps the insertion order of `targets`, mirroring the teacher's
    // `RepositorySet::order` convention for deterministic iteration.
    order: Vec<String>,
}

impl Package {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a target; duplicate names within the same package are a
    /// fatal `DuplicateTarget`.
    pub fn add_target(&mut self, target: Target) -> Result<(), BuildererError> {
        let name = target.name().to_owned();
        if self.targets.contains_key(&name) {
            return Err(BuildererError::DuplicateTarget {
                label: Label::new(self.name.clone(), name.clone()),
                message: format!("target {name:?} already declared in package {:?}", self.name),
            });
        }
        self.order.push(name.clone());
        self.targets.insert(name, target);
        Ok(())
    }

    pub fn get_target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Targets in declaration order (spec.md section 4.8, `iter_targets`).
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.order.iter().map(|name| &self.targets[name])
    }
}

/// Holds every `Package` and registered `ConfigRecord`/back-end name,
/// enforcing the uniqueness invariants of spec.md section 4.2.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    packages: HashMap<String, Package>,
    package_order: Vec<String>,
    buildtools: HashMap<String, String>,
    configs: HashMap<String, crate::config::record::ConfigRecord>,
    config_order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `add_buildtool(name, generator_kind)` — registers a back-end factory
    /// under a unique name.
    pub fn add_buildtool(
        &mut self,
        name: impl Into<String>,
        generator_kind: impl Into<String>,
    ) -> Result<(), BuildererError> {
        let name = name.into();
        if self.buildtools.contains_key(&name) {
            return Err(BuildererError::DuplicateBuildtool {
                name: name.clone(),
                message: format!("buildtool {name:?} already registered"),
            });
        }
        self.buildtools.insert(name, generator_kind.into());
        Ok(())
    }

    pub fn buildtool(&self, name: &str) -> Option<&str> {
        self.buildtools.get(name).map(String::as_str)
    }

    /// `add_config(name, record)` — registers a named `ConfigRecord`; the
    /// name must be unique.
    pub fn add_config(
        &mut self,
        name: impl Into<String>,
        record: crate::config::record::ConfigRecord,
    ) -> Result<(), BuildererError> {
        let name = name.into();
        if self.configs.contains_key(&name) {
            return Err(BuildererError::DuplicateConfig {
                name: name.clone(),
                message: format!("config {name:?} already registered"),
            });
        }
        self.config_order.push(name.clone());
        self.configs.insert(name, record);
        Ok(())
    }

    pub fn config(&self, name: &str) -> Option<&crate::config::record::ConfigRecord> {
        self.configs.get(name)
    }

    /// `add_package(name)` — returns a mutable handle to a newly created
    /// package; duplicate package names are a fatal `DuplicatePackage`.
    pub fn add_package(&mut self, name: impl Into<String>) -> Result<&mut Package, BuildererError> {
        let name = name.into();
        if self.packages.contains_key(&name) {
            return Err(BuildererError::DuplicatePackage {
                name: name.clone(),
                message: format!("package {name:?} already declared"),
            });
        }
        self.package_order.push(name.clone());
        self.packages.insert(name.clone(), Package::new(name.clone()));
        Ok(self.packages.get_mut(&name).expect("just inserted"))
    }

    pub fn get_package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Packages sorted by name (spec.md section 4.8, `iter_targets`:
    /// "packages sorted, targets in declaration order").
    pub fn packages(&self) -> Vec<&Package> {
        let mut names: Vec<&str> = self.package_order.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter().map(|name| &self.packages[name]).collect_vec()
    }

    pub fn get_target(&self, label: &Label) -> Option<&Target> {
        self.packages
            .get(label.package_path())
            .and_then(|pkg| pkg.get_target(label.target_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::CppBinary;

    #[test]
    fn duplicate_target_in_same_package_is_fatal() {
        let mut registry = Registry::new();
        let pkg = registry.add_package("app").unwrap();
        pkg.add_target(Target::CppBinary(CppBinary::new("hello"))).unwrap();
        let err = pkg
            .add_target(Target::CppBinary(CppBinary::new("hello")))
            .unwrap_err();
        assert_eq!(err.kind(), "DuplicateTarget");
    }

    #[test]
    fn duplicate_package_is_fatal() {
        let mut registry = Registry::new();
        registry.add_package("app").unwrap();
        let err = registry.add_package("app").unwrap_err();
        assert_eq!(err.kind(), "DuplicatePackage");
    }

    #[test]
    fn duplicate_buildtool_is_fatal() {
        let mut registry = Registry::new();
        registry.add_buildtool("make", "make").unwrap();
        let err = registry.add_buildtool("make", "make").unwrap_err();
        assert_eq!(err.kind(), "DuplicateBuildtool");
    }

    #[test]
    fn targets_iterate_in_declaration_order() {
        let mut registry = Registry::new();
        let pkg = registry.add_package("app").unwrap();
        pkg.add_target(Target::CppBinary(CppBinary::new("b"))).unwrap();
        pkg.add_target(Target::CppBinary(CppBinary::new("a"))).unwrap();
        let names: Vec<&str> = pkg.targets().map(Target::name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn packages_iterate_sorted_by_name() {
        let mut registry = Registry::new();
        registry.add_package("zeta").unwrap();
        registry.add_package("alpha").unwrap();
        let names: Vec<&str> = registry.packages().into_iter().map(Package::name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
