// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// ConfigRecord: a mapping from string keys to scalar or sequence-of-scalar
// values. Grounded on `data.rs`'s `Vars`/`UseMap` (plain string-keyed maps)
// and `config/mod.rs`'s `ConfigNodeValue` (named, source-tracked config
// entries) in the teacher crate.

use std::collections::HashMap;
use std::fmt;

/// A leaf value: string, integer, or boolean. No implicit coercion between
/// variants when compared (spec.md section 3, Scalar type).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The value an axis holds: a single scalar, or a finite ordered sequence
/// (which makes the record a *matrix* record for that axis; see
/// `ConfigRecord::is_baked`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AxisValue {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
}

impl AxisValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Sequence(_) => None,
        }
    }

    pub fn contains(&self, value: &Scalar) -> bool {
        match self {
            Self::Scalar(s) => s == value,
            Self::Sequence(seq) => seq.contains(value),
        }
    }
}

impl<T: Into<Scalar>> From<T> for AxisValue {
    fn from(value: T) -> Self {
        Self::Scalar(value.into())
    }
}

/// A named point (matrix or baked) in the configuration space.
///
/// Keys include the reserved axes (`platform`, `architecture`, `buildtool`,
/// `toolchain`, `build_config`, `build_root`, `sandbox_root`) plus any
/// user-defined fields; `ConfigRecord` makes no distinction between them.
///
/// Axis order is *declaration* order, not sorted: matrix baking (section
/// 4.6) walks axes in the order they were added to the matrix record, the
/// first axis varying slowest. This mirrors the `RepositorySet`/`order`
/// pairing in the teacher's `repository.rs` — a `HashMap` for lookup plus a
/// side `Vec` that remembers insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigRecord {
    axes: HashMap<String, AxisValue>,
    order: Vec<String>,
}

impl ConfigRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AxisValue>) -> Self {
        let key = key.into();
        if !self.axes.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.axes.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AxisValue> {
        self.axes.get(key)
    }

    /// Axis keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AxisValue)> {
        self.order.iter().map(|k| (k.as_str(), &self.axes[k]))
    }

    /// A record is baked when every axis holds a scalar.
    pub fn is_baked(&self) -> bool {
        self.axes.values().all(|v| matches!(v, AxisValue::Scalar(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baked_requires_every_axis_scalar() {
        let baked = ConfigRecord::new()
            .with("architecture", "x86-64")
            .with("build_config", "debug");
        assert!(baked.is_baked());

        let matrix = baked.with(
            "build_config",
            AxisValue::Sequence(vec!["debug".into(), "release".into()]),
        );
        assert!(!matrix.is_baked());
    }

    #[test]
    fn keys_preserve_declaration_order_not_sorted() {
        let record = ConfigRecord::new()
            .with("build_config", "debug")
            .with("architecture", "x86-64");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["build_config", "architecture"]);
    }

    #[test]
    fn axis_value_contains_scalar_or_set_membership() {
        let scalar: AxisValue = "linux".into();
        assert!(scalar.contains(&"linux".into()));
        assert!(!scalar.contains(&"macos".into()));

        let set = AxisValue::Sequence(vec!["linux".into(), "macos".into()]);
        assert!(set.contains(&"macos".into()));
        assert!(!set.contains(&"windows".into()));
    }
}
