// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Conditional expression tree: Scalar / Seq / Optional / Switch, resolved
// against a baked ConfigRecord.
//
// Generalized from the teacher crate's `Dependency<L>` /
// `CompositeDependency<L>` pair in `dependency/mod.rs` (leaf vs. composite,
// `map_tree`/`try_map_tree` tree rewriting) and the resolution shape of
// `dependency/algorithm.rs`'s `elide_use_conditions`/`simplify`. Here the
// leaf is a bare `Scalar` and the composite variants are the spec's
// `Seq`/`Optional`/`Switch` rather than all-of/any-of/use-conditional.

use crate::error::BuildererError;
use crate::label::Label;

use super::record::{AxisValue, ConfigRecord, Scalar};

/// A condition: AND over a set of `key -> scalar-or-set` requirements. An
/// empty condition is always true.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Condition {
    requirements: Vec<(String, AxisValue)>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AxisValue>) -> Self {
        self.requirements.push((key.into(), value.into()));
        self
    }

    /// Evaluates the condition against a baked config. `label` is used only
    /// to annotate `UnknownConfigKey` errors.
    pub fn eval(&self, config: &ConfigRecord, label: &Label) -> Result<bool, BuildererError> {
        for (key, expected) in &self.requirements {
            let actual = config
                .get(key)
                .ok_or_else(|| BuildererError::UnknownConfigKey {
                    key: key.clone(),
                    label: label.clone(),
                    message: format!("condition referenced undeclared config key {key:?}"),
                })?
                .as_scalar()
                .ok_or_else(|| BuildererError::MatrixLeakage {
                    label: label.clone(),
                    message: format!(
                        "condition on {key:?} evaluated against a matrix (non-baked) config"
                    ),
                })?;
            if !expected.contains(actual) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// A single `Switch` arm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Case {
    pub condition: Condition,
    pub values: Vec<Expr>,
}

impl Case {
    pub fn new(condition: Condition, values: Vec<Expr>) -> Self {
        Self { condition, values }
    }
}

/// The conditional expression tree over a baked `ConfigRecord`. See spec.md
/// section 3, "Conditional expressions".
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Scalar(Scalar),
    Seq(Vec<Expr>),
    Optional(Condition, Vec<Expr>),
    Switch(Vec<Case>),
}

impl Expr {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        Self::Scalar(value.into())
    }

    /// Normalizes a plain list of scalars into `Expr::Seq`, matching
    /// spec.md's "Attribute-value normalization" rule: a value passed as a
    /// list is stored as a plain sequence, a scalar as a singleton.
    pub fn from_scalars<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        Self::Seq(values.into_iter().map(|v| Self::scalar(v)).collect())
    }

    /// Resolves the expression to a flat sequence of scalars in
    /// left-to-right, depth-first order, with empty branches dropped
    /// (spec.md section 3 and 4.1).
    pub fn resolve(&self, config: &ConfigRecord, label: &Label) -> Result<Vec<Scalar>, BuildererError> {
        let mut out = Vec::new();
        self.resolve_into(config, label, &mut out)?;
        Ok(out)
    }

    fn resolve_into(
        &self,
        config: &ConfigRecord,
        label: &Label,
        out: &mut Vec<Scalar>,
    ) -> Result<(), BuildererError> {
        match self {
            Self::Scalar(v) => out.push(v.clone()),
            Self::Seq(items) => {
                for item in items {
                    item.resolve_into(config, label, out)?;
                }
            }
            Self::Optional(cond, values) => {
                if cond.eval(config, label)? {
                    for item in values {
                        item.resolve_into(config, label, out)?;
                    }
                }
            }
            Self::Switch(cases) => {
                for case in cases {
                    if case.condition.eval(config, label)? {
                        for item in &case.values {
                            item.resolve_into(config, label, out)?;
                        }
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Self::Seq(items)
    }
}
