// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Matrix baking: Cartesian-product expansion of a matrix `ConfigRecord`
// into an ordered list of baked `ConfigRecord`s, plus the slug assembled
// for each (spec.md section 4.6).
//
// The baking algorithm itself has no direct PMS/Portage equivalent in the
// teacher crate (grounded per `DESIGN.md`); its deterministic, allocate-a-
// Vec-and-sort-or-preserve-order style follows `repository.rs`'s
// `RepositoryLookup::create_repository_set`, which builds up an ordered
// `Vec<String>` while resolving a graph and only materializes the final
// map at the end.

use super::record::{AxisValue, ConfigRecord, Scalar};

/// One axis of the matrix record, split into its declaration-order key and
/// its sequence of possible values (a scalar axis is a one-element
/// sequence, carrying no entry into the slug per `[FULL 4.6]`).
struct Axis<'a> {
    key: &'a str,
    values: &'a [Scalar],
    varies: bool,
}

/// Expands `matrix` into the Cartesian product of every sequence-valued
/// axis, holding scalar axes fixed. Axes are walked in declaration order
/// with the first axis varying slowest (spec.md section 4.6). An empty
/// sequence on any axis yields zero baked configs.
pub fn bake(matrix: &ConfigRecord) -> Vec<ConfigRecord> {
    let axes: Vec<Axis> = matrix
        .iter()
        .map(|(key, value)| match value {
            AxisValue::Scalar(s) => Axis {
                key,
                values: std::slice::from_ref(s),
                varies: false,
            },
            AxisValue::Sequence(values) => Axis {
                key,
                values,
                varies: true,
            },
        })
        .collect();

    if axes.iter().any(|axis| axis.values.is_empty()) {
        return Vec::new();
    }

    let mut results = vec![ConfigRecord::new()];
    for axis in &axes {
        let mut next = Vec::with_capacity(results.len() * axis.values.len());
        for partial in &results {
            for value in axis.values {
                next.push(partial.clone().with(axis.key, value.clone()));
            }
        }
        results = next;
    }
    results
}

/// Assembles the stable name slug for a baked config produced from
/// `matrix`: the `.`-joined values of every axis that varied in the source
/// matrix record, in declaration order, lowercased with any character
/// outside `[A-Za-z0-9_.-]` replaced by `_` (`[FULL 4.6]`).
pub fn slug(matrix: &ConfigRecord, baked: &ConfigRecord) -> String {
    matrix
        .iter()
        .filter(|(_, value)| matches!(value, AxisValue::Sequence(_)))
        .filter_map(|(key, _)| baked.get(key))
        .filter_map(AxisValue::as_scalar)
        .map(|scalar| sanitize(&scalar.to_string()))
        .collect::<Vec<_>>()
        .join(".")
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || matches!(lower, '_' | '.' | '-') {
                lower
            } else {
                '_'
            }
        })
        .collect()
}
