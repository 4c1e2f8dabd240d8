// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Config & Conditionals (spec.md section 4.1): `ConfigRecord`/`Scalar`
//! storage, the `Expr`/`Condition` tree, and matrix baking.

pub mod expr;
pub mod matrix;
pub mod record;
