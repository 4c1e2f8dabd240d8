// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Test-only fixture helper, identical in shape to the corpus's own
// `testutils::write_files` (grounded on `testutils.rs` in the teacher
// crate), used to stand up fixture package trees under a `tempfile::TempDir`.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;

/// Installs a `tracing_subscriber` writer scoped to the test harness so a
/// failing assertion's surrounding spans (`bake_matrix`, `enumerate_sources`,
/// `sandbox_commit`, ...) show up in `cargo test -- --nocapture` output.
/// Safe to call from multiple tests: a subscriber is already installed once
/// the first caller wins.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Writes `files` (relative path, content) pairs under `base_dir`, creating
/// parent directories as needed.
pub fn write_files<'a, P: AsRef<Path> + 'a, D: AsRef<str> + 'a, I: IntoIterator<Item = (P, D)>>(
    base_dir: impl AsRef<Path>,
    files: I,
) -> Result<()> {
    let dir = base_dir.as_ref();

    for (rel_path, content) in files.into_iter() {
        let path = dir.join(rel_path.as_ref());
        let content = content.as_ref();

        create_dir_all(path.parent().unwrap())?;

        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;
    }

    Ok(())
}
