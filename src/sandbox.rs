// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Sandbox layer: hdrs/srcs mirror trees under `sandbox_root`, touch-only-
// on-change writes, obsolete-file pruning (spec.md section 4.7).
//
// Grounded on `fileops.rs`'s `FileOps`/`execute_file_ops` (a declarative
// list of operations resolved against a root before being applied) for the
// "desired state, then apply" shape, and `repository.rs`'s
// `RepositoryDigest::new` (parallel `Sha256` hashing via `rayon`) for
// deciding whether a destination file's content already matches —
// reused here instead of mtime, which is not reproducible across
// checkouts (`[FULL 4.7]`).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// A file the sandbox should contain: `relpath` under the target's hdrs or
/// srcs root, copied from `source` (an absolute path to the real file).
#[derive(Clone, Debug)]
pub struct DesiredFile {
    pub relpath: PathBuf,
    pub source: PathBuf,
}

fn hash_file(path: &Path) -> Result<[u8; 32]> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hasher.finalize().into())
}

/// Materializes `desired` under `root` (a target's `hdrs` or `srcs`
/// sandbox directory): writes a file only when absent or when its content
/// hash differs from the desired source's; removes any existing file under
/// `root` with no corresponding desired entry; prunes directories left
/// empty by removal.
pub fn commit(root: &Path, desired: &[DesiredFile]) -> Result<()> {
    let existing: BTreeSet<PathBuf> = if root.exists() {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect()
    } else {
        BTreeSet::new()
    };

    let desired_set: BTreeSet<&Path> = desired.iter().map(|f| f.relpath.as_path()).collect();

    let to_write: Vec<&DesiredFile> = desired
        .par_iter()
        .filter(|f| {
            let dest = root.join(&f.relpath);
            match (hash_file(&f.source), dest.exists().then(|| hash_file(&dest)).transpose()) {
                (Ok(want), Ok(Some(have))) => want != have,
                _ => true,
            }
        })
        .collect();

    for file in to_write {
        let dest = root.join(&file.relpath);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        fs::copy(&file.source, &dest)
            .with_context(|| format!("copying {} to {}", file.source.display(), dest.display()))?;
    }

    for relpath in &existing {
        if !desired_set.contains(relpath.as_path()) {
            let dest = root.join(relpath);
            fs::remove_file(&dest).with_context(|| format!("removing {}", dest.display()))?;
        }
    }

    prune_empty_dirs(root)?;
    Ok(())
}

/// Ensures `out_dir` (a `GenerateFiles` target's sandbox output directory)
/// exists, and that every declared relative output's parent directory
/// exists. The core does not invoke `generator` itself (spec.md section 9,
/// Open Questions): this only prepares the directory a back-end's
/// generator run will populate.
pub fn prepare_output_dirs(out_dir: &Path, relative_outputs: &[PathBuf]) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("mkdir -p {}", out_dir.display()))?;
    for rel in relative_outputs {
        if let Some(parent) = out_dir.join(rel).parent() {
            fs::create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
    }
    Ok(())
}

fn prune_empty_dirs(root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect();
    // Deepest directories first, so emptied parents are pruned in the same pass.
    dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
    for dir in dirs {
        if dir == root {
            continue;
        }
        let is_empty = fs::read_dir(&dir).map(|mut it| it.next().is_none()).unwrap_or(false);
        if is_empty {
            fs::remove_dir(&dir).with_context(|| format!("rmdir {}", dir.display()))?;
        }
    }
    Ok(())
}
