// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Glob & file enumeration: include/exclude glob pattern evaluation with
// deterministic ordering (spec.md section 4.4).
//
// Grounded on `repository.rs`'s `find_ebuilds`/`find_all_ebuilds` (directory
// scan + extension filter + `paths.sort()`) and its `walkdir` usage in
// `RepositoryDigest::new`, generalized from a fixed `*.ebuild` suffix check
// to an arbitrary `*`/`**`/`?` pattern compiled to an anchored `Regex`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use walkdir::WalkDir;

/// One glob entry: an include (default) or an exclude (`!`-prefixed)
/// pattern, resolved relative to `base`.
#[derive(Clone, Debug)]
pub struct GlobPattern {
    text: String,
    exclude: bool,
    matcher: OnceCell<Regex>,
}

impl GlobPattern {
    pub fn parse(raw: &str) -> Self {
        let (exclude, text) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest.to_owned()),
            None => (false, raw.to_owned()),
        };
        Self {
            text,
            exclude,
            matcher: OnceCell::new(),
        }
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    fn regex(&self) -> &Regex {
        self.matcher
            .get_or_init(|| Regex::new(&translate(&self.text)).expect("glob pattern compiles"))
    }

    fn matches(&self, relpath: &str) -> bool {
        self.regex().is_match(relpath)
    }
}

/// Translates a glob pattern (`*`, `**`, `?`; no character classes or
/// braces, per spec.md section 4.4) into an anchored regex matching
/// forward-slash-separated relative paths.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut re = String::from("^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let prev_slash = i == 0 || chars[i - 1] == '/';
                let next_slash = chars.get(i + 2) == Some(&'/');
                if prev_slash && next_slash {
                    re.push_str("(?:.*/)?");
                    i += 3;
                } else if prev_slash && i + 2 == chars.len() {
                    if re.ends_with('/') {
                        re.pop();
                        re.push_str("(?:/.*)?");
                    } else {
                        re.push_str(".*");
                    }
                    i += 2;
                } else {
                    re.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                re.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                re.push_str("[^/]");
                i += 1;
            }
            c => {
                if "\\.+()|[]{}^$".contains(c) {
                    re.push('\\');
                }
                re.push(c);
                i += 1;
            }
        }
    }
    re.push('$');
    re
}

/// Evaluates `patterns` against files under `base` and returns
/// workspace-relative paths of matched files in lexicographic order
/// (spec.md section 4.4). A missing `base` directory is not an error: it
/// simply contributes no matches, which permits optional platform source
/// trees. Patterns are matched relative to `base`, which the caller has
/// already resolved (package directory, or an expanded `{P:T}` root).
pub fn enumerate(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let parsed: Vec<GlobPattern> = patterns.iter().map(|p| GlobPattern::parse(p)).collect();
    let includes: Vec<&GlobPattern> = parsed.iter().filter(|p| !p.is_exclude()).collect();
    let excludes: Vec<&GlobPattern> = parsed.iter().filter(|p| p.is_exclude()).collect();

    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut all_files: Vec<String> = Vec::new();
    for entry in WalkDir::new(base).into_iter() {
        let entry = entry.with_context(|| format!("walking {}", base.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relpath = entry
            .path()
            .strip_prefix(base)
            .expect("walkdir entries are under base")
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        all_files.push(relpath);
    }

    let mut matched: BTreeSet<String> = BTreeSet::new();
    for relpath in &all_files {
        if includes.iter().any(|p| p.matches(relpath)) {
            matched.insert(relpath.clone());
        }
    }
    for relpath in &all_files {
        if excludes.iter().any(|p| p.matches(relpath)) {
            matched.remove(relpath);
        }
    }

    Ok(matched.into_iter().map(|rel| base.join(rel)).collect())
}
