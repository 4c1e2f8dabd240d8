// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Label parsing: `package_path:target_name`, with `:target_name` shorthand
// resolved against a current package before a `Label` is ever constructed.
//
// Grounded on the nom combinator style used throughout the dependency-atom
// parsers (see `dependency/parser.rs` and `dependency/package/parser.rs` in
// the teacher crate): small `take_while1`/`tag`/`alt` grammars with a
// `once_cell`-cached `Regex` for the identifier character class.

use std::fmt;

use nom::{
    bytes::complete::{tag, take_while1},
    combinator::{all_consuming, opt},
    IResult,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// `[A-Za-z0-9_.-]+`, shared by package-path segments and target names.
static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn is_valid_ident(s: &str) -> bool {
    !s.is_empty() && IDENT_RE.is_match(s)
}

/// A fully-qualified target identifier: `package_path:target_name`.
///
/// Comparison is byte-wise, as spec.md section 3 requires; deriving
/// `Ord`/`Eq` on the two owned `String` fields gives exactly that.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Label {
    package_path: String,
    target_name: String,
}

impl Label {
    pub fn new(package_path: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            target_name: target_name.into(),
        }
    }

    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Parses a label, resolving `:target_name` shorthand against
    /// `current_package`.
    pub fn parse(text: &str, current_package: &str) -> Result<Self, LabelParseError> {
        let (package_path, target_name) = parse_label_parts(text)
            .map_err(|_| LabelParseError(text.to_owned()))?;
        let package_path = package_path.unwrap_or(current_package);
        if !package_path.split('/').all(is_valid_ident) {
            return Err(LabelParseError(text.to_owned()));
        }
        if !is_valid_ident(target_name) {
            return Err(LabelParseError(text.to_owned()));
        }
        Ok(Self::new(package_path, target_name))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package_path, self.target_name)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({self})")
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("malformed label: {0:?}")]
pub struct LabelParseError(String);

/// Consumes a path segment: one or more identifier characters.
fn parse_segment(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

/// Parses `path:name` or `:name`, returning `(Option<package_path>, target_name)`.
fn parse_label_parts(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    all_consuming(|input| {
        let (input, package_path) = opt(parse_package_path)(input)?;
        let (input, _) = tag(":")(input)?;
        let (input, target_name) = parse_segment(input)?;
        Ok((input, (package_path, target_name)))
    })(input)
}

fn parse_package_path(input: &str) -> IResult<&str, &str> {
    // A package path is itself `segment(/segment)*`, but since segments and
    // `/` are both made of non-`:` characters, the simplest correct parse is
    // "everything up to the final `:`".
    let colon = input
        .find(':')
        .ok_or_else(|| nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))?;
    let (path, rest) = input.split_at(colon);
    if path.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fully_qualified_label() {
        let label = Label::parse("foo/bar:baz", "unused").unwrap();
        assert_eq!(label.package_path(), "foo/bar");
        assert_eq!(label.target_name(), "baz");
    }

    #[test]
    fn resolves_shorthand_against_current_package() {
        let label = Label::parse(":baz", "foo/bar").unwrap();
        assert_eq!(label.package_path(), "foo/bar");
        assert_eq!(label.target_name(), "baz");
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(Label::parse("foo/bar", "foo").is_err());
    }

    #[test]
    fn rejects_empty_target_name() {
        assert!(Label::parse("foo/bar:", "foo").is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(Label::parse("foo/bar:baz qux", "foo").is_err());
    }

    #[test]
    fn display_round_trips() {
        let label = Label::parse("foo/bar:baz", "unused").unwrap();
        assert_eq!(label.to_string(), "foo/bar:baz");
    }

    #[test]
    fn ordering_is_byte_wise() {
        let a = Label::new("a", "x");
        let b = Label::new("b", "x");
        assert!(a < b);
    }
}
