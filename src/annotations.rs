//! Validation annotations embedded in comments.
//!
//! Field comments may carry `@Keyword value` lines from the AsyncAPI protobuf
//! schema vocabulary. Annotation lines are lifted out of the description into
//! a keyword map; everything else stays description text.

use std::collections::BTreeMap;
use std::fmt;

use crate::resolve;

/// A validation annotation keyword.
///
/// The vocabulary is closed: an `@`-token outside this set is not an error, it
/// simply remains part of the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Annotation {
    /// `@ExclusiveMinimum`
    ExclusiveMinimum,
    /// `@ExclusiveMaximum`
    ExclusiveMaximum,
    /// `@MinLength`
    MinLength,
    /// `@MaxLength`
    MaxLength,
    /// `@MinItems`
    MinItems,
    /// `@MaxItems`
    MaxItems,
    /// `@MultipleOf`
    MultipleOf,
    /// `@Minimum` or `@Min`
    Minimum,
    /// `@Maximum` or `@Max`
    Maximum,
    /// `@Pattern`
    Pattern,
    /// `@Example`
    Example,
    /// `@Default`
    Default,
}

impl Annotation {
    /// The canonical schema key, as consumed by AsyncAPI tooling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Annotation::ExclusiveMinimum => "exclusiveMinimum",
            Annotation::ExclusiveMaximum => "exclusiveMaximum",
            Annotation::MinLength => "minLength",
            Annotation::MaxLength => "maxLength",
            Annotation::MinItems => "minItems",
            Annotation::MaxItems => "maxItems",
            Annotation::MultipleOf => "multipleOf",
            Annotation::Minimum => "minimum",
            Annotation::Maximum => "maximum",
            Annotation::Pattern => "pattern",
            Annotation::Example => "example",
            Annotation::Default => "default",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Order matters: longer aliases come first so `@ExclusiveMinimum` is never
// consumed by `@Minimum`, nor `@Minimum` by `@Min`.
const ALIASES: &[(&str, Annotation)] = &[
    ("@ExclusiveMinimum", Annotation::ExclusiveMinimum),
    ("@ExclusiveMaximum", Annotation::ExclusiveMaximum),
    ("@MinLength", Annotation::MinLength),
    ("@MaxLength", Annotation::MaxLength),
    ("@MinItems", Annotation::MinItems),
    ("@MaxItems", Annotation::MaxItems),
    ("@MultipleOf", Annotation::MultipleOf),
    ("@Minimum", Annotation::Minimum),
    ("@Maximum", Annotation::Maximum),
    ("@Min", Annotation::Minimum),
    ("@Max", Annotation::Maximum),
    ("@Pattern", Annotation::Pattern),
    ("@Example", Annotation::Example),
    ("@Default", Annotation::Default),
];

/// Splits a normalized, newline-preserving comment into description text and
/// an annotation map.
///
/// A line starting with a known keyword maps the keyword to the remainder of
/// the line, with one leading `:` or `=` stripped. Other lines accumulate into
/// the description, which is returned with cross-references resolved.
pub(crate) fn extract(comment: &str) -> (String, BTreeMap<Annotation, String>) {
    let mut keywords = BTreeMap::new();
    let mut description: Vec<&str> = Vec::new();

    for line in comment.lines() {
        let line = line.trim();
        match ALIASES.iter().find(|(alias, _)| line.starts_with(alias)) {
            Some((alias, annotation)) => {
                let mut value = line[alias.len()..].trim();
                if let Some(rest) = value.strip_prefix(':').or_else(|| value.strip_prefix('=')) {
                    value = rest.trim();
                }
                if !value.is_empty() {
                    keywords.insert(*annotation, value.to_owned());
                }
            }
            None if !line.is_empty() => description.push(line),
            None => {}
        }
    }

    (resolve::references(&description.join(" ")), keywords)
}
