//! Documentation-oriented parsing of Protocol Buffer source files.
//!
//! This crate recovers a typed document model from `.proto` source text:
//! packages, messages, fields, enums, services and RPC methods, together with
//! the comments documenting each declaration and the validation annotations
//! embedded in them. It is a structural scan built for documentation tooling,
//! not a compiler front end: imports, `oneof` groups, inner message
//! declarations and semantic checks such as field-number collisions are out of
//! scope, and nothing is compiled to a binary descriptor.
//!
//! See [`parse()`] for the main entry point. The [`rst`] module renders a
//! parsed file as reStructuredText and the [`diagram`] module draws PlantUML
//! and Graphviz diagrams from the same model.
//!
//! # Examples
//!
//! ```
//! let file = protodoc::parse(r#"
//!     syntax = "proto3";
//!     package user.v1;
//!
//!     // A user account.
//!     message User {
//!         // Unique id.
//!         // @MinLength 1
//!         string id = 1;
//!     }
//! "#);
//!
//! assert_eq!(file.package, "user.v1");
//! assert_eq!(file.messages[0].name, "User");
//! assert_eq!(file.messages[0].comment, "A user account.");
//! assert_eq!(file.messages[0].fields[0].comment, "Unique id.");
//! assert_eq!(
//!     file.messages[0].fields[0].keywords[&protodoc::Annotation::MinLength],
//!     "1",
//! );
//! ```
//!
//! # Comment attachment
//!
//! A declaration's documentation is the contiguous `//` or `/* ... */` block
//! immediately above it; for fields, enum values and RPC methods an inline
//! trailing comment serves as a fallback when no block exists. Inside
//! comments, `@Keyword value` lines carry structured validation metadata (see
//! [`Annotation`]) and `@Ref Name` markers become RST cross-references.
//!
//! # Error handling
//!
//! Parsing is total: malformed declarations are dropped individually and the
//! rest of the file is still scanned, so [`parse()`] always returns a
//! [`ParsedFile`]. Only the file layer fails — [`parse_file()`] reports
//! missing, unreadable or non-UTF-8 files as [`Error`], letting batch callers
//! distinguish "parsed with zero matches" from "could not read".
#![warn(missing_debug_implementations, missing_docs)]
#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/protodoc/0.1.0/")]

use std::{fs, io, path::Path};

mod annotations;
mod ast;
mod comments;
mod error;
mod lex;
mod lines;
mod parse;
mod resolve;

pub mod diagram;
pub mod rst;


pub use self::annotations::Annotation;
pub use self::ast::{
    Enum, EnumBuilder, EnumValue, Field, FieldBuilder, FieldLabel, Message, MessageBuilder,
    ParsedFile, ParsedFileBuilder, RpcMethod, Service, ServiceBuilder,
};
pub use self::error::Error;

use self::error::ErrorKind;

/// Parses one file's source text into a [`ParsedFile`].
///
/// The scan never fails: a file without recognizable declarations produces an
/// empty model, and a declaration that cannot be parsed (for instance a body
/// whose brace never closes) is omitted while the rest of the file is still
/// scanned.
pub fn parse(source: &str) -> ParsedFile {
    parse::parse_file(source)
}

/// Reads and parses the file at the given path.
///
/// Unlike [`parse()`], this can fail: a missing file, an unreadable file and
/// non-UTF-8 content are each reported as a distinct [`Error`] so callers
/// processing a batch can skip, count or abort per file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedFile, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            Error::from_kind(ErrorKind::FileNotFound {
                path: path.to_owned(),
            })
        } else {
            Error::from_kind(ErrorKind::OpenFile {
                path: path.to_owned(),
                err,
            })
        }
    })?;
    let source = String::from_utf8(bytes).map_err(|_| {
        Error::from_kind(ErrorKind::FileInvalidUtf8 {
            path: path.to_owned(),
        })
    })?;
    Ok(parse(&source))
}
