use std::{fmt, io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// An error that can occur while reading a protobuf source file.
///
/// The structural scan itself never fails: declarations that cannot be parsed
/// are omitted from the result, and an empty match set is an ordinary outcome.
/// Errors exist only at the file boundary, so a batch caller can decide per
/// file whether to skip, count or abort.
#[derive(Diagnostic, Error)]
#[error("{}", kind)]
#[diagnostic(forward(kind))]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum ErrorKind {
    #[error("error opening file '{path}'")]
    OpenFile {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("file '{path}' not found")]
    FileNotFound { path: PathBuf },
    #[error("file '{path}' is not valid utf-8")]
    FileInvalidUtf8 { path: PathBuf },
}

impl Error {
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Error { kind }
    }

    /// The path of the file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match &self.kind {
            ErrorKind::OpenFile { path, .. }
            | ErrorKind::FileNotFound { path }
            | ErrorKind::FileInvalidUtf8 { path } => path,
        }
    }

    /// Returns true if the source file did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(&self.kind, ErrorKind::FileNotFound { .. })
    }

    /// Returns true if this error was caused by an IO error other than the
    /// file being missing.
    pub fn is_io(&self) -> bool {
        matches!(&self.kind, ErrorKind::OpenFile { .. })
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::OpenFile { err, .. } => write!(f, "{}: {}", self, err),
            _ => write!(f, "{}", self),
        }
    }
}

#[test]
fn fmt_debug_io() {
    let err = Error::from_kind(ErrorKind::OpenFile {
        path: "path/to/file.proto".into(),
        err: io::Error::new(io::ErrorKind::PermissionDenied, "io error"),
    });

    assert!(err.is_io());
    assert!(!err.is_not_found());
    assert_eq!(
        format!("{:?}", err),
        "error opening file 'path/to/file.proto': io error"
    );
}

#[test]
fn fmt_debug_not_found() {
    let err = Error::from_kind(ErrorKind::FileNotFound {
        path: "missing.proto".into(),
    });

    assert!(err.is_not_found());
    assert_eq!(format!("{:?}", err), "file 'missing.proto' not found");
}
