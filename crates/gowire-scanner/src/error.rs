//! Scanner error types

use std::path::{Path, PathBuf};

use gowire_types::Span;
use thiserror::Error;

/// Errors raised while scanning annotated source files.
///
/// All of these are terminal for the run; the scanner reports the first
/// occurrence and stops.
#[derive(Debug, Error)]
pub enum ScanError {
    /// E-SCAN-001: a declaration annotated as both provider and invocation
    #[error("{name}: cannot have both provide and invoke annotations")]
    ConflictingAnnotations {
        name: String,
        file: PathBuf,
        span: Span,
    },

    /// E-SCAN-002: a dependency type shape the wiring cannot express
    #[error("{detail}")]
    UnsupportedDependency {
        detail: String,
        file: PathBuf,
        span: Span,
    },

    /// E-SCAN-003: a qualified type names a package alias the file never imports
    #[error("unknown package alias: {alias}")]
    UnknownPackageAlias {
        alias: String,
        file: PathBuf,
        span: Span,
    },

    /// E-SCAN-004: an annotated function whose signature cannot provide
    #[error("{name}: {reason}")]
    BadProviderSignature {
        name: String,
        reason: String,
        file: PathBuf,
        span: Span,
    },

    /// E-SCAN-005: the declaration subset parser got stuck
    #[error("syntax error: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        file: PathBuf,
        span: Span,
    },

    /// E-SCAN-006: the module import path could not be determined
    #[error("resolving module path for {}: {reason}", .dir.display())]
    ModulePath { dir: PathBuf, reason: String },

    /// E-SCAN-007: filesystem trouble while walking or reading
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::ConflictingAnnotations { .. } => "E-SCAN-001",
            ScanError::UnsupportedDependency { .. } => "E-SCAN-002",
            ScanError::UnknownPackageAlias { .. } => "E-SCAN-003",
            ScanError::BadProviderSignature { .. } => "E-SCAN-004",
            ScanError::Syntax { .. } => "E-SCAN-005",
            ScanError::ModulePath { .. } => "E-SCAN-006",
            ScanError::Io { .. } => "E-SCAN-007",
        }
    }

    /// Source location for diagnostics, when the error points into a file
    pub fn location(&self) -> Option<(&Path, Span)> {
        match self {
            ScanError::ConflictingAnnotations { file, span, .. }
            | ScanError::UnsupportedDependency { file, span, .. }
            | ScanError::UnknownPackageAlias { file, span, .. }
            | ScanError::BadProviderSignature { file, span, .. }
            | ScanError::Syntax { file, span, .. } => Some((file.as_path(), *span)),
            ScanError::ModulePath { .. } | ScanError::Io { .. } => None,
        }
    }
}
