//! Error types for dependency graph resolution

use std::fmt;

use thiserror::Error;

/// A single unmet requirement found during completeness validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// Name of the provider or invocation requesting the key
    pub requester: String,
    /// The key no provider satisfies
    pub key: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} requires {}", self.requester, self.key)
    }
}

/// Errors from dependency graph resolution.
///
/// Each variant is terminal for the run. Only missing dependencies
/// aggregate: the consumer needs the complete picture to fix their
/// declarations in one pass, so validation does not stop at the first.
#[derive(Debug, Clone, Error)]
pub enum AnalyzeError {
    /// E-GRAPH-001: two providers claim the same key
    #[error("duplicate provider for {key}: {first} and {second}")]
    DuplicateProvider {
        key: String,
        first: String,
        second: String,
    },

    /// E-GRAPH-002: requested keys with no provider
    #[error("missing dependencies:\n  {}", join_lines(.0))]
    MissingDependencies(Vec<MissingDependency>),

    /// E-GRAPH-003: the depends-on relation contains a loop
    #[error("circular dependency: {}", .path.join(" -> "))]
    CircularDependency {
        /// The loop, beginning and ending with the repeated key
        path: Vec<String>,
    },
}

impl AnalyzeError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzeError::DuplicateProvider { .. } => "E-GRAPH-001",
            AnalyzeError::MissingDependencies(_) => "E-GRAPH-002",
            AnalyzeError::CircularDependency { .. } => "E-GRAPH-003",
        }
    }
}

fn join_lines(missing: &[MissingDependency]) -> String {
    missing
        .iter()
        .map(MissingDependency::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}
