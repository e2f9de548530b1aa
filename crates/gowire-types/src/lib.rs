//! gowire-types: shared data model
//!
//! The boundary types exchanged between the scanner, the analyzer and the
//! code generator: type references and their canonical keys, provider and
//! invocation entities, and the scanner's merged `ParseResult`.

mod entity;
mod span;
mod typeref;

pub use entity::{Invocation, ParseResult, Provider, ProviderKind};
pub use span::Span;
pub use typeref::{Dependency, TypeRef};

/// Maps an import path to the package name it declares.
///
/// Implementations must be total: when the real name cannot be determined
/// they fall back to a syntactic guess. Lookups for the same path must be
/// stable for the lifetime of one tool invocation, including under
/// concurrent calls.
pub trait PackageNameResolver {
    fn resolve_name(&self, import_path: &str) -> String;
}
