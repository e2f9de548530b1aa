//! Provider and invocation entities

use serde::{Deserialize, Serialize};

use crate::{Dependency, TypeRef};

/// How a provider constructs its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Struct-literal construction: dependencies are assigned into fields
    Struct,
    /// Function-call construction: dependencies are passed positionally
    Func,
}

/// An entity that produces exactly one typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Declared name (struct type name or constructor function name)
    pub name: String,
    pub kind: ProviderKind,
    pub provided_type: TypeRef,
    pub dependencies: Vec<Dependency>,
    /// Whether construction returns a second `error` value
    pub can_error: bool,
    /// Import path of the package declaring this provider
    pub import_path: String,
    /// Local binding name in generated code; lower-camel form of the
    /// provided type's short name, disambiguated by the analyzer
    pub var_name: String,
}

/// A side-effecting call that consumes typed values and produces none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub name: String,
    /// Required types, positional
    pub dependencies: Vec<TypeRef>,
    pub can_error: bool,
    pub import_path: String,
}

/// The unordered bag of entities discovered by the scanner, plus the
/// identity of the package the generated file will live in.
///
/// Multiple scan roots concatenate into one `ParseResult` before analysis;
/// there is no cross-root identity beyond the shared key space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub providers: Vec<Provider>,
    pub invocations: Vec<Invocation>,
    pub output_package: String,
    pub output_import_path: String,
}

impl ParseResult {
    /// Append another scan root's entities, keeping declaration order
    pub fn merge(&mut self, other: ParseResult) {
        self.providers.extend(other.providers);
        self.invocations.extend(other.invocations);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty() && self.invocations.is_empty()
    }
}
