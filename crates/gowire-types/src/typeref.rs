//! Type references and their canonical keys

use serde::{Deserialize, Serialize};

/// A qualified reference to a Go type.
///
/// The empty import path marks builtins and types declared in the output
/// package root; everything else is the owning package's import path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub import_path: String,
    pub is_pointer: bool,
}

impl TypeRef {
    /// Canonical string form used to join providers with their consumers.
    ///
    /// Two TypeRefs satisfy each other iff their keys are equal.
    pub fn key(&self) -> String {
        let prefix = if self.is_pointer { "*" } else { "" };
        if self.import_path.is_empty() {
            return format!("{}{}", prefix, self.name);
        }
        format!("{}{}.{}", prefix, self.import_path, self.name)
    }
}

/// A required type, optionally bound to a struct field name.
///
/// The field name is set for struct-kind providers whose dependencies are
/// written into named fields; positional dependencies leave it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub field_name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Dependency {
    pub fn positional(ty: TypeRef) -> Self {
        Self {
            field_name: None,
            ty,
        }
    }

    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            field_name: Some(name.into()),
            ty,
        }
    }
}
