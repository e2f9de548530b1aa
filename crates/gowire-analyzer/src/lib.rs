//! gowire-analyzer: dependency graph resolution
//!
//! Turns the scanner's unordered `ParseResult` into a valid construction
//! plan:
//! - index providers by provided-type key, rejecting duplicates
//! - validate that every requested key has a provider (collecting all
//!   violations, not just the first)
//! - compute a cycle-free topological initialization order
//! - disambiguate generated variable names in final order
//! - collect external imports and assign collision-free aliases
//!
//! Resolution is a pure function of its input: identical `ParseResult`s
//! produce identical `Analysis` values.

mod error;
mod imports;
mod order;

pub use error::{AnalyzeError, MissingDependency};

use std::collections::{BTreeMap, HashMap};

use gowire_types::{Invocation, PackageNameResolver, ParseResult, Provider};
use serde::{Deserialize, Serialize};

/// The analyzer's output: everything the generator needs, in final order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Providers in a valid construction order
    pub providers: Vec<Provider>,
    /// Invocations in their original declaration order
    pub invocations: Vec<Invocation>,
    /// Package name of the generated file
    pub package_name: String,
    /// Import path of the generated file's package
    pub output_import_path: String,
    /// import path -> alias; empty alias means unqualified reference
    pub imports: BTreeMap<String, String>,
}

/// Resolve the dependency graph of a parse result.
pub fn analyze(
    parsed: &ParseResult,
    resolver: &dyn PackageNameResolver,
) -> Result<Analysis, AnalyzeError> {
    let mut by_type: HashMap<String, Provider> = HashMap::new();
    for p in &parsed.providers {
        let key = p.provided_type.key();
        if let Some(dup) = by_type.get(&key) {
            return Err(AnalyzeError::DuplicateProvider {
                key,
                first: dup.name.clone(),
                second: p.name.clone(),
            });
        }
        by_type.insert(key, p.clone());
    }

    validate_deps(&parsed.providers, &parsed.invocations, &by_type)?;

    let ordered = order::topo_sort(&parsed.providers, &parsed.invocations, &by_type)?;
    let ordered = resolve_var_names(ordered);

    let imports = imports::collect_imports(
        &ordered,
        &parsed.invocations,
        &parsed.output_import_path,
        resolver,
    );

    Ok(Analysis {
        providers: ordered,
        invocations: parsed.invocations.clone(),
        package_name: parsed.output_package.clone(),
        output_import_path: parsed.output_import_path.clone(),
        imports,
    })
}

/// Check that every requested key resolves to a provider.
///
/// Batch validation: all violations are collected before failing.
fn validate_deps(
    providers: &[Provider],
    invocations: &[Invocation],
    by_type: &HashMap<String, Provider>,
) -> Result<(), AnalyzeError> {
    let mut missing = Vec::new();

    for p in providers {
        for dep in &p.dependencies {
            let key = dep.ty.key();
            if !by_type.contains_key(&key) {
                missing.push(MissingDependency {
                    requester: p.name.clone(),
                    key,
                });
            }
        }
    }

    for inv in invocations {
        for dep in &inv.dependencies {
            let key = dep.key();
            if !by_type.contains_key(&key) {
                missing.push(MissingDependency {
                    requester: inv.name.clone(),
                    key,
                });
            }
        }
    }

    if !missing.is_empty() {
        return Err(AnalyzeError::MissingDependencies(missing));
    }
    Ok(())
}

/// Make variable names unique across the final provider order.
///
/// The first occurrence keeps the base name; later occurrences get their
/// 1-based collision count as a suffix. Position in the final order, not
/// declaration order, decides who keeps the bare name.
fn resolve_var_names(mut providers: Vec<Provider>) -> Vec<Provider> {
    let mut used: HashMap<String, usize> = HashMap::new();

    for p in providers.iter_mut() {
        let base = p.var_name.clone();
        let count = *used.get(&base).unwrap_or(&0);
        used.insert(base.clone(), count + 1);

        if count > 0 {
            p.var_name = format!("{}{}", base, count);
        }
    }
    providers
}
