//! Cycle-safe topological ordering of providers
//!
//! Depth-first traversal over the depends-on relation with explicit
//! per-node visit state, so the walk is reentrant and a cycle can be
//! reported as the exact key path that closes the loop.

use std::collections::HashMap;

use gowire_types::{Invocation, Provider};

use crate::AnalyzeError;

/// Visit state for DFS cycle detection
#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Completed,
}

/// Order providers so that every dependency precedes its dependents.
///
/// Traversal roots are the invocations' dependencies first (providers
/// reachable only through an invocation are still placed ahead of their
/// call site), then every provider in declaration order, so providers no
/// invocation reaches are included as well.
pub(crate) fn topo_sort(
    providers: &[Provider],
    invocations: &[Invocation],
    by_type: &HashMap<String, Provider>,
) -> Result<Vec<Provider>, AnalyzeError> {
    let mut state: HashMap<String, VisitState> = HashMap::new();
    let mut path: Vec<String> = Vec::new();
    let mut result: Vec<Provider> = Vec::new();

    for inv in invocations {
        for dep in &inv.dependencies {
            if let Some(provider) = by_type.get(&dep.key()) {
                visit(provider, by_type, &mut state, &mut path, &mut result)?;
            }
        }
    }

    for provider in providers {
        visit(provider, by_type, &mut state, &mut path, &mut result)?;
    }

    Ok(result)
}

fn visit(
    provider: &Provider,
    by_type: &HashMap<String, Provider>,
    state: &mut HashMap<String, VisitState>,
    path: &mut Vec<String>,
    result: &mut Vec<Provider>,
) -> Result<(), AnalyzeError> {
    let key = provider.provided_type.key();
    match state.get(&key) {
        Some(VisitState::InProgress) => {
            // Cycle: report the loop from its first occurrence on the
            // current path back to the repeated key.
            let start = path.iter().position(|k| *k == key).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].to_vec();
            cycle.push(key);
            return Err(AnalyzeError::CircularDependency { path: cycle });
        }
        Some(VisitState::Completed) => return Ok(()),
        None => {}
    }

    state.insert(key.clone(), VisitState::InProgress);
    path.push(key.clone());

    for dep in &provider.dependencies {
        if let Some(dep_provider) = by_type.get(&dep.ty.key()) {
            visit(dep_provider, by_type, state, path, result)?;
        }
    }

    path.pop();
    state.insert(key, VisitState::Completed);
    result.push(provider.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use gowire_types::{Dependency, ProviderKind, TypeRef};

    use super::*;

    fn typeref(name: &str) -> TypeRef {
        TypeRef {
            name: name.into(),
            import_path: "pkg".into(),
            is_pointer: false,
        }
    }

    fn provider(name: &str, deps: &[&str]) -> Provider {
        Provider {
            name: name.into(),
            kind: ProviderKind::Func,
            provided_type: typeref(name),
            dependencies: deps
                .iter()
                .map(|d| Dependency::positional(typeref(d)))
                .collect(),
            can_error: false,
            import_path: "pkg".into(),
            var_name: name.to_lowercase(),
        }
    }

    fn index(providers: &[Provider]) -> HashMap<String, Provider> {
        providers
            .iter()
            .map(|p| (p.provided_type.key(), p.clone()))
            .collect()
    }

    fn index_of(result: &[Provider], name: &str) -> usize {
        result.iter().position(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_linear_chain() {
        let providers = vec![
            provider("A", &["B"]),
            provider("B", &["C"]),
            provider("C", &[]),
        ];
        let result = topo_sort(&providers, &[], &index(&providers)).unwrap();
        assert_eq!(result.len(), 3);
        assert!(index_of(&result, "C") < index_of(&result, "B"));
        assert!(index_of(&result, "B") < index_of(&result, "A"));
    }

    #[test]
    fn test_diamond_dependency() {
        let providers = vec![
            provider("A", &["B", "C"]),
            provider("B", &["D"]),
            provider("C", &["D"]),
            provider("D", &[]),
        ];
        let result = topo_sort(&providers, &[], &index(&providers)).unwrap();
        assert_eq!(result.len(), 4);
        assert!(index_of(&result, "D") < index_of(&result, "B"));
        assert!(index_of(&result, "D") < index_of(&result, "C"));
        assert!(index_of(&result, "B") < index_of(&result, "A"));
        assert!(index_of(&result, "C") < index_of(&result, "A"));
    }

    #[test]
    fn test_independent_providers_all_present() {
        let providers = vec![provider("A", &[]), provider("B", &[]), provider("C", &[])];
        let result = topo_sort(&providers, &[], &index(&providers)).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_invocation_roots_order_their_dependencies() {
        let providers = vec![provider("A", &["B"]), provider("B", &[])];
        let invocations = vec![Invocation {
            name: "Setup".into(),
            dependencies: vec![typeref("A")],
            can_error: false,
            import_path: "pkg".into(),
        }];
        let result = topo_sort(&providers, &invocations, &index(&providers)).unwrap();
        assert_eq!(result.len(), 2);
        assert!(index_of(&result, "B") < index_of(&result, "A"));
    }

    #[test]
    fn test_direct_cycle() {
        let providers = vec![provider("A", &["B"]), provider("B", &["A"])];
        let err = topo_sort(&providers, &[], &index(&providers)).unwrap_err();
        let AnalyzeError::CircularDependency { path } = err else {
            panic!("expected cycle error");
        };
        assert_eq!(path.first(), path.last());
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_indirect_cycle() {
        let providers = vec![
            provider("A", &["B"]),
            provider("B", &["C"]),
            provider("C", &["A"]),
        ];
        let err = topo_sort(&providers, &[], &index(&providers)).unwrap_err();
        let AnalyzeError::CircularDependency { path } = err else {
            panic!("expected cycle error");
        };
        assert_eq!(path.first(), path.last());
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_self_cycle() {
        let providers = vec![provider("A", &["A"])];
        let err = topo_sort(&providers, &[], &index(&providers)).unwrap_err();
        let AnalyzeError::CircularDependency { path } = err else {
            panic!("expected cycle error");
        };
        assert_eq!(path, vec!["pkg.A".to_string(), "pkg.A".to_string()]);
    }

    #[test]
    fn test_cycle_path_is_trimmed_to_the_loop() {
        // X depends on the A->B->A loop but is not part of it; the
        // reported path must not include X.
        let providers = vec![
            provider("X", &["A"]),
            provider("A", &["B"]),
            provider("B", &["A"]),
        ];
        let err = topo_sort(&providers, &[], &index(&providers)).unwrap_err();
        let AnalyzeError::CircularDependency { path } = err else {
            panic!("expected cycle error");
        };
        assert!(!path.contains(&"pkg.X".to_string()));
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_finished_nodes_are_not_redescended() {
        // D is shared; the second traversal through it must not duplicate
        // it in the output.
        let providers = vec![
            provider("B", &["D"]),
            provider("C", &["D"]),
            provider("D", &[]),
        ];
        let result = topo_sort(&providers, &[], &index(&providers)).unwrap();
        let d_count = result.iter().filter(|p| p.name == "D").count();
        assert_eq!(d_count, 1);
    }
}
