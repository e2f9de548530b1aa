//! Import collection and alias assignment

use std::collections::{BTreeMap, BTreeSet, HashMap};

use gowire_types::{Invocation, PackageNameResolver, Provider};

/// Collect every external import path the generated file will reference.
///
/// Skips the empty path (builtins) and the output package itself. The
/// returned map assigns each path its import alias; an empty alias means
/// the package is referenced unqualified by its own name.
pub(crate) fn collect_imports(
    providers: &[Provider],
    invocations: &[Invocation],
    output_path: &str,
    resolver: &dyn PackageNameResolver,
) -> BTreeMap<String, String> {
    let mut paths: BTreeSet<String> = BTreeSet::new();
    let add = |path: &str, paths: &mut BTreeSet<String>| {
        if path.is_empty() || path == output_path {
            return;
        }
        paths.insert(path.to_string());
    };

    for p in providers {
        add(&p.import_path, &mut paths);
        add(&p.provided_type.import_path, &mut paths);
        for dep in &p.dependencies {
            add(&dep.ty.import_path, &mut paths);
        }
    }

    for inv in invocations {
        add(&inv.import_path, &mut paths);
        for dep in &inv.dependencies {
            add(&dep.import_path, &mut paths);
        }
    }

    resolve_import_aliases(&paths, resolver)
}

/// Assign collision-free aliases, in lexicographic path order so the
/// result is independent of the caller's iteration order. The first path
/// to claim a short name keeps the empty alias; later claimants get
/// numeric suffixes.
pub(crate) fn resolve_import_aliases(
    paths: &BTreeSet<String>,
    resolver: &dyn PackageNameResolver,
) -> BTreeMap<String, String> {
    let mut imports = BTreeMap::new();
    let mut base_count: HashMap<String, usize> = HashMap::new();

    for path in paths {
        let base = resolver.resolve_name(path);
        let count = *base_count.get(&base).unwrap_or(&0);
        base_count.insert(base.clone(), count + 1);

        if count == 0 {
            imports.insert(path.clone(), String::new());
        } else {
            imports.insert(path.clone(), format!("{}{}", base, count));
        }
    }
    imports
}
