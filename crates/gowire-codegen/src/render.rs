//! Rendering helpers for the generated wiring file
//!
//! Everything here writes plain Go text. References to external packages
//! go through the import alias map; an empty alias means the package is
//! referenced by its resolved name.

use std::collections::{BTreeMap, HashMap};

use gowire_types::{Dependency, Invocation, PackageNameResolver, Provider, TypeRef};

/// Uppercase the first character; aggregate field names are the exported
/// form of the variable names.
pub(crate) fn to_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// The name a package is referenced by at its use sites.
pub(crate) fn pkg_name(
    import_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) -> String {
    if let Some(alias) = imports.get(import_path) {
        if !alias.is_empty() {
            return alias.clone();
        }
    }
    resolver.resolve_name(import_path)
}

/// Render a type reference as it appears in the output package.
pub(crate) fn format_type(
    ty: &TypeRef,
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) -> String {
    let prefix = if ty.is_pointer { "*" } else { "" };
    if ty.import_path.is_empty() || ty.import_path == output_path {
        return format!("{}{}", prefix, ty.name);
    }
    format!(
        "{}{}.{}",
        prefix,
        pkg_name(&ty.import_path, imports, resolver),
        ty.name
    )
}

/// Qualify a function or type name with its package unless it lives in
/// the output package itself.
pub(crate) fn qualified_name(
    name: &str,
    import_path: &str,
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) -> String {
    if import_path.is_empty() || import_path == output_path {
        return name.to_string();
    }
    format!("{}.{}", pkg_name(import_path, imports, resolver), name)
}

/// Positional argument list for a call: the resolved variable name of
/// each dependency, in declared order.
pub(crate) fn make_args(deps: &[Dependency], vars: &HashMap<String, String>) -> String {
    deps.iter()
        .map(|d| vars.get(&d.ty.key()).cloned().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The import block; omitted entirely when nothing external is referenced.
pub(crate) fn write_imports(out: &mut String, imports: &BTreeMap<String, String>) {
    if imports.is_empty() {
        return;
    }
    out.push_str("import (\n");
    for (path, alias) in imports {
        if alias.is_empty() {
            out.push_str(&format!("\t\"{}\"\n", path));
        } else {
            out.push_str(&format!("\t{} \"{}\"\n", alias, path));
        }
    }
    out.push_str(")\n\n");
}

/// The aggregate struct: one field per provider.
pub(crate) fn write_app_struct(
    out: &mut String,
    providers: &[Provider],
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) {
    out.push_str("type App struct {\n");
    for p in providers {
        out.push_str(&format!(
            "\t{} {}\n",
            to_upper(&p.var_name),
            format_type(&p.provided_type, output_path, imports, resolver)
        ));
    }
    out.push_str("}\n\n");
}

/// Struct-kind initialization: a literal with one assignment per
/// field-tagged dependency. Dependencies without a field name are not
/// expressible positionally and are skipped.
pub(crate) fn write_struct_init(
    out: &mut String,
    provider: &Provider,
    vars: &HashMap<String, String>,
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) {
    // The literal constructs the concrete struct; the provided type may
    // be an interface it is bound to.
    let type_name = qualified_name(
        &provider.name,
        &provider.import_path,
        output_path,
        imports,
        resolver,
    );
    let amp = if provider.provided_type.is_pointer {
        "&"
    } else {
        ""
    };

    let fields: Vec<&Dependency> = provider
        .dependencies
        .iter()
        .filter(|d| d.field_name.is_some())
        .collect();

    if fields.is_empty() {
        out.push_str(&format!(
            "\t{} := {}{}{{}}\n",
            provider.var_name, amp, type_name
        ));
        return;
    }

    out.push_str(&format!(
        "\t{} := {}{}{{\n",
        provider.var_name, amp, type_name
    ));
    for dep in fields {
        let field = dep.field_name.as_deref().unwrap_or_default();
        let var = vars.get(&dep.ty.key()).cloned().unwrap_or_default();
        out.push_str(&format!("\t\t{}: {},\n", field, var));
    }
    out.push_str("\t}\n");
}

/// Function-kind initialization, with a fail-fast guard when the
/// constructor can fail.
pub(crate) fn write_func_init(
    out: &mut String,
    provider: &Provider,
    vars: &HashMap<String, String>,
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) {
    let call = format!(
        "{}({})",
        qualified_name(
            &provider.name,
            &provider.import_path,
            output_path,
            imports,
            resolver
        ),
        make_args(&provider.dependencies, vars)
    );

    if provider.can_error {
        out.push_str(&format!("\t{}, err := {}\n", provider.var_name, call));
        out.push_str("\tif err != nil {\n\t\treturn nil, err\n\t}\n");
    } else {
        out.push_str(&format!("\t{} := {}\n", provider.var_name, call));
    }
}

/// An invocation call, after every provider has been constructed.
pub(crate) fn write_invocation(
    out: &mut String,
    invocation: &Invocation,
    vars: &HashMap<String, String>,
    output_path: &str,
    imports: &BTreeMap<String, String>,
    resolver: &dyn PackageNameResolver,
) {
    let args = invocation
        .dependencies
        .iter()
        .map(|d| vars.get(&d.key()).cloned().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!(
        "{}({})",
        qualified_name(
            &invocation.name,
            &invocation.import_path,
            output_path,
            imports,
            resolver
        ),
        args
    );

    if invocation.can_error {
        out.push_str(&format!(
            "\tif err := {}; err != nil {{\n\t\treturn nil, err\n\t}}\n",
            call
        ));
    } else {
        out.push_str(&format!("\t{}\n", call));
    }
}
