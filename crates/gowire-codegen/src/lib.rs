//! gowire-codegen: renders the generated wiring file
//!
//! Consumes the analyzer's ordered output and emits one Go source file: an
//! `App` aggregate with a field per provided value and an `InitializeApp`
//! function that constructs every value in dependency order, propagates
//! construction failures, and then runs the invocations.
//!
//! Output is deterministic: field, import, and statement order derive only
//! from the analysis, never from map iteration order.

mod render;

use std::collections::HashMap;

use gowire_analyzer::Analysis;
use gowire_lexer::{tokenize, TokenKind};
use gowire_types::{PackageNameResolver, ProviderKind};
use thiserror::Error;

use render::{
    to_upper, write_app_struct, write_func_init, write_imports, write_invocation,
    write_struct_init,
};

/// Errors from rendering. These indicate an internal inconsistency in the
/// generator, not a problem with the user's declarations.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generated code is malformed: {detail}")]
    Malformed { detail: String },
}

impl GenerateError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Malformed { .. } => "E-GEN-001",
        }
    }
}

/// Render the wiring file for an analysis.
pub fn generate(
    analysis: &Analysis,
    resolver: &dyn PackageNameResolver,
) -> Result<String, GenerateError> {
    let output_path = analysis.output_import_path.as_str();
    let imports = &analysis.imports;

    let vars: HashMap<String, String> = analysis
        .providers
        .iter()
        .map(|p| (p.provided_type.key(), p.var_name.clone()))
        .collect();

    let mut out = String::new();
    out.push_str("// Code generated by gowire. DO NOT EDIT.\n\n");
    out.push_str(&format!("package {}\n\n", analysis.package_name));

    write_imports(&mut out, imports);
    write_app_struct(&mut out, &analysis.providers, output_path, imports, resolver);

    out.push_str("func InitializeApp() (*App, error) {\n");

    if !analysis.providers.is_empty() {
        out.push_str("\t// provide\n");
        for provider in &analysis.providers {
            match provider.kind {
                ProviderKind::Struct => {
                    write_struct_init(&mut out, provider, &vars, output_path, imports, resolver)
                }
                ProviderKind::Func => {
                    write_func_init(&mut out, provider, &vars, output_path, imports, resolver)
                }
            }
        }
    }

    if !analysis.invocations.is_empty() {
        out.push_str("\n\t// invoke\n");
        for invocation in &analysis.invocations {
            write_invocation(&mut out, invocation, &vars, output_path, imports, resolver);
        }
    }

    out.push_str("\n\treturn &App{\n");
    for provider in &analysis.providers {
        out.push_str(&format!(
            "\t\t{}: {},\n",
            to_upper(&provider.var_name),
            provider.var_name
        ));
    }
    out.push_str("\t}, nil\n}\n");

    verify_delimiters(&out)?;
    Ok(out)
}

/// Sanity-check the assembled text by tokenizing it and matching delimiter
/// pairs. Strings and comments are single tokens, so delimiters inside
/// them cannot skew the count.
fn verify_delimiters(source: &str) -> Result<(), GenerateError> {
    let mut stack: Vec<TokenKind> = Vec::new();
    for token in tokenize(source) {
        match token.kind {
            kind if kind.opens() => {
                // closing() is total for opening delimiters
                if let Some(close) = kind.closing() {
                    stack.push(close);
                }
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                match stack.pop() {
                    Some(expected) if expected == token.kind => {}
                    _ => {
                        return Err(GenerateError::Malformed {
                            detail: format!(
                                "unmatched {} at byte {}",
                                token.kind.describe(),
                                token.span.start
                            ),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    if let Some(unclosed) = stack.pop() {
        return Err(GenerateError::Malformed {
            detail: format!("missing {}", unclosed.describe()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use gowire_types::{Dependency, Invocation, Provider, TypeRef};

    use super::*;

    struct MockResolver;

    impl PackageNameResolver for MockResolver {
        fn resolve_name(&self, import_path: &str) -> String {
            import_path
                .rsplit('/')
                .next()
                .unwrap_or(import_path)
                .to_string()
        }
    }

    fn typeref(name: &str, import_path: &str) -> TypeRef {
        TypeRef {
            name: name.into(),
            import_path: import_path.into(),
            is_pointer: true,
        }
    }

    fn analysis(
        providers: Vec<Provider>,
        invocations: Vec<Invocation>,
        imports: &[(&str, &str)],
    ) -> Analysis {
        Analysis {
            providers,
            invocations,
            package_name: "main".into(),
            output_import_path: "example.com/app".into(),
            imports: imports
                .iter()
                .map(|(p, a)| (p.to_string(), a.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn func_provider(name: &str, var: &str, ty: TypeRef, can_error: bool) -> Provider {
        Provider {
            name: name.into(),
            kind: ProviderKind::Func,
            import_path: ty.import_path.clone(),
            provided_type: ty,
            dependencies: vec![],
            can_error,
            var_name: var.into(),
        }
    }

    #[test]
    fn test_generate_empty() {
        let result = analysis(vec![], vec![], &[]);
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("// Code generated by gowire. DO NOT EDIT."));
        assert!(output.contains("package main"));
        assert!(output.contains("type App struct {"));
        assert!(output.contains("func InitializeApp() (*App, error)"));
        assert!(!output.contains("import"));
        verify_delimiters(&output).unwrap();
    }

    #[test]
    fn test_generate_struct_provider() {
        let provider = Provider {
            name: "Config".into(),
            kind: ProviderKind::Struct,
            provided_type: typeref("Config", "pkg/config"),
            dependencies: vec![],
            can_error: false,
            import_path: "pkg/config".into(),
            var_name: "config".into(),
        };
        let result = analysis(vec![provider], vec![], &[("pkg/config", "")]);
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("config := &config.Config{}"));
    }

    #[test]
    fn test_generate_func_provider_no_error() {
        let provider = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), false);
        let result = analysis(vec![provider], vec![], &[("pkg/config", "")]);
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("config := config.NewConfig()"));
    }

    #[test]
    fn test_generate_func_provider_with_error() {
        let provider = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), true);
        let result = analysis(vec![provider], vec![], &[("pkg/config", "")]);
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("config, err := config.NewConfig()"));
        assert!(output.contains("if err != nil {"));
    }

    #[test]
    fn test_generate_with_invocations() {
        let provider = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), false);
        let invocation = Invocation {
            name: "Setup".into(),
            dependencies: vec![typeref("Config", "pkg/config")],
            can_error: true,
            import_path: "pkg/setup".into(),
        };
        let result = analysis(
            vec![provider],
            vec![invocation],
            &[("pkg/config", ""), ("pkg/setup", "")],
        );
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("// provide"));
        assert!(output.contains("// invoke"));
        assert!(output.contains("if err := setup.Setup(config); err != nil {"));
    }

    #[test]
    fn test_generate_full_output() {
        let config = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), false);
        let mut database =
            func_provider("NewDatabase", "database", typeref("Database", "pkg/db"), true);
        database.dependencies = vec![Dependency::positional(typeref("Config", "pkg/config"))];
        let service = Provider {
            name: "Service".into(),
            kind: ProviderKind::Struct,
            provided_type: typeref("Service", "pkg/service"),
            dependencies: vec![Dependency::field("DB", typeref("Database", "pkg/db"))],
            can_error: false,
            import_path: "pkg/service".into(),
            var_name: "service".into(),
        };
        let invocation = Invocation {
            name: "SetupRoutes".into(),
            dependencies: vec![typeref("Service", "pkg/service")],
            can_error: true,
            import_path: "pkg/routes".into(),
        };

        let result = analysis(
            vec![config, database, service],
            vec![invocation],
            &[
                ("pkg/config", ""),
                ("pkg/db", ""),
                ("pkg/service", ""),
                ("pkg/routes", ""),
            ],
        );
        let output = generate(&result, &MockResolver).unwrap();

        assert!(output.contains("// Code generated by gowire. DO NOT EDIT."));
        assert!(output.contains("package main"));
        assert!(output.contains("type App struct {"));
        assert!(output.contains("*config.Config"));
        assert!(output.contains("*db.Database"));
        assert!(output.contains("*service.Service"));
        assert!(output.contains("func InitializeApp() (*App, error)"));
        assert!(output.contains("config := config.NewConfig()"));
        assert!(output.contains("database, err := db.NewDatabase(config)"));
        assert!(output.contains("service := &service.Service{"));
        assert!(output.contains("DB: database,"));
        assert!(output.contains("routes.SetupRoutes(service)"));

        // Providers must appear in the analysis order.
        let config_line = output.find("config := config.NewConfig()").unwrap();
        let db_line = output.find("database, err := db.NewDatabase").unwrap();
        let service_line = output.find("service := &service.Service{").unwrap();
        assert!(config_line < db_line);
        assert!(db_line < service_line);

        // The aggregate is populated and returned last.
        let return_line = output.find("return &App{").unwrap();
        assert!(service_line < return_line);
        assert!(output.contains("Config: config,"));
        assert!(output.contains("Database: database,"));
        assert!(output.contains("Service: service,"));

        verify_delimiters(&output).unwrap();
    }

    #[test]
    fn test_generate_is_deterministic() {
        let provider = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), false);
        let result = analysis(vec![provider], vec![], &[("pkg/config", "")]);
        let a = generate(&result, &MockResolver).unwrap();
        let b = generate(&result, &MockResolver).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_import_block_with_alias() {
        let provider = func_provider("NewConfig", "config", typeref("Config", "pkg/config"), false);
        let result = analysis(
            vec![provider],
            vec![],
            &[("other/config", "config1"), ("pkg/config", "")],
        );
        let output = generate(&result, &MockResolver).unwrap();
        assert!(output.contains("\t\"pkg/config\"\n"));
        assert!(output.contains("\tconfig1 \"other/config\"\n"));
    }

    #[test]
    fn test_verify_delimiters_rejects_imbalance() {
        assert!(verify_delimiters("func f() {").is_err());
        assert!(verify_delimiters("func f() }").is_err());
        assert!(verify_delimiters("func f(} ").is_err());
        assert!(verify_delimiters("func f() { return (a[0]) }").is_ok());
        // Braces inside string literals do not count.
        assert!(verify_delimiters(r#"var x = "{" "#).is_ok());
    }
}
