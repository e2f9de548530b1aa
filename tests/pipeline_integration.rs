//! End-to-end pipeline tests: scan -> analyze -> generate

use std::path::{Path, PathBuf};

use gowire::analyzer::{analyze, Analysis};
use gowire::codegen::generate;
use gowire::scanner::{output_info, scan_dir};
use gowire::types::{PackageNameResolver, ParseResult};

/// Syntactic resolver so tests never depend on an installed toolchain.
struct FixtureResolver;

impl PackageNameResolver for FixtureResolver {
    fn resolve_name(&self, import_path: &str) -> String {
        gowire_resolver::fallback_name(import_path)
    }
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn scan_fixture(name: &str) -> ParseResult {
    let root = fixture(name);
    let (output_package, output_import_path) = output_info(&root).unwrap();
    let mut merged = ParseResult {
        output_package,
        output_import_path,
        ..ParseResult::default()
    };
    merged.merge(scan_dir(&root, &FixtureResolver).unwrap());
    merged
}

/// Every dependency-provider must appear strictly before its dependent.
fn assert_topological(analysis: &Analysis) {
    for (i, p) in analysis.providers.iter().enumerate() {
        for dep in &p.dependencies {
            if let Some(j) = analysis
                .providers
                .iter()
                .position(|q| q.provided_type.key() == dep.ty.key())
            {
                assert!(
                    j < i,
                    "{} (index {}) must come after its dependency {} (index {})",
                    p.name,
                    i,
                    analysis.providers[j].name,
                    j
                );
            }
        }
    }
}

#[test]
fn scan_discovers_fixture_entities() {
    let merged = scan_fixture("basic");

    assert_eq!(merged.output_package, "main");
    assert_eq!(merged.output_import_path, "example.com/demo");

    assert_eq!(merged.providers.len(), 2);
    assert_eq!(merged.providers[0].name, "NewConfig");
    assert_eq!(
        merged.providers[0].provided_type.key(),
        "*example.com/demo/config.Config"
    );
    assert_eq!(merged.providers[1].name, "NewDatabase");
    assert!(merged.providers[1].can_error);

    assert_eq!(merged.invocations.len(), 1);
    assert_eq!(merged.invocations[0].name, "Routes");
    assert!(merged.invocations[0].can_error);
}

#[test]
fn full_pipeline_renders_ordered_wiring() {
    let merged = scan_fixture("basic");
    let analysis = analyze(&merged, &FixtureResolver).unwrap();
    assert_topological(&analysis);

    let output = generate(&analysis, &FixtureResolver).unwrap();

    assert!(output.starts_with("// Code generated by gowire. DO NOT EDIT.\n"));
    assert!(output.contains("package main"));
    assert!(output.contains("\t\"example.com/demo/config\"\n"));
    assert!(output.contains("\t\"example.com/demo/db\"\n"));
    assert!(output.contains("\t\"example.com/demo/setup\"\n"));

    assert!(output.contains("type App struct {"));
    assert!(output.contains("\tConfig *config.Config\n"));
    assert!(output.contains("\tDatabase *db.Database\n"));

    assert!(output.contains("config := config.NewConfig()"));
    assert!(output.contains("database, err := db.NewDatabase(config)"));
    assert!(output.contains("if err := setup.Routes(config, database); err != nil {"));

    let config_init = output.find("config := config.NewConfig()").unwrap();
    let db_init = output.find("database, err :=").unwrap();
    let invoke = output.find("setup.Routes").unwrap();
    assert!(config_init < db_init);
    assert!(db_init < invoke);

    assert!(output.contains("\t\tConfig: config,\n"));
    assert!(output.contains("\t\tDatabase: database,\n"));
    assert!(output.trim_end().ends_with('}'));
}

#[test]
fn pipeline_is_deterministic() {
    let first = {
        let merged = scan_fixture("basic");
        let analysis = analyze(&merged, &FixtureResolver).unwrap();
        generate(&analysis, &FixtureResolver).unwrap()
    };
    let second = {
        let merged = scan_fixture("basic");
        let analysis = analyze(&merged, &FixtureResolver).unwrap();
        generate(&analysis, &FixtureResolver).unwrap()
    };
    assert_eq!(first, second);
}
