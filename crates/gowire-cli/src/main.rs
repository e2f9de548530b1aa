//! gowire CLI - generates dependency injection wiring from annotations
//!
//! Scans Go source trees for `//gowire:provide` and `//gowire:invoke`
//! annotations, resolves the dependency graph, and writes a single
//! generated file that initializes everything in order.

use std::fs;
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

use gowire_analyzer::analyze;
use gowire_codegen::generate;
use gowire_resolver::Resolver;
use gowire_scanner::{output_info, scan_dir, ScanError};
use gowire_types::ParseResult;

#[derive(Parser)]
#[command(name = "gowire")]
#[command(about = "Dependency injection code generator for annotated Go sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, analyze, and write the generated wiring file
    Generate {
        /// Directories to scan for annotations (repeatable)
        #[arg(short, long, default_value = ".")]
        scan: Vec<PathBuf>,
        /// Output directory for the generated file
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Output filename
        #[arg(short, long, default_value = "app_gen.go")]
        name: String,
        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Scan and analyze without writing anything
    Check {
        /// Directories to scan for annotations (repeatable)
        #[arg(short, long, default_value = ".")]
        scan: Vec<PathBuf>,
        /// Directory the generated file would live in
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Dump the merged scan result as JSON
    Scan {
        /// Directories to scan for annotations (repeatable)
        #[arg(short, long, default_value = ".")]
        scan: Vec<PathBuf>,
        /// Directory the generated file would live in
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            scan,
            out,
            name,
            verbose,
        } => cmd_generate(&scan, &out, &name, verbose),
        Commands::Check { scan, out } => cmd_check(&scan, &out),
        Commands::Scan { scan, out, pretty } => cmd_scan(&scan, &out, pretty),
    }
}

/// Scan every root and merge the results under the output identity.
fn scan_all(scan_dirs: &[PathBuf], out_dir: &PathBuf, resolver: &Resolver, verbose: bool) -> ParseResult {
    let (output_package, output_import_path) = match output_info(out_dir) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Error resolving output package: {}", e);
            std::process::exit(1);
        }
    };

    let mut merged = ParseResult {
        output_package,
        output_import_path,
        ..ParseResult::default()
    };

    for dir in scan_dirs {
        if verbose {
            println!("scanning: {}", dir.display());
        }
        match scan_dir(dir, resolver) {
            Ok(parsed) => merged.merge(parsed),
            Err(e) => {
                report_scan_error(&e);
                std::process::exit(1);
            }
        }
    }

    if merged.is_empty() {
        let dirs = scan_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("no gowire annotations found in: {}", dirs);
        std::process::exit(1);
    }

    if verbose {
        println!("found {} providers:", merged.providers.len());
        for p in &merged.providers {
            println!("  - {} -> {}", p.name, p.provided_type.key());
        }
        println!("found {} invocations:", merged.invocations.len());
        for inv in &merged.invocations {
            println!("  - {}", inv.name);
        }
    }

    merged
}

fn cmd_generate(scan_dirs: &[PathBuf], out_dir: &PathBuf, name: &str, verbose: bool) {
    let resolver = Resolver::new();
    let merged = scan_all(scan_dirs, out_dir, &resolver, verbose);

    let analysis = match analyze(&merged, &resolver) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            std::process::exit(1);
        }
    };

    if verbose {
        println!("initialization order:");
        for (i, p) in analysis.providers.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, p.name, p.var_name);
        }
    }

    let code = match generate(&analysis, &resolver) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            std::process::exit(1);
        }
    };

    let output_path = out_dir.join(name);
    if let Err(e) = fs::write(&output_path, code) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }
    println!("gowire: generated {}", output_path.display());
}

fn cmd_check(scan_dirs: &[PathBuf], out_dir: &PathBuf) {
    let resolver = Resolver::new();
    let merged = scan_all(scan_dirs, out_dir, &resolver, false);

    match analyze(&merged, &resolver) {
        Ok(analysis) => {
            println!(
                "✓ {} providers, {} invocations, {} imports",
                analysis.providers.len(),
                analysis.invocations.len(),
                analysis.imports.len()
            );
        }
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_scan(scan_dirs: &[PathBuf], out_dir: &PathBuf, pretty: bool) {
    let resolver = Resolver::new();
    let merged = scan_all(scan_dirs, out_dir, &resolver, false);

    let json = if pretty {
        serde_json::to_string_pretty(&merged)
    } else {
        serde_json::to_string(&merged)
    };
    match json {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error serializing scan result: {}", e);
            std::process::exit(1);
        }
    }
}

/// Render a scanner error; annotated declarations carry spans, so point
/// at the offending source when we can.
fn report_scan_error(error: &ScanError) {
    let Some((file, span)) = error.location() else {
        eprintln!("[{}] {}", error.code(), error);
        return;
    };
    let Ok(source) = fs::read_to_string(file) else {
        eprintln!("[{}] {}: {}", error.code(), file.display(), error);
        return;
    };

    let file_name = file.to_string_lossy().to_string();
    let result = Report::build(ReportKind::Error, file_name.clone(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((file_name.clone(), span.start..span.end))
                .with_message(error.code())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((file_name, Source::from(source)));
    if result.is_err() {
        eprintln!("[{}] {}", error.code(), error);
    }
}
