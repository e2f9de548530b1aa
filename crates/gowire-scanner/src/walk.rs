//! Directory walking and output package identity
//!
//! The scanner walks each scan root looking for annotated `.go` files and
//! derives import paths from the enclosing module. The module path comes
//! from `go list -m` when the toolchain is available, otherwise from the
//! nearest `go.mod`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use gowire_lexer::{tokenize, TokenKind};
use gowire_types::{PackageNameResolver, ParseResult};
use walkdir::{DirEntry, WalkDir};

use crate::parser::scan_source;
use crate::ScanError;

/// Scan a directory tree for annotated declarations.
///
/// Files are visited in lexicographic order so the resulting entity order
/// (and everything derived from it) is stable across runs.
pub fn scan_dir(dir: &Path, resolver: &dyn PackageNameResolver) -> Result<ParseResult, ScanError> {
    let root = canonical(dir)?;
    let (module_path, module_root) = module_identity(&root)?;
    let base = join_import_path(&module_path, &module_root, &root)?;

    let mut result = ParseResult::default();
    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_skip(e));

    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Io {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.clone()),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".go") || name.ends_with("_test.go") || name.ends_with("_gen.go") {
            continue;
        }

        let path = entry.path();
        let parent = path.parent().unwrap_or(&root);
        let import_path = match parent.strip_prefix(&root) {
            Ok(rel) if rel.as_os_str().is_empty() => base.clone(),
            Ok(rel) => format!("{}/{}", base, slashify(rel)),
            Err(_) => base.clone(),
        };

        let source = fs::read_to_string(path).map_err(|e| ScanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        scan_source(&source, &import_path, path, resolver, &mut result)?;
    }
    Ok(result)
}

/// Determine the package name and import path of the output directory.
///
/// The package name is taken from the package clause of any existing
/// non-test, non-generated `.go` file, falling back to the directory name.
pub fn output_info(out_dir: &Path) -> Result<(String, String), ScanError> {
    let dir = canonical(out_dir)?;
    let (module_path, module_root) = module_identity(&dir)?;
    let import_path = join_import_path(&module_path, &module_root, &dir)?;

    let fallback = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut names: Vec<PathBuf> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(_) => return Ok((fallback, import_path)),
    };
    names.sort();

    for path in names {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !name.ends_with(".go") || name.ends_with("_test.go") || name.ends_with("_gen.go") {
            continue;
        }
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        if let Some(package) = package_clause(&source) {
            return Ok((package, import_path));
        }
    }
    Ok((fallback, import_path))
}

fn should_skip(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

fn canonical(dir: &Path) -> Result<PathBuf, ScanError> {
    fs::canonicalize(dir).map_err(|e| ScanError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn slashify(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read the package clause from a source file, if it has one.
fn package_clause(source: &str) -> Option<String> {
    let tokens = tokenize(source);
    let mut iter = tokens.iter().filter(|t| {
        !matches!(
            t.kind,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Semicolon
        )
    });
    let package = iter.next()?;
    let name = iter.next()?;
    if package.kind == TokenKind::Package && name.kind == TokenKind::Ident {
        return Some(name.text(source).to_string());
    }
    None
}

/// Resolve the module path and module root for a directory.
///
/// Prefers `go list -m`; without a usable toolchain, finds the nearest
/// `go.mod` in the ancestor chain and reads its module directive.
fn module_identity(dir: &Path) -> Result<(String, PathBuf), ScanError> {
    if let Some(found) = go_list_module(dir) {
        return Ok(found);
    }

    for ancestor in dir.ancestors() {
        let gomod = ancestor.join("go.mod");
        if !gomod.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&gomod).map_err(|e| ScanError::Io {
            path: gomod.clone(),
            source: e,
        })?;
        if let Some(path) = module_directive(&contents) {
            return Ok((path, ancestor.to_path_buf()));
        }
        return Err(ScanError::ModulePath {
            dir: dir.to_path_buf(),
            reason: format!("{} has no module directive", gomod.display()),
        });
    }

    Err(ScanError::ModulePath {
        dir: dir.to_path_buf(),
        reason: "no go.mod found in any parent directory".to_string(),
    })
}

fn go_list_module(dir: &Path) -> Option<(String, PathBuf)> {
    let output = Command::new("go")
        .args(["list", "-m", "-f", "{{.Path}} {{.Dir}}"])
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let line = stdout.trim();
    let (path, root) = line.split_once(' ')?;
    if path.is_empty() || root.is_empty() {
        return None;
    }
    Some((path.to_string(), PathBuf::from(root)))
}

fn module_directive(gomod: &str) -> Option<String> {
    for line in gomod.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("module") {
            if rest.starts_with(char::is_whitespace) {
                let path = rest.split("//").next().unwrap_or(rest).trim();
                let path = path.trim_matches('"');
                if !path.is_empty() {
                    return Some(path.to_string());
                }
            }
        }
    }
    None
}

fn join_import_path(
    module_path: &str,
    module_root: &Path,
    dir: &Path,
) -> Result<String, ScanError> {
    // go list reports the on-disk root; normalize before comparing against
    // the already-canonicalized scan dir.
    let module_root = fs::canonicalize(module_root).unwrap_or_else(|_| module_root.to_path_buf());
    let rel = dir.strip_prefix(&module_root).map_err(|_| ScanError::ModulePath {
        dir: dir.to_path_buf(),
        reason: format!("{} is outside module root {}", dir.display(), module_root.display()),
    })?;
    if rel.as_os_str().is_empty() {
        return Ok(module_path.to_string());
    }
    Ok(format!("{}/{}", module_path, slashify(rel)))
}
