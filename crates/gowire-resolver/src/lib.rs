//! gowire-resolver: package-name resolution with a process-lifetime cache
//!
//! Maps an import path to the package name it declares. The authoritative
//! answer comes from `go list`; when the toolchain cannot answer (not
//! installed, package not downloaded) the name falls back to a syntactic
//! guess from the path, with bare version segments (`/v5`) and version
//! suffixes (`.v3`) stripped.
//!
//! Lookups are memoized per import path. The cache is a concurrent map so
//! multiple scan roots can resolve in parallel; under a race the compute
//! may run more than once but every caller observes the same stored name.

use std::process::Command;

use dashmap::DashMap;
use gowire_types::PackageNameResolver;

pub struct Resolver {
    cache: DashMap<String, String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    fn resolve(&self, import_path: &str) -> String {
        go_list_name(import_path).unwrap_or_else(|| fallback_name(import_path))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageNameResolver for Resolver {
    fn resolve_name(&self, import_path: &str) -> String {
        if let Some(name) = self.cache.get(import_path) {
            return name.clone();
        }
        let name = self.resolve(import_path);
        // First store wins; racing callers converge on the stored value.
        self.cache
            .entry(import_path.to_string())
            .or_insert(name)
            .clone()
    }
}

fn go_list_name(import_path: &str) -> Option<String> {
    let output = Command::new("go")
        .args(["list", "-e", "-f", "{{.ImportPath}} {{.Name}}", import_path])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let line = stdout.trim();
    let (_, name) = line.split_once(' ')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Syntactic fallback: the last path segment, skipping module version
/// segments (`.../chi/v5` resolves to `chi`) and stripping version
/// suffixes (`yaml.v3` resolves to `yaml`).
pub fn fallback_name(import_path: &str) -> String {
    let base = import_path.rsplit('/').next().unwrap_or(import_path);
    if is_version_segment(base) {
        let parent = import_path[..import_path.len() - base.len()].trim_end_matches('/');
        return parent.rsplit('/').next().unwrap_or(parent).to_string();
    }
    if let Some(stripped) = strip_version_suffix(base) {
        return stripped;
    }
    base.to_string()
}

fn is_version_segment(s: &str) -> bool {
    let mut bytes = s.bytes();
    if bytes.next() != Some(b'v') {
        return false;
    }
    let rest = &s[1..];
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}

fn strip_version_suffix(base: &str) -> Option<String> {
    let idx = base.rfind(".v")?;
    let suffix = &base[idx + 1..];
    if !is_version_segment(suffix) {
        return None;
    }
    Some(base[..idx].to_string())
}
