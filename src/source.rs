//! Source loading with `UVEZI:` import directives.
//!
//! A line of the form `UVEZI: definicije/vrijeme.ras` is replaced by the
//! contents of the named file, resolved relative to the directory of the
//! file that contains the directive. Imports nest. Each file is read at most
//! once per load; a second import of the same file (including a cycle back to
//! an importer) is skipped with a warning.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*UVEZI:\s*["']?([^"'\r\n]+?)["']?\s*$"#).expect("import directive regex is valid")
});

/// Read `path` and expand its imports recursively.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let mut seen = HashSet::new();
    load_recursive(path.as_ref(), &mut seen)
}

fn load_recursive(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<String, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !seen.insert(key) {
        warn!(path = %path.display(), "file imported more than once, skipping");
        return Ok(String::new());
    }
    debug!(path = %path.display(), "loading source");

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        match IMPORT.captures(line.trim_end_matches(['\r', '\n'])) {
            Some(caps) => {
                let target = caps[1].trim();
                let imported = load_recursive(&base_dir.join(target), seen)?;
                out.push_str(&format!("\n// --- Početak importa: {target} ---\n"));
                out.push_str(&imported);
                out.push_str(&format!("\n// --- Kraj importa: {target} ---\n"));
            }
            None => out.push_str(line),
        }
    }

    Ok(out)
}
