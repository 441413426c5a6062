//! The `should_watch` filter and its hardcoded exclusion sets.
//!
//! Checks run cheapest-first: dot-prefixed components, then excluded
//! directory names, then excluded extensions, then the scoped ignore
//! rules. Only path components below the watch root are inspected, so a
//! root like `/home/dev/.projects/app` is not rejected for its own dot
//! component.

use std::path::Path;

use crate::ignores::IgnoreSet;

/// Directory basenames that are never watched: VCS metadata, dependency
/// directories, build outputs, tool caches, and agent/IDE config dirs.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "dist",
    "build",
    "target",
    ".venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".tox",
    ".eggs",
    ".gradle",
    ".mvn",
    ".terraform",
    ".cache",
    "coverage",
    ".vscode",
    ".idea",
    ".claude",
    ".cursor",
];

/// File extensions (without the dot) that are never watched: compiled and
/// binary artifacts, editor swap files, and logs.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "o", "a", "out", "class", "jar", "pyc", "pyo", "wasm", "swp",
    "swo", "tmp", "bak", "log",
];

/// Whether `path` (under `root`) should be watched.
///
/// `is_dir` distinguishes directory filtering (registration and descent)
/// from file filtering (extension check).
#[must_use]
pub fn should_watch(root: &Path, path: &Path, is_dir: bool, ignores: &IgnoreSet) -> bool {
    let relative = match path.strip_prefix(root) {
        Ok(rel) => rel,
        // Outside the root entirely — e.g. a symlink target. Never watch.
        Err(_) => return false,
    };

    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        let name = component.as_os_str().to_string_lossy();
        if name.starts_with('.') {
            return false;
        }
        // The exclusion set names directories; a regular file that happens
        // to be called `build` or `vendor` is still watched.
        let is_basename = components.peek().is_none();
        if (is_dir || !is_basename) && EXCLUDED_DIRS.contains(&name.as_ref()) {
            return false;
        }
    }

    if !is_dir {
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy();
            if EXCLUDED_EXTENSIONS.contains(&ext.as_ref()) {
                return false;
            }
        }
    }

    !ignores.is_ignored(path, is_dir)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
