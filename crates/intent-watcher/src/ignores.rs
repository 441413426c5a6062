//! Scoped ignore rules.
//!
//! A `.gitignore` discovered in a directory applies only to paths under
//! that directory and its descendants — never to siblings or ancestors.
//! The root additionally contributes a `.intentignore` with the same
//! syntax. Each rule set is recorded with the directory it was loaded
//! from; applicability is a prefix check, so rules loaded during traversal
//! never apply retroactively to unrelated subtrees.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

/// Name of the root-scoped ignore file consumed alongside `.gitignore`s.
pub const INTENT_IGNORE_FILE: &str = ".intentignore";

/// One ignore file's compiled rules, scoped to the directory it came from.
struct ScopedIgnore {
    dir: PathBuf,
    rules: Gitignore,
}

/// The accumulated in-scope ignore rules for a watched tree.
#[derive(Default)]
pub struct IgnoreSet {
    scopes: Vec<ScopedIgnore>,
}

impl IgnoreSet {
    /// Empty set — nothing is ignored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the root-scoped `.intentignore`, if present.
    pub fn load_root(&mut self, root: &Path) {
        self.load_file(root, &root.join(INTENT_IGNORE_FILE));
    }

    /// Load `dir`'s `.gitignore`, if present, scoped to `dir`.
    pub fn load_dir(&mut self, dir: &Path) {
        self.load_file(dir, &dir.join(".gitignore"));
    }

    /// Number of loaded ignore files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no ignore files are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Whether any in-scope rule ignores `path`.
    ///
    /// A rule set is in scope only when `path` lies under the directory
    /// the rules were loaded from; the match itself is computed relative
    /// to that directory.
    #[must_use]
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.scopes.iter().any(|scope| {
            path.starts_with(&scope.dir) && scope.rules.matched(path, is_dir).is_ignore()
        })
    }

    fn load_file(&mut self, dir: &Path, file: &Path) {
        if !file.is_file() {
            return;
        }
        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(file) {
            warn!(file = %file.display(), error = %err, "failed to read ignore file");
            return;
        }
        match builder.build() {
            Ok(rules) => {
                debug!(file = %file.display(), "loaded ignore file");
                self.scopes.push(ScopedIgnore {
                    dir: dir.to_path_buf(),
                    rules,
                });
            }
            Err(err) => {
                warn!(file = %file.display(), error = %err, "failed to compile ignore file");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn nested_gitignore_is_scoped_to_its_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("services/api/.gitignore"), "generated/\n");
        fs::create_dir_all(root.join("services/web")).unwrap();

        let mut ignores = IgnoreSet::new();
        ignores.load_dir(&root.join("services/api"));

        assert!(ignores.is_ignored(&root.join("services/api/generated"), true));
        assert!(!ignores.is_ignored(&root.join("services/web/generated"), true));
        assert!(!ignores.is_ignored(&root.join("generated"), true));
    }

    #[test]
    fn root_gitignore_applies_to_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join(".gitignore"), "*.snap\n");

        let mut ignores = IgnoreSet::new();
        ignores.load_dir(root);

        assert!(ignores.is_ignored(&root.join("a.snap"), false));
        assert!(ignores.is_ignored(&root.join("deep/nested/b.snap"), false));
        assert!(!ignores.is_ignored(&root.join("a.rs"), false));
    }

    #[test]
    fn intentignore_is_loaded_from_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join(INTENT_IGNORE_FILE), "scratch/\n");

        let mut ignores = IgnoreSet::new();
        ignores.load_root(root);

        assert_eq!(ignores.len(), 1);
        assert!(ignores.is_ignored(&root.join("scratch"), true));
        assert!(!ignores.is_ignored(&root.join("src"), true));
    }

    #[test]
    fn missing_ignore_files_load_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut ignores = IgnoreSet::new();
        ignores.load_root(dir.path());
        ignores.load_dir(dir.path());
        assert!(ignores.is_empty());
    }

    #[test]
    fn negation_patterns_work() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join(".gitignore"), "*.log\n!keep.log\n");

        let mut ignores = IgnoreSet::new();
        ignores.load_dir(root);

        assert!(ignores.is_ignored(&root.join("debug.log"), false));
        assert!(!ignores.is_ignored(&root.join("keep.log"), false));
    }
}
