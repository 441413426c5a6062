//! Path normalization and the path-suffix-match predicate.
//!
//! Agent-reported paths arrive in whatever form the agent logged them —
//! relative or absolute, sometimes with Windows separators. They are
//! normalized once before storage and matching; the original value stays
//! in the serialized event payload.
//!
//! [`path_suffix_match`] is the core comparison primitive of the whole
//! subsystem: an agent path matches a filesystem path only when it is a
//! directory-boundary-aligned trailing segment of it.

/// Normalize an agent-reported path for storage and comparison.
///
/// Backslashes become forward slashes and a leading `/` is injected if
/// absent, so every stored agent path is `/`-rooted regardless of how the
/// agent reported it.
#[must_use]
pub fn normalize_agent_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    if forward.starts_with('/') {
        forward
    } else {
        format!("/{forward}")
    }
}

/// Whether agent path `agent_path` is a directory-aligned suffix of
/// filesystem path `file_path`.
///
/// True iff `file_path` ends with `agent_path` and the match is aligned on
/// a path-separator boundary: either the paths are equal, the agent path
/// itself begins with `/`, or the character immediately preceding the
/// matched suffix is `/`. This rejects false hits like
/// `/project/src/afoo.go` vs `foo.go` while allowing the agent path to be
/// a bare filename, a partial relative path, or the full absolute path.
#[must_use]
pub fn path_suffix_match(file_path: &str, agent_path: &str) -> bool {
    if agent_path.is_empty() || !file_path.ends_with(agent_path) {
        return false;
    }
    if file_path.len() == agent_path.len() {
        return true;
    }
    if agent_path.starts_with('/') {
        return true;
    }
    file_path.as_bytes()[file_path.len() - agent_path.len() - 1] == b'/'
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_passes_through_absolute() {
        assert_eq!(normalize_agent_path("/src/main.go"), "/src/main.go");
    }

    #[test]
    fn normalize_injects_leading_slash() {
        assert_eq!(normalize_agent_path("src/main.go"), "/src/main.go");
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize_agent_path("src\\main.go"), "/src/main.go");
        assert_eq!(normalize_agent_path("C:\\work\\a.rs"), "/C:/work/a.rs");
    }

    #[test]
    fn suffix_rejects_unaligned_boundary() {
        assert!(!path_suffix_match("/project/src/afoo.go", "/foo.go"));
        assert!(!path_suffix_match("/project/xsrc/foo.go", "/src/foo.go"));
    }

    #[test]
    fn suffix_accepts_aligned_tail() {
        assert!(path_suffix_match("/project/src/foo.go", "/foo.go"));
        assert!(path_suffix_match("/project/src/foo.go", "/src/foo.go"));
    }

    #[test]
    fn suffix_accepts_exact_match() {
        assert!(path_suffix_match("/project/src/foo.go", "/project/src/foo.go"));
    }

    #[test]
    fn suffix_handles_unrooted_agent_path() {
        assert!(path_suffix_match("/project/src/foo.go", "foo.go"));
        assert!(!path_suffix_match("/project/src/afoo.go", "foo.go"));
    }

    #[test]
    fn suffix_rejects_empty_agent_path() {
        assert!(!path_suffix_match("/project/src/foo.go", ""));
    }

    #[test]
    fn suffix_rejects_non_suffix() {
        assert!(!path_suffix_match("/project/src/foo.go", "/bar.go"));
        assert!(!path_suffix_match("/foo.go", "/project/src/foo.go"));
    }
}
