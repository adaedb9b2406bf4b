//! Logical path helpers.
//!
//! A logical path is root-relative and `/`-separated regardless of the host
//! platform, e.g. `proj/reads/sample.bam`. The empty string denotes the root
//! itself and never names an entry.

use crate::{Error, Result};

/// Path separator used in logical paths.
pub const SEPARATOR: char = '/';

/// Returns the parent path, or `None` for a root-level path.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// Returns the last segment of the path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit_once(SEPARATOR).map_or(path, |(_, name)| name)
}

/// Returns the number of segments in the path (`a` is 1, `a/b` is 2).
#[must_use]
pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches(SEPARATOR).count() + 1
    }
}

/// Joins a parent path and a single segment.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if `name` is empty or contains a separator,
/// since such a name would make the resulting path ambiguous.
pub fn join(parent: &str, name: &str) -> Result<String> {
    validate_name(name)?;
    if parent.is_empty() {
        Ok(name.to_string())
    } else {
        Ok(format!("{parent}{SEPARATOR}{name}"))
    }
}

/// Checks that a name is usable as a single path segment.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(SEPARATOR) || name == "." || name == ".." {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_nested_and_root_level() {
        assert_eq!(parent("a/b/c.txt"), Some("a/b"));
        assert_eq!(parent("a"), None);
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(depth(""), 0);
        assert_eq!(depth("a"), 1);
        assert_eq!(depth("a/b/c"), 3);
    }

    #[test]
    fn join_rejects_separator_in_name() {
        assert!(join("a", "b/c").is_err());
        assert!(join("a", "").is_err());
        assert_eq!(join("", "a").unwrap(), "a");
    }
}
