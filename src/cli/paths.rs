//! Path resolution for CLI commands

use std::env;
use std::path::{Path, PathBuf};

/// Resolve the base directory for store discovery.
///
/// Falls back to the current working directory, or "." if that cannot be
/// determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve an explicit `--store` path against the base directory
pub fn resolve_store_path(root: &Path, store: &Path) -> PathBuf {
    if store.is_absolute() {
        store.to_path_buf()
    } else {
        root.join(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_root_path(Some(PathBuf::from("/tmp/project")));
        assert_eq!(root, PathBuf::from("/tmp/project"));
    }

    #[test]
    fn test_store_path_resolution() {
        let root = Path::new("/tmp/project");
        assert_eq!(
            resolve_store_path(root, Path::new("data/.rubric")),
            PathBuf::from("/tmp/project/data/.rubric")
        );
        assert_eq!(
            resolve_store_path(root, Path::new("/var/rubric")),
            PathBuf::from("/var/rubric")
        );
    }
}
