//! File-system primitives shared by resources, hooks and the cleanup scanner.
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) with mode `0755` if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent, 0o755)?;
    }
    Ok(())
}

/// Create `dir` and its ancestors. `mode` applies to newly created
/// directories on Unix and is ignored elsewhere.
///
/// # Errors
///
/// Returns an error if any component cannot be created.
pub fn create_dir_all(dir: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
        .create(dir)
        .with_context(|| format!("create directory: {}", dir.display()))
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created (e.g. `link` exists).
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);

    #[cfg(windows)]
    let result = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };

    result.with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })
}

/// Copy `src` to `dst` unless `dst` already exists.
///
/// Returns `false` when the copy was skipped.
///
/// # Errors
///
/// Returns an error if the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> Result<bool> {
    if dst.symlink_metadata().is_ok() {
        return Ok(false);
    }
    fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(true)
}

/// Remove `path` recursively without following symlinks.
///
/// A symlink is removed itself, never its target. Does nothing if `path`
/// does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_all(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("removing directory: {}", path.display()))
    } else if meta.file_type().is_symlink() && is_dir_link(&meta) {
        fs::remove_dir(path).with_context(|| format!("removing symlink: {}", path.display()))
    } else {
        fs::remove_file(path).with_context(|| format!("removing file: {}", path.display()))
    }
}

/// On Windows, directory symlinks carry `FILE_ATTRIBUTE_DIRECTORY` and must
/// be removed with `remove_dir`.
fn is_dir_link(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt as _;
        meta.file_attributes() & 0x10 != 0
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a/b/c/file");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn create_dir_all_applies_mode() {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("private");
        create_dir_all(&target, 0o700).unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn copy_file_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "mine").unwrap();
        assert!(!copy_file(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "mine");
    }

    #[test]
    fn remove_all_handles_trees_and_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("sub")).unwrap();
        fs::write(tree.join("sub/file"), "x").unwrap();
        remove_all(&tree).unwrap();
        assert!(!tree.exists());
        remove_all(&tree).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn remove_all_removes_link_not_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let link = dir.path().join("link");
        create_symlink(&target, &link).unwrap();
        remove_all(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(target.join("keep").exists());
    }
}
