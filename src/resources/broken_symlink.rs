//! A dangling symlink found by the cleanup scanner.
use anyhow::Result;

use super::helpers::fs::remove_all;
use super::{Decision, Removable, Resource, ResourceChange};
use crate::path::PathValue;

/// Symlink whose target no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenSymlinkResource {
    /// Location of the link itself.
    pub path: PathValue,
}

impl BrokenSymlinkResource {
    /// Create a new broken-symlink resource.
    #[must_use]
    pub const fn new(path: PathValue) -> Self {
        Self { path }
    }
}

impl Resource for BrokenSymlinkResource {
    fn description(&self) -> String {
        self.path.to_string()
    }
}

impl Removable for BrokenSymlinkResource {
    fn check_remove(&self) -> Result<Decision> {
        if !self.path.lstat().is_symlink() {
            return Ok(Decision::satisfied(format!(
                "File already removed: {}",
                self.path
            )));
        }
        if self.path.stat().exists() {
            return Ok(Decision::satisfied(format!(
                "Symlink is no longer broken: {}",
                self.path
            )));
        }
        Ok(Decision::Act)
    }

    fn remove_command(&self) -> String {
        format!("rm -rf {}", self.path)
    }

    fn remove(&self) -> Result<ResourceChange> {
        remove_all(self.path.as_path())?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn removes_dangling_link_only() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink(dir.path().join("gone"), &link).unwrap();
        let broken = BrokenSymlinkResource::new(PathValue::new(&link));
        assert_eq!(broken.check_remove().unwrap(), Decision::Act);
        broken.remove().unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(matches!(
            broken.check_remove().unwrap(),
            Decision::Satisfied { .. }
        ));
    }

    #[test]
    fn repaired_link_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("target"), "x").unwrap();
        let link = dir.path().join("link");
        symlink(dir.path().join("target"), &link).unwrap();
        let broken = BrokenSymlinkResource::new(PathValue::new(&link));
        assert!(matches!(
            broken.check_remove().unwrap(),
            Decision::Satisfied { .. }
        ));
    }
}
