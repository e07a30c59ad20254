//! Preference resource: one chain installed as a symlink or a copy.
use std::fs;

use anyhow::Result;

use super::error::ResourceError;
use super::helpers::fs::{copy_file, create_symlink, ensure_parent_dir, remove_all};
use super::{Applicable, Decision, Removable, Resource, ResourceChange};
use crate::catalog::{Chain, LinkKind};
use crate::path::{PathValue, Stat};

/// A single file installed at `dst` from `src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceResource {
    /// Absolute source file.
    pub src: PathValue,
    /// Absolute destination.
    pub dst: PathValue,
    /// Symlink or copy.
    pub kind: LinkKind,
}

impl PreferenceResource {
    /// Create a new preference resource.
    #[must_use]
    pub const fn new(src: PathValue, dst: PathValue, kind: LinkKind) -> Self {
        Self { src, dst, kind }
    }

    /// Build from a resolved chain; non-preference chains link.
    #[must_use]
    pub fn from_chain(chain: &Chain) -> Self {
        Self::new(
            chain.src.clone(),
            chain.dst.clone(),
            chain.link_kind().unwrap_or_default(),
        )
    }

    /// Whether `dst` holds the same bytes as `src`.
    fn is_unchanged_copy(&self) -> Result<bool, ResourceError> {
        let read = |path: &PathValue| {
            fs::read(path.as_path()).map_err(|source| ResourceError::Unreadable {
                path: path.to_string(),
                source,
            })
        };
        Ok(read(&self.src)? == read(&self.dst)?)
    }

    fn source_missing(&self) -> Option<Decision> {
        (!self.src.lstat().exists())
            .then(|| Decision::unavailable(format!("File not found: {}", self.src)))
    }
}

impl Resource for PreferenceResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.dst, self.src)
    }
}

impl Applicable for PreferenceResource {
    fn check_apply(&self) -> Result<Decision> {
        if let Some(missing) = self.source_missing() {
            return Ok(missing);
        }
        Ok(match self.dst.lstat() {
            Stat::Absent => Decision::Act,
            Stat::Found(meta) if meta.file_type().is_symlink() => {
                Decision::satisfied(format!("Symlink already exists: {}", self.dst))
            }
            Stat::Found(meta) if meta.is_dir() => {
                Decision::conflict(format!("Directory already exists: {}", self.dst))
            }
            Stat::Found(_) => match self.kind {
                LinkKind::Link => Decision::conflict(format!("File already exists: {}", self.dst)),
                LinkKind::Copy => {
                    Decision::satisfied(format!("File already exists: {}", self.dst))
                }
            },
        })
    }

    fn apply_command(&self) -> String {
        match self.kind {
            LinkKind::Link => format!("ln -s {} {}", self.src, self.dst),
            LinkKind::Copy => format!("cp {} {}", self.src, self.dst),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(self.dst.as_path())?;
        match self.kind {
            LinkKind::Link => {
                create_symlink(self.src.as_path(), self.dst.as_path())?;
                Ok(ResourceChange::Applied)
            }
            LinkKind::Copy => {
                if copy_file(self.src.as_path(), self.dst.as_path())? {
                    Ok(ResourceChange::Applied)
                } else {
                    Ok(ResourceChange::AlreadyCorrect)
                }
            }
        }
    }
}

impl Removable for PreferenceResource {
    fn check_remove(&self) -> Result<Decision> {
        if let Some(missing) = self.source_missing() {
            return Ok(missing);
        }
        Ok(match self.dst.lstat() {
            Stat::Absent => Decision::satisfied(format!("File already removed: {}", self.dst)),
            Stat::Found(meta)
                if meta.is_file() && self.kind == LinkKind::Copy && self.is_unchanged_copy()? =>
            {
                Decision::Act
            }
            Stat::Found(meta) if meta.is_file() => {
                Decision::conflict(format!("File is normal file: {}", self.dst))
            }
            Stat::Found(_) => Decision::Act,
        })
    }

    fn remove_command(&self) -> String {
        format!("rm -rf {}", self.dst)
    }

    fn remove(&self) -> Result<ResourceChange> {
        remove_all(self.dst.as_path())?;
        Ok(ResourceChange::Applied)
    }
}
