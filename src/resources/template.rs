//! Template resource: rendered once, never re-rendered over an existing
//! file.
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::error::ResourceError;
use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, Decision, Removable, Resource, ResourceChange};
use crate::path::{PathValue, Stat};
use crate::render::Renderer;

/// A template source rendered with `values` into `dst`.
#[derive(Clone)]
pub struct TemplateResource {
    /// Absolute template source.
    pub src: PathValue,
    /// Absolute output file.
    pub dst: PathValue,
    /// Placeholder values.
    pub values: BTreeMap<String, String>,
    renderer: Arc<dyn Renderer>,
}

impl fmt::Debug for TemplateResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateResource")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("values", &self.values)
            .field("renderer", &"<dyn Renderer>")
            .finish()
    }
}

impl TemplateResource {
    /// Create a new template resource.
    #[must_use]
    pub fn new(
        src: PathValue,
        dst: PathValue,
        values: BTreeMap<String, String>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            src,
            dst,
            values,
            renderer,
        }
    }
}

impl Resource for TemplateResource {
    fn description(&self) -> String {
        format!("{} from {}", self.dst, self.src)
    }
}

impl Applicable for TemplateResource {
    fn check_apply(&self) -> Result<Decision> {
        if !self.src.lstat().exists() {
            return Ok(Decision::unavailable(format!("File not found: {}", self.src)));
        }
        if self.dst.lstat().exists() {
            return Ok(Decision::satisfied(format!(
                "File already created: {}",
                self.dst
            )));
        }
        Ok(Decision::Act)
    }

    fn apply_command(&self) -> String {
        format!("render {} > {}", self.src, self.dst)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let template =
            fs::read_to_string(self.src.as_path()).map_err(|source| ResourceError::Unreadable {
                path: self.src.to_string(),
                source,
            })?;
        let rendered = self
            .renderer
            .render(&template, &self.values)
            .with_context(|| format!("rendering {}", self.src))?;
        ensure_parent_dir(self.dst.as_path())?;
        fs::write(self.dst.as_path(), rendered).map_err(|source| ResourceError::Unwritable {
            path: self.dst.to_string(),
            source,
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Removable for TemplateResource {
    fn check_remove(&self) -> Result<Decision> {
        Ok(match self.dst.lstat() {
            Stat::Absent => Decision::satisfied(format!("File not found: {}", self.dst)),
            Stat::Found(meta) if meta.is_file() => Decision::Act,
            Stat::Found(_) => {
                Decision::conflict(format!("File is not a normal file: {}", self.dst))
            }
        })
    }

    fn remove_command(&self) -> String {
        format!("rm {}", self.dst)
    }

    fn remove(&self) -> Result<ResourceChange> {
        fs::remove_file(self.dst.as_path())
            .with_context(|| format!("removing file: {}", self.dst))?;
        Ok(ResourceChange::Applied)
    }
}
