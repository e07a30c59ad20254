//! Snippet resource: a text block toggled inside an existing file by
//! substring containment.
use std::fs;

use anyhow::Result;

use super::error::{ResourceError, read_optional};
use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, Decision, Removable, Resource, ResourceChange};
use crate::path::PathValue;

/// The trimmed text of `src`, enabled in or disabled from `dst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetResource {
    /// Absolute snippet source.
    pub src: PathValue,
    /// Absolute file the snippet lives in.
    pub dst: PathValue,
}

impl SnippetResource {
    /// Create a new snippet resource.
    #[must_use]
    pub const fn new(src: PathValue, dst: PathValue) -> Self {
        Self { src, dst }
    }

    /// Trimmed snippet text; `None` when the source is missing.
    fn snippet(&self) -> Result<Option<String>, ResourceError> {
        Ok(read_optional(self.src.as_path())?.map(|text| text.trim().to_string()))
    }

    fn target(&self) -> Result<Option<String>, ResourceError> {
        read_optional(self.dst.as_path())
    }

    fn not_found(&self) -> Decision {
        Decision::unavailable(format!("File not found: {}", self.src))
    }

    fn write(&self, text: &str) -> Result<()> {
        ensure_parent_dir(self.dst.as_path())?;
        fs::write(self.dst.as_path(), text).map_err(|source| ResourceError::Unwritable {
            path: self.dst.to_string(),
            source,
        })?;
        Ok(())
    }
}

/// `target` with `snippet` appended on its own line.
fn appended(target: Option<&str>, snippet: &str) -> String {
    match target.map(str::trim).filter(|t| !t.is_empty()) {
        Some(existing) => format!("{existing}\n{snippet}\n"),
        None => format!("{snippet}\n"),
    }
}

impl Resource for SnippetResource {
    fn description(&self) -> String {
        format!("{} in {}", self.src, self.dst)
    }
}

impl Applicable for SnippetResource {
    fn check_apply(&self) -> Result<Decision> {
        let Some(snippet) = self.snippet()? else {
            return Ok(self.not_found());
        };
        match self.target()? {
            Some(target) if target.contains(&snippet) => Ok(Decision::satisfied(format!(
                "Snippet already enabled in file: {}",
                self.dst
            ))),
            _ => Ok(Decision::Act),
        }
    }

    fn apply_command(&self) -> String {
        format!("Enable snippet: {} >> {}", self.src, self.dst)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let Some(snippet) = self.snippet()? else {
            return Ok(ResourceChange::Skipped {
                reason: format!("File not found: {}", self.src),
            });
        };
        let target = self.target()?;
        if target.as_deref().is_some_and(|t| t.contains(&snippet)) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.write(&appended(target.as_deref(), &snippet))?;
        Ok(ResourceChange::Applied)
    }
}

impl Removable for SnippetResource {
    fn check_remove(&self) -> Result<Decision> {
        let Some(snippet) = self.snippet()? else {
            return Ok(self.not_found());
        };
        Ok(match self.target()? {
            None => Decision::satisfied(format!("File not found: {}", self.dst)),
            Some(target) if target.contains(&snippet) => Decision::Act,
            Some(_) => {
                Decision::satisfied(format!("Snippet already disabled in file: {}", self.dst))
            }
        })
    }

    fn remove_command(&self) -> String {
        format!("Disable snippet: {} << {}", self.src, self.dst)
    }

    fn remove(&self) -> Result<ResourceChange> {
        let (Some(snippet), Some(target)) = (self.snippet()?, self.target()?) else {
            return Ok(ResourceChange::AlreadyCorrect);
        };
        if !target.contains(&snippet) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        let line = format!("{snippet}\n");
        let pattern = if target.contains(&line) { &line } else { &snippet };
        self.write(&target.replace(pattern.as_str(), ""))?;
        Ok(ResourceChange::Applied)
    }
}
