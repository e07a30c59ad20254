//! Idempotent resource primitives (check + apply/remove pattern).
//!
//! Every resource inspects live filesystem state on each invocation and
//! reports a [`Decision`] before anything is mutated, so the same check runs
//! under dry-run and real runs alike.
pub mod broken_symlink;
pub mod error;
pub mod helpers;
pub mod preference;
pub mod snippet;
pub mod template;

use anyhow::Result;

pub use broken_symlink::BrokenSymlinkResource;
pub use preference::PreferenceResource;
pub use snippet::SnippetResource;
pub use template::TemplateResource;

/// Anything the action engine can describe in log output.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;
}

/// Outcome of inspecting current state before an action.
///
/// # Examples
///
/// ```
/// use xake_cli::resources::Decision;
///
/// let done = Decision::satisfied("Symlink already exists: /home/me/.zshrc");
/// assert!(!done.needs_action());
/// assert!(Decision::Act.needs_action());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A state transition is required.
    Act,
    /// Already in the desired state.
    Satisfied {
        /// What was found.
        reason: String,
    },
    /// Destination is occupied by something the engine will not overwrite.
    Conflict {
        /// What was found.
        reason: String,
    },
    /// Nothing to act on, e.g. the source is missing.
    Unavailable {
        /// What was missing.
        reason: String,
    },
}

impl Decision {
    /// [`Decision::Satisfied`] with `reason`.
    #[must_use]
    pub fn satisfied(reason: impl Into<String>) -> Self {
        Self::Satisfied {
            reason: reason.into(),
        }
    }

    /// [`Decision::Conflict`] with `reason`.
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// [`Decision::Unavailable`] with `reason`.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether the action has to be performed.
    #[must_use]
    pub const fn needs_action(&self) -> bool {
        matches!(self, Self::Act)
    }
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use xake_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "source missing".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// assert_ne!(noop, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, updated or removed.
    Applied,
    /// Resource turned out to be correct already (no change made).
    AlreadyCorrect,
    /// Resource was skipped at apply time.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// A resource that can be brought into its installed state.
pub trait Applicable: Resource {
    /// Inspect current state without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if state that must be read (e.g. snippet text) is
    /// unreadable for reasons other than absence.
    fn check_apply(&self) -> Result<Decision>;

    /// Shell equivalent of [`apply`](Self::apply), for trace and dry-run
    /// output.
    fn apply_command(&self) -> String;

    /// Perform the state transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying filesystem operation fails.
    fn apply(&self) -> Result<ResourceChange>;
}

/// A resource that can be brought into its uninstalled state.
pub trait Removable: Resource {
    /// Inspect current state without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if required state is unreadable.
    fn check_remove(&self) -> Result<Decision>;

    /// Shell equivalent of [`remove`](Self::remove).
    fn remove_command(&self) -> String;

    /// Undo a previous [`Applicable::apply`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying filesystem operation fails.
    fn remove(&self) -> Result<ResourceChange>;
}

impl<T: Resource + ?Sized> Resource for &T {
    fn description(&self) -> String {
        (**self).description()
    }
}

impl<T: Applicable + ?Sized> Applicable for &T {
    fn check_apply(&self) -> Result<Decision> {
        (**self).check_apply()
    }

    fn apply_command(&self) -> String {
        (**self).apply_command()
    }

    fn apply(&self) -> Result<ResourceChange> {
        (**self).apply()
    }
}

impl<T: Removable + ?Sized> Removable for &T {
    fn check_remove(&self) -> Result<Decision> {
        (**self).check_remove()
    }

    fn remove_command(&self) -> String {
        (**self).remove_command()
    }

    fn remove(&self) -> Result<ResourceChange> {
        (**self).remove()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn only_act_needs_action() {
        assert!(Decision::Act.needs_action());
        assert!(!Decision::satisfied("x").needs_action());
        assert!(!Decision::conflict("x").needs_action());
        assert!(!Decision::unavailable("x").needs_action());
    }

    #[test]
    fn constructors_keep_reason() {
        assert_eq!(
            Decision::conflict("File already exists: /h/.vimrc"),
            Decision::Conflict {
                reason: "File already exists: /h/.vimrc".to_string()
            }
        );
    }
}
