//! Generic resource processing loop: check state, apply or remove, collect
//! stats.
//!
//! Resources are processed strictly in order; a failure on one resource is
//! logged and counted, and the loop moves on to the next.

mod apply;

use anyhow::Result;

use super::context::Context;
use crate::error::TaskError;
use crate::resources::{Applicable, Removable};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use xake_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("--no-activate".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for tasks that process many resources.
///
/// # Examples
///
/// ```
/// use xake_cli::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// Conflicts, skips and failures are only listed when non-zero:
///
/// ```
/// use xake_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, conflicts: 1, skipped: 3, failed: 0 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 1 conflicts, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Resources changed (or that would change under dry-run).
    pub changed: u32,
    /// Resources already in the desired state.
    pub already_ok: u32,
    /// Resources blocked by something the engine will not overwrite.
    pub conflicts: u32,
    /// Resources with nothing to act on (e.g. missing source).
    pub skipped: u32,
    /// Resources whose check or action failed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut parts = vec![
            format!("{} {verb}", self.changed),
            format!("{} already ok", self.already_ok),
        ];
        for (count, label) in [
            (self.conflicts, "conflicts"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ] {
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }
        parts.join(", ")
    }

    /// Log the summary and return the appropriate `TaskResult`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::ExecutionFailed`] if any resource failed.
    pub fn finish(self, ctx: &Context, task: &str) -> Result<TaskResult> {
        ctx.log.debug(&format!("{task}: {}", self.summary(ctx.dry_run)));
        if self.failed > 0 {
            return Err(TaskError::ExecutionFailed {
                task: task.to_string(),
                reason: format!("{} operation(s) failed", self.failed),
            }
            .into());
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.conflicts += other.conflicts;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Bring every resource into its installed state, in order.
pub fn process_apply<R: Applicable>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
) -> TaskStats {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += apply::apply_single(ctx, &resource);
    }
    stats
}

/// Bring every resource into its uninstalled state, in order.
pub fn process_remove<R: Removable>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
) -> TaskStats {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += apply::remove_single(ctx, &resource);
    }
    stats
}
