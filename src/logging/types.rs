//! Core logging types: task entries, status, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do for this cookbook.
    NotApplicable,
    /// Task was explicitly skipped (e.g., disabled by a flag).
    Skipped,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// Task encountered an error and could not complete.
    Failed,
}

/// Leveled log sink used by every engine component.
///
/// Levels, lowest first: `debug`, `trace`, `mark`, `info`, `warn`, `error`.
/// [`Logger`](super::logger::Logger) writes to the console and the log file;
/// tests substitute a recording implementation.
pub trait Log: Send + Sync {
    /// Log a cookbook banner or other section marker.
    fn mark(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log the shell equivalent of a mutation about to be performed.
    fn trace(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a mutation that was skipped because of dry-run mode.
    fn dry_run(&self, msg: &str);
    /// Show a progress line without a trailing newline; the next message
    /// replaces it.
    fn progress(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn task_status_equality() {
        assert_eq!(TaskStatus::Ok, TaskStatus::Ok);
        assert_ne!(TaskStatus::Ok, TaskStatus::Failed);
        assert_ne!(TaskStatus::Skipped, TaskStatus::DryRun);
        assert_ne!(TaskStatus::NotApplicable, TaskStatus::Ok);
    }
}
