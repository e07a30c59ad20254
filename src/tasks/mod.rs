//! Named tasks that run resources per cookbook and record their outcome.
pub mod cleanup;
pub mod context;
pub mod helpers;
pub mod hooks;
pub mod preferences;
mod processing;
pub mod snippets;
pub mod templates;

pub use context::Context;
pub use processing::{TaskResult, TaskStats, process_apply, process_remove};

use anyhow::Result;

use crate::catalog::{CookBook, HookSlot};
use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> String;

    /// Whether this task has anything to do.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if any resource failed, or if a lifecycle hook
    /// failed.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;

    /// Whether a failure aborts the remaining run.
    fn is_fatal(&self) -> bool {
        false
    }
}

/// Tasks for installing one cookbook: setup hook, preferences, snippets,
/// templates, then the activate hook unless `activate` is off.
#[must_use]
pub fn link_tasks(book: &CookBook, activate: bool) -> Vec<Box<dyn Task + '_>> {
    let mut tasks: Vec<Box<dyn Task + '_>> = vec![
        Box::new(hooks::RunHook::new(book, HookSlot::Setup)),
        Box::new(preferences::LinkPreferences::new(book)),
        Box::new(snippets::EnableSnippets::new(book)),
        Box::new(templates::ForgeTemplates::new(book)),
    ];
    if activate {
        tasks.push(Box::new(hooks::RunHook::new(book, HookSlot::Activate)));
    }
    tasks
}

/// Tasks for uninstalling one cookbook, mirroring [`link_tasks`]: the
/// deactivate hook unless `deactivate` is off, templates, snippets, then
/// preferences.
#[must_use]
pub fn unlink_tasks(book: &CookBook, deactivate: bool) -> Vec<Box<dyn Task + '_>> {
    let mut tasks: Vec<Box<dyn Task + '_>> = Vec::new();
    if deactivate {
        tasks.push(Box::new(hooks::RunHook::new(book, HookSlot::Deactivate)));
    }
    tasks.push(Box::new(templates::RecallTemplates::new(book)));
    tasks.push(Box::new(snippets::DisableSnippets::new(book)));
    tasks.push(Box::new(preferences::UnlinkPreferences::new(book)));
    tasks
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error only when the task is fatal; other failures
/// are logged and recorded so the run continues.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    let name = task.name();
    if !task.should_run(ctx) {
        ctx.log.debug(&format!("skipping task: {name} (not applicable)"));
        ctx.log.record_task(&name, TaskStatus::NotApplicable, None);
        return Ok(());
    }

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(&name, TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(&name, TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(&name, TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{name}: {e:#}"));
            ctx.log
                .record_task(&name, TaskStatus::Failed, Some(&format!("{e:#}")));
            if task.is_fatal() {
                return Err(e);
            }
        }
    }
    Ok(())
}
