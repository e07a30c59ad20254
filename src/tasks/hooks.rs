//! Cookbook lifecycle hook tasks.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::catalog::{CookBook, HookSlot};
use crate::error::TaskError;

/// Invoke one lifecycle hook slot of a cookbook.
///
/// Hook failures are fatal: they abort the remaining run.
#[derive(Debug)]
pub struct RunHook<'a> {
    book: &'a CookBook,
    slot: HookSlot,
}

impl<'a> RunHook<'a> {
    /// Task for `slot` of `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook, slot: HookSlot) -> Self {
        Self { book, slot }
    }
}

impl Task for RunHook<'_> {
    fn name(&self) -> String {
        format!("{}: {}", self.book.name, self.slot)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.book.hooks.get(self.slot).is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log
            .debug(&format!("running {} hook of {}", self.slot, self.book.name));
        self.book
            .run_hook(self.slot, &ctx.hook_context())
            .map_err(|e| TaskError::HookFailed {
                cookbook: self.book.name.clone(),
                hook: self.slot.to_string(),
                reason: format!("{e:#}"),
            })?;
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }

    fn is_fatal(&self) -> bool {
        true
    }
}
