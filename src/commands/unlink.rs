//! `xake unlink`: uninstall every cookbook in reverse catalog order.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandRunner, launch_banner};
use crate::catalog::CookBook;
use crate::cli::{GlobalOpts, UnlinkOpts};
use crate::logging::Logger;
use crate::tasks::{self, Context, cleanup::CleanBrokenSymlinks};

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if setup fails, a lifecycle hook fails, or any task
/// recorded a failure.
pub fn run(global: &GlobalOpts, opts: &UnlinkOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = CommandRunner::new(global, log)?;
    let books = runner.cookbooks();
    runner.finish(unlink(&books, runner.context(), opts))
}

/// Uninstall `books` last to first, each in the reverse of its link order.
///
/// # Errors
///
/// Returns an error only when a lifecycle hook fails.
pub fn unlink(books: &[&CookBook], ctx: &Context, opts: &UnlinkOpts) -> Result<()> {
    if !opts.no_cleanup {
        tasks::execute(&CleanBrokenSymlinks::new(books, false), ctx)?;
    }
    for (index, book) in books.iter().rev().enumerate() {
        launch_banner(ctx, book, index, books.len());
        for task in tasks::unlink_tasks(book, !opts.no_deactivate) {
            tasks::execute(task.as_ref(), ctx)?;
        }
    }
    Ok(())
}
