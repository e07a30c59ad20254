//! `xake link`: install every cookbook in catalog order.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandRunner, launch_banner};
use crate::catalog::CookBook;
use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Logger;
use crate::tasks::{self, Context, cleanup::CleanBrokenSymlinks};

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails, a lifecycle hook fails, or any task
/// recorded a failure.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = CommandRunner::new(global, log)?;
    let books = runner.cookbooks();
    runner.finish(link(&books, runner.context(), opts))
}

/// Install `books`: optional cleanup, then per cookbook the setup hook,
/// preferences, snippets, templates and activate hook.
///
/// # Errors
///
/// Returns an error only when a lifecycle hook fails; other failures are
/// recorded in the log.
pub fn link(books: &[&CookBook], ctx: &Context, opts: &LinkOpts) -> Result<()> {
    if !opts.no_cleanup {
        tasks::execute(&CleanBrokenSymlinks::new(books, false), ctx)?;
    }
    for (index, book) in books.iter().enumerate() {
        launch_banner(ctx, book, index, books.len());
        for task in tasks::link_tasks(book, !opts.no_activate) {
            tasks::execute(task.as_ref(), ctx)?;
        }
    }
    Ok(())
}
