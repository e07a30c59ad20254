//! `xake cleanup`: remove broken symlinks, ignoring `autoclean = false`.
use anyhow::Result;
use std::sync::Arc;

use super::CommandRunner;
use crate::catalog::CookBook;
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::{self, Context, cleanup::CleanBrokenSymlinks};

/// Run the cleanup command.
///
/// # Errors
///
/// Returns an error if setup fails or a removal failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = CommandRunner::new(global, log)?;
    let books = runner.cookbooks();
    runner.finish(cleanup(&books, runner.context()))
}

/// Scan every preference destination root of `books` and remove broken
/// symlinks.
///
/// # Errors
///
/// Never fails itself; removal failures are recorded in the log.
pub fn cleanup(books: &[&CookBook], ctx: &Context) -> Result<()> {
    tasks::execute(&CleanBrokenSymlinks::new(books, true), ctx)
}
