//! `xake list` / `xake status`: show resolved preference chains.
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;

use super::CommandRunner;
use crate::catalog::{Chain, CookBook};
use crate::cli::{GlobalOpts, ListOpts};
use crate::logging::Logger;
use crate::path::{PathValue, Stat};
use crate::tasks::{Context, helpers::resolve_chains};

/// Run the list command, writing to stdout.
///
/// # Errors
///
/// Returns an error if setup fails or stdout cannot be written.
pub fn run(global: &GlobalOpts, opts: &ListOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = CommandRunner::new(global, log)?;
    let books = runner.cookbooks();
    let mut out = std::io::stdout().lock();
    list(&books, runner.context(), opts, global.color.enabled(), &mut out)
}

/// Every preference chain of `books`, sorted by destination.
#[must_use]
pub fn pref_chains(books: &[&CookBook], ctx: &Context) -> Vec<Chain> {
    let mut chains: Vec<Chain> = books
        .iter()
        .flat_map(|book| resolve_chains(ctx, book, &book.prefs))
        .collect();
    chains.sort_by(|a, b| a.dst.as_path().cmp(b.dst.as_path()));
    chains
}

/// Write one line per preference chain of `books` to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn list(
    books: &[&CookBook],
    ctx: &Context,
    opts: &ListOpts,
    color: bool,
    out: &mut dyn Write,
) -> Result<()> {
    for chain in pref_chains(books, ctx) {
        let dst = paint(&chain.dst, color);
        if opts.long {
            writeln!(out, "{dst} -> {}", chain.src)?;
        } else {
            writeln!(out, "{dst}")?;
        }
    }
    Ok(())
}

/// Destination text, colored by what currently occupies it.
fn paint(dst: &PathValue, color: bool) -> String {
    if !color {
        return dst.to_string();
    }
    let code = match dst.lstat() {
        Stat::Found(meta) if meta.file_type().is_symlink() => Some("\x1b[35m"),
        Stat::Found(meta) if meta.is_dir() => Some("\x1b[34m"),
        Stat::Found(_) => None,
        Stat::Absent => Some("\x1b[31m"),
    };
    code.map_or_else(|| dst.to_string(), |c| format!("{c}{dst}\x1b[0m"))
}
