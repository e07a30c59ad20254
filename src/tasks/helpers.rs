//! Chain resolution shared by the per-cookbook tasks.

use super::Context;
use crate::catalog::{Chain, CookBook, Spec};
use crate::resolve;

/// Resolve `specs` of `book` into chains, in declaration order, dropping
/// sources on the ignore list.
///
/// Resolution completes for every spec before the caller acts on any
/// chain.
pub fn resolve_chains(ctx: &Context, book: &CookBook, specs: &[Spec]) -> Vec<Chain> {
    specs
        .iter()
        .flat_map(|spec| resolve::chains(book, spec, ctx.platform, Some(ctx.home.as_path())))
        .filter(|chain| {
            let ignored = ctx.filter.is_ignored(&chain.src);
            if ignored {
                ctx.log.debug(&format!("File ignored: {}", chain.src));
            }
            !ignored
        })
        .collect()
}
