//! Spec resolution: overlay contexts → traversal → chains.
//!
//! Resolution only reads the filesystem. Every chain list for a spec is
//! complete before any action consumes it.
pub mod filter;
pub mod glob;
pub mod overlay;
pub mod traverse;

use std::path::Path;

use crate::catalog::{Chain, CookBook, Spec};
use crate::platform::Platform;

pub use filter::PathFilter;
pub use overlay::SearchContext;

/// Chains for one spec of `book`, concatenated across overlay contexts so
/// that platform-specific sources come before default ones.
#[must_use]
pub fn chains(book: &CookBook, spec: &Spec, platform: Platform, home: Option<&Path>) -> Vec<Chain> {
    overlay::contexts(spec, &book.container, platform)
        .iter()
        .flat_map(|ctx| traverse::traverse(spec, ctx, home))
        .collect()
}
