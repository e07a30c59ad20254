//! Broken-symlink scanner over preference destination roots.
use std::collections::HashSet;
use std::path::Path;

use crate::catalog::{CookBook, Spec};
use crate::path::{PathValue, Stat};
use crate::resolve::traverse::{LeafKind, walk_leaves};

/// Preference specs of `books`, in cookbook then declaration order.
#[must_use]
pub fn pref_specs<'a>(books: &[&'a CookBook]) -> Vec<&'a Spec> {
    books.iter().flat_map(|book| book.prefs.iter()).collect()
}

/// Every dangling symlink under the destination roots of `specs`.
///
/// Roots are visited sorted by destination; specs with `autoclean = false`
/// are skipped unless `force` is set. Each broken link is reported once.
#[must_use]
pub fn scan(specs: &[&Spec], home: Option<&Path>, force: bool) -> Vec<PathValue> {
    let mut roots: Vec<(PathValue, bool)> = specs
        .iter()
        .map(|spec| {
            let autoclean = spec.pref_options().is_none_or(|o| o.autoclean);
            (spec.dst.expand_home_with(home).to_absolute(), autoclean)
        })
        .collect();
    roots.sort_by(|a, b| a.0.cmp(&b.0));

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for (root, autoclean) in roots {
        if !autoclean && !force {
            continue;
        }
        for hit in scan_root(&root) {
            if seen.insert(hit.clone()) {
                found.push(hit);
            }
        }
    }
    found
}

fn is_broken(path: &PathValue) -> bool {
    path.lstat().is_symlink() && !path.stat().exists()
}

fn scan_root(root: &PathValue) -> Vec<PathValue> {
    match root.lstat() {
        Stat::Found(meta) if meta.file_type().is_symlink() => {
            if is_broken(root) {
                vec![root.clone()]
            } else {
                Vec::new()
            }
        }
        Stat::Found(meta) if meta.is_dir() => walk_leaves(root)
            .into_iter()
            .filter(|leaf| leaf.kind == LeafKind::Symlink && !leaf.path.stat().exists())
            .map(|leaf| leaf.path)
            .collect(),
        Stat::Found(_) | Stat::Absent => Vec::new(),
    }
}
