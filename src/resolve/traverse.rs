//! Chain materialization: turn one spec in one search context into
//! file-level chains.
use std::fs;
use std::path::Path;

use super::overlay::SearchContext;
use crate::catalog::{Chain, Spec};
use crate::path::{PathValue, Stat};

/// Kind of a non-directory entry found by [`walk_leaves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Regular file.
    File,
    /// Symlink, whatever it points to.
    Symlink,
}

/// A file or symlink beneath a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Full path of the entry.
    pub path: PathValue,
    /// Entry classification.
    pub kind: LeafKind,
}

/// Every file and symlink beneath `root`, depth first, siblings in name
/// order.
///
/// Each entry is classified once without following links: directories are
/// pushed on the worklist, files and symlinks are emitted, anything else is
/// ignored. Unreadable directories are skipped.
#[must_use]
pub fn walk_leaves(root: &PathValue) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(dir.as_path()) else {
            continue;
        };
        let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut subdirs = Vec::new();
        for entry in entries {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = dir.join(entry.file_name());
            if file_type.is_symlink() {
                leaves.push(Leaf {
                    path,
                    kind: LeafKind::Symlink,
                });
            } else if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() {
                leaves.push(Leaf {
                    path,
                    kind: LeafKind::File,
                });
            }
        }
        pending.extend(subdirs.into_iter().rev());
    }
    leaves
}

/// Chains for `spec` searched in `ctx`.
///
/// A missing source root yields nothing. A file (or symlink) root yields a
/// single file-to-file chain. A directory root yields one chain per leaf,
/// with the destination mirroring the leaf's path relative to the root.
/// Pairs that cannot be made absolute are skipped with a warning.
#[must_use]
pub fn traverse(spec: &Spec, ctx: &SearchContext, home: Option<&Path>) -> Vec<Chain> {
    let src_root = ctx.source_root(spec, home);
    let dst_root = spec.dst.expand_home_with(home).to_absolute();

    match src_root.lstat() {
        Stat::Absent => Vec::new(),
        Stat::Found(meta) if meta.is_dir() => walk_leaves(&src_root)
            .into_iter()
            .filter_map(|leaf| {
                let rel = leaf.path.relative_to(&src_root)?;
                let dst = dst_root.join(rel);
                bind(spec, leaf.path, dst)
            })
            .collect(),
        Stat::Found(_) => bind(spec, src_root, dst_root).into_iter().collect(),
    }
}

fn bind(spec: &Spec, src: PathValue, dst: PathValue) -> Option<Chain> {
    spec.chain(src, dst)
        .inspect_err(|e| tracing::warn!("Skipping {}: {e}", spec.src))
        .ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::PrefOptions;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn prefix(root: &Path) -> SearchContext {
        SearchContext {
            prefix: Some(PathValue::new(root)),
            suffix: None,
        }
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = Spec::preference("absent", "/dst", PrefOptions::default());
        assert!(traverse(&spec, &prefix(dir.path()), None).is_empty());
    }

    #[test]
    fn file_root_yields_single_chain() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zshrc");
        let spec = Spec::preference("zshrc", "/home/me/.zshrc", PrefOptions::default());
        let chains = traverse(&spec, &prefix(dir.path()), None);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].src, PathValue::new(dir.path().join("zshrc")));
        assert_eq!(chains[0].dst, PathValue::new("/home/me/.zshrc"));
    }

    #[test]
    fn directory_root_mirrors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "nvim/init.lua");
        write(dir.path(), "nvim/lua/plugins/lsp.lua");
        let spec = Spec::preference("nvim", "~/.config/nvim", PrefOptions::default());
        let home = Path::new("/home/me");
        let dsts: Vec<String> = traverse(&spec, &prefix(dir.path()), Some(home))
            .into_iter()
            .map(|c| c.dst.to_string())
            .collect();
        assert_eq!(
            dsts,
            [
                "/home/me/.config/nvim/init.lua",
                "/home/me/.config/nvim/lua/plugins/lsp.lua"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_leaves_and_never_followed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "outside/secret");
        fs::create_dir_all(dir.path().join("tree")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("outside"), dir.path().join("tree/dirlink"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("tree/dangling"))
            .unwrap();

        let leaves = walk_leaves(&PathValue::new(dir.path().join("tree")));
        let names: Vec<_> = leaves
            .iter()
            .map(|l| (l.path.file_name().unwrap().to_string_lossy().to_string(), l.kind))
            .collect();
        assert_eq!(
            names,
            [
                ("dangling".to_string(), LeafKind::Symlink),
                ("dirlink".to_string(), LeafKind::Symlink),
            ]
        );
    }

    #[test]
    fn concrete_git_scenario() {
        let repo = tempfile::tempdir().unwrap();
        write(repo.path(), "vault/git/default/git/config");
        let container = PathValue::new(repo.path().join("vault/git"));
        let spec = Spec::preference("git/", "~/.config/git/", PrefOptions::default());
        let ctxs = super::super::overlay::contexts(
            &spec,
            &container,
            crate::platform::Platform::Default,
        );
        let chains: Vec<Chain> = ctxs
            .iter()
            .flat_map(|ctx| traverse(&spec, ctx, Some(Path::new("/home/me"))))
            .collect();
        assert_eq!(chains.len(), 1);
        assert_eq!(
            chains[0].src,
            PathValue::new(repo.path().join("vault/git/default/git/config"))
        );
        assert_eq!(chains[0].dst, PathValue::new("/home/me/.config/git/config"));
    }
}
