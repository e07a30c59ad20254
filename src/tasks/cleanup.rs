//! Broken-symlink cleanup task.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_remove};
use crate::catalog::CookBook;
use crate::resources::BrokenSymlinkResource;
use crate::scanner;

/// Remove dangling symlinks under the preference destinations of `books`.
#[derive(Debug)]
pub struct CleanBrokenSymlinks<'a> {
    books: &'a [&'a CookBook],
    force: bool,
}

impl<'a> CleanBrokenSymlinks<'a> {
    /// Task over `books`; `force` also scans specs with `autoclean = false`.
    #[must_use]
    pub const fn new(books: &'a [&'a CookBook], force: bool) -> Self {
        Self { books, force }
    }
}

impl Task for CleanBrokenSymlinks<'_> {
    fn name(&self) -> String {
        "Clean broken symlinks".to_string()
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.books.iter().any(|book| !book.prefs.is_empty())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.progress("Scanning broken symlinks...");
        let specs = scanner::pref_specs(self.books);
        let found = scanner::scan(&specs, Some(ctx.home.as_path()), self.force);
        ctx.log
            .info(&format!("Found {} broken symlinks", found.len()));
        process_remove(ctx, found.into_iter().map(BrokenSymlinkResource::new))
            .finish(ctx, &self.name())
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{PrefOptions, Spec};
    use crate::tasks::test_helpers::make_context;
    use std::fs;
    use std::os::unix::fs::symlink;

    fn setup() -> (tempfile::TempDir, CookBook) {
        let repo = tempfile::tempdir().unwrap();
        let root = repo.path().join("home/.config/app");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("plain"), "x").unwrap();
        symlink(root.join("plain"), root.join("valid")).unwrap();
        symlink(root.join("gone"), root.join("broken")).unwrap();
        let book = CookBook::new("AppCookBook", repo.path().join("vault/app")).with_spec(
            Spec::preference("app", "~/.config/app", PrefOptions::default()),
        );
        (repo, book)
    }

    #[test]
    fn removes_broken_links_only() {
        let (repo, book) = setup();
        let home = repo.path().join("home");
        let (ctx, log) = make_context(repo.path(), &home);
        let books = [&book];
        CleanBrokenSymlinks::new(&books, false).run(&ctx).unwrap();

        let root = home.join(".config/app");
        assert!(root.join("broken").symlink_metadata().is_err());
        assert!(root.join("valid").symlink_metadata().is_ok());
        assert!(root.join("plain").is_file());
        assert!(log.contains_at("PROGRESS", "Scanning broken symlinks..."));
        assert!(log.contains("Found 1 broken symlinks"));
    }

    #[test]
    fn dry_run_reports_without_removing() {
        let (repo, book) = setup();
        let home = repo.path().join("home");
        let (mut ctx, log) = make_context(repo.path(), &home);
        ctx.dry_run = true;
        let books = [&book];
        CleanBrokenSymlinks::new(&books, false).run(&ctx).unwrap();
        assert!(home.join(".config/app/broken").symlink_metadata().is_ok());
        assert!(log.contains_at("DRY", "rm -rf"));
    }
}
