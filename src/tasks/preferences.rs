//! Preference tasks: link/copy into place and unlink.
use anyhow::Result;

use super::helpers::resolve_chains;
use super::{Context, Task, TaskResult, process_apply, process_remove};
use crate::catalog::CookBook;
use crate::resources::PreferenceResource;

/// Install a cookbook's preferences as symlinks or copies.
#[derive(Debug)]
pub struct LinkPreferences<'a> {
    book: &'a CookBook,
}

impl<'a> LinkPreferences<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for LinkPreferences<'_> {
    fn name(&self) -> String {
        format!("{}: link preferences", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.prefs.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let chains = resolve_chains(ctx, self.book, &self.book.prefs);
        process_apply(ctx, chains.iter().map(PreferenceResource::from_chain))
            .finish(ctx, &self.name())
    }
}

/// Remove a cookbook's installed preferences.
#[derive(Debug)]
pub struct UnlinkPreferences<'a> {
    book: &'a CookBook,
}

impl<'a> UnlinkPreferences<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for UnlinkPreferences<'_> {
    fn name(&self) -> String {
        format!("{}: unlink preferences", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.prefs.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let chains = resolve_chains(ctx, self.book, &self.book.prefs);
        process_remove(ctx, chains.iter().map(PreferenceResource::from_chain))
            .finish(ctx, &self.name())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{PrefOptions, Spec};
    use crate::platform::Platform;
    use crate::tasks::test_helpers::make_context;
    use std::fs;

    fn git_repo() -> (tempfile::TempDir, CookBook) {
        let repo = tempfile::tempdir().unwrap();
        let src = repo.path().join("vault/git/default/git/config");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, "[user]\n").unwrap();
        let book = CookBook::new("GitCookBook", repo.path().join("vault/git")).with_spec(
            Spec::preference("git/", "~/.config/git/", PrefOptions::default()),
        );
        (repo, book)
    }

    #[test]
    fn second_link_is_a_noop() {
        let (repo, book) = git_repo();
        let home = repo.path().join("home");
        let (mut ctx, log) = make_context(repo.path(), &home);
        ctx.platform = Platform::Default;
        let task = LinkPreferences::new(&book);
        let dst = home.join(".config/git/config");

        task.run(&ctx).unwrap();
        assert!(dst.symlink_metadata().unwrap().file_type().is_symlink());
        assert!(!log.contains("Symlink already exists"));

        task.run(&ctx).unwrap();
        assert!(log.contains_at(
            "INFO",
            &format!("Symlink already exists: {}", dst.display())
        ));
    }

    #[test]
    fn unlink_round_trip() {
        let (repo, book) = git_repo();
        let home = repo.path().join("home");
        let (ctx, log) = make_context(repo.path(), &home);
        LinkPreferences::new(&book).run(&ctx).unwrap();
        UnlinkPreferences::new(&book).run(&ctx).unwrap();
        let dst = home.join(".config/git/config");
        assert!(dst.symlink_metadata().is_err());

        UnlinkPreferences::new(&book).run(&ctx).unwrap();
        assert!(log.contains(&format!("File already removed: {}", dst.display())));
    }

    #[test]
    fn empty_cookbook_is_not_applicable() {
        let (ctx, _log) = make_context(std::path::Path::new("/repo"), std::path::Path::new("/h"));
        let book = CookBook::new("EmptyCookBook", "/repo/vault/empty");
        assert!(!LinkPreferences::new(&book).should_run(&ctx));
    }
}
