//! Snippet tasks: enable and disable text blocks in existing files.
use anyhow::Result;

use super::helpers::resolve_chains;
use super::{Context, Task, TaskResult, process_apply, process_remove};
use crate::catalog::CookBook;
use crate::resources::SnippetResource;

fn resources(ctx: &Context, book: &CookBook) -> Vec<SnippetResource> {
    resolve_chains(ctx, book, &book.snips)
        .into_iter()
        .map(|chain| SnippetResource::new(chain.src, chain.dst))
        .collect()
}

/// Append a cookbook's snippets to their target files.
#[derive(Debug)]
pub struct EnableSnippets<'a> {
    book: &'a CookBook,
}

impl<'a> EnableSnippets<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for EnableSnippets<'_> {
    fn name(&self) -> String {
        format!("{}: enable snippets", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.snips.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_apply(ctx, resources(ctx, self.book)).finish(ctx, &self.name())
    }
}

/// Strip a cookbook's snippets from their target files.
#[derive(Debug)]
pub struct DisableSnippets<'a> {
    book: &'a CookBook,
}

impl<'a> DisableSnippets<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for DisableSnippets<'_> {
    fn name(&self) -> String {
        format!("{}: disable snippets", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.snips.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_remove(ctx, resources(ctx, self.book)).finish(ctx, &self.name())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Spec;
    use crate::tasks::test_helpers::make_context;
    use std::fs;

    #[test]
    fn dry_run_leaves_target_untouched() {
        let repo = tempfile::tempdir().unwrap();
        let src = repo.path().join("vault/asdf/default/zshrc.snip");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, ". ~/.asdf/asdf.sh\n").unwrap();
        let home = repo.path().join("home");
        let book = CookBook::new("AsdfCookBook", repo.path().join("vault/asdf"))
            .with_spec(Spec::snippet("zshrc.snip", "~/.zshrc"));

        let (mut ctx, log) = make_context(repo.path(), &home);
        ctx.dry_run = true;
        EnableSnippets::new(&book).run(&ctx).unwrap();
        assert!(!home.join(".zshrc").exists());
        assert!(log.contains_at("DRY", "Enable snippet"));

        ctx.dry_run = false;
        EnableSnippets::new(&book).run(&ctx).unwrap();
        assert_eq!(
            fs::read_to_string(home.join(".zshrc")).unwrap(),
            ". ~/.asdf/asdf.sh\n"
        );
        DisableSnippets::new(&book).run(&ctx).unwrap();
        assert_eq!(fs::read_to_string(home.join(".zshrc")).unwrap(), "\n");
    }
}
