//! Template tasks: forge once, recall on uninstall.
use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;

use super::helpers::resolve_chains;
use super::{Context, Task, TaskResult, process_apply, process_remove};
use crate::catalog::{CookBook, SpecKind};
use crate::resources::TemplateResource;

fn resources(ctx: &Context, book: &CookBook) -> Vec<TemplateResource> {
    resolve_chains(ctx, book, &book.tmpls)
        .into_iter()
        .map(|chain| {
            let values = match chain.kind {
                SpecKind::Template(options) => options.values,
                SpecKind::Preference(_) | SpecKind::Snippet => BTreeMap::new(),
            };
            TemplateResource::new(chain.src, chain.dst, values, Arc::clone(&ctx.renderer))
        })
        .collect()
}

/// Render a cookbook's templates where no output exists yet.
#[derive(Debug)]
pub struct ForgeTemplates<'a> {
    book: &'a CookBook,
}

impl<'a> ForgeTemplates<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for ForgeTemplates<'_> {
    fn name(&self) -> String {
        format!("{}: forge templates", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.tmpls.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_apply(ctx, resources(ctx, self.book)).finish(ctx, &self.name())
    }
}

/// Remove a cookbook's rendered templates.
#[derive(Debug)]
pub struct RecallTemplates<'a> {
    book: &'a CookBook,
}

impl<'a> RecallTemplates<'a> {
    /// Task for `book`.
    #[must_use]
    pub const fn new(book: &'a CookBook) -> Self {
        Self { book }
    }
}

impl Task for RecallTemplates<'_> {
    fn name(&self) -> String {
        format!("{}: recall templates", self.book.name)
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.book.tmpls.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_remove(ctx, resources(ctx, self.book)).finish(ctx, &self.name())
    }
}
