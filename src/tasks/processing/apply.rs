//! Single-resource processing: check state, then apply or remove one
//! resource.

use anyhow::Result;

use super::TaskStats;
use crate::resources::{Applicable, Decision, Removable, Resource, ResourceChange};
use crate::tasks::context::Context;

/// Apply one resource, returning a stats delta.
pub(super) fn apply_single<R: Applicable>(ctx: &Context, resource: &R) -> TaskStats {
    process_single(
        ctx,
        resource,
        resource.check_apply(),
        &resource.apply_command(),
        || resource.apply(),
    )
}

/// Remove one resource, returning a stats delta.
pub(super) fn remove_single<R: Removable>(ctx: &Context, resource: &R) -> TaskStats {
    process_single(
        ctx,
        resource,
        resource.check_remove(),
        &resource.remove_command(),
        || resource.remove(),
    )
}

fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    decision: Result<Decision>,
    command: &str,
    perform: impl FnOnce() -> Result<ResourceChange>,
) -> TaskStats {
    let mut delta = TaskStats::new();
    let decision = match decision {
        Ok(decision) => decision,
        Err(e) => {
            ctx.log
                .error(&format!("{}: {e:#}", resource.description()));
            delta.failed += 1;
            return delta;
        }
    };
    match decision {
        Decision::Satisfied { reason } => {
            ctx.log.info(&reason);
            delta.already_ok += 1;
        }
        Decision::Conflict { reason } => {
            ctx.log.info(&reason);
            delta.conflicts += 1;
        }
        Decision::Unavailable { reason } => {
            ctx.log.info(&reason);
            delta.skipped += 1;
        }
        Decision::Act if ctx.dry_run => {
            ctx.log.dry_run(command);
            delta.changed += 1;
        }
        Decision::Act => {
            ctx.log.trace(command);
            match perform() {
                Ok(ResourceChange::Applied) => delta.changed += 1,
                Ok(ResourceChange::AlreadyCorrect) => delta.already_ok += 1,
                Ok(ResourceChange::Skipped { reason }) => {
                    ctx.log.info(&reason);
                    delta.skipped += 1;
                }
                Err(e) => {
                    ctx.log
                        .error(&format!("{}: {e:#}", resource.description()));
                    delta.failed += 1;
                }
            }
        }
    }
    delta
}
