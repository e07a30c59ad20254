//! Execution context shared by every task.
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::catalog::HookContext;
use crate::exec::Executor;
use crate::logging::Log;
use crate::path;
use crate::platform::Platform;
use crate::render::Renderer;
use crate::resolve::PathFilter;

/// Shared context for task execution.
pub struct Context {
    /// Repository root.
    pub root: PathBuf,
    /// Platform whose overlays are installed.
    pub platform: Platform,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (inspect, log, never mutate).
    pub dry_run: bool,
    /// Home directory substituted for `~`.
    pub home: PathBuf,
    /// Command executor for hooks.
    pub executor: Arc<dyn Executor>,
    /// Template renderer.
    pub renderer: Arc<dyn Renderer>,
    /// Source paths never installed.
    pub filter: PathFilter,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .field("renderer", &"<dyn Renderer>")
            .field("filter", &self.filter)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution with the default ignore
    /// list.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `HOME` nor `USERPROFILE` is set.
    pub fn new(
        root: PathBuf,
        platform: Platform,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self> {
        let home = path::home_dir()
            .ok_or_else(|| anyhow::anyhow!("HOME environment variable is not set"))?;
        Ok(Self {
            root,
            platform,
            log,
            dry_run,
            home,
            executor,
            renderer,
            filter: PathFilter::default(),
        })
    }

    /// Capabilities handed to cookbook hooks.
    #[must_use]
    pub fn hook_context(&self) -> HookContext {
        HookContext {
            executor: Arc::clone(&self.executor),
            log: Arc::clone(&self.log),
            dry_run: self.dry_run,
            home: self.home.clone(),
        }
    }
}
