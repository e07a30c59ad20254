//! Top-level subcommand orchestration.
pub mod cleanup;
pub mod completion;
pub mod link;
pub mod list;
pub mod unlink;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::catalog::CookBook;
use crate::cli::{GlobalOpts, VERSION};
use crate::config::{CATALOG_FILE, Config};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::path;
use crate::platform::Platform;
use crate::render::PlaceholderRenderer;
use crate::tasks::Context;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected or overridden platform.
    pub platform: Platform,
    /// Loaded catalog.
    pub config: Config,
}

impl CommandSetup {
    /// Identify the platform and load the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined or the
    /// catalog fails to load.
    pub fn init(global: &GlobalOpts, executor: &dyn Executor, log: &dyn Log) -> Result<Self> {
        log.debug(&format!("xake {VERSION}"));
        let platform = global
            .platform
            .unwrap_or_else(|| Platform::identify(executor));
        log.debug(&format!("platform: {platform}"));

        let root = resolve_root(global)?;
        log.debug(&format!("root: {}", root.display()));

        let home = path::home_dir();
        let config = Config::load(&root, home.as_deref())
            .with_context(|| format!("loading {}", root.join(CATALOG_FILE).display()))?;
        log.debug(&format!("{} cookbooks", config.registry.len()));

        Ok(Self { platform, config })
    }
}

/// Setup plus execution context for commands that run tasks.
#[derive(Debug)]
pub struct CommandRunner {
    setup: CommandSetup,
    ctx: Context,
    log: Arc<Logger>,
}

impl CommandRunner {
    /// Build the setup and a [`Context`] backed by the system executor and
    /// the placeholder renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if setup fails or the home directory is unknown.
    pub fn new(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
        let setup = CommandSetup::init(global, executor.as_ref(), log.as_ref())?;
        let ctx = Context::new(
            setup.config.root.clone(),
            setup.platform,
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            executor,
            Arc::new(PlaceholderRenderer),
        )?;
        Ok(Self {
            setup,
            ctx,
            log: Arc::clone(log),
        })
    }

    /// Cookbooks applicable on the current platform, in catalog order.
    #[must_use]
    pub fn cookbooks(&self) -> Vec<&CookBook> {
        self.setup.config.registry.for_platform(self.setup.platform)
    }

    /// Execution context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.ctx
    }

    /// Print the summary, then surface a fatal error or recorded failures.
    ///
    /// # Errors
    ///
    /// Returns `outcome`'s error, or an error if any task failed.
    pub fn finish(&self, outcome: Result<()>) -> Result<()> {
        self.log.print_summary();
        outcome?;
        let count = self.log.failure_count();
        if count > 0 {
            anyhow::bail!("{count} task(s) failed");
        }
        Ok(())
    }
}

/// Log the banner that opens a cookbook's pass.
pub(crate) fn launch_banner(ctx: &Context, book: &CookBook, index: usize, total: usize) {
    ctx.log
        .mark(&format!("{} Launched ({:02}/{:02})", book.name, index + 1, total));
}

/// Resolve the repository root from CLI arguments or auto-detection.
///
/// Order: `--root`, `XAKE_ROOT`, an ancestor of the binary containing the
/// catalog, then the current directory.
///
/// # Errors
///
/// Returns an error if no candidate holds the catalog.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("XAKE_ROOT") {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(root) = exe.ancestors().skip(1).find(|dir| is_repo_root(dir))
    {
        return Ok(dunce::canonicalize(root)?);
    }

    let cwd = std::env::current_dir()?;
    if is_repo_root(&cwd) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine repository root. Use --root or set XAKE_ROOT");
}

fn is_repo_root(dir: &Path) -> bool {
    dir.join(CATALOG_FILE).is_file()
}
