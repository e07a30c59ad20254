//! Cookbook lifecycle hooks.
//!
//! Hooks are opaque to the engine: it only invokes them in order and lets
//! their failures abort the run. [`StepHook`] is the declarative
//! implementation built from the catalog file.
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::error::HookError;
use crate::exec::{CallOpts, Executor};
use crate::logging::Log;
use crate::path::PathValue;
use crate::resources::helpers::fs::{create_dir_all, create_symlink, ensure_parent_dir};

/// Capabilities handed to a running hook.
#[derive(Clone)]
pub struct HookContext {
    /// Process runner.
    pub executor: Arc<dyn Executor>,
    /// Log sink.
    pub log: Arc<dyn Log>,
    /// Log instead of mutating.
    pub dry_run: bool,
    /// Home directory used to expand `~`.
    pub home: PathBuf,
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("executor", &"<dyn Executor>")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .finish()
    }
}

impl HookContext {
    fn expand(&self, path: &PathValue) -> PathValue {
        path.expand_home_with(Some(&self.home)).to_absolute()
    }
}

/// A side-effecting lifecycle callback.
#[cfg_attr(test, mockall::automock)]
pub trait Hook: Send + Sync {
    /// Run the hook.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining run.
    fn run(&self, ctx: &HookContext) -> Result<()>;
}

/// The lifecycle slots a cookbook can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSlot {
    /// Before the cookbook's preferences are installed.
    Setup,
    /// After everything in the cookbook is installed.
    Activate,
    /// Before anything in the cookbook is uninstalled.
    Deactivate,
}

impl fmt::Display for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        })
    }
}

/// One declarative hook step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStep {
    /// Run a program.
    Run {
        /// Program followed by its arguments.
        argv: Vec<String>,
        /// Working directory.
        cwd: Option<PathValue>,
        /// Extra environment.
        env: BTreeMap<String, String>,
        /// Binary that must be on `PATH`, otherwise the step is skipped.
        requires: Option<String>,
    },
    /// Create a directory tree.
    Mkdir {
        /// Directory to create.
        path: PathValue,
        /// Permission bits for new directories.
        mode: Option<u32>,
    },
    /// Create an empty file if absent.
    Touch {
        /// File to create.
        path: PathValue,
    },
    /// Create a symlink if absent.
    Symlink {
        /// Link location.
        link: PathValue,
        /// What the link points to.
        target: PathValue,
    },
}

impl HookStep {
    fn run(&self, ctx: &HookContext) -> Result<()> {
        match self {
            Self::Run {
                argv,
                cwd,
                env,
                requires,
            } => {
                let (program, args) = argv.split_first().ok_or(HookError::EmptyCommand)?;
                if let Some(binary) = requires
                    && !ctx.executor.which(binary)
                {
                    ctx.log
                        .warn(&format!("Command not found, step skipped: {binary}"));
                    return Ok(());
                }
                let line = argv.join(" ");
                if ctx.dry_run {
                    ctx.log.dry_run(&line);
                    return Ok(());
                }
                ctx.log.trace(&line);
                let opts = CallOpts {
                    cwd: cwd.as_ref().map(|dir| ctx.expand(dir).into_path_buf()),
                    env: env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                };
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let result = ctx.executor.call(program, &args, &opts)?;
                if !result.success {
                    return Err(HookError::CommandFailed {
                        program: program.clone(),
                        code: result.code,
                    }
                    .into());
                }
                Ok(())
            }
            Self::Mkdir { path, mode } => {
                let path = ctx.expand(path);
                if path.lstat().is_dir() {
                    ctx.log
                        .debug(&format!("Directory already exists: {path}"));
                    return Ok(());
                }
                let mode = mode.unwrap_or(0o755);
                let line = format!("mkdir -p -m {mode:o} {path}");
                if ctx.dry_run {
                    ctx.log.dry_run(&line);
                    return Ok(());
                }
                ctx.log.trace(&line);
                create_dir_all(path.as_path(), mode)
            }
            Self::Touch { path } => {
                let path = ctx.expand(path);
                if path.lstat().exists() {
                    ctx.log.debug(&format!("File already exists: {path}"));
                    return Ok(());
                }
                if ctx.dry_run {
                    ctx.log.dry_run(&format!("touch {path}"));
                    return Ok(());
                }
                ctx.log.trace(&format!("touch {path}"));
                ensure_parent_dir(path.as_path())?;
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path.as_path())
                    .with_context(|| format!("touch {path}"))?;
                Ok(())
            }
            Self::Symlink { link, target } => {
                let link = ctx.expand(link);
                let target = ctx.expand(target);
                if link.lstat().exists() {
                    ctx.log.info(&format!("Symlink already exists: {link}"));
                    return Ok(());
                }
                let line = format!("ln -s {target} {link}");
                if ctx.dry_run {
                    ctx.log.dry_run(&line);
                    return Ok(());
                }
                ctx.log.trace(&line);
                ensure_parent_dir(link.as_path())?;
                create_symlink(target.as_path(), link.as_path())
            }
        }
    }
}

/// Hook that runs its steps in order, stopping at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepHook {
    steps: Vec<HookStep>,
}

impl StepHook {
    /// Wrap a step list.
    #[must_use]
    pub const fn new(steps: Vec<HookStep>) -> Self {
        Self { steps }
    }
}

impl Hook for StepHook {
    fn run(&self, ctx: &HookContext) -> Result<()> {
        for step in &self.steps {
            step.run(ctx)?;
        }
        Ok(())
    }
}
