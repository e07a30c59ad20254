//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`HookError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! Expected absence and conflicts are never errors; they are reported as
//! outcomes by the action engine.
//!
//! # Error hierarchy
//!
//! ```text
//! XakeError
//! ├── Config(ConfigError)     : catalog parsing and validation
//! ├── Task(TaskError)         : task execution, lifecycle hook failures
//! ├── Hook(HookError)         : individual hook step failures
//! └── Template(TemplateError) : template rendering
//! ```
//!
//! Filesystem resource failures live in
//! [`resources::error`](crate::resources::error).

use thiserror::Error;

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum XakeError {
    /// Catalog loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution error.
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),

    /// Lifecycle hook step error.
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Errors that arise while loading the cookbook catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The catalog file could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Two cookbooks share a name.
    #[error("Duplicate cookbook '{0}'")]
    DuplicateCookBook(String),

    /// A spec entry is structurally invalid (e.g. both `dst` and `glob`).
    #[error("Invalid entry in cookbook '{cookbook}': {message}")]
    InvalidEntry {
        /// Name of the cookbook owning the entry.
        cookbook: String,
        /// What is wrong with it.
        message: String,
    },

    /// A destination glob pattern does not compile.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Pattern compiler message.
        message: String,
    },

    /// A resolved chain endpoint is not absolute.
    #[error("Path is not absolute: {0}")]
    RelativePath(String),
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// One or more operations inside a task failed.
    #[error("Task '{task}' failed: {reason}")]
    ExecutionFailed {
        /// Name of the task that failed.
        task: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A lifecycle hook failed; the run is aborted.
    #[error("{hook} hook of '{cookbook}' failed: {reason}")]
    HookFailed {
        /// Cookbook owning the hook.
        cookbook: String,
        /// Hook slot (`setup`, `activate` or `deactivate`).
        hook: String,
        /// Underlying failure.
        reason: String,
    },
}

/// Errors raised by individual hook steps.
#[derive(Error, Debug)]
pub enum HookError {
    /// A `run` step exited unsuccessfully.
    #[error("command '{program}' failed (exit {})", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Program that was run.
        program: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// A step declared no program to run.
    #[error("empty command in hook step")]
    EmptyCommand,
}

/// Errors raised by the template renderer.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A placeholder references a key absent from the value map.
    #[error("unknown template key '{0}'")]
    UnknownKey(String),

    /// A `{{` opener has no matching `}}`.
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: "/repo/conf/cookbooks.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/repo/conf/cookbooks.toml"));
        assert!(e.to_string().contains("IO error reading config file"));
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: "cookbooks.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn config_error_invalid_entry_display() {
        let e = ConfigError::InvalidEntry {
            cookbook: "IntelliJCookBook".to_string(),
            message: "exactly one of `dst` or `glob` is required".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid entry in cookbook 'IntelliJCookBook': exactly one of `dst` or `glob` is required"
        );
    }

    #[test]
    fn task_error_hook_failed_display() {
        let e = TaskError::HookFailed {
            cookbook: "RustCookBook".to_string(),
            hook: "activate".to_string(),
            reason: "command 'rustup' failed (exit 1)".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "activate hook of 'RustCookBook' failed: command 'rustup' failed (exit 1)"
        );
    }

    #[test]
    fn hook_error_signal_display() {
        let e = HookError::CommandFailed {
            program: "curl".to_string(),
            code: None,
        };
        assert_eq!(e.to_string(), "command 'curl' failed (exit signal)");
    }

    #[test]
    fn template_error_display() {
        assert_eq!(
            TemplateError::UnknownKey("cache".to_string()).to_string(),
            "unknown template key 'cache'"
        );
    }

    #[test]
    fn xake_error_wraps_sub_errors() {
        let e: XakeError = ConfigError::DuplicateCookBook("GitCookBook".to_string()).into();
        assert!(e.to_string().contains("Configuration error"));
        assert!(e.to_string().contains("GitCookBook"));
        let e: XakeError = TemplateError::Unterminated(3).into();
        assert!(e.to_string().contains("Template error"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<XakeError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<TaskError>();
        assert_send_sync::<HookError>();
        assert_send_sync::<TemplateError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _a: anyhow::Error = TaskError::ExecutionFailed {
            task: "link preferences".to_string(),
            reason: "2 operation(s) failed".to_string(),
        }
        .into();
        let _b: anyhow::Error = HookError::EmptyCommand.into();
    }
}
