//! Console and file logger with dry-run awareness and summary collection.
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::{log_file_path, terminal_columns};

/// Implement the single-message methods of [`Log`] by delegating to inherent
/// methods of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are also written to `$XDG_CACHE_HOME/xake/<command>.log`
/// (default `~/.cache/xake/<command>.log`) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
    ansi: bool,
    /// Whether a progress line is currently displayed.
    ///
    /// The progress line is truncated to a single terminal row so clearing it
    /// never needs cursor-up movement.
    progress_shown: Mutex<bool>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// The log file itself is opened by
    /// [`init_subscriber`](super::subscriber::init_subscriber); this only
    /// remembers its path for the summary.
    #[must_use]
    pub fn new(command: &str, ansi: bool) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
            ansi,
            progress_shown: Mutex::new(false),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded task entries (test-only).
    #[cfg(test)]
    pub(crate) fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    #[cfg(test)]
    pub(crate) fn progress_is_shown(&self) -> bool {
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        self.clear_progress();
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.clear_progress();
        tracing::warn!("{msg}");
    }

    /// Log a section marker.
    pub fn mark(&self, msg: &str) {
        self.clear_progress();
        tracing::info!(target: "xake::mark", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        self.clear_progress();
        tracing::info!("{msg}");
    }

    /// Log the shell equivalent of a mutation.
    pub fn trace(&self, msg: &str) {
        self.clear_progress();
        tracing::info!(target: "xake::trace", "{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        self.clear_progress();
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        self.clear_progress();
        tracing::info!(target: "xake::dry_run", "{msg}");
    }

    /// Show a transient progress line.
    ///
    /// Without ANSI support the line cannot be erased, so it is printed as a
    /// regular info line instead.
    pub fn progress(&self, msg: &str) {
        if !self.ansi {
            self.info(msg);
            return;
        }
        self.clear_progress();
        tracing::info!(target: "xake::progress", "{msg}");
        self.draw_progress(msg);
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded tasks.
    ///
    /// Tasks that had nothing to do are only counted, not listed.
    pub fn print_summary(&self) {
        let tasks = match self.tasks.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if tasks.is_empty() {
            return;
        }

        self.mark("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    continue;
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + not_applicable + skipped + dry_run + failed;
        self.info(&format!(
            "{total} tasks: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }

    /// Erase the progress line from the console. No-op if none is shown.
    fn clear_progress(&self) {
        let mut guard = self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *guard {
            print!("\r\x1b[K");
            std::io::stdout().flush().ok();
            *guard = false;
        }
    }

    /// Print a progress line truncated to one terminal row.
    fn draw_progress(&self, msg: &str) {
        let cols = terminal_columns();
        let prefix_width = "[INFO ] ".len();
        let max_chars = cols.saturating_sub(prefix_width);
        let display = if msg.chars().count() > max_chars {
            let truncated: String = msg.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{truncated}…")
        } else {
            msg.to_string()
        };
        print!("\x1b[36m[INFO ]\x1b[0m {display}");
        std::io::stdout().flush().ok();
        let mut guard = self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = true;
    }
}

impl Log for Logger {
    forward_log_methods!(mark, info, trace, debug, warn, error, dry_run, progress);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
