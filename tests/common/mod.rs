// Shared helpers for integration tests.
//
// Provides a temporary repository with a separate fake home directory, a
// recording logger, and a builder for the catalog and vault files, so every
// test runs the engine without touching the real `$HOME`.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use xake_cli::catalog::CookBook;
use xake_cli::config::Config;
use xake_cli::exec::SystemExecutor;
use xake_cli::logging::{Log, TaskStatus};
use xake_cli::platform::Platform;
use xake_cli::render::PlaceholderRenderer;
use xake_cli::resolve::PathFilter;
use xake_cli::tasks::Context;

/// [`Log`] that keeps every `(level, message)` pair and task status.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<(String, TaskStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.entries.lock().unwrap().push((level, msg.to_string()));
    }

    /// Messages logged at `level`, in order.
    pub fn at(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any message at `level` contains `needle`.
    pub fn contains_at(&self, level: &str, needle: &str) -> bool {
        self.at(level).iter().any(|m| m.contains(needle))
    }

    /// Number of tasks recorded as failed.
    pub fn failures(&self) -> usize {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == TaskStatus::Failed)
            .count()
    }

    /// Recorded task names with their status.
    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks.lock().unwrap().clone()
    }
}

impl Log for RecordingLog {
    fn mark(&self, msg: &str) {
        self.push("MARK", msg);
    }
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn trace(&self, msg: &str) {
        self.push("TRACE", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("DRY", msg);
    }
    fn progress(&self, msg: &str) {
        self.push("PROGRESS", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.tasks.lock().unwrap().push((name.to_string(), status));
    }
}

/// An isolated repository (`<tmp>/repo`) and home (`<tmp>/home`).
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create an empty repository with a `conf/` directory and an empty home.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("repo/conf")).expect("create conf dir");
        fs::create_dir_all(dir.path().join("home")).expect("create home dir");
        Self { dir }
    }

    /// Repository root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    /// Fake home directory.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Path under the fake home.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home().join(rel)
    }

    /// Write `conf/cookbooks.toml`.
    pub fn with_catalog(self, toml: &str) -> Self {
        fs::write(self.root().join("conf/cookbooks.toml"), toml).expect("write catalog");
        self
    }

    /// Write a file under the repository root, creating parents.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.root().join(rel), content);
        self
    }

    /// Write a file under the fake home, creating parents.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.home_path(rel), content);
        self
    }

    /// Load the catalog with `~` bound to the fake home.
    pub fn config(&self) -> Config {
        Config::load(&self.root(), Some(&self.home())).expect("load config")
    }

    /// Execution context bound to the fake home.
    pub fn context(&self, platform: Platform, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context {
            root: self.root(),
            platform,
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            home: self.home(),
            executor: Arc::new(SystemExecutor),
            renderer: Arc::new(PlaceholderRenderer),
            filter: PathFilter::default(),
        };
        (ctx, log)
    }
}

/// Cookbooks of `config` applicable on `platform`.
pub fn books(config: &Config, platform: Platform) -> Vec<&CookBook> {
    config.registry.for_platform(platform)
}

/// Read a file to a string.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
}
