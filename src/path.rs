//! Immutable path values with home expansion and best-effort stat.
//!
//! Every transform on [`PathValue`] returns a new value; paths are lexically
//! normalized on construction (`.` segments and trailing separators are
//! dropped, `a/../b` collapses to `b`).
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Outcome of a best-effort stat.
///
/// Any OS error (not found, permission denied, dangling link for a following
/// stat, ...) maps to [`Stat::Absent`].
#[derive(Debug, Clone)]
pub enum Stat {
    /// The path resolved to an entry with this metadata.
    Found(Metadata),
    /// The path could not be inspected.
    Absent,
}

impl From<io::Result<Metadata>> for Stat {
    fn from(result: io::Result<Metadata>) -> Self {
        result.map_or(Self::Absent, Self::Found)
    }
}

impl Stat {
    /// Whether the entry exists.
    #[must_use]
    pub const fn exists(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Whether the entry is a symlink (only meaningful for `lstat`).
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Found(m) if m.file_type().is_symlink())
    }

    /// Whether the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::Found(m) if m.file_type().is_file())
    }

    /// Whether the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Found(m) if m.file_type().is_dir())
    }
}

/// An immutable filesystem path.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use xake_cli::path::PathValue;
///
/// let dst = PathValue::new("~/.config/git/");
/// let home = Path::new("/home/me");
/// assert_eq!(
///     dst.expand_home_with(Some(home)).join("config"),
///     PathValue::new("/home/me/.config/git/config"),
/// );
/// assert!(!dst.is_absolute());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathValue(PathBuf);

impl PathValue {
    /// Create a normalized path value.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize(path.as_ref()))
    }

    /// Borrow the underlying path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consume into a [`PathBuf`].
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Pure string predicate; does not touch the filesystem.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.0.is_absolute()
    }

    /// Whether the first component is a bare `~`.
    #[must_use]
    pub fn is_home_relative(&self) -> bool {
        matches!(self.0.components().next(), Some(Component::Normal(first)) if first == "~")
    }

    /// Join `other` onto this path. An absolute `other` replaces it.
    #[must_use]
    pub fn join(&self, other: impl AsRef<Path>) -> Self {
        Self::new(self.0.join(other))
    }

    /// Parent directory, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Self::new)
    }

    /// Final component.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.0.file_name()
    }

    /// Replace a leading `~` component with the current user's home.
    ///
    /// The home directory is read from the environment at call time; when it
    /// is unavailable the value is returned unchanged.
    #[must_use]
    pub fn expand_home(&self) -> Self {
        self.expand_home_with(home_dir().as_deref())
    }

    /// Replace a leading `~` component with `home`.
    ///
    /// `~user` forms are left alone.
    #[must_use]
    pub fn expand_home_with(&self, home: Option<&Path>) -> Self {
        let Some(home) = home else {
            return self.clone();
        };
        let mut components = self.0.components();
        match components.next() {
            Some(Component::Normal(first)) if first == "~" => {
                Self::new(home.join(components.as_path()))
            }
            _ => self.clone(),
        }
    }

    /// Resolve against the current working directory.
    ///
    /// Symlinks are not resolved. If the working directory cannot be read
    /// the value is returned unchanged.
    #[must_use]
    pub fn to_absolute(&self) -> Self {
        if self.is_absolute() {
            return self.clone();
        }
        std::path::absolute(&self.0).map_or_else(|_| self.clone(), Self::new)
    }

    /// The relative path leading from `base` to `self`.
    ///
    /// Returns `None` when exactly one of the two paths is absolute.
    #[must_use]
    pub fn relative_to(&self, base: &Self) -> Option<Self> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        let ours: Vec<Component<'_>> = self.0.components().collect();
        let theirs: Vec<Component<'_>> = base.0.components().collect();
        let common = ours
            .iter()
            .zip(&theirs)
            .take_while(|(a, b)| a == b)
            .count();

        let mut rel = PathBuf::new();
        for _ in common..theirs.len() {
            rel.push("..");
        }
        for component in ours.iter().skip(common) {
            rel.push(component.as_os_str());
        }
        Some(Self::new(rel))
    }

    /// Stat without following a final symlink.
    #[must_use]
    pub fn lstat(&self) -> Stat {
        fs::symlink_metadata(&self.0).into()
    }

    /// Stat following symlinks; a dangling link is [`Stat::Absent`].
    #[must_use]
    pub fn stat(&self) -> Stat {
        fs::metadata(&self.0).into()
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for PathValue {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for PathValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PathValue {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for PathValue {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for PathValue {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// The current user's home directory from `HOME` (or `USERPROFILE`).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .or_else(|| std::env::var_os("USERPROFILE").filter(|h| !h.is_empty()))
        .map(PathBuf::from)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                out.pop();
                depth -= 1;
            }
            Component::ParentDir if out.has_root() => {}
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
