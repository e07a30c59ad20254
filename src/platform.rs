//! Platform identification and overlay directory naming.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::exec::{CallOpts, Executor};

/// Platform a cookbook can target.
///
/// Displayed (and named in the catalog and on the vault filesystem) as
/// `darwin`, `linux` or `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS.
    Darwin,
    /// Any Linux distribution.
    Linux,
    /// Generic fallback when the system could not be identified.
    Default,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(Self::Darwin),
            "linux" | "ubuntu" => Ok(Self::Linux),
            "default" => Ok(Self::Default),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

impl Platform {
    /// Directory name used for this platform inside a container.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Default => "default",
        }
    }

    /// Overlay directories to search, highest precedence first.
    ///
    /// ```
    /// use xake_cli::platform::Platform;
    ///
    /// assert_eq!(Platform::Darwin.overlay_dirs(), ["darwin", "default"]);
    /// assert_eq!(Platform::Default.overlay_dirs(), ["default"]);
    /// ```
    #[must_use]
    pub fn overlay_dirs(self) -> Vec<&'static str> {
        match self {
            Self::Default => vec![Self::Default.as_str()],
            other => vec![other.as_str(), Self::Default.as_str()],
        }
    }

    /// Classify the output of `uname -a`.
    #[must_use]
    pub fn from_uname(uname: &str) -> Self {
        let uname = uname.to_ascii_lowercase();
        if uname.contains("darwin") {
            Self::Darwin
        } else if uname.contains("linux") {
            Self::Linux
        } else {
            Self::Default
        }
    }

    /// Identify the running platform by asking `uname -a`.
    ///
    /// Any failure to run the command yields [`Platform::Default`].
    #[must_use]
    pub fn identify(executor: &dyn Executor) -> Self {
        executor
            .capture("uname", &["-a"], &CallOpts::default())
            .ok()
            .filter(|r| r.success)
            .map_or(Self::Default, |r| Self::from_uname(&r.stdout))
    }
}
