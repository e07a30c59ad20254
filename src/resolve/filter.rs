//! Ignore list for editor backups and VCS placeholder files.
use glob::Pattern;

use crate::path::PathValue;

/// File-name patterns never installed.
pub const DEFAULT_BLACKLIST: &[&str] = &["*.swp", "*.bak", ".DS_Store", ".keep", ".gitkeep"];

/// Matches source paths by file name against a pattern list.
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<Pattern>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_BLACKLIST)
    }
}

impl PathFilter {
    /// Build a filter; patterns that do not compile are dropped.
    #[must_use]
    pub fn from_patterns(patterns: &[&str]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    /// Whether `path`'s file name matches any pattern.
    #[must_use]
    pub fn is_ignored(&self, path: &PathValue) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.patterns.iter().any(|p| p.matches(name))
    }
}
