//! Destination glob expansion for specs whose targets are only known by
//! pattern (e.g. versioned IDE configuration directories).
use std::path::Path;

use crate::catalog::Spec;
use crate::error::ConfigError;
use crate::path::PathValue;

/// Live filesystem matches for `pattern` after `~` expansion, in the order
/// the `glob` crate yields them (alphabetical). Unreadable entries are
/// dropped.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidGlob`] if the pattern does not compile.
pub fn matches(pattern: &str, home: Option<&Path>) -> Result<Vec<PathValue>, ConfigError> {
    let expanded = PathValue::new(pattern).expand_home_with(home);
    let expanded = expanded.as_path().to_string_lossy();
    let paths = glob::glob(&expanded).map_err(|e| ConfigError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(paths.filter_map(Result::ok).map(PathValue::new).collect())
}

/// One spec per match of `pattern`, each with the match as destination.
///
/// Zero matches is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidGlob`] if the pattern does not compile.
pub fn expand(template: &Spec, pattern: &str, home: Option<&Path>) -> Result<Vec<Spec>, ConfigError> {
    Ok(matches(pattern, home)?
        .into_iter()
        .map(|dst| template.rebind(template.src.clone(), dst))
        .collect())
}

/// One spec per (match, child) pair: source `src/child`, destination
/// `match/child`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidGlob`] if the pattern does not compile.
pub fn expand_children(
    template: &Spec,
    pattern: &str,
    children: &[String],
    home: Option<&Path>,
) -> Result<Vec<Spec>, ConfigError> {
    let found = matches(pattern, home)?;
    Ok(found
        .iter()
        .flat_map(|dst| {
            children
                .iter()
                .map(move |child| template.rebind(template.src.join(child), dst.join(child)))
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::PrefOptions;
    use std::fs;

    fn ide_home() -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        for version in ["IntelliJIdea2023.2", "IntelliJIdea2023.3", "PyCharm2023.3"] {
            fs::create_dir_all(home.path().join("Library/Preferences").join(version)).unwrap();
        }
        home
    }

    fn template() -> Spec {
        Spec::preference(
            "ide",
            "unused",
            PrefOptions {
                autoclean: false,
                ..PrefOptions::default()
            },
        )
    }

    #[test]
    fn expands_one_spec_per_match() {
        let home = ide_home();
        let specs = expand(
            &template(),
            "~/Library/Preferences/IntelliJIdea*",
            Some(home.path()),
        )
        .unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(
            specs[0].dst,
            PathValue::new(home.path().join("Library/Preferences/IntelliJIdea2023.2"))
        );
        assert!(specs.iter().all(|s| s.kind == template().kind));
    }

    #[test]
    fn children_fan_out_per_match() {
        let home = ide_home();
        let children = vec!["colors".to_string(), "keymaps".to_string()];
        let specs = expand_children(
            &template(),
            "~/Library/Preferences/IntelliJIdea*",
            &children,
            Some(home.path()),
        )
        .unwrap();
        let pairs: Vec<(String, String)> = specs
            .iter()
            .map(|s| {
                (
                    s.src.to_string(),
                    s.dst.file_name().unwrap().to_string_lossy().to_string(),
                )
            })
            .collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ("ide/colors".to_string(), "colors".to_string()));
        assert_eq!(pairs[1], ("ide/keymaps".to_string(), "keymaps".to_string()));
    }

    #[test]
    fn zero_matches_is_not_an_error() {
        let home = tempfile::tempdir().unwrap();
        let specs = expand(&template(), "~/Library/Preferences/AndroidStudio*", Some(home.path()))
            .unwrap();
        assert!(specs.is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = expand(&template(), "/tmp/[unclosed", None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }
}
