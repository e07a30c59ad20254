//! Platform overlay resolution: which source roots a spec is searched in.
use std::path::Path;

use crate::catalog::{Layout, Spec};
use crate::path::PathValue;
use crate::platform::Platform;

/// One place to look for a spec's source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchContext {
    /// Joined before the spec's source.
    pub prefix: Option<PathValue>,
    /// Joined after the spec's source.
    pub suffix: Option<PathValue>,
}

impl SearchContext {
    /// Context for absolute sources: no prefix, no suffix.
    #[must_use]
    pub const fn bare() -> Self {
        Self {
            prefix: None,
            suffix: None,
        }
    }

    /// Absolute source root for `spec` in this context.
    #[must_use]
    pub fn source_root(&self, spec: &Spec, home: Option<&Path>) -> PathValue {
        let src = spec.src.expand_home_with(home);
        let root = match &self.prefix {
            Some(prefix) => prefix.join(&src),
            None => src,
        };
        let root = match &self.suffix {
            Some(suffix) => root.join(suffix),
            None => root,
        };
        root.to_absolute()
    }
}

/// Ordered search contexts for `spec`, highest precedence first.
///
/// Absolute (or `~`-relative) sources ignore the platform. Otherwise the
/// platform directory comes before `default` under either layout.
#[must_use]
pub fn contexts(spec: &Spec, container: &PathValue, platform: Platform) -> Vec<SearchContext> {
    if spec.src.is_absolute() || spec.src.is_home_relative() {
        return vec![SearchContext::bare()];
    }
    let dirs = platform.overlay_dirs();
    match spec.kind.layout() {
        Layout::ByPlatform => dirs
            .into_iter()
            .map(|dir| SearchContext {
                prefix: Some(container.join(dir)),
                suffix: None,
            })
            .collect(),
        Layout::ByComponent => dirs
            .into_iter()
            .map(|dir| SearchContext {
                prefix: Some(container.clone()),
                suffix: Some(PathValue::new(dir)),
            })
            .collect(),
    }
}
