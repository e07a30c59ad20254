//! Catalog-time specs and resolution-time chains.
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::path::PathValue;

/// How a preference is materialized at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Symlink pointing at the source.
    #[default]
    Link,
    /// Independent copy of the source.
    Copy,
}

/// Where platform overlay directories sit relative to a spec's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// `container/<platform>/src`
    #[default]
    ByPlatform,
    /// `container/src/<platform>`
    ByComponent,
}

/// Options carried by preference specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefOptions {
    /// Link or copy.
    pub kind: LinkKind,
    /// Whether the broken-symlink scanner may clean the destination root.
    pub autoclean: bool,
    /// Overlay layout policy.
    pub layout: Layout,
}

impl Default for PrefOptions {
    fn default() -> Self {
        Self {
            kind: LinkKind::Link,
            autoclean: true,
            layout: Layout::ByPlatform,
        }
    }
}

/// Options carried by template specs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TmplOptions {
    /// Values substituted into the template.
    pub values: BTreeMap<String, String>,
}

/// What a spec installs, with its kind-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKind {
    /// Symlinked or copied file set.
    Preference(PrefOptions),
    /// Rendered once from a template.
    Template(TmplOptions),
    /// Text block toggled inside an existing file.
    Snippet,
}

impl SpecKind {
    /// Overlay layout; only preferences can opt into
    /// [`Layout::ByComponent`].
    #[must_use]
    pub const fn layout(&self) -> Layout {
        match self {
            Self::Preference(options) => options.layout,
            Self::Template(_) | Self::Snippet => Layout::ByPlatform,
        }
    }
}

/// Declarative binding of a source location to a destination location.
///
/// `src` may be relative to the owning cookbook's container; `dst` may start
/// with `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    /// Source, relative to the container or absolute.
    pub src: PathValue,
    /// Destination, possibly home-relative.
    pub dst: PathValue,
    /// Kind and options.
    pub kind: SpecKind,
}

impl Spec {
    /// A preference spec.
    #[must_use]
    pub fn preference(src: impl Into<PathValue>, dst: impl Into<PathValue>, options: PrefOptions) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            kind: SpecKind::Preference(options),
        }
    }

    /// A template spec.
    #[must_use]
    pub fn template(
        src: impl Into<PathValue>,
        dst: impl Into<PathValue>,
        values: BTreeMap<String, String>,
    ) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            kind: SpecKind::Template(TmplOptions { values }),
        }
    }

    /// A snippet spec.
    #[must_use]
    pub fn snippet(src: impl Into<PathValue>, dst: impl Into<PathValue>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            kind: SpecKind::Snippet,
        }
    }

    /// Same kind and options with new endpoints.
    #[must_use]
    pub fn rebind(&self, src: PathValue, dst: PathValue) -> Self {
        Self {
            src,
            dst,
            kind: self.kind.clone(),
        }
    }

    /// Preference options, if this is a preference spec.
    #[must_use]
    pub const fn pref_options(&self) -> Option<&PrefOptions> {
        match &self.kind {
            SpecKind::Preference(options) => Some(options),
            _ => None,
        }
    }

    /// Bind one concrete file pair, carrying this spec's options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativePath`] if either end is relative.
    pub fn chain(&self, src: PathValue, dst: PathValue) -> Result<Chain, ConfigError> {
        if let Some(relative) = [&src, &dst].into_iter().find(|p| !p.is_absolute()) {
            return Err(ConfigError::RelativePath(relative.to_string()));
        }
        Ok(Chain {
            src,
            dst,
            kind: self.kind.clone(),
        })
    }
}

/// A resolved single-file binding; both ends are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Absolute source file.
    pub src: PathValue,
    /// Absolute destination file.
    pub dst: PathValue,
    /// Kind and options inherited from the spec.
    pub kind: SpecKind,
}

impl Chain {
    /// Link kind for preference chains; `None` otherwise.
    #[must_use]
    pub const fn link_kind(&self) -> Option<LinkKind> {
        match &self.kind {
            SpecKind::Preference(options) => Some(options.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pref_options_defaults() {
        let options = PrefOptions::default();
        assert_eq!(options.kind, LinkKind::Link);
        assert!(options.autoclean);
        assert_eq!(options.layout, Layout::ByPlatform);
    }

    #[test]
    fn chain_preserves_options() {
        let options = PrefOptions {
            kind: LinkKind::Copy,
            autoclean: false,
            layout: Layout::ByComponent,
        };
        let spec = Spec::preference("gradle", "~/.gradle", options.clone());
        let chain = spec.chain(
            PathValue::new("/repo/vault/gradle/default/gradle/gradle.properties"),
            PathValue::new("/home/me/.gradle/gradle.properties"),
        )
        .unwrap();
        assert_eq!(chain.kind, SpecKind::Preference(options));
        assert_eq!(chain.link_kind(), Some(LinkKind::Copy));
    }

    #[test]
    fn template_chain_carries_values() {
        let values = BTreeMap::from([("cache".to_string(), "/c".to_string())]);
        let spec = Spec::template("vimrc", "~/.vimrc", values.clone());
        let chain = spec
            .chain(PathValue::new("/v/vimrc"), PathValue::new("/h/.vimrc"))
            .unwrap();
        assert_eq!(chain.kind, SpecKind::Template(TmplOptions { values }));
        assert_eq!(chain.link_kind(), None);
    }

    #[test]
    fn relative_chain_end_is_rejected() {
        let spec = Spec::snippet("zshrc", "~/.zshrc");
        let err = spec
            .chain(PathValue::new("/v/zshrc"), PathValue::new("home/.zshrc"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::RelativePath(ref p) if p == "home/.zshrc"));
        assert!(
            spec.chain(PathValue::new("zshrc"), PathValue::new("/h/.zshrc"))
                .is_err()
        );
    }

    #[test]
    fn only_preferences_use_component_layout() {
        let pref = Spec::preference(
            "bash",
            "~",
            PrefOptions {
                layout: Layout::ByComponent,
                ..PrefOptions::default()
            },
        );
        assert_eq!(pref.kind.layout(), Layout::ByComponent);
        assert_eq!(Spec::snippet("a", "b").kind.layout(), Layout::ByPlatform);
    }

    #[test]
    fn rebind_keeps_kind() {
        let spec = Spec::snippet("zshrc", "~/.zshrc");
        let moved = spec.rebind(PathValue::new("other"), PathValue::new("~/.zprofile"));
        assert_eq!(moved.kind, SpecKind::Snippet);
        assert_eq!(moved.dst, PathValue::new("~/.zprofile"));
    }
}
