//! Cookbook catalog schema (`conf/cookbooks.toml`) and its conversion into
//! [`CookBook`] values.
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::catalog::{CookBook, HookSlot, HookStep, Layout, LinkKind, PrefOptions, Spec, StepHook};
use crate::error::ConfigError;
use crate::path::PathValue;
use crate::platform::Platform;
use crate::resolve::glob;

/// Top-level document: an ordered array of `[[cookbook]]` tables.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Cookbooks in declaration order.
    #[serde(default, rename = "cookbook")]
    pub cookbooks: Vec<CookBookEntry>,
}

/// One `[[cookbook]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookBookEntry {
    /// Unique cookbook name.
    pub name: String,
    /// Container directory relative to the repository root.
    #[serde(default)]
    pub container: Option<String>,
    /// Platforms the cookbook applies to; absent means all.
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
    /// Preference entries.
    #[serde(default)]
    pub prefs: Vec<PrefEntry>,
    /// Snippet entries.
    #[serde(default)]
    pub snips: Vec<SnipEntry>,
    /// Template entries.
    #[serde(default)]
    pub tmpls: Vec<TmplEntry>,
    /// Steps run before preferences are installed.
    #[serde(default)]
    pub setup: Vec<StepEntry>,
    /// Steps run after the cookbook is installed.
    #[serde(default)]
    pub activate: Vec<StepEntry>,
    /// Steps run before the cookbook is uninstalled.
    #[serde(default)]
    pub deactivate: Vec<StepEntry>,
}

/// A `[[cookbook.prefs]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefEntry {
    /// Source, relative to the container or absolute.
    pub src: String,
    /// Literal destination.
    #[serde(default)]
    pub dst: Option<String>,
    /// Destination glob, expanded at load time.
    #[serde(default)]
    pub glob: Option<String>,
    /// Sub-paths fanned out under every glob match.
    #[serde(default)]
    pub children: Vec<String>,
    /// Link or copy.
    #[serde(default)]
    pub kind: LinkKind,
    /// Broken-symlink scanner eligibility.
    #[serde(default = "default_autoclean")]
    pub autoclean: bool,
    /// Overlay layout.
    #[serde(default)]
    pub layout: Layout,
}

const fn default_autoclean() -> bool {
    true
}

/// A `[[cookbook.snips]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnipEntry {
    /// Snippet source.
    pub src: String,
    /// File the snippet is toggled in.
    pub dst: String,
}

/// A `[[cookbook.tmpls]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TmplEntry {
    /// Template source.
    pub src: String,
    /// Rendered output.
    pub dst: String,
    /// Placeholder values.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// One hook step; the variant is selected by which key is present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    /// `{ run = ["rustup", "default", "stable"], requires = "rustup" }`
    Run {
        /// Program and arguments.
        run: Vec<String>,
        /// Working directory.
        #[serde(default)]
        cwd: Option<String>,
        /// Extra environment.
        #[serde(default)]
        env: BTreeMap<String, String>,
        /// Binary that must be on `PATH`.
        #[serde(default)]
        requires: Option<String>,
    },
    /// `{ mkdir = "~/.cache/zsh", mode = 0o700 }`
    Mkdir {
        /// Directory to create.
        mkdir: String,
        /// Permission bits.
        #[serde(default)]
        mode: Option<u32>,
    },
    /// `{ touch = "~/.hushlogin" }`
    Touch {
        /// File to create.
        touch: String,
    },
    /// `{ symlink = "~/.zsh_history", target = "~/.cache/zsh/history" }`
    Symlink {
        /// Link location.
        symlink: String,
        /// Link target.
        target: String,
    },
}

impl From<StepEntry> for HookStep {
    fn from(entry: StepEntry) -> Self {
        match entry {
            StepEntry::Run {
                run,
                cwd,
                env,
                requires,
            } => Self::Run {
                argv: run,
                cwd: cwd.map(PathValue::from),
                env,
                requires,
            },
            StepEntry::Mkdir { mkdir, mode } => Self::Mkdir {
                path: PathValue::new(mkdir),
                mode,
            },
            StepEntry::Touch { touch } => Self::Touch {
                path: PathValue::new(touch),
            },
            StepEntry::Symlink { symlink, target } => Self::Symlink {
                link: PathValue::new(symlink),
                target: PathValue::new(target),
            },
        }
    }
}

impl PrefEntry {
    /// Specs for this entry; glob entries expand against the live
    /// filesystem.
    fn into_specs(self, cookbook: &str, home: Option<&Path>) -> Result<Vec<Spec>, ConfigError> {
        let options = PrefOptions {
            kind: self.kind,
            autoclean: self.autoclean,
            layout: self.layout,
        };
        match (self.dst, self.glob) {
            (Some(dst), None) => {
                if !self.children.is_empty() {
                    return Err(ConfigError::InvalidEntry {
                        cookbook: cookbook.to_string(),
                        message: format!("'children' requires 'glob' (src = {})", self.src),
                    });
                }
                Ok(vec![Spec::preference(self.src, dst, options)])
            }
            (None, Some(pattern)) => {
                let template = Spec::preference(self.src, pattern.as_str(), options);
                if self.children.is_empty() {
                    glob::expand(&template, &pattern, home)
                } else {
                    glob::expand_children(&template, &pattern, &self.children, home)
                }
            }
            _ => Err(ConfigError::InvalidEntry {
                cookbook: cookbook.to_string(),
                message: format!("exactly one of 'dst' or 'glob' is required (src = {})", self.src),
            }),
        }
    }
}

impl CookBookEntry {
    /// Build the cookbook, resolving `container` against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error for structurally invalid entries and bad glob
    /// patterns.
    pub fn into_cookbook(self, root: &Path, home: Option<&Path>) -> Result<CookBook, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidEntry {
                cookbook: self.name,
                message: "name must not be empty".to_string(),
            });
        }
        let container = self
            .container
            .unwrap_or_else(|| format!("vault/{}", self.name));
        let mut book = CookBook::new(self.name.as_str(), PathValue::new(root.join(container)));
        if let Some(platforms) = self.platforms {
            book = book.with_platforms(platforms);
        }
        for pref in self.prefs {
            for spec in pref.into_specs(&self.name, home)? {
                book = book.with_spec(spec);
            }
        }
        for snip in self.snips {
            book = book.with_spec(Spec::snippet(snip.src, snip.dst));
        }
        for tmpl in self.tmpls {
            book = book.with_spec(Spec::template(tmpl.src, tmpl.dst, tmpl.values));
        }
        for (slot, steps) in [
            (HookSlot::Setup, self.setup),
            (HookSlot::Activate, self.activate),
            (HookSlot::Deactivate, self.deactivate),
        ] {
            if !steps.is_empty() {
                let steps = steps.into_iter().map(HookStep::from).collect();
                book = book.with_hook(slot, Box::new(StepHook::new(steps)));
            }
        }
        Ok(book)
    }
}

/// Convert every entry, rejecting duplicate names.
///
/// # Errors
///
/// Returns the first conversion error, or
/// [`ConfigError::DuplicateCookBook`].
pub fn build(
    file: CatalogFile,
    root: &Path,
    home: Option<&Path>,
) -> Result<Vec<CookBook>, ConfigError> {
    let mut names = HashSet::new();
    file.cookbooks
        .into_iter()
        .map(|entry| {
            if !names.insert(entry.name.clone()) {
                return Err(ConfigError::DuplicateCookBook(entry.name));
            }
            entry.into_cookbook(root, home)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::SpecKind;

    fn parse(text: &str) -> CatalogFile {
        toml::from_str(text).unwrap()
    }

    fn books(text: &str) -> Result<Vec<CookBook>, ConfigError> {
        build(parse(text), Path::new("/repo"), Some(Path::new("/home/me")))
    }

    #[test]
    fn defaults_are_applied() {
        let books = books(
            r#"
[[cookbook]]
name = "GitCookBook"

[[cookbook.prefs]]
src = "git/"
dst = "~/.config/git/"
"#,
        )
        .unwrap();
        let git = &books[0];
        assert_eq!(git.container, PathValue::new("/repo/vault/GitCookBook"));
        assert!(git.platforms.is_none());
        assert_eq!(
            git.prefs[0].kind,
            SpecKind::Preference(PrefOptions::default())
        );
    }

    #[test]
    fn full_cookbook_parses() {
        let books = books(
            r#"
[[cookbook]]
name = "ZshCookBook"
container = "vault/zsh"
platforms = ["darwin", "linux"]

[[cookbook.prefs]]
src = "zsh"
dst = "~"
kind = "copy"
autoclean = false
layout = "by-component"

[[cookbook.snips]]
src = "zshrc.snip"
dst = "~/.zshrc"

[[cookbook.tmpls]]
src = "zshenv"
dst = "~/.zshenv"
values = { cache = "~/.cache/zsh" }

[[cookbook.setup]]
mkdir = "~/.cache/zsh"
mode = 0o700

[[cookbook.activate]]
run = ["zsh", "-c", "compinit"]
requires = "zsh"

[[cookbook.activate]]
symlink = "~/.zsh_history"
target = "~/.cache/zsh/history"

[[cookbook.deactivate]]
touch = "~/.zsh_removed"
"#,
        )
        .unwrap();
        let zsh = &books[0];
        assert_eq!(zsh.container, PathValue::new("/repo/vault/zsh"));
        assert_eq!(zsh.platforms, Some(vec![Platform::Darwin, Platform::Linux]));
        assert_eq!(
            zsh.prefs[0].pref_options(),
            Some(&PrefOptions {
                kind: LinkKind::Copy,
                autoclean: false,
                layout: Layout::ByComponent,
            })
        );
        assert_eq!(zsh.snips.len(), 1);
        assert_eq!(zsh.tmpls.len(), 1);
        assert!(zsh.hooks.setup.is_some());
        assert!(zsh.hooks.activate.is_some());
        assert!(zsh.hooks.deactivate.is_some());
    }

    #[test]
    fn hook_steps_select_variant_by_key() {
        let file = parse(
            r#"
[[cookbook]]
name = "RustCookBook"

[[cookbook.activate]]
run = ["rustup", "default", "stable"]
cwd = "~"
env = { RUSTUP_INIT_SKIP_PATH_CHECK = "yes" }

[[cookbook.activate]]
mkdir = "~/.cargo/bin"
"#,
        );
        let steps: Vec<HookStep> = file
            .cookbooks
            .into_iter()
            .flat_map(|b| b.activate)
            .map(HookStep::from)
            .collect();
        assert!(matches!(&steps[0], HookStep::Run { argv, cwd: Some(_), env, .. }
            if argv[0] == "rustup" && env.len() == 1));
        assert_eq!(
            steps[1],
            HookStep::Mkdir {
                path: PathValue::new("~/.cargo/bin"),
                mode: None,
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = books(
            r#"
[[cookbook]]
name = "VimCookBook"

[[cookbook]]
name = "VimCookBook"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCookBook(name) if name == "VimCookBook"));
    }

    #[test]
    fn dst_and_glob_are_exclusive() {
        for body in [
            "src = \"a\"\ndst = \"~/a\"\nglob = \"~/a*\"",
            "src = \"a\"",
            "src = \"a\"\ndst = \"~/a\"\nchildren = [\"x\"]",
        ] {
            let text = format!("[[cookbook]]\nname = \"X\"\n[[cookbook.prefs]]\n{body}\n");
            assert!(
                matches!(books(&text), Err(ConfigError::InvalidEntry { .. })),
                "accepted: {body}"
            );
        }
    }

    #[test]
    fn glob_entries_expand_at_load_time() {
        let home = tempfile::tempdir().unwrap();
        for version in ["GoLand2023.2", "GoLand2023.3"] {
            std::fs::create_dir_all(home.path().join("Library/Preferences").join(version))
                .unwrap();
        }
        let file = parse(
            r#"
[[cookbook]]
name = "GoLandCookBook"

[[cookbook.prefs]]
src = "idea"
glob = "~/Library/Preferences/GoLand*"
children = ["colors", "keymaps", "templates"]
autoclean = false
"#,
        );
        let books = build(file, Path::new("/repo"), Some(home.path())).unwrap();
        assert_eq!(books[0].prefs.len(), 6);
        assert_eq!(books[0].prefs[0].src, PathValue::new("idea/colors"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CatalogFile, _> =
            toml::from_str("[[cookbook]]\nname = \"X\"\ncolour = \"red\"\n");
        assert!(result.is_err());
    }
}
