//! The cookbook catalog: immutable specs and hooks, grouped per tool.
//!
//! A [`Registry`] is built once per invocation (see
//! [`config::Config::load`](crate::config::Config::load)) and passed by
//! reference into the engine.
pub mod hook;
pub mod spec;

use std::fmt;

use anyhow::Result;

use crate::path::PathValue;
use crate::platform::Platform;

pub use hook::{Hook, HookContext, HookSlot, HookStep, StepHook};
pub use spec::{Chain, Layout, LinkKind, PrefOptions, Spec, SpecKind, TmplOptions};

/// Optional lifecycle callbacks of a cookbook.
#[derive(Default)]
pub struct Hooks {
    /// Runs before the cookbook's preferences are installed.
    pub setup: Option<Box<dyn Hook>>,
    /// Runs after the cookbook is installed.
    pub activate: Option<Box<dyn Hook>>,
    /// Runs before the cookbook is uninstalled.
    pub deactivate: Option<Box<dyn Hook>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("setup", &self.setup.is_some())
            .field("activate", &self.activate.is_some())
            .field("deactivate", &self.deactivate.is_some())
            .finish()
    }
}

impl Hooks {
    /// The hook occupying `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: HookSlot) -> Option<&dyn Hook> {
        match slot {
            HookSlot::Setup => self.setup.as_deref(),
            HookSlot::Activate => self.activate.as_deref(),
            HookSlot::Deactivate => self.deactivate.as_deref(),
        }
    }
}

/// Named bundle of specs and hooks for one tool.
#[derive(Debug)]
pub struct CookBook {
    /// Unique name, e.g. `GitCookBook`.
    pub name: String,
    /// Platforms the cookbook applies to; `None` means all.
    pub platforms: Option<Vec<Platform>>,
    /// Absolute base directory for relative spec sources.
    pub container: PathValue,
    /// Preference specs.
    pub prefs: Vec<Spec>,
    /// Snippet specs.
    pub snips: Vec<Spec>,
    /// Template specs.
    pub tmpls: Vec<Spec>,
    /// Lifecycle hooks.
    pub hooks: Hooks,
}

impl CookBook {
    /// An empty cookbook rooted at `container`.
    #[must_use]
    pub fn new(name: impl Into<String>, container: impl Into<PathValue>) -> Self {
        Self {
            name: name.into(),
            platforms: None,
            container: container.into(),
            prefs: Vec::new(),
            snips: Vec::new(),
            tmpls: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    /// Restrict to `platforms`.
    #[must_use]
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    /// Append a spec to the list matching its kind.
    #[must_use]
    pub fn with_spec(mut self, spec: Spec) -> Self {
        match spec.kind {
            SpecKind::Preference(_) => self.prefs.push(spec),
            SpecKind::Template(_) => self.tmpls.push(spec),
            SpecKind::Snippet => self.snips.push(spec),
        }
        self
    }

    /// Fill a hook slot.
    #[must_use]
    pub fn with_hook(mut self, slot: HookSlot, hook: Box<dyn Hook>) -> Self {
        let target = match slot {
            HookSlot::Setup => &mut self.hooks.setup,
            HookSlot::Activate => &mut self.hooks.activate,
            HookSlot::Deactivate => &mut self.hooks.deactivate,
        };
        *target = Some(hook);
        self
    }

    /// Whether the cookbook applies on `platform`.
    #[must_use]
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms
            .as_ref()
            .is_none_or(|platforms| platforms.contains(&platform))
    }

    /// Invoke the hook in `slot`. An empty slot is a no-op returning
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Propagates the hook's failure unchanged.
    pub fn run_hook(&self, slot: HookSlot, ctx: &HookContext) -> Result<bool> {
        match self.hooks.get(slot) {
            Some(hook) => hook.run(ctx).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Ordered, read-only set of cookbooks.
#[derive(Debug, Default)]
pub struct Registry {
    cookbooks: Vec<CookBook>,
}

impl Registry {
    /// Wrap cookbooks in declaration order.
    #[must_use]
    pub const fn new(cookbooks: Vec<CookBook>) -> Self {
        Self { cookbooks }
    }

    /// All cookbooks in declaration order.
    #[must_use]
    pub fn cookbooks(&self) -> &[CookBook] {
        &self.cookbooks
    }

    /// Cookbooks applicable on `platform`, in declaration order.
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Vec<&CookBook> {
        self.cookbooks
            .iter()
            .filter(|book| book.supports(platform))
            .collect()
    }

    /// Number of cookbooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookbooks.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookbooks.is_empty()
    }
}
