//! Command-line surface of `xake`.
use std::io::IsTerminal as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::platform::Platform;

/// Version string: `XAKE_VERSION` from the build script, else the package
/// version.
pub const VERSION: &str = match option_env!("XAKE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "xake",
    about = "Cookbook-driven home directory provisioning",
    version = VERSION
)]
pub struct Cli {
    /// Subcommand to run; help is printed when absent.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Global options.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Override repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override platform detection (darwin, linux, default)
    #[arg(long, global = true)]
    pub platform: Option<Platform>,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

/// `--color` setting.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    /// Whether ANSI escapes should be emitted.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List preference chains for this platform
    #[command(visible_alias = "status")]
    List(ListOpts),
    /// Install every cookbook
    Link(LinkOpts),
    /// Uninstall every cookbook in reverse order
    Unlink(UnlinkOpts),
    /// Remove broken symlinks under preference destinations
    Cleanup,
    /// Print a shell completion script
    Completion(CompletionOpts),
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Link(_) => "link",
            Self::Unlink(_) => "unlink",
            Self::Cleanup => "cleanup",
            Self::Completion(_) => "completion",
        }
    }
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ListOpts {
    /// Print `DST -> SRC`
    #[arg(short, long)]
    pub long: bool,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
#[allow(clippy::struct_field_names)]
pub struct LinkOpts {
    /// Skip the broken-symlink cleanup before linking
    #[arg(long)]
    pub no_cleanup: bool,

    /// Skip cookbook activate hooks
    #[arg(long)]
    pub no_activate: bool,
}

/// Options for the `unlink` subcommand.
#[derive(Parser, Debug, Clone, Default)]
#[allow(clippy::struct_field_names)]
pub struct UnlinkOpts {
    /// Skip the broken-symlink cleanup before unlinking
    #[arg(long)]
    pub no_cleanup: bool,

    /// Skip cookbook deactivate hooks
    #[arg(long)]
    pub no_deactivate: bool,
}

/// Options for the `completion` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses_to_none() {
        let cli = Cli::parse_from(["xake"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_link_dry_run_short() {
        let cli = Cli::parse_from(["xake", "-n", "link"]);
        assert!(cli.global.dry_run);
        assert!(matches!(cli.command, Some(Command::Link(_))));
    }

    #[test]
    fn parse_link_opt_outs() {
        let cli = Cli::parse_from(["xake", "link", "--no-cleanup", "--no-activate"]);
        let Some(Command::Link(opts)) = cli.command else {
            panic!("expected link");
        };
        assert!(opts.no_cleanup);
        assert!(opts.no_activate);
    }

    #[test]
    fn parse_unlink_opt_outs() {
        let cli = Cli::parse_from(["xake", "unlink", "--no-deactivate"]);
        let Some(Command::Unlink(opts)) = cli.command else {
            panic!("expected unlink");
        };
        assert!(!opts.no_cleanup);
        assert!(opts.no_deactivate);
    }

    #[test]
    fn status_is_an_alias_of_list() {
        let cli = Cli::parse_from(["xake", "status", "-l"]);
        let Some(Command::List(opts)) = cli.command else {
            panic!("expected list");
        };
        assert!(opts.long);
    }

    #[test]
    fn parse_platform_override() {
        let cli = Cli::parse_from(["xake", "--platform", "darwin", "list"]);
        assert_eq!(cli.global.platform, Some(Platform::Darwin));
    }

    #[test]
    fn rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["xake", "--platform", "plan9", "list"]).is_err());
    }

    #[test]
    fn parse_color_and_root() {
        let cli = Cli::parse_from(["xake", "--color", "never", "--root", "/tmp/repo", "cleanup"]);
        assert_eq!(cli.global.color, ColorMode::Never);
        assert!(!cli.global.color.enabled());
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(cli.command.as_ref().map(Command::name), Some("cleanup"));
    }

    #[test]
    fn color_defaults_to_auto() {
        let cli = Cli::parse_from(["xake", "list"]);
        assert_eq!(cli.global.color, ColorMode::Auto);
    }

    #[test]
    fn parse_completion_shell() {
        let cli = Cli::parse_from(["xake", "completion", "zsh"]);
        let Some(Command::Completion(opts)) = cli.command else {
            panic!("expected completion");
        };
        assert_eq!(opts.shell, Shell::Zsh);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["xake", "-v", "link"]);
        assert!(cli.verbose);
    }
}
