//! `xake` binary: parse arguments, initialise logging, dispatch.
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use xake_cli::cli::{Cli, Command};
use xake_cli::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let Some(command) = args.command else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    if let Command::Completion(opts) = &command {
        commands::completion::run(opts.shell, &mut std::io::stdout());
        return Ok(());
    }

    let ansi = args.global.color.enabled();
    logging::init_subscriber(args.verbose, command.name(), ansi);
    let log = Arc::new(logging::Logger::new(command.name(), ansi));

    match command {
        Command::List(opts) => commands::list::run(&args.global, &opts, &log),
        Command::Link(opts) => commands::link::run(&args.global, &opts, &log),
        Command::Unlink(opts) => commands::unlink::run(&args.global, &opts, &log),
        Command::Cleanup => commands::cleanup::run(&args.global, &log),
        Command::Completion(_) => Ok(()),
    }
}
