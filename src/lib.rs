//! Cookbook-driven home directory provisioning.
//!
//! A catalog of cookbooks in `conf/cookbooks.toml` declares which files of
//! the repository's vault are linked, copied, rendered or appended into the
//! home directory, with per-platform overlays and broken-symlink cleanup.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** parses the catalog file into a [`catalog::Registry`]
//! - **[`resolve`]** turns catalog specs into file-level chains
//! - **[`resources`]** holds idempotent `check + apply/remove` primitives
//! - **[`tasks`]** runs resources per cookbook and records outcomes
//! - **[`commands`]** orchestrates `list`, `link`, `unlink` and `cleanup`
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod path;
pub mod platform;
pub mod render;
pub mod resolve;
pub mod resources;
pub mod scanner;
pub mod tasks;
