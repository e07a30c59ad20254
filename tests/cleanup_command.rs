#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
#![cfg(unix)]
//! Integration tests for broken-symlink cleanup, both as the `cleanup`
//! command and as the pre-step of `link`.

mod common;

use std::fs;
use std::os::unix::fs::symlink;

use common::*;
use xake_cli::cli::LinkOpts;
use xake_cli::commands::cleanup::cleanup;
use xake_cli::commands::link::link;
use xake_cli::platform::Platform;

const CATALOG: &str = r#"
[[cookbook]]
name = "NvimCookBook"

[[cookbook.prefs]]
src = "nvim"
dst = "~/.config/nvim"

[[cookbook]]
name = "SshCookBook"

[[cookbook.prefs]]
src = "ssh"
dst = "~/.ssh"
autoclean = false
"#;

fn repo() -> TestRepo {
    let repo = TestRepo::new()
        .with_catalog(CATALOG)
        .with_file("vault/NvimCookBook/default/nvim/init.lua", "")
        .with_file("vault/SshCookBook/default/ssh/config", "")
        .with_home_file(".config/nvim/notes.txt", "keep me")
        .with_home_file(".ssh/known_hosts", "");
    let nvim = repo.home_path(".config/nvim");
    symlink(nvim.join("notes.txt"), nvim.join("valid")).unwrap();
    symlink(nvim.join("deleted.lua"), nvim.join("broken")).unwrap();
    symlink("/nonexistent/key", repo.home_path(".ssh/stale")).unwrap();
    repo
}

fn exists(path: &std::path::Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[test]
fn cleanup_removes_only_broken_links_including_opted_out_roots() {
    let repo = repo();
    let config = repo.config();
    let (ctx, log) = repo.context(Platform::Default, false);

    cleanup(&books(&config, Platform::Default), &ctx).unwrap();

    assert!(!exists(&repo.home_path(".config/nvim/broken")));
    assert!(!exists(&repo.home_path(".ssh/stale")));
    assert!(exists(&repo.home_path(".config/nvim/valid")));
    assert_eq!(read(&repo.home_path(".config/nvim/notes.txt")), "keep me");
    assert!(log.contains_at("PROGRESS", "Scanning broken symlinks..."));
    assert!(log.contains_at("INFO", "Found 2 broken symlinks"));
}

#[test]
fn link_precleanup_respects_autoclean() {
    let repo = repo();
    let config = repo.config();
    let (ctx, log) = repo.context(Platform::Default, false);

    link(&books(&config, Platform::Default), &ctx, &LinkOpts::default()).unwrap();

    assert!(!exists(&repo.home_path(".config/nvim/broken")));
    assert!(exists(&repo.home_path(".ssh/stale")));
    assert!(log.contains_at("INFO", "Found 1 broken symlinks"));
    assert!(exists(&repo.home_path(".config/nvim/init.lua")));
}

#[test]
fn no_cleanup_leaves_broken_links() {
    let repo = repo();
    let config = repo.config();
    let (ctx, log) = repo.context(Platform::Default, false);
    let opts = LinkOpts {
        no_cleanup: true,
        ..LinkOpts::default()
    };

    link(&books(&config, Platform::Default), &ctx, &opts).unwrap();

    assert!(exists(&repo.home_path(".config/nvim/broken")));
    assert!(log.at("PROGRESS").is_empty());
}

#[test]
fn dry_run_cleanup_only_reports() {
    let repo = repo();
    let config = repo.config();
    let (ctx, log) = repo.context(Platform::Default, true);

    cleanup(&books(&config, Platform::Default), &ctx).unwrap();

    assert!(exists(&repo.home_path(".config/nvim/broken")));
    assert!(log.contains_at("DRY", "rm -rf"));
}
