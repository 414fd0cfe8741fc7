//! menuhand - menu coordination and drag-and-drop engine
//!
//! Headless driver: replays scripted input against the menus and writes the
//! emitted events to a JSONL transcript.

mod headless;
mod scripted_input;

use anyhow::{Context, Result};
use headless::HeadlessConfig;
use menuhand_assets::{content_from_file, Content};
use menuhand_menus::MenuConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting menuhand v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }

    let menus = match cli.config.as_deref() {
        Some(path) => MenuConfig::load_from_path(path),
        None => MenuConfig::load(),
    };
    let content = match cli.content.as_deref() {
        Some(path) => content_from_file(path)
            .with_context(|| format!("failed to load content pack {}", path.display()))?,
        None => {
            tracing::warn!("no --content given, running with empty item and power catalogs");
            Content::default()
        }
    };
    if cli.script.is_none() && cli.max_ticks.is_none() {
        tracing::warn!("no --script or --max-ticks given, running a single idle tick");
    }

    let summary = headless::run(HeadlessConfig {
        menus,
        content,
        scripted_input: cli.script,
        max_ticks: cli.max_ticks,
        event_log: cli.event_log,
        exit_when_requested: !cli.ignore_exit,
    })?;

    info!(
        ticks = summary.ticks,
        events = summary.events,
        exit_requested = summary.exit_requested,
        "menuhand run finished"
    );
    Ok(())
}

fn print_usage() {
    println!(
        "usage: menuhand [--config <menus.toml>] [--content <pack.json>] [--script <input.json>]\n\
         \x20               [--max-ticks N] [--event-log <events.jsonl>] [--ignore-exit]"
    );
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    content: Option<PathBuf>,
    script: Option<PathBuf>,
    max_ticks: Option<u64>,
    event_log: Option<PathBuf>,
    ignore_exit: bool,
    help: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => opts.config = path_arg(&mut args, "--config"),
                "--content" => opts.content = path_arg(&mut args, "--content"),
                "--script" | "--scripted-input" => opts.script = path_arg(&mut args, "--script"),
                "--event-log" => opts.event_log = path_arg(&mut args, "--event-log"),
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                "--ignore-exit" => opts.ignore_exit = true,
                "--help" | "-h" => opts.help = true,
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }

        opts
    }
}

fn path_arg<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<PathBuf> {
    match args.next() {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            tracing::error!("{flag} requires a file path");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_paths_and_ticks() {
        let opts = parse(&[
            "--config",
            "menus.toml",
            "--script",
            "run.json",
            "--max-ticks",
            "120",
            "--event-log",
            "out/events.jsonl",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("menus.toml")));
        assert_eq!(opts.script, Some(PathBuf::from("run.json")));
        assert_eq!(opts.max_ticks, Some(120));
        assert_eq!(opts.event_log, Some(PathBuf::from("out/events.jsonl")));
        assert!(!opts.ignore_exit);
    }

    #[test]
    fn bad_values_are_dropped() {
        let opts = parse(&["--max-ticks", "soon", "--content"]);
        assert_eq!(opts.max_ticks, None);
        assert_eq!(opts.content, None);
    }
}
